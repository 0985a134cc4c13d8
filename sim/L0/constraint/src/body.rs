//! Rigid bodies.
//!
//! A [`Body`] carries its current pose, the pose at the start of the
//! substep (from which velocities are re-derived after constraint solving),
//! velocities, and diagonal inverse mass properties in body-local principal
//! axes.

use std::sync::Arc;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::warn;
use xpbd_collision::CollisionShape;
use xpbd_types::{Pose, SimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a body in the body slice handed to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub usize);

impl BodyId {
    /// Create a body ID.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// A simulated rigid body.
#[derive(Debug, Clone)]
pub struct Body {
    pose: Pose,
    prev_pose: Pose,
    orig_pose: Pose,
    vel: Vector3<f64>,
    omega: Vector3<f64>,
    inv_mass: f64,
    inv_inertia: Vector3<f64>,
    is_static: bool,
    shape: Option<Arc<CollisionShape>>,
}

impl Body {
    /// Dynamic body at `pose` with unit inverse mass and inertia.
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            prev_pose: pose,
            orig_pose: pose,
            vel: Vector3::zeros(),
            omega: Vector3::zeros(),
            inv_mass: 1.0,
            inv_inertia: Vector3::repeat(1.0),
            is_static: false,
            shape: None,
        }
    }

    /// Immovable body at `pose`.
    #[must_use]
    pub fn new_static(pose: Pose) -> Self {
        Self {
            is_static: true,
            ..Self::new(pose)
        }
    }

    /// Attach a collision shape.
    #[must_use]
    pub fn with_shape(mut self, shape: Arc<CollisionShape>) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Set the initial linear velocity.
    #[must_use]
    pub fn with_velocity(mut self, vel: Vector3<f64>) -> Self {
        self.vel = vel;
        self
    }

    /// Set the initial angular velocity.
    #[must_use]
    pub fn with_angular_velocity(mut self, omega: Vector3<f64>) -> Self {
        self.omega = omega;
        self
    }

    /// Derive mass properties from a solid box of the given full size and
    /// density.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidMassProperties`] for non-positive or non-finite
    /// size or density.
    pub fn set_box(&mut self, size: Vector3<f64>, density: f64) -> Result<(), SimError> {
        if size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(SimError::invalid_mass(format!(
                "box size must be positive, got {size:?}"
            )));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(SimError::invalid_mass(format!(
                "density must be positive, got {density}"
            )));
        }

        let mut mass = size.x * size.y * size.z * density;
        self.inv_mass = 1.0 / mass;
        mass /= 12.0;
        self.inv_inertia = Vector3::new(
            1.0 / (size.y * size.y + size.z * size.z) / mass,
            1.0 / (size.z * size.z + size.x * size.x) / mass,
            1.0 / (size.x * size.x + size.y * size.y) / mass,
        );
        Ok(())
    }

    /// Builder form of [`Body::set_box`].
    pub fn with_box(mut self, size: Vector3<f64>, density: f64) -> Result<Self, SimError> {
        self.set_box(size, density)?;
        Ok(self)
    }

    /// Mark the body static (immovable) or dynamic.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    /// Whether the body is static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Pose at the start of the current substep.
    #[must_use]
    pub fn prev_pose(&self) -> &Pose {
        &self.prev_pose
    }

    /// Pose the body was created with.
    #[must_use]
    pub fn orig_pose(&self) -> &Pose {
        &self.orig_pose
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Point3<f64> {
        self.pose.position
    }

    /// Current orientation.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.pose.rotation
    }

    /// Linear velocity.
    #[must_use]
    pub fn velocity(&self) -> Vector3<f64> {
        self.vel
    }

    /// Angular velocity (world frame).
    #[must_use]
    pub fn angular_velocity(&self) -> Vector3<f64> {
        self.omega
    }

    /// Inverse mass as configured (ignores the static flag).
    #[must_use]
    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    /// Diagonal inverse inertia in body-local axes.
    #[must_use]
    pub fn inv_inertia(&self) -> Vector3<f64> {
        self.inv_inertia
    }

    /// Attached collision shape.
    #[must_use]
    pub fn shape(&self) -> Option<&CollisionShape> {
        self.shape.as_deref()
    }

    /// Teleport the body. Also resets the previous pose so no velocity is
    /// implied by the jump.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.prev_pose = pose;
    }

    /// Set the linear velocity.
    pub fn set_velocity(&mut self, vel: Vector3<f64>) {
        self.vel = vel;
    }

    /// Set the angular velocity.
    pub fn set_angular_velocity(&mut self, omega: Vector3<f64>) {
        self.omega = omega;
    }

    /// Advance the pose by one substep of free motion.
    pub fn integrate(&mut self, dt: f64, gravity: &Vector3<f64>) {
        self.prev_pose = self.pose;
        if self.is_static {
            return;
        }
        self.vel += gravity * dt;
        self.pose.position += self.vel * dt;
        self.pose.apply_rotation(&self.omega, dt);
    }

    /// Re-derive velocities from the pose change over the substep.
    pub fn update(&mut self, dt: f64) {
        if self.is_static {
            return;
        }
        self.vel = (self.pose.position - self.prev_pose.position) / dt;

        let dq = self.pose.rotation.into_inner() * self.prev_pose.rotation.conjugate().into_inner();
        self.omega = dq.imag() * (2.0 / dt);
        if dq.w < 0.0 {
            self.omega = -self.omega;
        }

        if !self.vel.iter().chain(self.omega.iter()).all(|v| v.is_finite()) {
            warn!(
                position = ?self.pose.position,
                "body velocity is no longer finite"
            );
        }
    }

    /// Velocity of the material point currently at `point`.
    #[must_use]
    pub fn velocity_at(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.vel - (point - self.pose.position).cross(&self.omega)
    }

    /// Generalized inverse mass along `normal`, optionally at a world point.
    ///
    /// Without a point only the rotational term `nᵀ R I⁻¹ Rᵀ n` is returned.
    /// With a point the lever arm `(point - position) × normal` replaces `n`
    /// and the linear inverse mass is added. Static bodies return 0.
    #[must_use]
    pub fn inverse_mass(&self, normal: &Vector3<f64>, point: Option<&Point3<f64>>) -> f64 {
        if self.is_static {
            return 0.0;
        }
        let n = match point {
            Some(p) => (p - self.pose.position).cross(normal),
            None => *normal,
        };
        let n = self.pose.inv_rotate(&n);
        let mut w = n.component_mul(&n).dot(&self.inv_inertia);
        if point.is_some() {
            w += self.inv_mass;
        }
        w
    }

    /// Apply a world-space correction impulse, optionally at a world point.
    ///
    /// At position level the pose moves; at velocity level the velocities
    /// change. Static bodies ignore corrections.
    pub fn apply_correction(
        &mut self,
        corr: &Vector3<f64>,
        point: Option<&Point3<f64>>,
        velocity_level: bool,
    ) {
        if self.is_static {
            return;
        }
        let dq = match point {
            Some(p) => {
                if velocity_level {
                    self.vel += corr * self.inv_mass;
                } else {
                    self.pose.position += corr * self.inv_mass;
                }
                (p - self.pose.position).cross(corr)
            }
            None => *corr,
        };

        let dq = self
            .pose
            .rotate(&self.pose.inv_rotate(&dq).component_mul(&self.inv_inertia));
        if velocity_level {
            self.omega += dq;
        } else {
            self.pose.apply_rotation(&dq, 1.0);
        }
    }
}

/// Mutable access to up to two distinct bodies of a slice.
///
/// Empty slots, out-of-range IDs and a repeated ID in the second slot come
/// back as `None`.
pub fn body_pair_mut(
    bodies: &mut [Body],
    first: Option<BodyId>,
    second: Option<BodyId>,
) -> (Option<&mut Body>, Option<&mut Body>) {
    match (first, second) {
        (Some(a), Some(b)) if a != b => {
            let (i, j) = (a.0, b.0);
            if j >= bodies.len() {
                return (bodies.get_mut(i), None);
            }
            if i >= bodies.len() {
                return (None, bodies.get_mut(j));
            }
            if i < j {
                let (lo, hi) = bodies.split_at_mut(j);
                (lo.get_mut(i), hi.first_mut())
            } else {
                let (lo, hi) = bodies.split_at_mut(i);
                (hi.first_mut(), lo.get_mut(j))
            }
        }
        (Some(a), _) => (bodies.get_mut(a.0), None),
        (None, Some(b)) => (None, bodies.get_mut(b.0)),
        (None, None) => (None, None),
    }
}
