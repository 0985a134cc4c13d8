//! Rigid transforms.
//!
//! A [`Pose`] is a position plus a unit quaternion. Every operation that
//! composes rotations renormalizes the result so accumulated floating-point
//! drift never leaks into the constraint solver.

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest rotation (radians) a single integration or correction step may
/// apply to a body. Larger requests are scaled down proportionally.
pub const MAX_ROTATION_PER_SUBSTEP: f64 = 0.5;

/// Position and orientation of a rigid body or joint anchor.
///
/// # Example
///
/// ```
/// use xpbd_types::Pose;
/// use nalgebra::{Point3, UnitQuaternion, Vector3};
///
/// let pose = Pose::new(
///     Point3::new(1.0, 0.0, 0.0),
///     UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
/// );
///
/// let world = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((world - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in the parent (usually world) frame.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn new(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pose with the given position and identity rotation.
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Rotate a local vector into the parent frame.
    #[must_use]
    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * v
    }

    /// Rotate a parent-frame vector into the local frame.
    #[must_use]
    pub fn inv_rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.inverse_transform_vector(v)
    }

    /// Transform a local point into the parent frame.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Transform a parent-frame point into the local frame.
    #[must_use]
    pub fn inv_transform_point(&self, world: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.inv_rotate(&(world - self.position)))
    }

    /// Compose `self * other`: `other` is expressed in this pose's frame and
    /// the result is in this pose's parent frame.
    ///
    /// The position of `other` is rotated before it is translated.
    #[must_use]
    pub fn transform_pose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(&other.position),
            rotation: UnitQuaternion::new_normalize(
                self.rotation.into_inner() * other.rotation.into_inner(),
            ),
        }
    }

    /// The inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv = self.rotation.inverse();
        Self {
            position: Point3::from(-(inv * self.position.coords)),
            rotation: inv,
        }
    }

    /// Local X axis expressed in the parent frame.
    #[must_use]
    pub fn axis0(&self) -> Vector3<f64> {
        self.rotation * Vector3::x()
    }

    /// Local Y axis expressed in the parent frame.
    #[must_use]
    pub fn axis1(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// Local Z axis expressed in the parent frame.
    #[must_use]
    pub fn axis2(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Rotate the orientation by the small-angle rotation vector `rot * scale`.
    ///
    /// The step is built from the first-order quaternion update
    /// `q += 0.5 * (rot, 0) * q` followed by renormalization. If
    /// `|rot| * scale` exceeds [`MAX_ROTATION_PER_SUBSTEP`] the scale is
    /// reduced to `MAX_ROTATION_PER_SUBSTEP / |rot|`. Integration and
    /// position-level corrections both go through here so they clamp
    /// identically.
    pub fn apply_rotation(&mut self, rot: &Vector3<f64>, scale: f64) {
        let phi = rot.norm();
        let scale = if phi * scale > MAX_ROTATION_PER_SUBSTEP {
            MAX_ROTATION_PER_SUBSTEP / phi
        } else {
            scale
        };

        let q = self.rotation.into_inner();
        let dq = Quaternion::from_imag(rot * scale) * q;
        self.rotation = UnitQuaternion::new_normalize(q + dq * 0.5);
    }

    /// Check that no component is `NaN` or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}
