//! Joint types and their XPBD position and velocity solves.
//!
//! A [`Joint`] ties an anchor pose on one body to an anchor pose on another.
//! Either slot may be empty, in which case its anchor is a fixed point in
//! the world with infinite mass. Joints are built once through
//! [`JointBuilder`] and their configuration cannot change afterwards.
//!
//! # Solve order
//!
//! [`Joint::solve_pos`] applies the orientation term for the joint type
//! (with limits), then the position attachment. [`Joint::solve_vel`] applies
//! rotational and positional damping. Anchor poses are recomputed from the
//! bodies before every term that reads them.

use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;
use xpbd_types::{Pose, SimError};

use crate::body::{body_pair_mut, Body, BodyId};
use crate::correction::apply_body_pair_correction;
use crate::limits::{limit_angle, AngleLimit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type of joint constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointType {
    /// Ball and socket: anchors coincide, rotation is free up to the
    /// optional swing and twist limits.
    Spherical,
    /// Anchors coincide and the anchor X axes stay aligned. The optional
    /// swing limit bounds rotation about that axis.
    Hinge,
    /// Anchors coincide and relative rotation is locked.
    Fixed,
}

impl JointType {
    /// Number of rotational degrees of freedom left free.
    #[must_use]
    pub const fn rotational_dof(self) -> usize {
        match self {
            Self::Spherical => 3,
            Self::Hinge => 1,
            Self::Fixed => 0,
        }
    }
}

/// Stiffness, damping and limits of a joint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointConfig {
    /// Compliance of the attachment and of the fixed orientation term.
    pub compliance: f64,
    /// Rotational damping coefficient (1/s).
    pub rot_damping: f64,
    /// Positional damping coefficient (1/s).
    pub pos_damping: f64,
    /// Swing limit, if enabled.
    pub swing: Option<AngleLimit>,
    /// Twist limit, if enabled.
    pub twist: Option<AngleLimit>,
}

impl Default for JointConfig {
    fn default() -> Self {
        Self {
            compliance: 0.0,
            rot_damping: 0.0,
            pos_damping: 0.0,
            swing: None,
            twist: None,
        }
    }
}

/// A joint between two body slots.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Joint {
    joint_type: JointType,
    body0: Option<BodyId>,
    body1: Option<BodyId>,
    local_pose0: Pose,
    local_pose1: Pose,
    global_pose0: Pose,
    global_pose1: Pose,
    config: JointConfig,
}

impl Joint {
    /// Start building a joint of `joint_type` between two body slots.
    ///
    /// `None` stands for the fixed world.
    #[must_use]
    pub fn builder(
        joint_type: JointType,
        body0: Option<BodyId>,
        body1: Option<BodyId>,
    ) -> JointBuilder {
        JointBuilder::new(joint_type, body0, body1)
    }

    /// Joint type.
    #[must_use]
    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    /// Both body slots.
    #[must_use]
    pub fn bodies(&self) -> (Option<BodyId>, Option<BodyId>) {
        (self.body0, self.body1)
    }

    /// Anchor poses in each body's local frame.
    #[must_use]
    pub fn local_poses(&self) -> (&Pose, &Pose) {
        (&self.local_pose0, &self.local_pose1)
    }

    /// World-space anchor poses as of the last solve or update.
    #[must_use]
    pub fn global_poses(&self) -> (&Pose, &Pose) {
        (&self.global_pose0, &self.global_pose1)
    }

    /// Stiffness, damping and limits.
    #[must_use]
    pub fn config(&self) -> &JointConfig {
        &self.config
    }

    /// Recompute both world-space anchor poses from the bodies' poses.
    ///
    /// An empty slot, or one that does not name a body in `bodies`, keeps its
    /// local pose as a world pose.
    pub fn update_global_poses(&mut self, bodies: &[Body]) {
        self.global_pose0 = anchor_pose(bodies, self.body0, &self.local_pose0);
        self.global_pose1 = anchor_pose(bodies, self.body1, &self.local_pose1);
    }

    /// Position-level solve for one substep.
    pub fn solve_pos(&mut self, bodies: &mut [Body], dt: f64) {
        match self.joint_type {
            JointType::Fixed => self.solve_fixed_orientation(bodies, dt),
            JointType::Hinge => self.solve_hinge_orientation(bodies, dt),
            JointType::Spherical => self.solve_spherical_orientation(bodies, dt),
        }

        self.update_global_poses(bodies);
        let corr = self.global_pose1.position - self.global_pose0.position;
        let (p0, p1) = (self.global_pose0.position, self.global_pose1.position);
        let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
        apply_body_pair_correction(
            b0,
            b1,
            &corr,
            self.config.compliance,
            dt,
            Some(&p0),
            Some(&p1),
            false,
        );
    }

    /// Velocity-level damping for one substep.
    ///
    /// Each damping term removes at most the existing relative velocity.
    pub fn solve_vel(&mut self, bodies: &mut [Body], dt: f64) {
        if self.config.rot_damping > 0.0 {
            let mut omega = Vector3::zeros();
            if let Some(b) = self.body0.and_then(|id| bodies.get(id.index())) {
                omega -= b.angular_velocity();
            }
            if let Some(b) = self.body1.and_then(|id| bodies.get(id.index())) {
                omega += b.angular_velocity();
            }
            omega *= (self.config.rot_damping * dt).min(1.0);

            let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
            apply_body_pair_correction(b0, b1, &omega, 0.0, dt, None, None, true);
        }

        if self.config.pos_damping > 0.0 {
            self.update_global_poses(bodies);
            let (p0, p1) = (self.global_pose0.position, self.global_pose1.position);

            let mut vel = Vector3::zeros();
            if let Some(b) = self.body0.and_then(|id| bodies.get(id.index())) {
                vel -= b.velocity_at(&p0);
            }
            if let Some(b) = self.body1.and_then(|id| bodies.get(id.index())) {
                vel += b.velocity_at(&p1);
            }
            vel *= (self.config.pos_damping * dt).min(1.0);

            let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
            apply_body_pair_correction(b0, b1, &vel, 0.0, dt, Some(&p0), Some(&p1), true);
        }
    }

    fn solve_fixed_orientation(&mut self, bodies: &mut [Body], dt: f64) {
        self.update_global_poses(bodies);

        // Relative rotation in world frame, shortest arc.
        let q = self.global_pose1.rotation.into_inner()
            * self.global_pose0.rotation.conjugate().into_inner();
        let mut omega = q.imag() * 2.0;
        if q.w < 0.0 {
            omega = -omega;
        }

        let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
        apply_body_pair_correction(b0, b1, &omega, self.config.compliance, dt, None, None, false);
    }

    fn solve_hinge_orientation(&mut self, bodies: &mut [Body], dt: f64) {
        self.update_global_poses(bodies);
        let a0 = self.global_pose0.axis0();
        let a1 = self.global_pose1.axis0();
        let corr = a0.cross(&a1);
        {
            let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
            apply_body_pair_correction(b0, b1, &corr, 0.0, dt, None, None, false);
        }

        if let Some(limit) = self.config.swing {
            self.update_global_poses(bodies);
            let n = self.global_pose0.axis0();
            let b0_axis = self.global_pose0.axis1();
            let b1_axis = self.global_pose1.axis1();
            let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
            limit_angle(b0, b1, &n, &b0_axis, &b1_axis, &limit, dt, PI);
        }
    }

    fn solve_spherical_orientation(&mut self, bodies: &mut [Body], dt: f64) {
        if let Some(limit) = self.config.swing {
            self.update_global_poses(bodies);
            let a0 = self.global_pose0.axis0();
            let a1 = self.global_pose1.axis0();
            // Parallel axes have no swing to limit.
            if let Some(n) = a0.cross(&a1).try_normalize(f64::EPSILON) {
                let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
                limit_angle(b0, b1, &n, &a0, &a1, &limit, dt, PI);
            }
        }

        if let Some(limit) = self.config.twist {
            self.update_global_poses(bodies);
            let n0 = self.global_pose0.axis0();
            let n1 = self.global_pose1.axis0();
            let Some(n) = (n0 + n1).try_normalize(f64::EPSILON) else {
                return;
            };

            let a0 = self.global_pose0.axis1();
            let a1 = self.global_pose1.axis1();
            let (Some(a0), Some(a1)) = (
                (a0 - n * n.dot(&a0)).try_normalize(f64::EPSILON),
                (a1 - n * n.dot(&a1)).try_normalize(f64::EPSILON),
            ) else {
                return;
            };

            // Near-antiparallel primary axes make the twist axis unreliable.
            let max_corr = if n0.dot(&n1) > -0.5 { TAU } else { dt };

            let (b0, b1) = body_pair_mut(bodies, self.body0, self.body1);
            limit_angle(b0, b1, &n, &a0, &a1, &limit, dt, max_corr);
        }
    }
}

fn anchor_pose(bodies: &[Body], slot: Option<BodyId>, local: &Pose) -> Pose {
    match slot.and_then(|id| bodies.get(id.index())) {
        Some(body) => body.pose().transform_pose(local),
        None => *local,
    }
}

/// Builder for [`Joint`].
///
/// # Example
///
/// ```
/// use xpbd_constraint::{BodyId, Joint, JointType};
/// use xpbd_types::Pose;
/// use nalgebra::Point3;
///
/// let joint = Joint::builder(JointType::Spherical, None, Some(BodyId(0)))
///     .local_pose1(Pose::from_position(Point3::new(0.0, 1.0, 0.0)))
///     .swing_limits(-0.5, 0.5, 0.0)
///     .rot_damping(2.0)
///     .build()
///     .unwrap();
///
/// assert!(joint.config().swing.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct JointBuilder {
    joint_type: JointType,
    body0: Option<BodyId>,
    body1: Option<BodyId>,
    local_pose0: Pose,
    local_pose1: Pose,
    config: JointConfig,
}

impl JointBuilder {
    /// New builder with identity anchors and a rigid, undamped, unlimited
    /// configuration.
    #[must_use]
    pub fn new(joint_type: JointType, body0: Option<BodyId>, body1: Option<BodyId>) -> Self {
        Self {
            joint_type,
            body0,
            body1,
            local_pose0: Pose::identity(),
            local_pose1: Pose::identity(),
            config: JointConfig::default(),
        }
    }

    /// Anchor pose in the first body's frame (world frame if the slot is empty).
    #[must_use]
    pub fn local_pose0(mut self, pose: Pose) -> Self {
        self.local_pose0 = pose;
        self
    }

    /// Anchor pose in the second body's frame (world frame if the slot is empty).
    #[must_use]
    pub fn local_pose1(mut self, pose: Pose) -> Self {
        self.local_pose1 = pose;
        self
    }

    /// Compliance of the attachment (0 = rigid).
    #[must_use]
    pub fn compliance(mut self, compliance: f64) -> Self {
        self.config.compliance = compliance;
        self
    }

    /// Rotational damping coefficient.
    #[must_use]
    pub fn rot_damping(mut self, damping: f64) -> Self {
        self.config.rot_damping = damping;
        self
    }

    /// Positional damping coefficient.
    #[must_use]
    pub fn pos_damping(mut self, damping: f64) -> Self {
        self.config.pos_damping = damping;
        self
    }

    /// Enable swing limits.
    #[must_use]
    pub fn swing_limits(mut self, min: f64, max: f64, compliance: f64) -> Self {
        self.config.swing = Some(AngleLimit::new(min, max).with_compliance(compliance));
        self
    }

    /// Enable twist limits. Only spherical joints use them.
    #[must_use]
    pub fn twist_limits(mut self, min: f64, max: f64, compliance: f64) -> Self {
        self.config.twist = Some(AngleLimit::new(min, max).with_compliance(compliance));
        self
    }

    /// Validate and build the joint.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidJoint`] for negative or non-finite
    /// compliance or damping, malformed limits, two empty slots, or both
    /// slots naming the same body.
    pub fn build(self) -> Result<Joint, SimError> {
        let JointConfig {
            compliance,
            rot_damping,
            pos_damping,
            swing,
            twist,
        } = self.config;

        for (name, value) in [
            ("compliance", compliance),
            ("rotational damping", rot_damping),
            ("positional damping", pos_damping),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::invalid_joint(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if let Some(limit) = swing {
            limit.validate("swing")?;
        }
        if let Some(limit) = twist {
            limit.validate("twist")?;
        }

        match (self.body0, self.body1) {
            (None, None) => {
                return Err(SimError::invalid_joint("joint needs at least one body"));
            }
            (Some(a), Some(b)) if a == b => {
                return Err(SimError::invalid_joint(format!("joint connects {a} to itself")));
            }
            _ => {}
        }

        Ok(Joint {
            joint_type: self.joint_type,
            body0: self.body0,
            body1: self.body1,
            local_pose0: self.local_pose0,
            local_pose1: self.local_pose1,
            global_pose0: self.local_pose0,
            global_pose1: self.local_pose1,
            config: self.config,
        })
    }
}
