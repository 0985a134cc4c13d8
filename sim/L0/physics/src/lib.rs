//! XPBD rigid-body simulation.
//!
//! This crate ties the lower layers together and re-exports them:
//!
//! - [`xpbd_types`] - poses, configuration, errors
//! - [`xpbd_collision`] - shapes, voxel grids, colliders, manifolds
//! - [`xpbd_constraint`] - bodies, the correction primitive, joints, contacts
//!
//! On top it provides the substep loop ([`simulate`],
//! [`simulate_with_contacts`]), a [`Stepper`] that runs one frame at a time
//! over caller-owned slices, and a [`World`] that owns everything.
//!
//! # Layer 0
//!
//! Headless and single-threaded. One call runs every substep to completion;
//! a multithreaded host must serialize access for the length of a frame.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use xpbd_physics::prelude::*;
//!
//! let mut world = World::new(SimulationConfig::default());
//! let ground = world.add_body(
//!     Body::new_static(Pose::identity()).with_shape(Arc::new(CollisionShape::ground_plane())),
//! );
//! let ball = world.add_body(
//!     Body::new(Pose::from_position(Point3::new(0.0, 2.0, 0.0)))
//!         .with_shape(Arc::new(CollisionShape::sphere(0.5))),
//! );
//! world.add_contact_pair(ground, ball).unwrap();
//!
//! for _ in 0..120 {
//!     world.step().unwrap();
//! }
//!
//! let y = world.body(ball).unwrap().position().y;
//! assert!((y - 0.5).abs() < 1e-3);
//! ```
//!
//! # Joints
//!
//! ```
//! use xpbd_physics::prelude::*;
//!
//! let mut bodies = vec![Body::new(Pose::from_position(Point3::new(0.0, -1.0, 0.0)))];
//! let mut joints = vec![Joint::builder(JointType::Hinge, None, Some(BodyId(0)))
//!     .local_pose1(Pose::from_position(Point3::new(0.0, 1.0, 0.0)))
//!     .rot_damping(1.0)
//!     .build()
//!     .unwrap()];
//!
//! simulate(&mut bodies, &mut joints, &SimulationConfig::default()).unwrap();
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn, clippy::missing_errors_doc)]

mod error;
mod simulate;
mod stepper;
mod world;

pub use error::{PhysicsError, Result};
pub use simulate::{simulate, simulate_with_contacts, StepStats};
pub use stepper::Stepper;
pub use world::World;

pub use xpbd_collision;
pub use xpbd_constraint;
pub use xpbd_types;

pub use xpbd_collision::{
    collide, has_collider, Aabb, CollisionError, CollisionShape, ContactPair, Manifold, VoxelClass,
    VoxelGrid, VoxelShape,
};
pub use xpbd_constraint::{
    apply_body_pair_correction, body_pair_mut, limit_angle, signed_angle, solve_contact,
    solve_contacts, AngleLimit, Body, BodyId, Joint, JointBuilder, JointConfig, JointType,
};
pub use xpbd_types::{
    Gravity, Point3, Pose, Quaternion, SimError, SimulationConfig, UnitQuaternion, Vector3,
    MAX_ROTATION_PER_SUBSTEP,
};

/// Everything needed to build and step a scene.
pub mod prelude {
    pub use crate::{
        collide, simulate, simulate_with_contacts, Body, BodyId, CollisionShape, Gravity, Joint,
        JointType, Manifold, Point3, Pose, SimulationConfig, StepStats, Stepper, UnitQuaternion,
        Vector3, VoxelShape, World,
    };
}
