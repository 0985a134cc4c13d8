//! Collision shapes and narrow-phase colliders for the XPBD core.
//!
//! - [`CollisionShape`] - box, sphere, plane and voxel variants
//! - [`VoxelGrid`] / [`VoxelShape`] - bit-packed occupancy with surface
//!   classification
//! - [`Manifold`] / [`ContactPair`] - contacts in a single A-to-B convention
//! - [`collide`] - the shape-pair dispatch table
//!
//! Colliders are pure functions of two (shape, pose) pairs. They keep no
//! state between calls, so calling one twice with the same inputs returns
//! the same manifold. Broad-phase pruning is left to the caller;
//! [`CollisionShape::local_bounds`] is provided for that purpose.
//!
//! # Example
//!
//! ```
//! use xpbd_collision::{collide, CollisionShape};
//! use xpbd_types::Pose;
//! use nalgebra::Point3;
//!
//! let a = CollisionShape::sphere(0.6);
//! let b = CollisionShape::sphere(0.6);
//! let manifold = collide(
//!     &a,
//!     &Pose::identity(),
//!     &b,
//!     &Pose::from_position(Point3::new(1.0, 0.0, 0.0)),
//! )
//! .unwrap();
//!
//! assert!(manifold.is_colliding());
//! let depth = manifold.contacts().unwrap()[0].depth;
//! assert!((depth - 0.2).abs() < 1e-12);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::similar_names,             // a0/a1, b0/b1 are intentional
    clippy::many_single_char_names,    // geometric formulas
)]

mod aabb;
pub mod colliders;
mod error;
mod manifold;
mod shape;
pub mod voxel;

pub use aabb::Aabb;
pub use colliders::{collide, has_collider};
pub use error::CollisionError;
pub use manifold::{ContactPair, Manifold};
pub use shape::CollisionShape;
pub use voxel::{VoxelClass, VoxelGrid, VoxelShape};
