//! Error types for collision queries.

use thiserror::Error;

/// Errors reported by the collision layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// Contact points were requested from a manifold with no contacts.
    #[error("shapes are not colliding")]
    NotColliding,

    /// No collider exists for this shape pair.
    #[error("no collider for shape pair {first}-{second}")]
    UnsupportedPair {
        /// Kind of the first shape.
        first: &'static str,
        /// Kind of the second shape.
        second: &'static str,
    },

    /// A voxel write landed outside the grid bounds.
    #[error("voxel ({x}, {y}, {z}) is outside the grid bounds")]
    VoxelOutOfBounds {
        /// Lattice X coordinate.
        x: i32,
        /// Lattice Y coordinate.
        y: i32,
        /// Lattice Z coordinate.
        z: i32,
    },
}
