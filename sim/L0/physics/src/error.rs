//! Error type for the simulation entry points.

use thiserror::Error;
use xpbd_collision::CollisionError;
use xpbd_types::SimError;

/// Errors returned by [`simulate`](crate::simulate), the [`Stepper`](crate::Stepper)
/// and the [`World`](crate::World).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    /// Invalid configuration, body reference or joint.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// A collision query failed.
    #[error(transparent)]
    Collision(#[from] CollisionError),

    /// A contact pair names the same body twice.
    #[error("contact pair references body {0} twice")]
    SelfContact(usize),
}

impl PhysicsError {
    /// Whether the error came from input validation rather than the solve.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        match self {
            Self::Sim(err) => !err.is_diverged(),
            Self::Collision(_) => false,
            Self::SelfContact(_) => true,
        }
    }
}

/// Result type for simulation entry points.
pub type Result<T> = std::result::Result<T, PhysicsError>;
