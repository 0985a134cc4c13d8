//! Core value types for the XPBD rigid-body core.
//!
//! - [`Pose`] - position + unit quaternion, with the shared clamped
//!   rotation step used by integration and corrections
//! - [`Gravity`], [`SimulationConfig`] - frame length, substeps, contacts
//! - [`SimError`] - validation and divergence errors
//!
//! # Layer 0
//!
//! Pure data and small math helpers. No scene graph, no rendering, no
//! engine dependencies.
//!
//! # Coordinate System
//!
//! Right-handed, Y up. Gravity defaults to `(0, -10, 0)`.
//!
//! # Example
//!
//! ```
//! use xpbd_types::{Pose, SimulationConfig};
//! use nalgebra::Point3;
//!
//! let pose = Pose::from_position(Point3::new(0.0, 1.0, 0.0));
//! assert_eq!(pose.position.y, 1.0);
//!
//! let config = SimulationConfig::default();
//! assert!(config.validate().is_ok());
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
    clippy::missing_errors_doc,        // Error docs added where non-obvious
)]

mod config;
mod error;
mod pose;

pub use config::{Gravity, SimulationConfig};
pub use error::SimError;
pub use pose::{Pose, MAX_ROTATION_PER_SUBSTEP};

// Re-export math types for convenience
pub use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;
