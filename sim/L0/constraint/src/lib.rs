//! Rigid bodies and XPBD constraint solving.
//!
//! - [`Body`] - pose, velocities, diagonal inverse mass properties,
//!   integration and velocity re-derivation
//! - [`apply_body_pair_correction`] - the compliance-weighted correction
//!   every constraint goes through
//! - [`Joint`] / [`JointBuilder`] - spherical, hinge and fixed joints with
//!   swing/twist limits and damping
//! - [`solve_contacts`] - position-level contact resolution for a manifold
//!
//! # XPBD in one line
//!
//! A constraint error `C` along direction `n` is removed by
//! `Δλ = -C / (w₀ + w₁ + α / dt²)`, where `wᵢ` are the generalized inverse
//! masses of the two bodies along `n` and `α` the compliance. With `α = 0`
//! the constraint is rigid; with `α > 0` it behaves like a spring whose
//! stiffness does not depend on the substep size.
//!
//! # Example
//!
//! ```
//! use xpbd_constraint::{apply_body_pair_correction, Body};
//! use xpbd_types::Pose;
//! use nalgebra::Point3;
//!
//! let mut a = Body::new(Pose::identity());
//! let mut b = Body::new(Pose::from_position(Point3::new(1.0, 0.0, 0.0)));
//! let (pa, pb) = (a.position(), b.position());
//!
//! apply_body_pair_correction(
//!     Some(&mut a),
//!     Some(&mut b),
//!     &(pb - pa),
//!     0.0,
//!     1.0 / 60.0,
//!     Some(&pa),
//!     Some(&pb),
//!     false,
//! );
//!
//! assert!((a.position().x - 0.5).abs() < 1e-12);
//! assert!((b.position().x - 0.5).abs() < 1e-12);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::similar_names,          // b0/b1, p0/p1 pairs
    clippy::many_single_char_names, // n, a, b, q in angle math
    clippy::missing_errors_doc,
)]

mod body;
mod contact;
mod correction;
mod joint;
mod limits;

pub use body::{body_pair_mut, Body, BodyId};
pub use contact::{solve_contact, solve_contacts};
pub use correction::apply_body_pair_correction;
pub use joint::{Joint, JointBuilder, JointConfig, JointType};
pub use limits::{limit_angle, signed_angle, AngleLimit};
