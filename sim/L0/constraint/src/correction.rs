//! The XPBD correction step shared by joints and contacts.

use nalgebra::{Point3, Vector3};

use crate::body::Body;

/// Move two bodies so that `corr` (a world-space displacement of A toward
/// B) is resolved, weighted by their generalized inverse masses.
///
/// With `C = |corr|`, `n = corr / C` and `w = w_a + w_b`:
///
/// ```text
/// Δλ = -C / (w + compliance / dt²)
/// ```
///
/// The impulse `n · (-Δλ)` goes to A at `point_a` and its negation to B at
/// `point_b`. A missing body contributes zero inverse mass. Nothing happens
/// when `C` or `w` is zero. With `velocity_level` the impulse changes
/// velocities instead of poses.
///
/// Returns the applied `Δλ` (0 when nothing was applied).
#[allow(clippy::too_many_arguments)]
pub fn apply_body_pair_correction(
    body_a: Option<&mut Body>,
    body_b: Option<&mut Body>,
    corr: &Vector3<f64>,
    compliance: f64,
    dt: f64,
    point_a: Option<&Point3<f64>>,
    point_b: Option<&Point3<f64>>,
    velocity_level: bool,
) -> f64 {
    let c = corr.norm();
    if c == 0.0 {
        return 0.0;
    }
    let normal = corr / c;

    let w_a = body_a.as_deref().map_or(0.0, |b| b.inverse_mass(&normal, point_a));
    let w_b = body_b.as_deref().map_or(0.0, |b| b.inverse_mass(&normal, point_b));
    let w = w_a + w_b;
    if w == 0.0 {
        return 0.0;
    }

    let alpha = if compliance == 0.0 {
        0.0
    } else {
        compliance / (dt * dt)
    };
    let d_lambda = -c / (w + alpha);
    let impulse = normal * -d_lambda;

    if let Some(body) = body_a {
        body.apply_correction(&impulse, point_a, velocity_level);
    }
    if let Some(body) = body_b {
        body.apply_correction(&-impulse, point_b, velocity_level);
    }

    d_lambda
}
