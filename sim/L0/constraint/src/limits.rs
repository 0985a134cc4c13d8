//! Angular joint limits.

use std::f64::consts::{PI, TAU};

use nalgebra::{UnitQuaternion, Vector3};
use xpbd_types::SimError;

use crate::body::Body;
use crate::correction::apply_body_pair_correction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An allowed angle range with its own compliance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngleLimit {
    /// Lower bound (radians).
    pub min: f64,
    /// Upper bound (radians).
    pub max: f64,
    /// Compliance of the limit (0 = hard stop).
    pub compliance: f64,
}

impl Default for AngleLimit {
    fn default() -> Self {
        Self {
            min: -TAU,
            max: TAU,
            compliance: 0.0,
        }
    }
}

impl AngleLimit {
    /// Hard limit over `[min, max]`.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            compliance: 0.0,
        }
    }

    /// Symmetric hard limit over `[-bound, bound]`.
    #[must_use]
    pub fn symmetric(bound: f64) -> Self {
        Self::new(-bound.abs(), bound.abs())
    }

    /// Set the compliance.
    #[must_use]
    pub fn with_compliance(mut self, compliance: f64) -> Self {
        self.compliance = compliance;
        self
    }

    /// Whether `angle` lies inside the range.
    #[must_use]
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min && angle <= self.max
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), SimError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(SimError::invalid_joint(format!("{name} limits must be finite")));
        }
        if self.min > self.max {
            return Err(SimError::invalid_joint(format!(
                "{name} limit min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if !self.compliance.is_finite() || self.compliance < 0.0 {
            return Err(SimError::invalid_joint(format!(
                "{name} limit compliance must be non-negative"
            )));
        }
        Ok(())
    }
}

/// Signed angle from `a` to `b` about `n`, in `[-π, π]`.
///
/// `a` and `b` are expected to be roughly perpendicular to `n`.
#[must_use]
pub fn signed_angle(n: &Vector3<f64>, a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let mut phi = a.cross(b).dot(n).clamp(-1.0, 1.0).asin();
    if a.dot(b) < 0.0 {
        phi = PI - phi;
    }
    if phi > PI {
        phi -= TAU;
    }
    if phi < -PI {
        phi += TAU;
    }
    phi
}

/// Keep the angle from `a` to `b` about `n` inside `limit`.
///
/// When the angle is out of range, `a` is rotated about `n` to the nearest
/// bound and the rotation that brings `b` onto it is applied as a pure
/// angular correction, capped at `max_corr`.
#[allow(clippy::too_many_arguments)]
pub fn limit_angle(
    body_a: Option<&mut Body>,
    body_b: Option<&mut Body>,
    n: &Vector3<f64>,
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    limit: &AngleLimit,
    dt: f64,
    max_corr: f64,
) {
    let phi = signed_angle(n, a, b);
    if limit.contains(phi) {
        return;
    }

    let target = phi.clamp(limit.min, limit.max);
    let q = UnitQuaternion::from_scaled_axis(n * target);
    let mut omega = (q * a).cross(b);

    let len = omega.norm();
    if len > max_corr {
        omega *= max_corr / len;
    }

    apply_body_pair_correction(body_a, body_b, &omega, limit.compliance, dt, None, None, false);
}
