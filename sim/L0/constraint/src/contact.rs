//! Contact resolution.
//!
//! A contact is treated like a joint's position attachment whose rest
//! length is zero along the normal: once per substep, the penetration
//! measured at the contact's two body-fixed points is removed through
//! [`apply_body_pair_correction`]. Contacts that have separated since the
//! manifold was produced are skipped.

use xpbd_collision::{ContactPair, Manifold};

use crate::body::Body;
use crate::correction::apply_body_pair_correction;

/// Resolve a single contact between `body_a` and `body_b`.
///
/// The depth is re-measured from the bodies' current poses. Returns whether
/// a correction was applied.
pub fn solve_contact(
    body_a: &mut Body,
    body_b: &mut Body,
    contact: &ContactPair,
    compliance: f64,
    dt: f64,
) -> bool {
    let (world_a, world_b) = contact.world_points(body_a.pose(), body_b.pose());
    let depth = contact.normal.dot(&(world_a - world_b));
    if depth <= 0.0 {
        return false;
    }

    // A moves along -normal, B along +normal.
    let corr = contact.normal * -depth;
    apply_body_pair_correction(
        Some(body_a),
        Some(body_b),
        &corr,
        compliance,
        dt,
        Some(&world_a),
        Some(&world_b),
        false,
    );
    true
}

/// Resolve every contact of a manifold in order. Returns how many
/// contacts were still penetrating and got corrected.
pub fn solve_contacts(
    body_a: &mut Body,
    body_b: &mut Body,
    manifold: &Manifold,
    compliance: f64,
    dt: f64,
) -> usize {
    manifold
        .iter()
        .filter(|contact| solve_contact(body_a, body_b, contact, compliance, dt))
        .count()
}
