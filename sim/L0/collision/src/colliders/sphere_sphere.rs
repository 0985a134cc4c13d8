//! Sphere-sphere collider.

use xpbd_types::Pose;

use crate::manifold::{ContactPair, Manifold};

/// Centers closer than this are treated as coincident and produce no
/// contact, since the normal is undefined.
const MIN_CENTER_DISTANCE: f64 = 1e-20;

/// Collide two spheres centered at their body origins.
#[must_use]
pub fn collide_sphere_sphere(radius_a: f64, pose_a: &Pose, radius_b: f64, pose_b: &Pose) -> Manifold {
    let delta = pose_b.position - pose_a.position;
    let distance = delta.norm();
    let radii = radius_a + radius_b;

    if distance < MIN_CENTER_DISTANCE || distance >= radii {
        return Manifold::empty();
    }

    let normal = delta / distance;
    let world_a = pose_a.position + normal * radius_a;
    let world_b = pose_b.position - normal * radius_b;

    Manifold::single(ContactPair::from_world(
        pose_a,
        pose_b,
        &world_a,
        &world_b,
        normal,
        radii - distance,
    ))
}
