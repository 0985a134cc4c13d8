//! Plane-sphere collider.

use nalgebra::Vector3;
use xpbd_types::Pose;

use crate::manifold::{ContactPair, Manifold};

/// Collide a plane (shape A, local `normal`, through A's origin) with a
/// sphere (shape B). The plane's world normal is the contact normal.
#[must_use]
pub fn collide_plane_sphere(
    normal: &Vector3<f64>,
    pose_plane: &Pose,
    radius: f64,
    pose_sphere: &Pose,
) -> Manifold {
    let n = pose_plane.rotate(normal).normalize();
    let center = pose_sphere.position;
    let distance = n.dot(&(center - pose_plane.position));

    if distance >= radius {
        return Manifold::empty();
    }

    let on_plane = center - n * distance;
    let on_sphere = center - n * radius;

    Manifold::single(ContactPair::from_world(
        pose_plane,
        pose_sphere,
        &on_plane,
        &on_sphere,
        n,
        radius - distance,
    ))
}
