//! Box-sphere collider.

use xpbd_types::Pose;

use super::box_box::push_out;
use crate::aabb::Aabb;
use crate::manifold::{ContactPair, Manifold};

/// Collide a box (shape A) with a sphere centered at B's origin.
///
/// The sphere center is clamped into the box to find the closest point.
/// A center inside the box is pushed out through the nearest face.
#[must_use]
pub fn collide_box_sphere(aabb: &Aabb, pose_box: &Pose, radius: f64, pose_sphere: &Pose) -> Manifold {
    let center = pose_box.inv_transform_point(&pose_sphere.position);
    let closest = aabb.closest_point(&center);
    let offset = center - closest;
    let distance = offset.norm();

    let (local_a, local_normal, depth) = if distance > 0.0 {
        if distance >= radius {
            return Manifold::empty();
        }
        (closest, offset / distance, radius - distance)
    } else {
        let Some((to_face, face)) = push_out(aabb, &center) else {
            return Manifold::empty();
        };
        (center + face * to_face, face, radius + to_face)
    };

    let world_a = pose_box.transform_point(&local_a);
    let normal = pose_box.rotate(&local_normal);
    let world_b = pose_sphere.position - normal * radius;

    Manifold::single(ContactPair::from_world(
        pose_box,
        pose_sphere,
        &world_a,
        &world_b,
        normal,
        depth,
    ))
}
