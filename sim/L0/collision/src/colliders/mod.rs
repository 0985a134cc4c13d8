//! Narrow-phase colliders and the shape-pair dispatch table.
//!
//! Each collider is a pure function of two (shape, pose) pairs. Pairs that
//! only exist in one orientation (plane-sphere, box-sphere) are served in
//! the reverse order by swapping the arguments and flipping the manifold.

mod box_box;
mod box_sphere;
mod plane_sphere;
mod sphere_sphere;
mod voxel_voxel;

pub use box_box::collide_box_box;
pub use box_sphere::collide_box_sphere;
pub use plane_sphere::collide_plane_sphere;
pub use sphere_sphere::collide_sphere_sphere;
pub use voxel_voxel::{
    collide_voxel_voxel, MAX_VOXEL_CONTACTS, VOXEL_SAMPLE_OFFSET, VOXEL_SUPPORT_RADIUS,
};

use tracing::trace;
use xpbd_types::Pose;

use crate::error::CollisionError;
use crate::manifold::Manifold;
use crate::shape::CollisionShape;

/// Minimum norm threshold for geometric operations.
pub const GEOM_EPSILON: f64 = 1e-10;

/// Whether [`collide`] has a collider for `(shape_a, shape_b)`, in either
/// order.
#[must_use]
pub fn has_collider(shape_a: &CollisionShape, shape_b: &CollisionShape) -> bool {
    use CollisionShape as S;

    matches!(
        (shape_a, shape_b),
        (S::Sphere { .. }, S::Sphere { .. })
            | (S::Plane { .. } | S::Box(_), S::Sphere { .. })
            | (S::Sphere { .. }, S::Plane { .. } | S::Box(_))
            | (S::Box(_), S::Box(_))
            | (S::Voxel(_), S::Voxel(_))
    )
}

/// Run the collider registered for `(shape_a, shape_b)`.
///
/// # Errors
///
/// [`CollisionError::UnsupportedPair`] if no collider exists for the pair.
pub fn collide(
    shape_a: &CollisionShape,
    pose_a: &Pose,
    shape_b: &CollisionShape,
    pose_b: &Pose,
) -> Result<Manifold, CollisionError> {
    use CollisionShape as S;

    let manifold = match (shape_a, shape_b) {
        (S::Sphere { radius: r_a }, S::Sphere { radius: r_b }) => {
            collide_sphere_sphere(*r_a, pose_a, *r_b, pose_b)
        }

        (S::Plane { normal }, S::Sphere { radius }) => {
            collide_plane_sphere(normal, pose_a, *radius, pose_b)
        }
        (S::Sphere { radius }, S::Plane { normal }) => {
            collide_plane_sphere(normal, pose_b, *radius, pose_a).flipped()
        }

        (S::Box(box_a), S::Box(box_b)) => collide_box_box(box_a, pose_a, box_b, pose_b),

        (S::Box(aabb), S::Sphere { radius }) => collide_box_sphere(aabb, pose_a, *radius, pose_b),
        (S::Sphere { radius }, S::Box(aabb)) => {
            collide_box_sphere(aabb, pose_b, *radius, pose_a).flipped()
        }

        (S::Voxel(voxels_a), S::Voxel(voxels_b)) => {
            collide_voxel_voxel(voxels_a, pose_a, voxels_b, pose_b)
        }

        _ => {
            return Err(CollisionError::UnsupportedPair {
                first: shape_a.kind(),
                second: shape_b.kind(),
            })
        }
    };

    trace!(
        first = shape_a.kind(),
        second = shape_b.kind(),
        contacts = manifold.len(),
        "narrow phase"
    );

    Ok(manifold)
}
