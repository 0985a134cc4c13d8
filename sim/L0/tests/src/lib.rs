//! Shared scene builders and tolerances for the integration tests.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]

use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use xpbd_physics::{Body, CollisionShape, Pose, SimError};

/// Tolerance for closed-form geometric results.
pub const GEOM_TOL: f64 = 1e-10;

/// Tolerance for penetration left after the solver has settled.
pub const REST_TOL: f64 = 1e-3;

/// Static body carrying an upward-facing plane through the origin.
#[must_use]
pub fn ground() -> Body {
    Body::new_static(Pose::identity()).with_shape(Arc::new(CollisionShape::ground_plane()))
}

/// Static box with the given half extents, top face at `y = 0`.
#[must_use]
pub fn slab(half_extents: Vector3<f64>) -> Body {
    let pose = Pose::from_position(Point3::new(0.0, -half_extents.y, 0.0));
    Body::new_static(pose).with_shape(Arc::new(CollisionShape::box_from_half_extents(
        half_extents,
    )))
}

/// Dynamic sphere of `radius` centered at `center`.
#[must_use]
pub fn ball(center: Point3<f64>, radius: f64) -> Body {
    Body::new(Pose::from_position(center)).with_shape(Arc::new(CollisionShape::sphere(radius)))
}

/// Dynamic cube with edge length 1 at `center`, with box mass properties
/// of unit density.
///
/// # Errors
///
/// Returns [`SimError::InvalidMassProperties`] if the box mass properties
/// are rejected.
pub fn unit_cube(center: Point3<f64>) -> Result<Body, SimError> {
    Body::new(Pose::from_position(center))
        .with_shape(Arc::new(CollisionShape::box_from_half_extents(
            Vector3::repeat(0.5),
        )))
        .with_box(Vector3::repeat(1.0), 1.0)
}

/// Lowest world-space Y over the eight corners of a box body.
#[must_use]
pub fn lowest_corner(body: &Body, half_extents: Vector3<f64>) -> f64 {
    let h = half_extents;
    let mut lowest = f64::INFINITY;
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                let corner = Point3::new(sx * h.x, sy * h.y, sz * h.z);
                lowest = lowest.min(body.pose().transform_point(&corner).y);
            }
        }
    }
    lowest
}
