//! Colliders against closed-form results.
//!
//! Every contact obeys one convention: the normal points from A toward B
//! and `depth = normal · (world_a - world_b)` is positive while overlapping.

use std::f64::consts::{FRAC_PI_4, SQRT_2};

use approx::assert_relative_eq;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use xpbd_physics::{collide, CollisionError, CollisionShape, Manifold, Pose};
use xpbd_tests::GEOM_TOL;

fn at(x: f64, y: f64, z: f64) -> Pose {
    Pose::from_position(Point3::new(x, y, z))
}

fn unit_box() -> CollisionShape {
    CollisionShape::box_from_half_extents(Vector3::repeat(0.5))
}

/// Depth recomputed from the contact's own points must match the reported
/// depth.
fn assert_consistent(manifold: &Manifold, pose_a: &Pose, pose_b: &Pose) {
    for c in manifold.iter() {
        let (wa, wb) = c.world_points(pose_a, pose_b);
        assert_relative_eq!(c.normal.norm(), 1.0, epsilon = GEOM_TOL);
        assert_relative_eq!(c.normal.dot(&(wa - wb)), c.depth, epsilon = 1e-9);
    }
}

#[test]
fn sphere_sphere_overlap() {
    let (pa, pb) = (Pose::identity(), at(1.0, 0.0, 0.0));
    let shape = CollisionShape::sphere(0.6);
    let m = collide(&shape, &pa, &shape, &pb).unwrap();

    assert!(m.is_colliding());
    let c = m.contacts().unwrap()[0];
    assert_relative_eq!(c.depth, 0.2, epsilon = GEOM_TOL);
    assert_relative_eq!(c.normal, Vector3::x(), epsilon = GEOM_TOL);

    let (wa, wb) = c.world_points(&pa, &pb);
    assert_relative_eq!(wa, Point3::new(0.6, 0.0, 0.0), epsilon = GEOM_TOL);
    assert_relative_eq!(wb, Point3::new(0.4, 0.0, 0.0), epsilon = GEOM_TOL);
    assert_consistent(&m, &pa, &pb);
}

#[test]
fn sphere_sphere_apart_reports_not_colliding() {
    let shape = CollisionShape::sphere(0.4);
    let m = collide(&shape, &Pose::identity(), &shape, &at(1.0, 0.0, 0.0)).unwrap();
    assert!(!m.is_colliding());
    assert_eq!(m.contacts().unwrap_err(), CollisionError::NotColliding);
}

#[test]
fn plane_sphere_overlap() {
    let (pa, pb) = (Pose::identity(), at(0.0, 0.3, 0.0));
    let m = collide(
        &CollisionShape::plane(Vector3::y()),
        &pa,
        &CollisionShape::sphere(0.5),
        &pb,
    )
    .unwrap();

    let c = m.contacts().unwrap()[0];
    assert_relative_eq!(c.depth, 0.2, epsilon = GEOM_TOL);
    assert_relative_eq!(c.normal, Vector3::y(), epsilon = GEOM_TOL);
    assert_consistent(&m, &pa, &pb);
}

#[test]
fn tilted_plane_uses_world_normal() {
    let tilt = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.3);
    let pa = Pose::new(Point3::origin(), tilt);
    let pb = Pose::from_position(Point3::from(tilt * Vector3::new(0.0, 0.4, 0.0)));

    let m = collide(&CollisionShape::ground_plane(), &pa, &CollisionShape::sphere(0.5), &pb)
        .unwrap();
    let c = m.contacts().unwrap()[0];
    assert_relative_eq!(c.depth, 0.1, epsilon = 1e-9);
    assert_relative_eq!(c.normal, tilt * Vector3::y(), epsilon = 1e-9);
}

#[test]
fn box_box_overlap_along_z() {
    // Every vertex of each box sits on a side face of the other, so the
    // contacts may carry zero depth; the pair still counts as touching.
    let (pa, pb) = (Pose::identity(), at(0.0, 0.0, 0.5));
    let m = collide(&unit_box(), &pa, &unit_box(), &pb).unwrap();

    assert!(m.is_colliding());
    assert!(m.iter().all(|c| c.depth >= 0.0));
    assert_consistent(&m, &pa, &pb);
}

#[test]
fn box_box_separated_along_z() {
    let m = collide(&unit_box(), &Pose::identity(), &unit_box(), &at(0.0, 0.0, 2.0)).unwrap();
    assert!(!m.is_colliding());
    assert!(m.contacts().is_err());
}

#[test]
fn crossed_box_edges_give_one_contact() {
    // A's top edge runs along X, B's bottom edge along Z.
    let pa = Pose::new(
        Point3::origin(),
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_4),
    );
    let pb = Pose::new(
        Point3::new(0.0, 1.3, 0.0),
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4),
    );

    let m = collide(&unit_box(), &pa, &unit_box(), &pb).unwrap();
    assert_eq!(m.len(), 1);

    let c = m.contacts().unwrap()[0];
    assert_relative_eq!(c.depth, SQRT_2 - 1.3, epsilon = 1e-9);
    assert_relative_eq!(c.normal, Vector3::y(), epsilon = 1e-9);
    assert_consistent(&m, &pa, &pb);
}

#[test]
fn box_sphere_both_orders() {
    let (pa, pb) = (Pose::identity(), at(0.0, 0.8, 0.0));
    let cube = unit_box();
    let sphere = CollisionShape::sphere(0.5);

    let forward = collide(&cube, &pa, &sphere, &pb).unwrap();
    let reverse = collide(&sphere, &pb, &cube, &pa).unwrap();

    let f = forward.contacts().unwrap()[0];
    let r = reverse.contacts().unwrap()[0];
    assert_relative_eq!(f.depth, 0.2, epsilon = GEOM_TOL);
    assert_relative_eq!(f.normal, Vector3::y(), epsilon = GEOM_TOL);
    assert_relative_eq!(r.depth, f.depth, epsilon = GEOM_TOL);
    assert_relative_eq!(r.normal, -f.normal, epsilon = GEOM_TOL);
    assert_consistent(&forward, &pa, &pb);
    assert_consistent(&reverse, &pb, &pa);
}

#[test]
fn unsupported_pairs_are_errors() {
    let plane = CollisionShape::ground_plane();
    let err = collide(&plane, &Pose::identity(), &plane, &Pose::identity()).unwrap_err();
    assert!(matches!(err, CollisionError::UnsupportedPair { .. }));
}

/// Colliders keep no state: the same inputs give the same manifold.
#[test]
fn colliders_are_idempotent() {
    let cases = [
        (CollisionShape::sphere(0.6), CollisionShape::sphere(0.6), at(0.9, 0.1, 0.0)),
        (CollisionShape::ground_plane(), CollisionShape::sphere(0.5), at(0.2, 0.3, 0.1)),
        (unit_box(), unit_box(), at(0.1, 0.8, 0.05)),
        (unit_box(), CollisionShape::sphere(0.4), at(0.3, 0.7, 0.2)),
    ];

    for (a, b, pose_b) in &cases {
        let first = collide(a, &Pose::identity(), b, pose_b).unwrap();
        let second = collide(a, &Pose::identity(), b, pose_b).unwrap();
        assert!(first.is_colliding(), "{} vs {} should touch", a.kind(), b.kind());
        assert_eq!(first, second);
    }
}
