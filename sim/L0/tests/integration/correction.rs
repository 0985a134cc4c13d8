//! The correction primitive between real bodies.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;
use xpbd_physics::{apply_body_pair_correction, body_pair_mut, Body, BodyId, Pose};

/// Rigid correction between equal bodies splits the displacement evenly.
#[test]
fn rigid_correction_splits_evenly() {
    let mut bodies = vec![
        Body::new(Pose::from_position(Point3::new(-1.0, 2.0, 0.0))),
        Body::new(Pose::from_position(Point3::new(1.0, 2.0, 0.0))),
    ];
    let (pa, pb) = (bodies[0].position(), bodies[1].position());

    let (a, b) = body_pair_mut(&mut bodies, Some(BodyId(0)), Some(BodyId(1)));
    apply_body_pair_correction(a, b, &(pb - pa), 0.0, 1.0 / 2400.0, Some(&pa), Some(&pb), false);

    assert_relative_eq!(bodies[0].position(), Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    assert_relative_eq!(bodies[1].position(), Point3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
}

/// Heavier bodies move less, in proportion to their inverse mass.
#[test]
fn correction_follows_inverse_mass() {
    let mut light = Body::new(Pose::identity());
    let mut heavy = Body::new(Pose::from_position(Point3::new(1.0, 0.0, 0.0)))
        .with_box(Vector3::new(1.0, 1.0, 3.0), 1.0)
        .unwrap();
    assert_relative_eq!(heavy.inv_mass(), 1.0 / 3.0);

    let (pa, pb) = (light.position(), heavy.position());
    apply_body_pair_correction(
        Some(&mut light),
        Some(&mut heavy),
        &(pb - pa),
        0.0,
        0.01,
        Some(&pa),
        Some(&pb),
        false,
    );

    // w = 1 + 1/3, so the light body takes 3/4 of the gap.
    assert_relative_eq!(light.position().x, 0.75, epsilon = 1e-12);
    assert_relative_eq!(heavy.position().x, 0.75, epsilon = 1e-12);
}

/// Off-center corrections rotate the body as well as moving it.
#[test]
fn off_center_correction_spins_body() {
    let mut body = Body::new(Pose::identity());
    let point = Point3::new(1.0, 0.0, 0.0);
    let target = Point3::new(1.0, 0.1, 0.0);

    apply_body_pair_correction(
        None,
        Some(&mut body),
        &(point - target),
        0.0,
        0.01,
        Some(&target),
        Some(&point),
        false,
    );

    assert!(body.position().y > 0.0);
    assert!(body.rotation().angle() > 0.0);
    // Rotation is about +Z so the corner at +X rises.
    assert!(body.rotation().axis().unwrap().z > 0.0);
}

proptest! {
    /// A static body is never displaced, whatever the correction.
    #[test]
    fn static_body_is_never_displaced(
        corr in prop::array::uniform3(-100.0f64..100.0),
        point in prop::array::uniform3(-2.0f64..2.0),
        compliance in prop_oneof![Just(0.0), 0.0f64..1.0],
        velocity_level in any::<bool>(),
    ) {
        let pose = Pose::from_position(Point3::new(0.5, -0.5, 0.25));
        let mut wall = Body::new_static(pose);
        let mut body = Body::new(Pose::identity());
        let p = Point3::from(point);

        apply_body_pair_correction(
            Some(&mut body),
            Some(&mut wall),
            &Vector3::from(corr),
            compliance,
            1.0 / 2400.0,
            Some(&p),
            Some(&p),
            velocity_level,
        );

        prop_assert_eq!(wall.pose(), &pose);
        prop_assert_eq!(wall.velocity(), Vector3::zeros());
        prop_assert_eq!(wall.angular_velocity(), Vector3::zeros());
    }
}
