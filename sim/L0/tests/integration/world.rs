//! The world container end to end.

use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use xpbd_physics::{
    Body, CollisionShape, Joint, JointType, PhysicsError, Pose, SimError,
    SimulationConfig, World,
};
use xpbd_tests::{ball, ground, REST_TOL};

#[test]
fn balls_stack_on_ground() {
    let mut world = World::default();
    world.add_body(ground());
    let low = world.add_body(ball(Point3::new(0.0, 0.6, 0.0), 0.5));
    let high = world.add_body(ball(Point3::new(0.0, 1.8, 0.0), 0.5));
    assert_eq!(world.add_all_contact_pairs(), 3);

    let mut solved = 0;
    for _ in 0..180 {
        solved += world.step().unwrap().contacts_solved;
    }

    assert!(solved > 0);
    assert_relative_eq!(world.time(), 3.0, epsilon = 1e-9);
    let (low, high) = (world.body(low).unwrap(), world.body(high).unwrap());
    assert_relative_eq!(low.position().y, 0.5, epsilon = 5e-3);
    assert_relative_eq!(high.position().y, 1.5, epsilon = 5e-3);
    assert!((high.position() - low.position()).norm() > 1.0 - REST_TOL);
}

#[test]
fn pendulum_clears_floor() {
    let mut world = World::default();
    let floor = world.add_body(
        Body::new_static(Pose::from_position(Point3::new(0.0, -1.5, 0.0)))
            .with_shape(Arc::new(CollisionShape::ground_plane())),
    );
    let bob = world.add_body(ball(Point3::new(1.0, 0.0, 0.0), 0.25));
    world
        .add_joint(
            Joint::builder(JointType::Spherical, None, Some(bob))
                .local_pose1(Pose::from_position(Point3::new(-1.0, 0.0, 0.0)))
                .build()
                .unwrap(),
        )
        .unwrap();
    world.add_contact_pair(floor, bob).unwrap();

    for _ in 0..120 {
        world.step().unwrap();
        let bob = world.body(bob).unwrap();
        // The string is shorter than the drop, so the floor is never reached.
        assert!(bob.position().y > -1.25);
        assert_relative_eq!(bob.position().coords.norm(), 1.0, epsilon = 1e-2);
    }
}

#[test]
fn invalid_config_is_reported_before_stepping() {
    let mut world = World::new(SimulationConfig::default().substeps(0));
    let id = world.add_body(Body::new(Pose::identity()));

    let err = world.step().unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(err, PhysicsError::Sim(SimError::InvalidSubsteps(0)));
    assert_eq!(world.body(id).unwrap().pose(), &Pose::identity());
    assert_eq!(world.step_count(), 0);
}

#[test]
fn diverged_body_stops_the_world() {
    let mut world = World::default();
    let id = world.add_body(Body::new(Pose::identity()));
    world.step().unwrap();

    world
        .body_mut(id)
        .unwrap()
        .set_angular_velocity(Vector3::new(0.0, f64::INFINITY, 0.0));
    let err = world.step().unwrap_err();
    assert!(!err.is_validation_error());
    assert!(matches!(err, PhysicsError::Sim(ref e) if e.is_diverged()));
    assert_eq!(world.step_count(), 1);
}
