//! Joint scenarios run through the full substep loop.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use xpbd_physics::{
    signed_angle, simulate, Body, BodyId, Joint, JointType, Pose, SimulationConfig,
};

fn run(bodies: &mut [Body], joints: &mut [Joint], config: &SimulationConfig, frames: usize) {
    for _ in 0..frames {
        simulate(bodies, joints, config).unwrap();
    }
}

fn anchor_gap(joint: &mut Joint, bodies: &[Body]) -> f64 {
    joint.update_global_poses(bodies);
    let (g0, g1) = joint.global_poses();
    (g1.position - g0.position).norm()
}

/// Two point-like links hung from the world keep unit spacing while they
/// swing down.
#[test]
fn spherical_chain_keeps_link_lengths() {
    let mut bodies = vec![
        Body::new(Pose::from_position(Point3::new(1.0, 0.0, 0.0))),
        Body::new(Pose::from_position(Point3::new(2.0, 0.0, 0.0))),
    ];
    let back = Pose::from_position(Point3::new(-1.0, 0.0, 0.0));
    let mut joints = vec![
        Joint::builder(JointType::Spherical, None, Some(BodyId(0)))
            .local_pose1(back)
            .build()
            .unwrap(),
        Joint::builder(JointType::Spherical, Some(BodyId(0)), Some(BodyId(1)))
            .local_pose1(back)
            .build()
            .unwrap(),
    ];
    let config = SimulationConfig::default();

    for _ in 0..60 {
        run(&mut bodies, &mut joints, &config, 1);
        let (p0, p1) = (bodies[0].position(), bodies[1].position());
        assert_relative_eq!(p0.coords.norm(), 1.0, epsilon = 1e-2);
        assert_relative_eq!((p1 - p0).norm(), 1.0, epsilon = 1e-2);
    }
    assert!(bodies[1].position().y < -0.5);
    for joint in &mut joints {
        assert!(anchor_gap(joint, &bodies) < 1e-2);
    }
}

/// A door hinged about world X falls until the hinge limit catches it.
#[test]
fn hinge_door_stops_at_limit() {
    let mut bodies = vec![Body::new(Pose::from_position(Point3::new(0.0, 0.0, 1.0)))];
    let mut joints = vec![Joint::builder(JointType::Hinge, None, Some(BodyId(0)))
        .local_pose1(Pose::from_position(Point3::new(0.0, 0.0, -1.0)))
        .swing_limits(-0.5, 0.5, 0.0)
        .build()
        .unwrap()];

    run(&mut bodies, &mut joints, &SimulationConfig::default(), 60);

    let door = bodies[0].pose();
    let angle = signed_angle(&Vector3::x(), &Vector3::y(), &door.axis1());
    assert!(angle <= 0.5 + 1e-2, "door opened to {angle}");
    assert!(angle > 0.4, "door only reached {angle}");
    // The hinge axis never leaves world X.
    assert!(door.axis0().dot(&Vector3::x()) > 0.999);
    assert!(anchor_gap(&mut joints[0], &bodies) < 1e-3);
}

/// Rotational damping drives two spinning bodies to a shared angular
/// velocity without changing the total.
#[test]
fn rot_damping_equalizes_spin() {
    let mut bodies = vec![
        Body::new(Pose::identity()),
        Body::new(Pose::identity()).with_angular_velocity(Vector3::new(0.0, 0.0, 2.0)),
    ];
    let mut joints = vec![Joint::builder(JointType::Spherical, Some(BodyId(0)), Some(BodyId(1)))
        .rot_damping(100.0)
        .build()
        .unwrap()];

    run(&mut bodies, &mut joints, &SimulationConfig::default().zero_gravity(), 60);

    let (w0, w1) = (bodies[0].angular_velocity(), bodies[1].angular_velocity());
    assert!((w1 - w0).norm() < 1e-3);
    assert_relative_eq!(w0.z, 1.0, epsilon = 1e-2);
    assert_relative_eq!(w1.z, 1.0, epsilon = 1e-2);
}

/// A rigid fixed joint holds a cantilever against gravity.
#[test]
fn fixed_cantilever_holds() {
    let mut bodies = vec![Body::new(Pose::from_position(Point3::new(1.0, 0.0, 0.0)))];
    let mut joints = vec![Joint::builder(JointType::Fixed, None, Some(BodyId(0)))
        .local_pose1(Pose::from_position(Point3::new(-1.0, 0.0, 0.0)))
        .build()
        .unwrap()];

    run(&mut bodies, &mut joints, &SimulationConfig::default(), 60);

    assert_relative_eq!(bodies[0].position(), Point3::new(1.0, 0.0, 0.0), epsilon = 1e-2);
    assert!(bodies[0].rotation().angle() < 1e-2);
}

/// A compliant attachment stretches until the spring force carries the
/// weight: `stretch = compliance * m * g`.
#[test]
fn compliant_joint_sags_under_load() {
    let mut bodies = vec![Body::new(Pose::from_position(Point3::new(0.0, -1.0, 0.0)))];
    let mut joints = vec![Joint::builder(JointType::Spherical, None, Some(BodyId(0)))
        .local_pose1(Pose::from_position(Point3::new(0.0, 1.0, 0.0)))
        .compliance(1e-3)
        .pos_damping(10.0)
        .build()
        .unwrap()];

    run(&mut bodies, &mut joints, &SimulationConfig::default(), 180);

    assert_relative_eq!(anchor_gap(&mut joints[0], &bodies), 0.01, epsilon = 2e-3);
    assert_relative_eq!(bodies[0].position().y, -1.01, epsilon = 2e-3);
    assert!(bodies[0].velocity().norm() < 1e-2);
}
