//! Bodies dropped onto static supports settle with little penetration.

use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use xpbd_physics::{Body, BodyId, CollisionShape, Pose, SimulationConfig, Stepper, VoxelShape};
use xpbd_tests::{ball, ground, lowest_corner, slab, unit_cube, REST_TOL};

const PAIR: [(BodyId, BodyId); 1] = [(BodyId(0), BodyId(1))];

fn settle(bodies: &mut [Body], seconds: f64) {
    let mut stepper = Stepper::new(SimulationConfig::default());
    stepper
        .run_for(bodies, &mut [], &PAIR, seconds)
        .unwrap();
}

#[test]
fn sphere_rests_on_plane() {
    let mut bodies = vec![ground(), ball(Point3::new(0.3, 2.0, -0.2), 0.5)];
    settle(&mut bodies, 2.0);

    let pos = bodies[1].position();
    assert_relative_eq!(pos.y, 0.5, epsilon = REST_TOL);
    // Nothing pushes sideways on a flat plane.
    assert_relative_eq!(pos.x, 0.3, epsilon = 1e-9);
    assert_relative_eq!(pos.z, -0.2, epsilon = 1e-9);
    assert!(bodies[1].velocity().norm() < 1e-2);
}

#[test]
fn sphere_rests_on_box() {
    let mut bodies = vec![
        slab(Vector3::new(3.0, 0.5, 3.0)),
        ball(Point3::new(0.0, 1.5, 0.0), 0.5),
    ];
    settle(&mut bodies, 2.0);

    assert_relative_eq!(bodies[1].position().y, 0.5, epsilon = REST_TOL);
    assert!(bodies[1].velocity().norm() < 1e-2);
}

#[test]
fn unit_cube_has_box_mass_properties() {
    let cube = unit_cube(Point3::new(0.0, 2.0, 0.0)).unwrap();
    assert_relative_eq!(cube.inv_mass(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(cube.inv_inertia(), Vector3::repeat(6.0), epsilon = 1e-12);
    assert!(cube.shape().is_some());
}

#[test]
fn cube_settles_flat_on_slab() {
    let half = Vector3::repeat(0.5);
    let mut bodies = vec![
        slab(Vector3::new(5.0, 0.5, 5.0)),
        unit_cube(Point3::new(0.0, 0.6, 0.0)).unwrap(),
    ];
    settle(&mut bodies, 2.0);

    let cube = &bodies[1];
    assert!(
        lowest_corner(cube, half) > -REST_TOL,
        "cube sank to {}",
        lowest_corner(cube, half)
    );
    assert_relative_eq!(cube.position().y, 0.5, epsilon = 5e-3);
    // Still upright.
    assert!(cube.pose().axis1().dot(&Vector3::y()) > 0.99);
    assert!(cube.velocity().norm() < 5e-2);
}

#[test]
fn voxel_rests_on_voxel_floor() {
    let floor: Vec<_> = (-2..=2)
        .flat_map(|x| (-2..=2).map(move |z| Point3::new(x, 0, z)))
        .collect();
    let floor = Arc::new(CollisionShape::Voxel(VoxelShape::new(floor).unwrap()));
    let block = Arc::new(CollisionShape::Voxel(
        VoxelShape::new([Point3::new(0, 0, 0)]).unwrap(),
    ));

    let mut bodies = vec![
        Body::new_static(Pose::identity()).with_shape(floor),
        Body::new(Pose::from_position(Point3::new(0.0, 1.5, 0.0))).with_shape(block),
    ];
    settle(&mut bodies, 2.0);

    // The sample spheres stop at the floor's top face, one cell up.
    assert_relative_eq!(bodies[1].position().y, 1.0, epsilon = 1e-2);
    assert!(bodies[1].pose().axis1().dot(&Vector3::y()) > 0.99);
}
