//! Voxel grid bookkeeping and the voxel-voxel collider through the public
//! dispatch.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use xpbd_physics::{collide, CollisionError, CollisionShape, Pose, VoxelClass, VoxelGrid, VoxelShape};

fn p(x: i32, y: i32, z: i32) -> Point3<i32> {
    Point3::new(x, y, z)
}

#[test]
fn inserting_neighbour_bumps_count_by_one() {
    let mut grid = VoxelGrid::new();
    assert_eq!(grid.classify(&p(0, 0, 0)), VoxelClass::Air);
    assert_eq!(grid.classify(&p(1, 0, 0)), VoxelClass::Air);

    assert!(grid.set_full(&p(0, 0, 0)).unwrap());
    let before = grid.neighbor_count(&p(0, 0, 0));
    assert!(grid.set_full(&p(1, 0, 0)).unwrap());

    assert_eq!(grid.neighbor_count(&p(0, 0, 0)), before + 1);
    assert_eq!(grid.classify(&p(0, 0, 0)), VoxelClass::Surface);
    assert_eq!(grid.classify(&p(1, 0, 0)), VoxelClass::Surface);
    // A cell touching only the pair is in the halo.
    assert_eq!(grid.classify(&p(2, 1, 0)), VoxelClass::Proximity);
}

#[test]
fn repeated_writes_are_noops() {
    let mut grid = VoxelGrid::new();
    assert!(grid.set_full(&p(3, 3, 3)).unwrap());
    assert!(!grid.set_full(&p(3, 3, 3)).unwrap());
    assert_eq!(grid.neighbor_count(&p(4, 3, 3)), 1);

    assert!(grid.set_empty(&p(3, 3, 3)).unwrap());
    assert!(!grid.set_empty(&p(3, 3, 3)).unwrap());
    assert_eq!(grid.neighbor_count(&p(4, 3, 3)), 0);
    assert_eq!(grid, VoxelGrid::new());
}

#[test]
fn enclosed_cell_is_interior_and_silent() {
    let mut grid = VoxelGrid::new();
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                grid.set_full(&p(x, y, z)).unwrap();
            }
        }
    }
    assert_eq!(grid.neighbor_count(&p(0, 0, 0)), 26);
    assert_eq!(grid.classify(&p(0, 0, 0)), VoxelClass::Interior);
    assert!(grid.allowed_normals(&p(0, 0, 0)).is_empty());

    // A corner cell has three open faces.
    let corner = grid.allowed_normals(&p(1, 1, 1));
    assert_eq!(corner.len(), 3);
    assert!(corner.contains(&Vector3::x()));
    assert!(corner.contains(&Vector3::y()));
    assert!(corner.contains(&Vector3::z()));
}

#[test]
fn writes_outside_the_grid_fail() {
    let mut grid = VoxelGrid::new();
    let err = grid.set_full(&p(0, 21, 0)).unwrap_err();
    assert_eq!(err, CollisionError::VoxelOutOfBounds { x: 0, y: 21, z: 0 });
    assert_eq!(grid.classify(&p(0, 21, 0)), VoxelClass::Air);
}

#[test]
fn stacked_voxel_shapes_touch_through_dispatch() {
    let shape = CollisionShape::Voxel(VoxelShape::new([p(0, 0, 0)]).unwrap());
    let (pa, pb) = (Pose::identity(), Pose::from_position(Point3::new(0.0, 0.8, 0.0)));

    let m = collide(&shape, &pa, &shape, &pb).unwrap();
    assert_eq!(m.len(), 4);
    for c in m.iter() {
        assert_relative_eq!(c.normal, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(c.depth, 0.2, epsilon = 1e-12);
    }
}

#[test]
fn voxel_manifold_is_capped_deepest_first() {
    let slab: Vec<_> = (-2..=2)
        .flat_map(|x| (-2..=2).map(move |z| p(x, 0, z)))
        .collect();
    let floor = CollisionShape::Voxel(VoxelShape::new(slab.clone()).unwrap());
    let lid = CollisionShape::Voxel(VoxelShape::new(slab).unwrap());
    let pb = Pose::from_position(Point3::new(0.0, 0.9, 0.0));

    let m = collide(&floor, &Pose::identity(), &lid, &pb).unwrap();
    assert_eq!(m.len(), 4);
    let depths: Vec<f64> = m.iter().map(|c| c.depth).collect();
    assert!(depths.windows(2).all(|w| w[0] >= w[1]));
}
