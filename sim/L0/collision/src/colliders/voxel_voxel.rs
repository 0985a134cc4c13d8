//! Voxel-voxel collider (box clamp).
//!
//! Every surface voxel of B is sampled at its 8 corners, pulled in by
//! [`VOXEL_SAMPLE_OFFSET`]. Each sample is treated as a small sphere of
//! radius [`VOXEL_SUPPORT_RADIUS`] and tested against the nearest surface
//! cell of A within the 3x3x3 neighbourhood of the lattice point it falls
//! on. The nearest cell is a unit box, so the contact normal comes from the
//! closest point on that box. Corners and edges therefore get a diagonal
//! normal instead of an arbitrary face normal.
//!
//! Samples that end up inside a full cell of A are pushed out along the
//! face direction with the shortest walk through full cells to open space,
//! so a deeply sunk body is always driven back out of A.

use nalgebra::{Point3, Vector3};
use xpbd_types::Pose;

use crate::aabb::Aabb;
use crate::manifold::{ContactPair, Manifold};
use crate::voxel::{VoxelClass, VoxelGrid, VoxelShape, FACE_DIRECTIONS};

/// Distance of each sample from its voxel center along every axis.
pub const VOXEL_SAMPLE_OFFSET: f64 = 0.25;

/// Radius of the sphere each sample stands for.
pub const VOXEL_SUPPORT_RADIUS: f64 = 0.25;

/// Largest number of contacts reported for one voxel pair.
pub const MAX_VOXEL_CONTACTS: usize = 4;

const VOXEL_HALF_EXTENT: f64 = 0.5;

/// Collide two voxel shapes.
#[must_use]
pub fn collide_voxel_voxel(
    voxels_a: &VoxelShape,
    pose_a: &Pose,
    voxels_b: &VoxelShape,
    pose_b: &Pose,
) -> Manifold {
    let grid_a = voxels_a.grid();
    let mut manifold = Manifold::empty();

    for voxel in voxels_b.surface_voxels() {
        let center = voxel.cast::<f64>();
        for offset in corner_offsets() {
            let sample_b = center + offset;
            let sample = pose_a.inv_transform_point(&pose_b.transform_point(&sample_b));
            if let Some(contact) = sample_contact(grid_a, &sample, pose_a, pose_b) {
                manifold.push(contact);
            }
        }
    }

    manifold.keep_deepest(MAX_VOXEL_CONTACTS);
    manifold
}

/// Sample offsets, starting at (+, +, +) with Z flipping fastest.
fn corner_offsets() -> impl Iterator<Item = Vector3<f64>> {
    (0..8).map(|i| {
        let sign = |bit: u32| if (i >> bit) & 1 == 1 { -1.0 } else { 1.0 };
        Vector3::new(sign(2), sign(1), sign(0)) * VOXEL_SAMPLE_OFFSET
    })
}

/// Contact for one sample given in A's local frame.
fn sample_contact(
    grid: &VoxelGrid,
    sample: &Point3<f64>,
    pose_a: &Pose,
    pose_b: &Pose,
) -> Option<ContactPair> {
    let base = lattice_cell(sample);
    let r = VOXEL_SUPPORT_RADIUS;

    let (local_a, normal_out, depth) = if grid.is_full(&base) {
        let (to_surface, face) = exit_through_open_face(grid, &base, sample);
        (sample + face * to_surface, face, to_surface + r)
    } else {
        let (cell, closest, distance) = nearest_surface_cell(grid, &base, sample)?;
        if distance >= r {
            return None;
        }
        let normal = if distance > 0.0 {
            (sample - closest) / distance
        } else {
            // On the shared face of a full cell and the sample's empty cell.
            (base - cell).cast::<f64>().normalize()
        };
        (closest, normal, r - distance)
    };

    let local_b = sample - normal_out * r;
    let world_b = pose_a.transform_point(&local_b);

    Some(ContactPair {
        local_point_a: local_a,
        local_point_b: pose_b.inv_transform_point(&world_b),
        normal: pose_a.rotate(&normal_out),
        depth,
    })
}

/// Lattice cell whose unit box contains the point.
#[allow(clippy::cast_possible_truncation)] // lattice coordinates are small
fn lattice_cell(point: &Point3<f64>) -> Point3<i32> {
    let round = |x: f64| (x + 0.5).floor() as i32;
    Point3::new(round(point.x), round(point.y), round(point.z))
}

/// Shortest way out of A for a sample inside the full cell `base`: walk
/// each face direction across full cells to the first empty one. Returns
/// the distance to that exit face and its outward normal.
fn exit_through_open_face(
    grid: &VoxelGrid,
    base: &Point3<i32>,
    sample: &Point3<f64>,
) -> (f64, Vector3<f64>) {
    let offset = sample - base.cast::<f64>();
    let mut best = (f64::INFINITY, Vector3::y());

    for dir in FACE_DIRECTIONS.iter().map(|d| Vector3::from(*d)) {
        // Out-of-grid cells are empty, so every walk ends.
        let mut steps = 1;
        while grid.is_full(&(base + dir * steps)) {
            steps += 1;
        }
        let face = dir.cast::<f64>();
        let to_surface = f64::from(steps - 1) + VOXEL_HALF_EXTENT - face.dot(&offset);
        if to_surface < best.0 {
            best = (to_surface, face);
        }
    }
    best
}

/// Closest surface cell among the 3x3x3 cells around an empty lattice
/// cell: the cell, the closest point on its box, and the distance to it.
fn nearest_surface_cell(
    grid: &VoxelGrid,
    base: &Point3<i32>,
    sample: &Point3<f64>,
) -> Option<(Point3<i32>, Point3<f64>, f64)> {
    let half = Vector3::repeat(VOXEL_HALF_EXTENT);

    let mut best: Option<(Point3<i32>, Point3<f64>, f64)> = None;
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let cell = Point3::new(base.x + dx, base.y + dy, base.z + dz);
                if grid.classify(&cell) != VoxelClass::Surface {
                    continue;
                }
                let closest = Aabb::from_center(cell.cast::<f64>(), half).closest_point(sample);
                let distance = (sample - closest).norm();
                if best.map_or(true, |(_, _, d)| distance < d) {
                    best = Some((cell, closest, distance));
                }
            }
        }
    }
    best
}
