//! Voxel occupancy grids.
//!
//! A [`VoxelGrid`] is a dense byte array over a fixed lattice range. Each
//! byte packs two things:
//!
//! | bits | meaning |
//! |------|---------|
//! | 0    | cell is full |
//! | 1-7  | number of full cells among the 26 neighbours |
//!
//! The neighbour count is maintained incrementally on every write, so
//! classifying a cell is a single lookup. A [`VoxelShape`] pairs the grid
//! with the list of occupied cells for iteration.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use crate::aabb::Aabb;
use crate::error::CollisionError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const FULL_BIT: u8 = 0b0000_0001;
const COUNT_SHIFT: u8 = 1;
const ALL_NEIGHBORS: u8 = 26;

/// Default half-range of the lattice on every axis.
pub const DEFAULT_GRID_EXTENT: i32 = 20;

/// Outward face directions in the order +X, -X, +Y, -Y, +Z, -Z.
pub const FACE_DIRECTIONS: [[i32; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Occupancy class of a lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VoxelClass {
    /// Empty with no full neighbours, or outside the grid.
    Air,
    /// Empty but touching at least one full cell.
    Proximity,
    /// Full with at least one non-full neighbour.
    Surface,
    /// Full and completely enclosed.
    Interior,
}

impl VoxelClass {
    /// Whether the cell is occupied.
    #[must_use]
    pub fn is_full(self) -> bool {
        matches!(self, Self::Surface | Self::Interior)
    }
}

/// Bit-packed occupancy grid with incremental neighbour counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelGrid {
    min: Point3<i32>,
    max: Point3<i32>,
    data: Vec<u8>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelGrid {
    /// Empty grid spanning `-20..=20` on every axis.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bounds(
            Point3::new(-DEFAULT_GRID_EXTENT, -DEFAULT_GRID_EXTENT, -DEFAULT_GRID_EXTENT),
            Point3::new(DEFAULT_GRID_EXTENT, DEFAULT_GRID_EXTENT, DEFAULT_GRID_EXTENT),
        )
    }

    /// Empty grid spanning `min..=max` (inclusive). Inverted axes give an
    /// empty lattice where every cell is out of bounds.
    #[must_use]
    pub fn with_bounds(min: Point3<i32>, max: Point3<i32>) -> Self {
        let len = |lo: i32, hi: i32| usize::try_from(hi - lo + 1).unwrap_or(0);
        let size = len(min.x, max.x) * len(min.y, max.y) * len(min.z, max.z);
        Self {
            min,
            max,
            data: vec![0; size],
        }
    }

    /// Inclusive lower corner of the lattice.
    #[must_use]
    pub fn min(&self) -> Point3<i32> {
        self.min
    }

    /// Inclusive upper corner of the lattice.
    #[must_use]
    pub fn max(&self) -> Point3<i32> {
        self.max
    }

    /// Whether the cell lies inside the lattice.
    #[must_use]
    pub fn in_bounds(&self, cell: &Point3<i32>) -> bool {
        (0..3).all(|i| cell[i] >= self.min[i] && cell[i] <= self.max[i])
    }

    #[allow(clippy::cast_sign_loss)] // in_bounds guarantees non-negative offsets
    fn index(&self, cell: &Point3<i32>) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let x_len = (self.max.x - self.min.x + 1) as usize;
        let y_len = (self.max.y - self.min.y + 1) as usize;
        let dx = (cell.x - self.min.x) as usize;
        let dy = (cell.y - self.min.y) as usize;
        let dz = (cell.z - self.min.z) as usize;
        Some(dx + x_len * dy + x_len * y_len * dz)
    }

    fn raw(&self, cell: &Point3<i32>) -> u8 {
        self.index(cell).map_or(0, |i| self.data[i])
    }

    /// Whether the cell is full. Out-of-bounds cells are empty.
    #[must_use]
    pub fn is_full(&self, cell: &Point3<i32>) -> bool {
        self.raw(cell) & FULL_BIT != 0
    }

    /// Number of full cells among the 26 neighbours.
    #[must_use]
    pub fn neighbor_count(&self, cell: &Point3<i32>) -> u8 {
        self.raw(cell) >> COUNT_SHIFT
    }

    /// Mark a cell full. Returns whether anything changed.
    pub fn set_full(&mut self, cell: &Point3<i32>) -> Result<bool, CollisionError> {
        self.set(cell, true)
    }

    /// Mark a cell empty. Returns whether anything changed.
    pub fn set_empty(&mut self, cell: &Point3<i32>) -> Result<bool, CollisionError> {
        self.set(cell, false)
    }

    fn set(&mut self, cell: &Point3<i32>, full: bool) -> Result<bool, CollisionError> {
        let index = self.index(cell).ok_or(CollisionError::VoxelOutOfBounds {
            x: cell.x,
            y: cell.y,
            z: cell.z,
        })?;

        if (self.data[index] & FULL_BIT != 0) == full {
            return Ok(false);
        }

        if full {
            self.data[index] |= FULL_BIT;
        } else {
            self.data[index] &= !FULL_BIT;
        }

        for neighbor in neighbors(cell) {
            let Some(ni) = self.index(&neighbor) else {
                continue;
            };
            let byte = self.data[ni];
            let count = byte >> COUNT_SHIFT;
            let count = if full {
                count.saturating_add(1)
            } else {
                count.saturating_sub(1)
            };
            self.data[ni] = (byte & FULL_BIT) | (count << COUNT_SHIFT);
        }

        Ok(true)
    }

    /// Classify a cell. Out-of-bounds cells are [`VoxelClass::Air`].
    #[must_use]
    pub fn classify(&self, cell: &Point3<i32>) -> VoxelClass {
        let byte = self.raw(cell);
        let count = byte >> COUNT_SHIFT;
        match (byte & FULL_BIT != 0, count) {
            (false, 0) => VoxelClass::Air,
            (false, _) => VoxelClass::Proximity,
            (true, ALL_NEIGHBORS) => VoxelClass::Interior,
            (true, _) => VoxelClass::Surface,
        }
    }

    /// Outward face normals of a surface cell whose face neighbour is not
    /// full, in [`FACE_DIRECTIONS`] order. Empty for every other class.
    #[must_use]
    pub fn allowed_normals(&self, cell: &Point3<i32>) -> SmallVec<[Vector3<f64>; 6]> {
        if self.classify(cell) != VoxelClass::Surface {
            return SmallVec::new();
        }
        FACE_DIRECTIONS
            .iter()
            .map(|dir| Vector3::from(*dir))
            .filter(|dir| !self.is_full(&(cell + dir)))
            .map(|dir| dir.cast::<f64>())
            .collect()
    }
}

/// The 26 lattice neighbours of a cell.
fn neighbors(cell: &Point3<i32>) -> impl Iterator<Item = Point3<i32>> + '_ {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).filter_map(move |dz| {
                if dx == 0 && dy == 0 && dz == 0 {
                    None
                } else {
                    Some(Point3::new(cell.x + dx, cell.y + dy, cell.z + dz))
                }
            })
        })
    })
}

/// A shape made of unit cubes centered on integer lattice points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoxelShape {
    voxels: Vec<Point3<i32>>,
    grid: VoxelGrid,
}

impl VoxelShape {
    /// Build a shape on the default ±20 lattice.
    pub fn new(voxels: impl IntoIterator<Item = Point3<i32>>) -> Result<Self, CollisionError> {
        Self::with_grid(voxels, VoxelGrid::new())
    }

    /// Build a shape on a caller-supplied (empty) grid.
    pub fn with_grid(
        voxels: impl IntoIterator<Item = Point3<i32>>,
        grid: VoxelGrid,
    ) -> Result<Self, CollisionError> {
        let mut shape = Self {
            voxels: Vec::new(),
            grid,
        };
        for v in voxels {
            shape.add(v)?;
        }
        Ok(shape)
    }

    /// Add a voxel. Returns whether it was newly added.
    pub fn add(&mut self, voxel: Point3<i32>) -> Result<bool, CollisionError> {
        let changed = self.grid.set_full(&voxel)?;
        if changed {
            self.voxels.push(voxel);
        }
        Ok(changed)
    }

    /// Remove a voxel. Returns whether it was present.
    pub fn remove(&mut self, voxel: &Point3<i32>) -> Result<bool, CollisionError> {
        let changed = self.grid.set_empty(voxel)?;
        if changed {
            self.voxels.retain(|v| v != voxel);
        }
        Ok(changed)
    }

    /// Occupied cells in insertion order.
    #[must_use]
    pub fn voxels(&self) -> &[Point3<i32>] {
        &self.voxels
    }

    /// The backing grid.
    #[must_use]
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Occupied cells classified as [`VoxelClass::Surface`].
    pub fn surface_voxels(&self) -> impl Iterator<Item = &Point3<i32>> + '_ {
        self.voxels
            .iter()
            .filter(|v| self.grid.classify(v) == VoxelClass::Surface)
    }

    /// Local bound of all occupied cells, each a unit cube around its
    /// lattice point.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        let half = Vector3::repeat(0.5);
        self.voxels
            .iter()
            .map(|v| Aabb::from_center(Point3::from(v.coords.cast::<f64>()), half))
            .reduce(|a, b| a.merged(&b))
            .unwrap_or_default()
    }
}
