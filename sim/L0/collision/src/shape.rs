//! Collision shape variants.

use nalgebra::{Point3, Vector3};

use crate::aabb::Aabb;
use crate::voxel::VoxelShape;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Collision geometry attached to a body, expressed in the body's local frame.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CollisionShape {
    /// Box given by its local extents.
    Box(Aabb),
    /// Sphere centered at the body origin.
    Sphere {
        /// Radius of the sphere.
        radius: f64,
    },
    /// Half-space through the body origin. Solid below the plane.
    Plane {
        /// Local outward normal (unit vector).
        normal: Vector3<f64>,
    },
    /// Set of unit cubes on the integer lattice.
    Voxel(VoxelShape),
}

impl CollisionShape {
    /// Box centered at the body origin.
    #[must_use]
    pub fn box_from_half_extents(half_extents: Vector3<f64>) -> Self {
        Self::Box(Aabb::from_center(Point3::origin(), half_extents))
    }

    /// Sphere of the given radius.
    #[must_use]
    pub fn sphere(radius: f64) -> Self {
        Self::Sphere { radius }
    }

    /// Plane with the given local normal (normalized here).
    #[must_use]
    pub fn plane(normal: Vector3<f64>) -> Self {
        Self::Plane {
            normal: normal.normalize(),
        }
    }

    /// Horizontal ground plane facing +Y.
    #[must_use]
    pub fn ground_plane() -> Self {
        Self::Plane {
            normal: Vector3::y(),
        }
    }

    /// Short name of the variant, used in errors and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Box(_) => "box",
            Self::Sphere { .. } => "sphere",
            Self::Plane { .. } => "plane",
            Self::Voxel(_) => "voxel",
        }
    }

    /// Bound of the shape in its local frame. Planes are unbounded.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Self::Box(aabb) => *aabb,
            Self::Sphere { radius } => Aabb::from_center(Point3::origin(), Vector3::repeat(*radius)),
            Self::Plane { .. } => Aabb::unbounded(),
            Self::Voxel(voxels) => voxels.local_bounds(),
        }
    }
}
