//! Integration tests across the xpbd-* crates.
//!
//! - the correction primitive on real bodies
//! - colliders against closed-form results
//! - the voxel grid's incremental bookkeeping
//! - bodies settling under gravity with contacts
//! - joints inside the full substep loop
//! - the world container end to end

pub mod collision;
pub mod correction;
pub mod joints;
pub mod resting;
pub mod voxels;
pub mod world;
