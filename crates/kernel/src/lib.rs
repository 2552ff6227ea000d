//! World Kernel: the authoritative voxel grid.
//!
//! # Invariants
//! - The grid is generated once and never mutated afterwards.
//! - Solidity queries outside the grid answer "not solid" instead of failing.
//! - Cell iteration order is x-outer, y-middle, z-inner and visits every cell once.

pub mod world;

pub use world::{BlockType, VoxelGrid};
