//! Shared types and configuration for the voxelview workspace.
//!
//! # Invariants
//! - Grid coordinates are signed so probes one cell outside the world stay representable.
//! - Configuration is validated once at startup and immutable afterwards.

pub mod config;
pub mod types;

pub use config::{ConfigError, MAX_WORLD_CELLS, ViewerConfig};
pub use types::{CellCoord, GridDims};
