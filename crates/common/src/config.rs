use crate::types::GridDims;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest world the viewer accepts, in cells.
///
/// Every cell owns one 256-byte uniform slot on the GPU, and this many slots
/// fill the default 256 MiB buffer limit exactly.
pub const MAX_WORLD_CELLS: u64 = 1 << 20;

/// Errors from loading or validating a [`ViewerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every tunable of the viewer. Missing YAML keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    pub world: GridDims,
    /// Degrees of rotation per unit of mouse motion.
    pub mouse_sensitivity: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Distance from the feet to the eye.
    pub player_height: f32,
    pub texture_path: PathBuf,
    /// Tiles per side of the square texture atlas.
    pub atlas_dimension: u32,
    /// Upper bound on the per-frame delta time, in seconds.
    pub max_frame_dt: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            window_title: "voxelview".into(),
            world: GridDims::default(),
            mouse_sensitivity: 0.1,
            move_speed: 4.0,
            player_height: 1.8,
            texture_path: PathBuf::from("terrain.png"),
            atlas_dimension: 16,
            max_frame_dt: 0.1,
        }
    }
}

impl ViewerConfig {
    /// Load a config from a YAML file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the viewer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.world;
        if w.size_x <= 0 || w.size_y <= 0 || w.size_z <= 0 {
            return Err(ConfigError::Invalid(format!(
                "world dimensions must be positive, got {}x{}x{}",
                w.size_x, w.size_y, w.size_z
            )));
        }
        let cells = w.size_x as u64 * w.size_y as u64 * w.size_z as u64;
        if cells > MAX_WORLD_CELLS {
            return Err(ConfigError::Invalid(format!(
                "world {}x{}x{} has {cells} cells, more than the limit of {MAX_WORLD_CELLS}",
                w.size_x, w.size_y, w.size_z
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        if self.atlas_dimension == 0 {
            return Err(ConfigError::Invalid("atlas_dimension must be non-zero".into()));
        }
        for (name, value) in [
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("move_speed", self.move_speed),
            ("player_height", self.player_height),
            ("max_frame_dt", self.max_frame_dt),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
