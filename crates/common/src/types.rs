use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Integer coordinate of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing a world-space point (each component floored).
    pub fn containing(pos: Vec3) -> Self {
        Self {
            x: pos.x.floor() as i32,
            y: pos.y.floor() as i32,
            z: pos.z.floor() as i32,
        }
    }

    /// World-space position of the cell's minimum corner.
    pub fn min_corner(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// Extent of a voxel grid along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub size_x: i32,
    pub size_y: i32,
    pub size_z: i32,
}

impl GridDims {
    pub fn new(size_x: i32, size_y: i32, size_z: i32) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
        }
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        (self.size_x.max(0) as usize) * (self.size_y.max(0) as usize) * (self.size_z.max(0) as usize)
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        (0..self.size_x).contains(&coord.x)
            && (0..self.size_y).contains(&coord.y)
            && (0..self.size_z).contains(&coord.z)
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::new(16, 8, 16)
    }
}
