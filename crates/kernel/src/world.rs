use serde::{Deserialize, Serialize};
use voxelview_common::{CellCoord, GridDims};

/// Terrain material stored in each grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    /// Nothing present: never rendered, never collidable.
    #[default]
    Air = 0,
    Grass = 1,
    Dirt = 2,
    Stone = 3,
}

impl BlockType {
    /// Decode a raw block code. Unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Air),
            1 => Some(Self::Grass),
            2 => Some(Self::Dirt),
            3 => Some(Self::Stone),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_air(self) -> bool {
        self == Self::Air
    }
}

/// Dense, fixed-size 3D grid of blocks.
///
/// Cells are stored x-major so that linear iteration matches the draw order
/// (x outer, y middle, z inner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    dims: GridDims,
    cells: Vec<BlockType>,
}

impl VoxelGrid {
    /// An all-air grid.
    pub fn empty(dims: GridDims) -> Self {
        Self {
            dims,
            cells: vec![BlockType::Air; dims.volume()],
        }
    }

    /// Fill a grid with flat layered terrain.
    ///
    /// Every column gets the same surface height `H = size_y / 2`: stone below
    /// `H - 2`, dirt on `[H - 2, H)`, grass at `H`, air above.
    pub fn generate(dims: GridDims) -> Self {
        tracing::info!(
            "generating {}x{}x{} world",
            dims.size_x,
            dims.size_y,
            dims.size_z
        );
        let mut grid = Self::empty(dims);
        let height = dims.size_y / 2;
        for x in 0..dims.size_x {
            for z in 0..dims.size_z {
                for y in 0..dims.size_y {
                    let block = if y < height - 2 {
                        BlockType::Stone
                    } else if y < height {
                        BlockType::Dirt
                    } else if y == height {
                        BlockType::Grass
                    } else {
                        BlockType::Air
                    };
                    let i = grid.index(x, y, z);
                    grid.cells[i] = block;
                }
            }
        }
        tracing::info!("world generation complete: {} solid cells", grid.solid_count());
        grid
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Whether the cell holds anything other than air.
    ///
    /// Coordinates outside the grid are "outside the world" and never solid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get(x, y, z).is_some_and(|b| !b.is_air())
    }

    pub fn is_solid_at(&self, coord: CellCoord) -> bool {
        self.is_solid(coord.x, coord.y, coord.z)
    }

    /// Block at an in-range coordinate.
    ///
    /// # Panics
    /// Panics if the coordinate lies outside the grid; use [`VoxelGrid::get`]
    /// when bounds are not already known.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        match self.get(x, y, z) {
            Some(block) => block,
            None => panic!("block_at({x}, {y}, {z}) outside grid {:?}", self.dims),
        }
    }

    /// Block at a coordinate, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        if !self.dims.contains(CellCoord::new(x, y, z)) {
            return None;
        }
        Some(self.cells[self.index(x, y, z)])
    }

    /// Top-most solid cell of a column, if any.
    pub fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        (0..self.dims.size_y).rev().find(|&y| self.is_solid(x, y, z))
    }

    /// Every cell in x-outer, y-middle, z-inner order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellCoord, BlockType)> + '_ {
        let GridDims {
            size_x,
            size_y,
            size_z,
        } = self.dims;
        (0..size_x).flat_map(move |x| {
            (0..size_y).flat_map(move |y| {
                (0..size_z).map(move |z| (CellCoord::new(x, y, z), self.cells[self.index(x, y, z)]))
            })
        })
    }

    /// Number of non-air cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|b| !b.is_air()).count()
    }

    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        let (sy, sz) = (self.dims.size_y as usize, self.dims.size_z as usize);
        (x as usize * sy + y as usize) * sz + z as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_world() -> VoxelGrid {
        VoxelGrid::generate(GridDims::new(16, 8, 16))
    }

    #[test]
    fn block_codes_round_trip() {
        for block in [BlockType::Air, BlockType::Grass, BlockType::Dirt, BlockType::Stone] {
            assert_eq!(BlockType::from_code(block.code()), Some(block));
        }
        assert_eq!(BlockType::from_code(4), None);
        assert_eq!(BlockType::from_code(255), None);
    }

    #[test]
    fn generated_layers_follow_surface_height() {
        let grid = reference_world();
        let h = 8 / 2;
        for x in 0..16 {
            for z in 0..16 {
                for y in 0..8 {
                    let expected = if y < h - 2 {
                        BlockType::Stone
                    } else if y < h {
                        BlockType::Dirt
                    } else if y == h {
                        BlockType::Grass
                    } else {
                        BlockType::Air
                    };
                    assert_eq!(grid.block_at(x, y, z), expected, "cell ({x},{y},{z})");
                }
            }
        }
    }

    #[test]
    fn odd_height_uses_floor() {
        let grid = VoxelGrid::generate(GridDims::new(1, 7, 1));
        // H = 3
        assert_eq!(grid.block_at(0, 0, 0), BlockType::Stone);
        assert_eq!(grid.block_at(0, 1, 0), BlockType::Dirt);
        assert_eq!(grid.block_at(0, 2, 0), BlockType::Dirt);
        assert_eq!(grid.block_at(0, 3, 0), BlockType::Grass);
        assert_eq!(grid.block_at(0, 4, 0), BlockType::Air);
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(reference_world(), reference_world());
    }

    #[test]
    fn out_of_bounds_is_never_solid() {
        let grid = reference_world();
        let probes = [
            (-1, 0, 0),
            (0, -1, 0),
            (0, 0, -1),
            (16, 0, 0),
            (0, 8, 0),
            (0, 0, 16),
            (i32::MIN, i32::MIN, i32::MIN),
            (i32::MAX, 0, i32::MAX),
        ];
        for (x, y, z) in probes {
            assert!(!grid.is_solid(x, y, z), "({x},{y},{z})");
            assert_eq!(grid.get(x, y, z), None);
        }
    }

    #[test]
    fn air_is_not_solid_and_ground_is() {
        let grid = reference_world();
        assert!(grid.is_solid(0, 0, 0));
        assert!(grid.is_solid(5, 4, 5));
        assert!(!grid.is_solid(5, 5, 5));
        assert!(grid.is_solid_at(CellCoord::new(3, 2, 3)));
    }

    #[test]
    fn surface_height_finds_grass() {
        let grid = reference_world();
        assert_eq!(grid.surface_height(8, 8), Some(4));
        assert_eq!(grid.surface_height(-1, 8), None);
        let empty = VoxelGrid::empty(GridDims::new(2, 2, 2));
        assert_eq!(empty.surface_height(0, 0), None);
    }

    #[test]
    fn iter_cells_is_exhaustive_and_ordered() {
        let grid = VoxelGrid::generate(GridDims::new(3, 4, 5));
        let cells: Vec<CellCoord> = grid.iter_cells().map(|(c, _)| c).collect();
        assert_eq!(cells.len(), 3 * 4 * 5);
        assert_eq!(cells[0], CellCoord::new(0, 0, 0));
        assert_eq!(cells[1], CellCoord::new(0, 0, 1));
        assert_eq!(cells[5], CellCoord::new(0, 1, 0));
        assert_eq!(cells[20], CellCoord::new(1, 0, 0));
        let mut sorted = cells.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), cells.len());
    }

    #[test]
    fn solid_count_matches_layers() {
        let grid = reference_world();
        // Layers 0..=4 are solid.
        assert_eq!(grid.solid_count(), 16 * 16 * 5);
    }

    #[test]
    #[should_panic]
    fn block_at_panics_out_of_range() {
        reference_world().block_at(16, 0, 0);
    }

    #[test]
    fn far_corner_of_tall_world_indexes_last_cell() {
        // (x * size_y) alone exceeds i32::MAX here.
        let dims = GridDims::new(2, 1 << 30, 1);
        let grid = VoxelGrid {
            dims,
            cells: Vec::new(),
        };
        assert_eq!(grid.index(1, (1 << 30) - 1, 0), (1usize << 31) - 1);
    }
}
