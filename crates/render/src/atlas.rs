use glam::Vec2;
use voxelview_kernel::BlockType;

/// A tile inside the texture atlas, addressed by column and row (row 0 at the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasTile {
    pub col: u32,
    pub row: u32,
}

impl AtlasTile {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Square atlas of `dimension × dimension` equally sized tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileAtlas {
    dimension: u32,
}

impl Default for TileAtlas {
    fn default() -> Self {
        Self::new(16)
    }
}

impl TileAtlas {
    pub fn new(dimension: u32) -> Self {
        assert!(dimension > 0, "atlas dimension must be positive");
        Self { dimension }
    }

    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Width of one tile in normalized texture coordinates.
    pub fn tile_size(&self) -> f32 {
        1.0 / self.dimension as f32
    }

    /// The "missing texture" tile in the bottom-right corner.
    pub fn missing(&self) -> AtlasTile {
        AtlasTile::new(self.dimension - 1, self.dimension - 1)
    }

    /// Tile used for every face of a block.
    ///
    /// Dirt shares the stone tile. Air has no texture and maps to
    /// [`TileAtlas::missing`].
    pub fn tile_for(&self, block: BlockType) -> AtlasTile {
        match block {
            BlockType::Grass => AtlasTile::new(0, 0),
            BlockType::Dirt | BlockType::Stone => AtlasTile::new(1, 0),
            BlockType::Air => self.missing(),
        }
    }

    /// Like [`TileAtlas::tile_for`], for raw block codes; unknown codes get the missing tile.
    pub fn tile_for_code(&self, code: u8) -> AtlasTile {
        BlockType::from_code(code).map_or_else(|| self.missing(), |b| self.tile_for(b))
    }

    /// Top-left corner of a tile in normalized texture coordinates.
    pub fn tile_start(&self, tile: AtlasTile) -> Vec2 {
        Vec2::new(tile.col as f32, tile.row as f32) * self.tile_size()
    }
}
