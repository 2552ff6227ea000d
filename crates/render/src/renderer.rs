use crate::atlas::TileAtlas;
use crate::camera::Camera;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use voxelview_kernel::VoxelGrid;

/// Per-frame uniforms shared by every cube draw. Layout matches the WGSL `FrameUniforms`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub tile_size: f32,
    pub _pad: [f32; 3],
}

/// Per-voxel uniforms for a single cube draw. Layout matches the WGSL `VoxelUniforms`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VoxelUniforms {
    pub model: [[f32; 4]; 4],
    pub tile_start: [f32; 2],
    pub _pad: [f32; 2],
}

/// Current framebuffer size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        Camera::aspect_ratio(self.width, self.height)
    }
}

/// A GPU pipeline able to draw the static textured cube.
///
/// Calls arrive in frame order: `clear`, `bind_frame`, then one `draw_cube`
/// per visible voxel. Implementations may defer the actual GPU work until
/// the frame is submitted, but must preserve that order.
pub trait CubePipeline {
    /// Clear color and depth.
    fn clear(&mut self);

    /// Bind the program, upload view/projection and bind the atlas.
    fn bind_frame(&mut self, frame: &FrameUniforms);

    /// Upload per-voxel uniforms and draw the 36-vertex cube once.
    fn draw_cube(&mut self, voxel: &VoxelUniforms);
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub draws: usize,
    pub skipped_air: usize,
}

/// Record one frame of the world into `pipeline`.
///
/// Cells are visited x-outer, y-middle, z-inner; air is skipped and every
/// other cell becomes one `draw_cube` translated to its integer coordinates.
pub fn render_frame<P: CubePipeline + ?Sized>(
    pipeline: &mut P,
    grid: &VoxelGrid,
    camera: &Camera,
    atlas: &TileAtlas,
    viewport: Viewport,
) -> FrameStats {
    pipeline.clear();
    pipeline.bind_frame(&FrameUniforms {
        view: camera.view_matrix().to_cols_array_2d(),
        projection: camera
            .projection_matrix(viewport.aspect_ratio())
            .to_cols_array_2d(),
        tile_size: atlas.tile_size(),
        _pad: [0.0; 3],
    });

    let mut stats = FrameStats::default();
    for (cell, block) in grid.iter_cells() {
        if block.is_air() {
            stats.skipped_air += 1;
            continue;
        }
        let model = Mat4::from_translation(cell.min_corner());
        let tile_start = atlas.tile_start(atlas.tile_for(block));
        pipeline.draw_cube(&VoxelUniforms {
            model: model.to_cols_array_2d(),
            tile_start: tile_start.to_array(),
            _pad: [0.0; 2],
        });
        stats.draws += 1;
    }
    tracing::trace!(draws = stats.draws, skipped = stats.skipped_air, "frame recorded");
    stats
}

/// One pipeline call captured by [`DrawRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    BindFrame(FrameUniforms),
    DrawCube(VoxelUniforms),
}

/// In-memory [`CubePipeline`] that records every call.
///
/// Used for headless dry runs and for checking draw order in tests.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    commands: Vec<DrawCommand>,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn draw_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawCube(_)))
            .count()
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl CubePipeline for DrawRecorder {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn bind_frame(&mut self, frame: &FrameUniforms) {
        self.commands.push(DrawCommand::BindFrame(*frame));
    }

    fn draw_cube(&mut self, voxel: &VoxelUniforms) {
        self.commands.push(DrawCommand::DrawCube(*voxel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use voxelview_common::GridDims;
    use voxelview_kernel::BlockType;

    fn render_reference() -> (DrawRecorder, FrameStats) {
        let grid = VoxelGrid::generate(GridDims::new(16, 8, 16));
        let camera = Camera::new(Vec3::new(8.0, 6.3, 8.0));
        let mut recorder = DrawRecorder::new();
        let stats = render_frame(
            &mut recorder,
            &grid,
            &camera,
            &TileAtlas::default(),
            Viewport::new(1280, 720),
        );
        (recorder, stats)
    }

    #[test]
    fn one_draw_per_solid_cell() {
        let (recorder, stats) = render_reference();
        // Five non-air layers (stone 0..2, dirt 2..4, grass 4).
        assert_eq!(stats.draws, 16 * 16 * 5);
        assert_eq!(recorder.draw_count(), 16 * 16 * 5);
        assert_eq!(stats.skipped_air, 16 * 16 * 3);
    }

    #[test]
    fn clear_and_bind_precede_draws() {
        let (recorder, _) = render_reference();
        let commands = recorder.commands();
        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::BindFrame(_)));
        assert!(
            commands[2..]
                .iter()
                .all(|c| matches!(c, DrawCommand::DrawCube(_)))
        );
    }

    #[test]
    fn draws_follow_x_y_z_order_with_tiles() {
        let (recorder, _) = render_reference();
        let atlas = TileAtlas::default();
        let draws: Vec<&VoxelUniforms> = recorder
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::DrawCube(v) => Some(v),
                _ => None,
            })
            .collect();

        let origin = Mat4::from_cols_array_2d(&draws[0].model).w_axis.truncate();
        assert_eq!(origin, Vec3::ZERO);
        let second = Mat4::from_cols_array_2d(&draws[1].model).w_axis.truncate();
        assert_eq!(second, Vec3::new(0.0, 0.0, 1.0));

        // Column x=0, z=0 at y=0 is stone; grass sits at y=4 (index 4*16 within x=0).
        let stone = atlas.tile_start(atlas.tile_for(BlockType::Stone));
        assert_eq!(Vec2::from_array(draws[0].tile_start), stone);
        let grass = atlas.tile_start(atlas.tile_for(BlockType::Grass));
        assert_eq!(Vec2::from_array(draws[4 * 16].tile_start), grass);
        let grass_pos = Mat4::from_cols_array_2d(&draws[4 * 16].model).w_axis.truncate();
        assert_eq!(grass_pos, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn bind_frame_carries_camera_matrices() {
        let grid = VoxelGrid::empty(GridDims::new(2, 2, 2));
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        let mut recorder = DrawRecorder::new();
        let viewport = Viewport::new(800, 0);
        render_frame(&mut recorder, &grid, &camera, &TileAtlas::new(16), viewport);

        let DrawCommand::BindFrame(frame) = &recorder.commands()[1] else {
            panic!("expected BindFrame");
        };
        assert_eq!(frame.view, camera.view_matrix().to_cols_array_2d());
        assert_eq!(
            frame.projection,
            camera.projection_matrix(800.0).to_cols_array_2d()
        );
        assert_eq!(frame.tile_size, 1.0 / 16.0);
    }

    #[test]
    fn empty_world_draws_nothing() {
        let grid = VoxelGrid::empty(GridDims::new(4, 4, 4));
        let mut recorder = DrawRecorder::new();
        let stats = render_frame(
            &mut recorder,
            &grid,
            &Camera::default(),
            &TileAtlas::default(),
            Viewport::new(640, 480),
        );
        assert_eq!(stats.draws, 0);
        assert_eq!(recorder.commands().len(), 2);
    }

    #[test]
    fn uniform_layouts_match_wgsl() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 144);
        assert_eq!(std::mem::size_of::<VoxelUniforms>(), 80);
    }
}
