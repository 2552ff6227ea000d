//! Rendering core: everything about a frame that does not need a GPU.
//!
//! # Invariants
//! - Rendering never mutates the grid or the camera.
//! - Exactly one cube draw is issued per non-air cell, none for air.
//! - The look direction is always derived from yaw and pitch, never stored.
//!
//! GPU backends implement [`CubePipeline`]; [`DrawRecorder`] is an in-memory
//! implementation used for headless runs and tests.

mod atlas;
mod camera;
mod frame;
mod mesh;
mod renderer;

pub use atlas::{AtlasTile, TileAtlas};
pub use camera::Camera;
pub use frame::{FrameClock, LoopState};
pub use mesh::{CUBE_VERTICES, CUBE_VERTEX_COUNT, CubeVertex};
pub use renderer::{
    CubePipeline, DrawCommand, DrawRecorder, FrameStats, FrameUniforms, Viewport, VoxelUniforms,
    render_frame,
};
