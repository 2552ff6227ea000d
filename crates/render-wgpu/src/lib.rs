//! wgpu render backend for the voxel viewer.
//!
//! Implements [`voxelview_render::CubePipeline`]: every non-air voxel is its
//! own draw call of the static 36-vertex cube, with per-voxel uniforms bound
//! through a dynamic offset.
//!
//! # Invariants
//! - The renderer never mutates world or camera state.
//! - Draws are submitted in the order they were recorded.

mod gpu;
mod shaders;
mod texture;

pub use gpu::{RenderError, WgpuRenderer};
pub use texture::AtlasTexture;
