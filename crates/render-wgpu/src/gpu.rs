use crate::shaders;
use crate::texture::AtlasTexture;
use std::num::NonZeroU64;
use voxelview_assets::TextureImage;
use voxelview_render::{
    CUBE_VERTEX_COUNT, CUBE_VERTICES, CubePipeline, CubeVertex, FrameUniforms, VoxelUniforms,
};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.5,
    g: 0.8,
    b: 1.0,
    a: 1.0,
};

/// Errors from submitting a recorded frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("frame submitted before bind_frame")]
    FrameNotBound,
    #[error("{count} voxel draws exceed uniform capacity of {capacity}")]
    TooManyVoxels { count: usize, capacity: usize },
    #[error("{capacity} voxel slots need {required} bytes, device allows {limit}")]
    VoxelBufferTooLarge {
        capacity: usize,
        required: u64,
        limit: u64,
    },
}

/// Bytes needed for `capacity` uniform slots of `stride` bytes, if within `limit`.
fn voxel_buffer_size(stride: u64, capacity: usize, limit: u64) -> Result<u64, RenderError> {
    let required = stride.saturating_mul(capacity as u64);
    if required > limit {
        return Err(RenderError::VoxelBufferTooLarge {
            capacity,
            required,
            limit,
        });
    }
    Ok(required)
}

/// Commands recorded through [`CubePipeline`] since the last submit.
#[derive(Default)]
struct PendingFrame {
    clear: bool,
    frame: Option<FrameUniforms>,
    voxels: Vec<VoxelUniforms>,
}

/// wgpu-based voxel renderer.
///
/// Per-voxel uniforms live in one buffer at a fixed, alignment-padded stride;
/// each draw binds its slot through a dynamic offset.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    voxel_buffer: wgpu::Buffer,
    voxel_bind_group: wgpu::BindGroup,
    voxel_stride: u64,
    voxel_capacity: usize,
    voxel_staging: Vec<u8>,
    cube_vertex_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
    pending: PendingFrame,
    // Kept alive for the bind group.
    _atlas: AtlasTexture,
}

impl WgpuRenderer {
    /// Build the pipeline, upload the cube mesh and atlas, and size the
    /// per-voxel uniform buffer for `voxel_capacity` draws per frame.
    ///
    /// Fails before touching the GPU when that buffer would exceed the
    /// device's `max_buffer_size`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        atlas_image: &TextureImage,
        voxel_capacity: usize,
    ) -> Result<Self, RenderError> {
        let voxel_size = std::mem::size_of::<VoxelUniforms>() as u64;
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let voxel_stride = wgpu::util::align_to(voxel_size, alignment);
        let voxel_capacity = voxel_capacity.max(1);
        let voxel_buffer_bytes =
            voxel_buffer_size(voxel_stride, voxel_capacity, device.limits().max_buffer_size)?;

        let atlas = AtlasTexture::new(device, queue, atlas_image);

        // Frame uniforms + atlas
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniform_buffer"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(atlas.sampler()),
                },
            ],
        });

        // Per-voxel uniforms, one aligned slot per draw
        let voxel_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("voxel_uniform_buffer"),
            size: voxel_buffer_bytes,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let voxel_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("voxel_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(voxel_size),
                },
                count: None,
            }],
        });

        let voxel_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("voxel_bind_group"),
            layout: &voxel_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &voxel_buffer,
                    offset: 0,
                    size: NonZeroU64::new(voxel_size),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("voxel_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &voxel_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("voxel_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::VOXEL_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("voxel_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<CubeVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        let (atlas_w, atlas_h) = atlas.size();
        tracing::info!(
            "voxel pipeline ready: atlas {atlas_w}x{atlas_h}, {voxel_capacity} voxel slots of {voxel_stride} bytes"
        );

        Ok(Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            voxel_buffer,
            voxel_bind_group,
            voxel_stride,
            voxel_capacity,
            voxel_staging: Vec::new(),
            cube_vertex_buffer,
            depth_texture,
            surface_format,
            pending: PendingFrame::default(),
            _atlas: atlas,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Encode and submit everything recorded since the last submit into `view`.
    ///
    /// Returns the number of cube draws issued.
    pub fn submit(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
    ) -> Result<usize, RenderError> {
        let pending = std::mem::take(&mut self.pending);
        let frame = pending.frame.ok_or(RenderError::FrameNotBound)?;
        let count = pending.voxels.len();
        if count > self.voxel_capacity {
            return Err(RenderError::TooManyVoxels {
                count,
                capacity: self.voxel_capacity,
            });
        }

        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        if count > 0 {
            let stride = self.voxel_stride as usize;
            self.voxel_staging.clear();
            self.voxel_staging.resize(stride * count, 0);
            for (slot, voxel) in self.voxel_staging.chunks_exact_mut(stride).zip(&pending.voxels) {
                let bytes = bytemuck::bytes_of(voxel);
                slot[..bytes.len()].copy_from_slice(bytes);
            }
            queue.write_buffer(&self.voxel_buffer, 0, &self.voxel_staging);
        }

        let (color_load, depth_load) = if pending.clear {
            (wgpu::LoadOp::Clear(CLEAR_COLOR), wgpu::LoadOp::Clear(1.0))
        } else {
            (wgpu::LoadOp::Load, wgpu::LoadOp::Load)
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("voxel_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("voxel_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            for slot in 0..count {
                let offset = (slot as u64 * self.voxel_stride) as u32;
                pass.set_bind_group(1, &self.voxel_bind_group, &[offset]);
                pass.draw(0..CUBE_VERTEX_COUNT, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));

        let mut voxels = pending.voxels;
        voxels.clear();
        self.pending.voxels = voxels;
        Ok(count)
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

impl CubePipeline for WgpuRenderer {
    fn clear(&mut self) {
        self.pending.clear = true;
    }

    fn bind_frame(&mut self, frame: &FrameUniforms) {
        self.pending.frame = Some(*frame);
    }

    fn draw_cube(&mut self, voxel: &VoxelUniforms) {
        self.pending.voxels.push(*voxel);
    }
}
