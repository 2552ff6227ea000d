/// WGSL shader for the textured voxel cube.
///
/// The mesh is centred on the origin, so the vertex stage shifts it by +0.5 to
/// span `[0, 1]` and a voxel's model matrix is a plain translation to its cell.
/// The fragment stage reads the voxel's atlas tile with V flipped and drops
/// nearly transparent texels.
pub const VOXEL_SHADER: &str = r#"
struct FrameUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    tile_size: f32,
};

struct VoxelUniforms {
    model: mat4x4<f32>,
    tile_start: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;
@group(0) @binding(1)
var atlas: texture_2d<f32>;
@group(0) @binding(2)
var atlas_sampler: sampler;

@group(1) @binding(0)
var<uniform> voxel: VoxelUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) tex_coord: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let local = vec4<f32>(vertex.position + vec3<f32>(0.5, 0.5, 0.5), 1.0);

    var out: VertexOutput;
    out.clip_position = frame.projection * frame.view * voxel.model * local;
    out.tex_coord = vertex.tex_coord;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = voxel.tile_start
        + vec2<f32>(in.tex_coord.x, 1.0 - in.tex_coord.y) * frame.tile_size;
    let color = textureSample(atlas, atlas_sampler, uv);
    if color.a < 0.1 {
        discard;
    }
    return color;
}
"#;
