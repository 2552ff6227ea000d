use bytemuck::{Pod, Zeroable};

/// Vertex of the static cube mesh: object-space position and face texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

const fn v(x: f32, y: f32, z: f32, u: f32, t: f32) -> CubeVertex {
    CubeVertex {
        position: [x, y, z],
        tex_coord: [u, t],
    }
}

pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Unit cube centred on the origin, 6 faces × 2 triangles, no index buffer.
///
/// Each face carries its own `[0, 1]` texture coordinates so the atlas tile
/// is applied per face.
#[rustfmt::skip]
pub const CUBE_VERTICES: [CubeVertex; CUBE_VERTEX_COUNT as usize] = [
    // -Z
    v(-0.5, -0.5, -0.5, 0.0, 0.0), v( 0.5, -0.5, -0.5, 1.0, 0.0), v( 0.5,  0.5, -0.5, 1.0, 1.0),
    v( 0.5,  0.5, -0.5, 1.0, 1.0), v(-0.5,  0.5, -0.5, 0.0, 1.0), v(-0.5, -0.5, -0.5, 0.0, 0.0),
    // +Z
    v(-0.5, -0.5,  0.5, 0.0, 0.0), v( 0.5, -0.5,  0.5, 1.0, 0.0), v( 0.5,  0.5,  0.5, 1.0, 1.0),
    v( 0.5,  0.5,  0.5, 1.0, 1.0), v(-0.5,  0.5,  0.5, 0.0, 1.0), v(-0.5, -0.5,  0.5, 0.0, 0.0),
    // -X
    v(-0.5,  0.5,  0.5, 1.0, 1.0), v(-0.5,  0.5, -0.5, 0.0, 1.0), v(-0.5, -0.5, -0.5, 0.0, 0.0),
    v(-0.5, -0.5, -0.5, 0.0, 0.0), v(-0.5, -0.5,  0.5, 1.0, 0.0), v(-0.5,  0.5,  0.5, 1.0, 1.0),
    // +X
    v( 0.5,  0.5,  0.5, 0.0, 1.0), v( 0.5,  0.5, -0.5, 1.0, 1.0), v( 0.5, -0.5, -0.5, 1.0, 0.0),
    v( 0.5, -0.5, -0.5, 1.0, 0.0), v( 0.5, -0.5,  0.5, 0.0, 0.0), v( 0.5,  0.5,  0.5, 0.0, 1.0),
    // -Y
    v(-0.5, -0.5, -0.5, 0.0, 1.0), v( 0.5, -0.5, -0.5, 1.0, 1.0), v( 0.5, -0.5,  0.5, 1.0, 0.0),
    v( 0.5, -0.5,  0.5, 1.0, 0.0), v(-0.5, -0.5,  0.5, 0.0, 0.0), v(-0.5, -0.5, -0.5, 0.0, 1.0),
    // +Y
    v(-0.5,  0.5, -0.5, 0.0, 1.0), v( 0.5,  0.5, -0.5, 1.0, 1.0), v( 0.5,  0.5,  0.5, 1.0, 0.0),
    v( 0.5,  0.5,  0.5, 1.0, 0.0), v(-0.5,  0.5,  0.5, 0.0, 0.0), v(-0.5,  0.5, -0.5, 0.0, 1.0),
];
