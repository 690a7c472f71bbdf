//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the packed vertex format used for rendering voxels and provides
//! the vertex buffer layout the pipeline binds it with.

/// Bit width of each position component.
const POSITION_BITS: u32 = 6;
/// Mask for one position component.
const POSITION_MASK: u32 = 0x3F;
/// Offset of the normal ID field.
const NORMAL_SHIFT: u32 = 18;
/// Mask for the normal ID field.
const NORMAL_MASK: u32 = 0x7;
/// Offset of the UV-corner ID field.
const UV_SHIFT: u32 = 21;
/// Mask for the UV-corner ID field.
const UV_MASK: u32 = 0x3;
/// Offset of the texture ID field.
const TEXTURE_SHIFT: u32 = 23;
/// Mask for the texture ID field.
pub const TEXTURE_MASK: u32 = 0x7F;

/// One corner of one visible face, packed into 32 bits.
///
/// # Memory Layout
/// - bits 0..6: local X
/// - bits 6..12: local Y
/// - bits 12..18: local Z
/// - bits 18..21: normal ID (0-5)
/// - bits 21..23: UV-corner ID (0-3)
/// - bits 23..30: texture ID
/// - bits 30..32: unused
///
/// Total size: 4 bytes
///
/// Position fields hold up to 63, enough for the far corner of the last cell
/// in a chunk (32). Callers are responsible for keeping inputs in range;
/// out-of-range values are masked in release builds.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedVertex(pub u32);

impl PackedVertex {
    /// Packs one vertex.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Local corner coordinates within the chunk (0-63)
    /// * `normal` - Face normal ID (0-7)
    /// * `uv` - UV-corner ID (0-3)
    /// * `texture` - Texture ID (0-127)
    pub fn new(x: u32, y: u32, z: u32, normal: u32, uv: u32, texture: u32) -> Self {
        debug_assert!(x <= POSITION_MASK && y <= POSITION_MASK && z <= POSITION_MASK);
        debug_assert!(normal <= NORMAL_MASK && uv <= UV_MASK && texture <= TEXTURE_MASK);

        PackedVertex(
            (x & POSITION_MASK)
                | (y & POSITION_MASK) << POSITION_BITS
                | (z & POSITION_MASK) << (POSITION_BITS * 2)
                | (normal & NORMAL_MASK) << NORMAL_SHIFT
                | (uv & UV_MASK) << UV_SHIFT
                | (texture & TEXTURE_MASK) << TEXTURE_SHIFT,
        )
    }

    /// Local X coordinate.
    pub fn x(self) -> u32 {
        self.0 & POSITION_MASK
    }

    /// Local Y coordinate.
    pub fn y(self) -> u32 {
        (self.0 >> POSITION_BITS) & POSITION_MASK
    }

    /// Local Z coordinate.
    pub fn z(self) -> u32 {
        (self.0 >> (POSITION_BITS * 2)) & POSITION_MASK
    }

    /// Face normal ID.
    pub fn normal(self) -> u32 {
        (self.0 >> NORMAL_SHIFT) & NORMAL_MASK
    }

    /// UV-corner ID.
    pub fn uv(self) -> u32 {
        (self.0 >> UV_SHIFT) & UV_MASK
    }

    /// Texture ID.
    pub fn texture(self) -> u32 {
        (self.0 >> TEXTURE_SHIFT) & TEXTURE_MASK
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: packed vertex (u32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PackedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Uint32,
            }],
        }
    }
}
