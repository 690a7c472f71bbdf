use cgmath::Point3;

use crate::engine_state::{
    rendering::vertex::{PackedVertex, TEXTURE_MASK},
    voxels::block::{block_side::BlockSide, BlockTypeSize},
};

/// A single exposed face of one block, before packing.
///
/// The mesher produces one `Face` per block side that borders non-solid space
/// and turns it into a quad with [`Face::vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Local position of the block that owns the face
    pub position: Point3<i32>,
    /// The block identifier, which doubles as the texture ID
    pub block: BlockTypeSize,
    /// Which side of the block this face represents
    pub side: BlockSide,
}

impl Face {
    /// Creates a new face for the block at `position`.
    pub fn new(position: Point3<i32>, block: BlockTypeSize, side: BlockSide) -> Self {
        Face {
            position,
            block,
            side,
        }
    }

    /// Texture ID written into every vertex of this face.
    pub fn texture_id(&self) -> u32 {
        u32::from(self.block) & TEXTURE_MASK
    }

    /// Packs the four corners of the face's quad.
    ///
    /// # Returns
    /// The corners in counter-clockwise order seen from outside the block.
    /// Corner `i` carries UV-corner ID `i`.
    pub fn vertices(&self) -> [PackedVertex; 4] {
        let normal = self.side.normal_id();
        let texture = self.texture_id();
        let corners = self.side.corners();

        std::array::from_fn(|uv| {
            let [dx, dy, dz] = corners[uv];
            PackedVertex::new(
                (self.position.x + dx as i32) as u32,
                (self.position.y + dy as i32) as u32,
                (self.position.z + dz as i32) as u32,
                normal,
                uv as u32,
                texture,
            )
        })
    }

    /// Indices of the two triangles covering the quad.
    ///
    /// # Arguments
    /// * `base_vertex` - Index of the quad's first vertex in the mesh
    pub fn indices(base_vertex: u32) -> [u32; 6] {
        [
            base_vertex,
            base_vertex + 1,
            base_vertex + 2,
            base_vertex,
            base_vertex + 2,
            base_vertex + 3,
        ]
    }
}
