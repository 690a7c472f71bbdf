//! Mesh data structures for voxel rendering.
//!
//! This module holds the output of the mesher: a flat list of packed vertices and
//! a list of triangle indices into it, ready to be appended to the mesh arena.

use super::face::Face;
use crate::engine_state::rendering::vertex::PackedVertex;

/// Number of vertices emitted per face.
pub const VERTICES_PER_FACE: usize = 4;
/// Number of indices emitted per face.
pub const INDICES_PER_FACE: usize = 6;

/// The geometry of one chunk.
///
/// Indices are relative to the start of `vertices`; the arena supplies the
/// base vertex at draw time.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ChunkMesh {
    /// The packed vertex data
    pub vertices: Vec<PackedVertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all geometry while keeping the allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends one quad.
    pub fn push_face(&mut self, face: &Face) {
        let base_vertex = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices.extend_from_slice(&Face::indices(base_vertex));
    }

    /// Whether the mesh has no geometry. Empty meshes are skipped, never uploaded.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Number of quads in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// Size of the vertex and index data in bytes.
    pub fn byte_size(&self) -> (u64, u64) {
        (
            std::mem::size_of_val(self.vertices.as_slice()) as u64,
            std::mem::size_of_val(self.indices.as_slice()) as u64,
        )
    }
}
