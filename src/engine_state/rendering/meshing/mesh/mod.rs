//! Mesh generation for voxel rendering.
//!
//! This module converts a chunk's block grid into a culled, bit-packed triangle mesh.
//! Only faces that border non-solid space are emitted, one quad per face.
//!
//! # Architecture
//! - [`ChunkMesh`]: Output vertex and index lists for one chunk
//! - [`Face`]: One exposed side of one block, packed into four vertices
//! - [`ChunkNeighbors`]: Optional adjacent chunks consulted at the chunk boundary
//!
//! # Usage
//! ```
//! use cgmath::Point3;
//! use voxel_render_core::engine_state::{
//!     rendering::meshing::mesh::{generate_mesh, ChunkMesh},
//!     voxels::{block::block_registry::BlockRegistry, chunk::Chunk},
//! };
//!
//! let mut chunk = Chunk::empty(Point3::new(0, 0, 0));
//! chunk.set_block(4, 4, 4, 1);
//!
//! let mut mesh = ChunkMesh::new();
//! generate_mesh(&chunk, &BlockRegistry::builtin(), &mut mesh);
//! assert_eq!(mesh.face_count(), 6);
//! ```
//!
//! # Boundary Policy
//! When a neighbouring cell lies outside the chunk, the lookup falls through to the
//! matching neighbour chunk. Without one, the boundary counts as exposed and the face
//! is emitted. Meshing a chunk without its neighbours therefore yields extra faces on
//! its outer shell.

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;

use crate::engine_state::voxels::{
    block::{block_registry::BlockRegistry, block_side::BlockSide},
    chunk::{Chunk, CHUNK_DIMENSION},
};

/// Up to six adjacent chunks, one per block side.
///
/// A `None` entry means the boundary in that direction is treated as exposed.
#[derive(Clone, Copy, Default)]
pub struct ChunkNeighbors<'a> {
    chunks: [Option<&'a Chunk>; 6],
}

impl<'a> ChunkNeighbors<'a> {
    /// No neighbours at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builder-style setter for one side.
    pub fn with(mut self, side: BlockSide, chunk: &'a Chunk) -> Self {
        self.set(side, Some(chunk));
        self
    }

    /// Sets or clears the neighbour on `side`.
    pub fn set(&mut self, side: BlockSide, chunk: Option<&'a Chunk>) {
        self.chunks[side as usize] = chunk;
    }

    /// The neighbour touching `side` of this chunk, if any.
    pub fn get(&self, side: BlockSide) -> Option<&'a Chunk> {
        self.chunks[side as usize]
    }

    /// Number of neighbours present.
    pub fn count(&self) -> usize {
        self.chunks.iter().flatten().count()
    }
}

/// Meshes a chunk with no neighbour information.
///
/// Equivalent to [`generate_mesh_with_neighbors`] with [`ChunkNeighbors::none`].
pub fn generate_mesh(chunk: &Chunk, registry: &BlockRegistry, mesh: &mut ChunkMesh) {
    generate_mesh_with_neighbors(chunk, registry, &ChunkNeighbors::none(), mesh);
}

/// Meshes a chunk, consulting `neighbors` for cells across the chunk boundary.
///
/// # Arguments
/// * `chunk` - The chunk to mesh
/// * `registry` - Decides which block IDs are displayable
/// * `neighbors` - Adjacent chunks, read-only for the duration of the call
/// * `mesh` - Output; cleared first, so previous contents never leak into the result
pub fn generate_mesh_with_neighbors(
    chunk: &Chunk,
    registry: &BlockRegistry,
    neighbors: &ChunkNeighbors<'_>,
    mesh: &mut ChunkMesh,
) {
    mesh.clear();
    if chunk.is_empty() {
        return;
    }

    for (position, block) in chunk.iter_blocks() {
        if !registry.is_displayable(block) {
            continue;
        }
        for side in BlockSide::all() {
            let offset = side.offset();
            let (nx, ny, nz) = (
                position.x + offset.x,
                position.y + offset.y,
                position.z + offset.z,
            );
            if is_occluded(chunk, neighbors, side, nx, ny, nz) {
                continue;
            }
            mesh.push_face(&Face::new(position, block, side));
        }
    }
}

/// Meshes a chunk into a fresh [`ChunkMesh`].
pub fn mesh_chunk(
    chunk: &Chunk,
    registry: &BlockRegistry,
    neighbors: &ChunkNeighbors<'_>,
) -> ChunkMesh {
    let mut mesh = ChunkMesh::new();
    generate_mesh_with_neighbors(chunk, registry, neighbors, &mut mesh);
    mesh
}

/// Whether the cell at local `(x, y, z)` hides the face pointing at it.
///
/// Out-of-chunk cells wrap into the neighbour on `side`. Only one axis can be out of
/// range for a face neighbour, so wrapping all three is safe.
fn is_occluded(
    chunk: &Chunk,
    neighbors: &ChunkNeighbors<'_>,
    side: BlockSide,
    x: i32,
    y: i32,
    z: i32,
) -> bool {
    if Chunk::index_of(x, y, z).is_some() {
        return chunk.is_block_solid(x, y, z);
    }

    let dimension = CHUNK_DIMENSION as i32;
    match neighbors.get(side) {
        Some(neighbor) => neighbor.is_block_solid(
            x.rem_euclid(dimension),
            y.rem_euclid(dimension),
            z.rem_euclid(dimension),
        ),
        None => false,
    }
}
