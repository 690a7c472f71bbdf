//! Task for generating mesh data for chunks in a background thread.
//!
//! The task holds shared handles to the chunk and its neighbours and takes read locks
//! only while meshing, so the world map itself never leaves the main thread.

use std::sync::Arc;

use cgmath::Point3;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::meshing::mesh::{generate_mesh_with_neighbors, ChunkMesh, ChunkNeighbors},
        task_management::task::Task,
        voxels::{
            block::{block_registry::BlockRegistry, block_side::BlockSide},
            chunk::Chunk,
            world::NeighborHandles,
        },
    },
};

/// Meshes one chunk against its neighbours.
pub struct ChunkMeshGenerationTask {
    registry: Arc<BlockRegistry>,
    chunk: MtResource<Chunk>,
    neighbors: NeighborHandles,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `registry` - Decides which blocks are displayable
    /// * `chunk` - The chunk that needs mesh generation
    /// * `neighbors` - Adjacent chunks, indexed by `BlockSide as usize`
    pub fn new(
        registry: Arc<BlockRegistry>,
        chunk: MtResource<Chunk>,
        neighbors: NeighborHandles,
    ) -> Self {
        ChunkMeshGenerationTask {
            registry,
            chunk,
            neighbors,
        }
    }
}

/// The mesh of one chunk.
pub struct ChunkMeshGenerationResult {
    /// Chunk coordinates of the meshed chunk
    pub position: Point3<i32>,
    /// The generated geometry; empty when nothing is exposed
    pub mesh: ChunkMesh,
}

impl Task for ChunkMeshGenerationTask {
    type Output = ChunkMeshGenerationResult;

    fn process(self) -> ChunkMeshGenerationResult {
        let chunk = self.chunk.get();
        let guards: [_; 6] =
            std::array::from_fn(|index| self.neighbors[index].as_ref().map(MtResource::get));

        let mut neighbors = ChunkNeighbors::none();
        for side in BlockSide::all() {
            neighbors.set(side, guards[side as usize].as_deref());
        }

        let mut mesh = ChunkMesh::new();
        generate_mesh_with_neighbors(&chunk, &self.registry, &neighbors, &mut mesh);
        ChunkMeshGenerationResult {
            position: chunk.position,
            mesh,
        }
    }
}
