//! Mesh generation and management for voxel rendering.
//!
//! This module turns the chunks of the world into GPU-resident geometry and the
//! per-frame draw list that renders them with a single indirect call.
//!
//! # Architecture
//! - `mesh/`: Culled face meshing of one chunk into packed vertices
//! - [`mesh_arena::MeshArena`]: Append-only vertex and index storage on the GPU
//! - [`draw_list::DrawListBuilder`]: One indirect command and one chunk record per draw
//! - [`renderer::VoxelRenderer`]: Pipeline, per-frame buffers and the draw itself
//! - [`MeshManager`]: Meshes the world on worker threads and fills the arena
//!
//! # Rebuild Flow
//! 1. The arena is reset, invalidating every earlier allocation
//! 2. Every chunk is meshed against its neighbours, in parallel when workers exist
//! 3. Non-empty meshes are uploaded; identical meshes share one allocation when
//!    deduplication is enabled
//! 4. One `ChunkInstance` per non-empty chunk is recorded, ordered by position

pub mod draw_list;
pub mod mesh;
pub mod mesh_arena;
pub mod renderer;

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use crate::engine_state::{
    error::RenderResult,
    rendering::{
        gpu_backend::GpuBackend,
        tasks::chunk_mesh_generation_task::{ChunkMeshGenerationResult, ChunkMeshGenerationTask},
    },
    task_management::TaskManager,
    voxels::{block::block_registry::BlockRegistry, world::World},
};

use draw_list::ChunkInstance;
use mesh::ChunkMesh;
use mesh_arena::{MeshAllocation, MeshArena};

/// Counters from the last rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Chunks meshed
    pub chunks_meshed: usize,
    /// Chunks with no exposed faces
    pub empty_chunks: usize,
    /// Meshes uploaded to the arena
    pub unique_meshes: usize,
    /// Chunks that reused another chunk's allocation
    pub reused_meshes: usize,
    /// Faces across all drawn chunks
    pub faces_drawn: usize,
}

/// Central manager for voxel mesh generation.
pub struct MeshManager {
    registry: Arc<BlockRegistry>,
    task_manager: TaskManager<ChunkMeshGenerationTask>,
    deduplicate: bool,
    instances: Vec<ChunkInstance>,
    stats: MeshStats,
}

impl MeshManager {
    /// Creates a mesh manager.
    ///
    /// # Arguments
    /// * `registry` - Decides which blocks are displayable
    /// * `num_workers` - Mesh worker threads; 0 meshes on the calling thread
    /// * `deduplicate` - Share one allocation between chunks with identical meshes
    pub fn new(registry: Arc<BlockRegistry>, num_workers: usize, deduplicate: bool) -> Self {
        Self {
            registry,
            task_manager: TaskManager::new(num_workers),
            deduplicate,
            instances: Vec::new(),
            stats: MeshStats::default(),
        }
    }

    /// Meshes every chunk of `world` against its neighbours.
    ///
    /// # Returns
    /// One result per chunk, ordered by chunk position.
    pub fn generate_meshes(&mut self, world: &World) -> RenderResult<Vec<ChunkMeshGenerationResult>> {
        let tasks: Vec<_> = world
            .positions()
            .into_iter()
            .filter_map(|position| {
                let chunk = world.get_chunk_at(position)?;
                Some(ChunkMeshGenerationTask::new(
                    self.registry.clone(),
                    chunk,
                    world.neighbors_of(position),
                ))
            })
            .collect();

        let mut results = self.task_manager.run_to_completion(tasks)?;
        results.sort_by_key(|result| (result.position.x, result.position.y, result.position.z));
        Ok(results)
    }

    /// Rebuilds the arena contents and the chunk instances from `world`.
    ///
    /// The arena is reset first. GPU work still reading the arena must have finished.
    ///
    /// # Returns
    /// The instances to draw, one per chunk with a non-empty mesh.
    pub fn rebuild<B: GpuBackend>(
        &mut self,
        world: &World,
        arena: &mut MeshArena<B>,
    ) -> RenderResult<&[ChunkInstance]> {
        let results = self.generate_meshes(world)?;
        arena.reset();
        self.instances.clear();
        self.stats = MeshStats {
            chunks_meshed: results.len(),
            ..MeshStats::default()
        };

        let mut uploaded: HashMap<&ChunkMesh, MeshAllocation> = HashMap::new();
        for result in &results {
            if result.mesh.is_empty() {
                self.stats.empty_chunks += 1;
                continue;
            }

            let existing = if self.deduplicate {
                uploaded.get(&result.mesh).copied()
            } else {
                None
            };
            let allocation = match existing {
                Some(allocation) => {
                    self.stats.reused_meshes += 1;
                    allocation
                }
                None => {
                    let allocation = arena.upload_chunk_mesh(&result.mesh)?;
                    self.stats.unique_meshes += 1;
                    if self.deduplicate {
                        uploaded.insert(&result.mesh, allocation);
                    }
                    allocation
                }
            };

            self.stats.faces_drawn += result.mesh.face_count();
            self.instances.push(ChunkInstance {
                chunk_position: result.position,
                mesh: allocation,
            });
            debug!(
                "Chunk {:?}: {} faces",
                result.position,
                result.mesh.face_count()
            );
        }

        info!(
            "Meshed {} chunks: {} uploaded, {} reused, {} empty, {} faces",
            self.stats.chunks_meshed,
            self.stats.unique_meshes,
            self.stats.reused_meshes,
            self.stats.empty_chunks,
            self.stats.faces_drawn
        );
        Ok(&self.instances)
    }

    /// Instances recorded by the last rebuild.
    pub fn instances(&self) -> &[ChunkInstance] {
        &self.instances
    }

    /// Counters from the last rebuild.
    pub fn stats(&self) -> MeshStats {
        self.stats
    }
}
