//! # World Module
//!
//! This module provides the `World` struct which manages a collection of chunks in the voxel world.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks that have been generated
//! or inserted are kept in memory. Lookup by chunk coordinate is O(1) through a hash map.
//!
//! Chunks are stored in `MtResource` handles so that mesh workers can read a chunk and
//! its neighbours while the main thread keeps ownership of the map.

use std::collections::HashMap;

use cgmath::Point3;
use log::info;

use crate::core::MtResource;
use crate::engine_state::{
    error::RenderResult,
    task_management::TaskManager,
    voxels::{
        block::block_side::BlockSide,
        chunk::{chunk_creation::ChunkGenerator, Chunk, CHUNK_DIMENSION},
        tasks::chunk_generation_task::ChunkGenerationTask,
    },
};

/// Chunks adjacent to one chunk, indexed by `BlockSide as usize`.
pub type NeighborHandles = [Option<MtResource<Chunk>>; 6];

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_render_core::engine_state::voxels::{
///     chunk::chunk_creation::ChunkGenerator, world::World,
/// };
///
/// let mut world = World::new();
/// world.add_chunk_at(Point3::new(0, 0, 0), &ChunkGenerator::Solid);
///
/// let chunk = world.get_chunk_at(Point3::new(0, 0, 0)).unwrap();
/// assert_eq!(chunk.get().get_block(0, 0, 0), 1);
/// ```
#[derive(Default)]
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    pub chunks: HashMap<Point3<i32>, MtResource<Chunk>>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Inserts `chunk` at its own position, replacing any chunk already there.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Option<MtResource<Chunk>> {
        self.chunks.insert(chunk.position, MtResource::new(chunk))
    }

    /// Generates a chunk at `position` if one doesn't already exist.
    ///
    /// # Returns
    /// Whether a chunk was generated.
    pub fn add_chunk_at(&mut self, position: Point3<i32>, generator: &ChunkGenerator) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }
        self.insert_chunk(generator.generate(position));
        true
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, pos: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&pos).cloned()
    }

    /// Removes and returns the chunk at `pos`.
    pub fn remove_chunk_at(&mut self, pos: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.remove(&pos)
    }

    /// The chunks sharing a face with the chunk at `pos`.
    pub fn neighbors_of(&self, pos: Point3<i32>) -> NeighborHandles {
        let mut neighbors: NeighborHandles = Default::default();
        for side in BlockSide::all() {
            neighbors[side as usize] = self.get_chunk_at(pos + side.offset());
        }
        neighbors
    }

    /// Every chunk position, sorted by x, then y, then z.
    pub fn positions(&self) -> Vec<Point3<i32>> {
        let mut positions: Vec<_> = self.chunks.keys().copied().collect();
        positions.sort_by_key(|position| (position.x, position.y, position.z));
        positions
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the world has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Populates the square of chunks `-distance..distance` on X and Z, at Y = 0.
    ///
    /// # Returns
    /// The number of chunks generated. Existing chunks are kept.
    pub fn generate_grid(&mut self, generator: &ChunkGenerator, distance: i32) -> usize {
        let generated = grid_positions(distance)
            .filter(|position| self.add_chunk_at(*position, generator))
            .count();
        info!("Generated {} chunks (render distance {})", generated, distance);
        generated
    }

    /// Like [`World::generate_grid`], with the chunks filled on worker threads.
    pub fn generate_grid_with(
        &mut self,
        task_manager: &mut TaskManager<ChunkGenerationTask>,
        generator: &ChunkGenerator,
        distance: i32,
    ) -> RenderResult<usize> {
        let missing: Vec<_> = grid_positions(distance)
            .filter(|position| !self.chunks.contains_key(position))
            .collect();
        let chunks = task_manager.run_to_completion(
            missing
                .into_iter()
                .map(|position| ChunkGenerationTask::new(generator.clone(), position)),
        )?;

        let generated = chunks.len();
        for chunk in chunks {
            self.insert_chunk(chunk);
        }
        info!(
            "Generated {} chunks on {} workers (render distance {})",
            generated,
            task_manager.num_workers(),
            distance
        );
        Ok(generated)
    }
}

/// World-space origin of the chunk at `position`.
pub fn chunk_world_origin(position: Point3<i32>) -> Point3<i32> {
    let dimension = CHUNK_DIMENSION as i32;
    Point3::new(
        position.x * dimension,
        position.y * dimension,
        position.z * dimension,
    )
}

fn grid_positions(distance: i32) -> impl Iterator<Item = Point3<i32>> {
    (-distance..distance)
        .flat_map(move |x| (-distance..distance).map(move |z| Point3::new(x, 0, z)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_chunk_at_keeps_existing_chunk() {
        let mut world = World::new();
        let origin = Point3::new(0, 0, 0);
        assert!(world.add_chunk_at(origin, &ChunkGenerator::Solid));
        assert!(!world.add_chunk_at(origin, &ChunkGenerator::Empty));
        assert!(!world.get_chunk_at(origin).unwrap().get().is_empty());
    }

    #[test]
    fn test_grid_covers_square_at_ground_level() {
        let mut world = World::new();
        assert_eq!(world.generate_grid(&ChunkGenerator::Empty, 2), 16);
        assert_eq!(world.len(), 16);

        let positions = world.positions();
        assert_eq!(positions.first(), Some(&Point3::new(-2, 0, -2)));
        assert_eq!(positions.last(), Some(&Point3::new(1, 0, 1)));
        assert!(positions.iter().all(|position| position.y == 0));

        // Second call generates nothing new.
        assert_eq!(world.generate_grid(&ChunkGenerator::Empty, 2), 0);
    }

    #[test]
    fn test_zero_distance_is_an_empty_world() {
        let mut world = World::new();
        assert_eq!(world.generate_grid(&ChunkGenerator::Solid, 0), 0);
        assert!(world.is_empty());
    }

    #[test]
    fn test_parallel_grid_matches_sequential() {
        let mut sequential = World::new();
        sequential.generate_grid(&ChunkGenerator::Staircase, 2);

        let mut parallel = World::new();
        let mut task_manager = TaskManager::new(3);
        assert_eq!(
            parallel
                .generate_grid_with(&mut task_manager, &ChunkGenerator::Staircase, 2)
                .unwrap(),
            16
        );

        assert_eq!(parallel.positions(), sequential.positions());
        for position in sequential.positions() {
            let a = sequential.get_chunk_at(position).unwrap();
            let b = parallel.get_chunk_at(position).unwrap();
            assert_eq!(a.get().blocks(), b.get().blocks());
        }
    }

    #[test]
    fn test_neighbors_are_indexed_by_side() {
        let mut world = World::new();
        world.generate_grid(&ChunkGenerator::Empty, 1);
        world.add_chunk_at(Point3::new(1, 0, -1), &ChunkGenerator::Solid);

        let neighbors = world.neighbors_of(Point3::new(0, 0, -1));
        let position_of = |side: BlockSide| {
            neighbors[side as usize]
                .as_ref()
                .map(|chunk| chunk.get().position)
        };
        assert_eq!(position_of(BlockSide::East), Some(Point3::new(1, 0, -1)));
        assert_eq!(position_of(BlockSide::West), Some(Point3::new(-1, 0, -1)));
        assert_eq!(position_of(BlockSide::North), Some(Point3::new(0, 0, 0)));
        assert_eq!(position_of(BlockSide::South), None);
        assert_eq!(position_of(BlockSide::Top), None);
        assert_eq!(position_of(BlockSide::Bottom), None);
        assert_eq!(neighbors.iter().flatten().count(), 3);
    }

    #[test]
    fn test_remove_chunk() {
        let mut world = World::new();
        world.add_chunk_at(Point3::new(3, 0, 3), &ChunkGenerator::Solid);
        assert!(world.remove_chunk_at(Point3::new(3, 0, 3)).is_some());
        assert!(world.get_chunk_at(Point3::new(3, 0, 3)).is_none());
    }

    #[test]
    fn test_chunk_world_origin_scales_by_dimension() {
        assert_eq!(
            chunk_world_origin(Point3::new(-1, 2, 3)),
            Point3::new(-32, 64, 96)
        );
    }
}
