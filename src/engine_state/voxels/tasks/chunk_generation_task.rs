//! # Chunk Generation Task
//!
//! Runs a [`ChunkGenerator`] for one grid cell on a worker thread. The world inserts
//! the returned chunk on the main thread.

use cgmath::Point3;

use crate::engine_state::{
    task_management::task::Task,
    voxels::chunk::{chunk_creation::ChunkGenerator, Chunk},
};

/// Generates the chunk at `position`.
pub struct ChunkGenerationTask {
    generator: ChunkGenerator,
    position: Point3<i32>,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - How to fill the chunk
    /// * `position` - The chunk coordinates where the chunk should be generated
    pub fn new(generator: ChunkGenerator, position: Point3<i32>) -> Self {
        ChunkGenerationTask {
            generator,
            position,
        }
    }
}

impl Task for ChunkGenerationTask {
    type Output = Chunk;

    fn process(self) -> Chunk {
        self.generator.generate(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::task_management::TaskManager;

    #[test]
    fn test_generated_chunks_keep_their_position() {
        let mut manager = TaskManager::new(2);
        let positions = [Point3::new(0, 0, 0), Point3::new(-1, 0, 3)];
        let chunks = manager
            .run_to_completion(
                positions
                    .iter()
                    .map(|position| ChunkGenerationTask::new(ChunkGenerator::Solid, *position)),
            )
            .unwrap();

        assert_eq!(chunks.len(), 2);
        for chunk in chunks {
            assert!(positions.contains(&chunk.position));
            assert!(!chunk.is_empty());
        }
    }
}
