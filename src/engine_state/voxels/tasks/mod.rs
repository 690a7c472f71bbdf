//! Background tasks for the voxel world.
//!
//! - `ChunkGenerationTask`: Fills one chunk from a generator

pub mod chunk_generation_task;
