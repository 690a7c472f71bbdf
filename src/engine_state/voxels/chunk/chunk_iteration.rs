//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-air blocks of a chunk in
//! storage order (X fastest, then Y, then Z).

use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockTypeSize, AIR};

use super::{Chunk, CHUNK_DIMENSION, CHUNK_PLANE_SIZE, CHUNK_SIZE};

/// An iterator over all non-air blocks in a chunk.
///
/// Yields the local position of each block together with its identifier.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next storage index to inspect
    current_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockTypeSize);

    fn next(&mut self) -> Option<Self::Item> {
        let blocks = self.chunk_ref.blocks();
        while self.current_offset < CHUNK_SIZE {
            let offset = self.current_offset;
            self.current_offset += 1;

            let block = blocks[offset];
            if block == AIR {
                continue;
            }

            let position = Point3::new(
                (offset % CHUNK_DIMENSION) as i32,
                ((offset / CHUNK_DIMENSION) % CHUNK_DIMENSION) as i32,
                (offset / CHUNK_PLANE_SIZE) as i32,
            );
            return Some((position, block));
        }
        None
    }
}

impl Chunk {
    /// Iterates over the non-air blocks of this chunk.
    pub fn iter_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}
