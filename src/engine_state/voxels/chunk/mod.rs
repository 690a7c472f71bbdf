//! # Chunk Module
//!
//! This module provides the `Chunk` struct, a dense 32x32x32 grid of block
//! identifiers, together with its generators and iteration helpers.
//!
//! ## Storage
//!
//! Every cell stores one `BlockTypeSize` in a flat array laid out as
//! `x + y * CHUNK_DIMENSION + z * CHUNK_PLANE_SIZE`. Dense storage keeps every
//! lookup O(1), which matters because the mesher performs seven lookups per cell.
//!
//! ## Bounds
//!
//! All accessors take signed local coordinates. Anything outside
//! `0..CHUNK_DIMENSION` reads as air and ignores writes, so callers can query
//! one cell past the edge without special-casing chunk boundaries.

use cgmath::Point3;

use super::block::{BlockTypeSize, AIR};

pub mod chunk_creation;
pub mod chunk_iteration;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: usize = 32;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: usize = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Represents a 32x32x32 collection of voxel blocks in the world.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,
    /// One identifier per cell in `x + y*S + z*S²` order.
    blocks: Box<[BlockTypeSize]>,
    /// Cleared on the first non-air write and never set again.
    is_empty: bool,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    pub fn empty(position: Point3<i32>) -> Self {
        Self {
            position,
            blocks: vec![AIR; CHUNK_SIZE].into_boxed_slice(),
            is_empty: true,
        }
    }

    /// Maps local coordinates to a storage index.
    ///
    /// # Returns
    /// `None` when any coordinate lies outside `0..CHUNK_DIMENSION`.
    pub fn index_of(x: i32, y: i32, z: i32) -> Option<usize> {
        let dimension = CHUNK_DIMENSION as i32;
        if !(0..dimension).contains(&x) || !(0..dimension).contains(&y) || !(0..dimension).contains(&z)
        {
            return None;
        }
        Some(x as usize + y as usize * CHUNK_DIMENSION + z as usize * CHUNK_PLANE_SIZE)
    }

    /// Returns the block at the given local coordinates, or air when out of bounds.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        match Self::index_of(x, y, z) {
            Some(index) => self.blocks[index],
            None => AIR,
        }
    }

    /// Writes a block at the given local coordinates.
    ///
    /// Out-of-bounds writes are ignored. Writing any non-air block clears the
    /// emptiness hint.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockTypeSize) {
        let Some(index) = Self::index_of(x, y, z) else {
            return;
        };
        self.blocks[index] = block;
        if block != AIR {
            self.is_empty = false;
        }
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    ///
    /// # Returns
    /// `true` if the block is not air, `false` if it's air or out of bounds.
    pub fn is_block_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z) != AIR
    }

    /// Whether no non-air block has ever been written.
    ///
    /// This is a hint. A chunk whose blocks were all overwritten with air again
    /// still reports `false`.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Raw cell storage in `x + y*S + z*S²` order.
    pub fn blocks(&self) -> &[BlockTypeSize] {
        &self.blocks
    }

    /// Counts the cells holding something other than air.
    pub fn count_non_air(&self) -> usize {
        self.blocks.iter().filter(|block| **block != AIR).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Point3<i32> {
        Point3::new(0, 0, 0)
    }

    #[test]
    fn test_new_chunk_is_empty_air() {
        let chunk = Chunk::empty(origin());
        assert!(chunk.is_empty());
        assert_eq!(chunk.count_non_air(), 0);
        assert_eq!(chunk.blocks().len(), CHUNK_SIZE);
    }

    #[test]
    fn test_index_layout_is_x_then_y_then_z() {
        assert_eq!(Chunk::index_of(0, 0, 0), Some(0));
        assert_eq!(Chunk::index_of(1, 0, 0), Some(1));
        assert_eq!(Chunk::index_of(0, 1, 0), Some(CHUNK_DIMENSION));
        assert_eq!(Chunk::index_of(0, 0, 1), Some(CHUNK_PLANE_SIZE));
        assert_eq!(Chunk::index_of(31, 31, 31), Some(CHUNK_SIZE - 1));
    }

    #[test]
    fn test_out_of_bounds_reads_are_air() {
        let mut chunk = Chunk::empty(origin());
        chunk.set_block(0, 0, 0, 1);
        chunk.set_block(31, 31, 31, 1);
        for (x, y, z) in [(-1, 0, 0), (0, -1, 0), (0, 0, -1), (32, 31, 31), (31, 32, 31), (31, 31, 32)] {
            assert_eq!(chunk.get_block(x, y, z), AIR);
            assert!(!chunk.is_block_solid(x, y, z));
        }
    }

    #[test]
    fn test_out_of_bounds_writes_are_ignored() {
        let mut chunk = Chunk::empty(origin());
        chunk.set_block(32, 0, 0, 1);
        chunk.set_block(-1, 5, 5, 1);
        assert!(chunk.is_empty());
        assert_eq!(chunk.count_non_air(), 0);
    }

    #[test]
    fn test_set_block_clears_empty_hint_once() {
        let mut chunk = Chunk::empty(origin());
        chunk.set_block(3, 4, 5, AIR);
        assert!(chunk.is_empty());

        chunk.set_block(3, 4, 5, 2);
        assert!(!chunk.is_empty());
        assert_eq!(chunk.get_block(3, 4, 5), 2);
        assert!(chunk.is_block_solid(3, 4, 5));

        chunk.set_block(3, 4, 5, AIR);
        assert!(!chunk.is_empty());
        assert!(!chunk.is_block_solid(3, 4, 5));
    }
}
