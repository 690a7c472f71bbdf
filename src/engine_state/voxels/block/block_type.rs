//! # Block Type Module
//!
//! This module defines the block types shipped with the built-in registry.
//! Chunks only ever store the raw identifier; the enum exists so generators
//! and tests can name blocks instead of spelling out magic numbers.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates the built-in block types.
///
/// The discriminant of each variant is the identifier stored in chunks. The
/// `FromPrimitive` derive allows conversion back from the stored integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Never meshed, never solid.
    Air = 0,

    /// Solid rock, used for everything below the surface layers.
    Stone = 1,

    /// Surface block with grass on top.
    GrassBlock = 2,

    /// Tree trunk block.
    OakWood = 3,

    /// Displayable but not solid in the registry. Still occludes neighbouring
    /// faces because render solidity only distinguishes air from non-air.
    Water = 4,
}

impl BlockType {
    /// Converts a stored block identifier back into a `BlockType`.
    ///
    /// # Returns
    /// `None` for identifiers that are not built-in block types.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(id)
    }

    /// Returns the identifier stored in chunk cells for this block type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Picks a random non-air block type from the given generator.
    ///
    /// Used by the random chunk generator. Taking the generator explicitly keeps
    /// seeded worlds reproducible.
    pub fn random_non_air(rng: &mut fastrand::Rng) -> Self {
        Self::from_id(rng.u8(BlockType::Stone.id()..=BlockType::Water.id())).unwrap_or(BlockType::Stone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_from_id() {
        for block_type in [
            BlockType::Air,
            BlockType::Stone,
            BlockType::GrassBlock,
            BlockType::OakWood,
            BlockType::Water,
        ] {
            assert_eq!(BlockType::from_id(block_type.id()), Some(block_type));
        }
        assert_eq!(BlockType::from_id(200), None);
    }

    #[test]
    fn test_random_non_air_never_returns_air() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..512 {
            assert_ne!(BlockType::random_non_air(&mut rng), BlockType::Air);
        }
    }
}
