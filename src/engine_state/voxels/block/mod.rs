//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel renderer.
//! It includes the block identifier type, the built-in block type enumeration, the
//! six block faces used by meshing, and the registry of render attributes.

use block_type::BlockType;

pub mod block_registry;
pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// Chunks store exactly one of these per cell.
pub type BlockTypeSize = u8;

/// The reserved identifier for empty space.
///
/// Out-of-bounds chunk reads return this value and it is never displayable.
pub const AIR: BlockTypeSize = BlockType::Air as BlockTypeSize;
