//! # Chunk Creation Module
//!
//! Deterministic chunk generators. The world service picks one from the engine
//! configuration and runs it for every grid cell it populates.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::BlockType;

use super::{Chunk, CHUNK_DIMENSION};

/// Threshold above which Perlin noise is considered solid for terrain generation.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid for terrain generation.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;

/// How the contents of a new chunk are produced.
///
/// Deserialises from `{ "kind": "staircase" }`, `{ "kind": "slab", "height": 5 }` and so on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkGenerator {
    /// All air.
    Empty,
    /// Every cell filled with stone.
    Solid,
    /// A flat slab `height` blocks tall: stone with a single grass layer on top.
    Slab {
        /// Number of filled layers, clamped to the chunk height
        height: u32,
    },
    /// Diagonal staircase with stone, grass and a wood/water top layer.
    #[default]
    Staircase,
    /// 3D Perlin noise terrain with caves.
    Perlin {
        /// Noise seed
        seed: u32,
    },
    /// Independent random fill.
    Random {
        /// Probability of a cell being filled
        density: f64,
        /// Base seed, mixed with the chunk position
        seed: u64,
    },
}

impl ChunkGenerator {
    /// Generates the chunk at `position`.
    pub fn generate(&self, position: Point3<i32>) -> Chunk {
        match self {
            ChunkGenerator::Empty => Chunk::empty(position),
            ChunkGenerator::Solid => Chunk::solid(position),
            ChunkGenerator::Slab { height } => Chunk::slab(position, *height),
            ChunkGenerator::Staircase => Chunk::staircase(position),
            ChunkGenerator::Perlin { seed } => Chunk::perlin(position, *seed),
            ChunkGenerator::Random { density, seed } => Chunk::random(position, *density, *seed),
        }
    }
}

impl Chunk {
    /// Creates a new chunk completely filled with stone.
    pub fn solid(position: Point3<i32>) -> Self {
        let mut chunk = Chunk::empty(position);
        let dimension = CHUNK_DIMENSION as i32;
        for z in 0..dimension {
            for y in 0..dimension {
                for x in 0..dimension {
                    chunk.set_block(x, y, z, BlockType::Stone.id());
                }
            }
        }
        chunk
    }

    /// Creates a flat slab covering the whole footprint.
    ///
    /// Layers below `height - 1` are stone and the top layer is grass.
    pub fn slab(position: Point3<i32>, height: u32) -> Self {
        let mut chunk = Chunk::empty(position);
        let height = height.min(CHUNK_DIMENSION as u32) as i32;
        let dimension = CHUNK_DIMENSION as i32;
        for z in 0..dimension {
            for y in 0..height {
                let block = if y < height - 1 {
                    BlockType::Stone
                } else {
                    BlockType::GrassBlock
                };
                for x in 0..dimension {
                    chunk.set_block(x, y, z, block.id());
                }
            }
        }
        chunk
    }

    /// Creates the diagonal staircase pattern.
    ///
    /// Each column is `(x + z) / 2` blocks tall. The lowest layers are stone,
    /// the next four are grass, and the top layer is water on every third
    /// column in both directions and wood elsewhere.
    pub fn staircase(position: Point3<i32>) -> Self {
        let mut chunk = Chunk::empty(position);
        let dimension = CHUNK_DIMENSION as i32;
        for bx in 0..dimension {
            for bz in 0..dimension {
                let height = ((bx + bz) / 2).min(dimension);
                for by in 0..height {
                    let block = if by < height - 5 {
                        BlockType::Stone
                    } else if by < height - 1 {
                        BlockType::GrassBlock
                    } else if bx % 3 == 0 && bz % 3 == 0 {
                        BlockType::Water
                    } else {
                        BlockType::OakWood
                    };
                    chunk.set_block(bx, by, bz, block.id());
                }
            }
        }
        chunk
    }

    /// Generates a chunk using Perlin noise for natural-looking terrain.
    ///
    /// Cells whose noise sample falls outside the threshold band are stone; the
    /// band itself forms caves and open air.
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates where the chunk will be placed
    /// * `seed` - Noise seed
    pub fn perlin(position: Point3<i32>, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let mut chunk = Chunk::empty(position);
        let dimension = CHUNK_DIMENSION as i32;

        for k in 0..dimension {
            for j in 0..dimension {
                for i in 0..dimension {
                    let bposition = Point3::<i32>::new(
                        i + dimension * position.x,
                        j + dimension * position.y,
                        k + dimension * position.z,
                    );
                    let perlin_sample =
                        perlin.get(Self::to_perlin_pos(bposition, PERLIN_SCALE_FACTOR));
                    if !(PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD)
                        .contains(&perlin_sample)
                    {
                        chunk.set_block(i, j, k, BlockType::Stone.id());
                    }
                }
            }
        }

        chunk
    }

    /// Converts world-space block coordinates to Perlin sampling coordinates.
    fn to_perlin_pos(pos: Point3<i32>, scale_factor: f64) -> [f64; 3] {
        [
            (pos.x as f64 * scale_factor),
            (pos.y as f64 * scale_factor),
            (pos.z as f64 * scale_factor),
        ]
    }

    /// Creates a chunk with randomly placed, randomly typed blocks.
    ///
    /// The same `(position, density, seed)` always produces the same chunk.
    pub fn random(position: Point3<i32>, density: f64, seed: u64) -> Self {
        let position_hash = (position.x as i64 as u64).wrapping_mul(73_856_093)
            ^ (position.y as i64 as u64).wrapping_mul(19_349_663)
            ^ (position.z as i64 as u64).wrapping_mul(83_492_791);
        let mut rng = fastrand::Rng::with_seed(seed ^ position_hash);
        let mut chunk = Chunk::empty(position);
        let dimension = CHUNK_DIMENSION as i32;

        for z in 0..dimension {
            for y in 0..dimension {
                for x in 0..dimension {
                    if rng.f64() < density {
                        chunk.set_block(x, y, z, BlockType::random_non_air(&mut rng).id());
                    }
                }
            }
        }

        chunk
    }
}
