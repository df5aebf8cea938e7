//! # Chunk Module
//!
//! This module provides the `Chunk` struct which stores the solidity of a
//! 16x16x16 block of voxel space, plus the generators used to fill it.
//!
//! ## Memory Layout
//!
//! Only the information the pathfinder consults is stored: one bit per block in
//! `solid_array`, in row-major order (x, then y, then z). A solidity check is a
//! single bit lookup.

use bitvec::prelude::BitVec;
use cgmath::Point3;
use chunk_creation::ChunkCreationIterator;
use noise::NoiseFn;
use noise::Perlin;

use super::block::block_type::BlockType;

mod chunk_creation;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Threshold above which Perlin noise is considered solid for terrain generation.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid for terrain generation.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;

/// Represents a 16x16x16 collection of voxel blocks in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// A bit vector where each bit represents whether the corresponding block is solid (1) or air (0).
    pub solid_array: BitVec,

    /// Number of set bits in `solid_array`.
    solid_count: usize,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: &Point3<i32>) -> Self {
        Self::from_fn(position, |_| BlockType::AIR)
    }

    /// Creates a new chunk filled with solid blocks.
    pub fn solid(position: &Point3<i32>) -> Self {
        Self::from_fn(position, |_| BlockType::DIRT)
    }

    /// Creates a chunk whose blocks are solid below world height `ground_height`.
    ///
    /// The top solid layer is grass, everything beneath it dirt.
    pub fn flat(position: &Point3<i32>, ground_height: i32) -> Self {
        Self::from_fn(position, |block| {
            if block.y == ground_height - 1 {
                BlockType::GRASS
            } else if block.y < ground_height {
                BlockType::DIRT
            } else {
                BlockType::AIR
            }
        })
    }

    /// Creates a chunk where each block is solid with probability `density`.
    ///
    /// The same `seed` and position always produce the same chunk.
    pub fn random(position: &Point3<i32>, density: f64, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(
            seed ^ (position.x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
                ^ (position.y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
                ^ (position.z as u64).wrapping_mul(0x1656_67B1_9E37_79F9),
        );
        Self::from_fn(position, |_| {
            if rng.f64() < density {
                BlockType::DIRT
            } else {
                BlockType::AIR
            }
        })
    }

    /// Generates a chunk using 3D Perlin noise for natural-looking terrain
    /// with caves and overhangs.
    pub fn perlin(position: &Point3<i32>, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        Self::from_fn(position, |block| {
            let sample = perlin.get(Self::to_perlin_pos(block, PERLIN_SCALE_FACTOR));
            if !(PERLIN_NEGATIVE_THRESHOLD..=PERLIN_POSITIVE_THRESHOLD).contains(&sample) {
                BlockType::DIRT
            } else {
                BlockType::AIR
            }
        })
    }

    /// Builds a chunk by asking `block_at` for the type of every block, given
    /// its world-space block position.
    fn from_fn<F>(position: &Point3<i32>, mut block_at: F) -> Self
    where
        F: FnMut(Point3<i32>) -> BlockType,
    {
        let mut cci = ChunkCreationIterator::new(*position);

        for k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    let bposition = Point3::new(
                        i + CHUNK_DIMENSION * position.x,
                        j + CHUNK_DIMENSION * position.y,
                        k + CHUNK_DIMENSION * position.z,
                    );
                    cci.push_block_type(block_at(bposition));
                }
            }
        }

        cci.return_chunk()
    }

    /// Converts a world-space block position to Perlin noise sample coordinates.
    fn to_perlin_pos(pos: Point3<i32>, scale_factor: f64) -> [f64; 3] {
        [
            pos.x as f64 * scale_factor,
            pos.y as f64 * scale_factor,
            pos.z as f64 * scale_factor,
        ]
    }

    /// Index into `solid_array` for chunk-relative coordinates.
    ///
    /// Returns `None` for coordinates outside `0..CHUNK_DIMENSION`.
    pub fn block_index(local: Point3<i32>) -> Option<usize> {
        let range = 0..CHUNK_DIMENSION;
        if !(range.contains(&local.x) && range.contains(&local.y) && range.contains(&local.z)) {
            return None;
        }
        Some((local.x + CHUNK_DIMENSION * local.y + CHUNK_PLANE_SIZE * local.z) as usize)
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    ///
    /// Out of range coordinates are reported as air.
    pub fn is_block_solid(&self, local: Point3<i32>) -> bool {
        Self::block_index(local)
            .map(|index| self.solid_array[index])
            .unwrap_or(false)
    }

    /// Sets the block type at chunk-relative coordinates.
    ///
    /// Returns `false` if the coordinates lie outside the chunk.
    pub fn set_block_type(&mut self, local: Point3<i32>, block_type: BlockType) -> bool {
        let Some(index) = Self::block_index(local) else {
            return false;
        };
        let was_solid = self.solid_array[index];
        let is_solid = block_type.is_solid();
        if was_solid != is_solid {
            self.solid_array.set(index, is_solid);
            if is_solid {
                self.solid_count += 1;
            } else {
                self.solid_count -= 1;
            }
        }
        true
    }

    /// Number of solid blocks in this chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_count
    }
}
