//! # Chunk Creation Module
//!
//! A builder that fills a chunk's solidity bit vector block by block, in the
//! same x-then-y-then-z order that [`Chunk::block_index`] uses for lookups.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::voxels::block::block_type::BlockType;

use super::{Chunk, CHUNK_SIZE};

/// A builder for creating and populating chunks.
///
/// Blocks are pushed in storage order. Once all `CHUNK_SIZE` blocks have been
/// pushed further pushes are ignored; if fewer were pushed the remainder is
/// filled with air when the chunk is returned.
pub struct ChunkCreationIterator {
    /// The chunk-space position of the chunk being created
    position: Point3<i32>,
    /// One bit per block, set for solid blocks
    solid_array: BitVec,
    /// Number of solid blocks pushed so far
    solid_count: usize,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given position.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            position,
            solid_array: BitVec::with_capacity(CHUNK_SIZE as usize),
            solid_count: 0,
        }
    }

    /// Adds a block at the current position and advances the position.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        if self.solid_array.len() >= CHUNK_SIZE as usize {
            return;
        }

        let is_solid = block_type.is_solid();
        self.solid_array.push(is_solid);
        if is_solid {
            self.solid_count += 1;
        }
    }

    /// Finalizes the chunk creation and returns the constructed `Chunk`.
    pub fn return_chunk(mut self) -> Chunk {
        self.solid_array.resize(CHUNK_SIZE as usize, false);
        Chunk {
            position: self.position,
            solid_array: self.solid_array,
            solid_count: self.solid_count,
        }
    }
}
