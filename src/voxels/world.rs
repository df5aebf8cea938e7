//! # World Module
//!
//! This module provides the `World` struct which manages a collection of chunks in the voxel world.
//! It is the occupancy source the pathfinder consults.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only chunks that have been generated or
//! modified are kept in memory. Blocks inside chunks that are not loaded are treated as air.
//!
//! ## Chunk Generation
//!
//! New chunks are produced by the world's [`ChunkGeneration`] strategy:
//! - Perlin noise for natural-looking terrain
//! - Flat ground up to a fixed height
//! - Seeded random noise for stress tests
//! - Solid chunks (all blocks filled)
//! - Empty chunks (all blocks air)

use std::collections::HashMap;

use cgmath::Point3;

use crate::core::MtResource;
use crate::error::PathfindingResult;
use crate::voxels::block::block_type::BlockType;
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION};

/// The method used to generate new chunks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkGeneration {
    /// 3D Perlin noise with the given seed.
    Perlin {
        /// Noise seed.
        seed: u32,
    },
    /// Solid below the given world height, air above.
    Flat {
        /// First world height that is air.
        ground_height: i32,
    },
    /// Each block solid with probability `density`.
    Random {
        /// Probability that a block is solid.
        density: f64,
        /// Generator seed.
        seed: u64,
    },
    /// Every block solid.
    Solid,
    /// Every block air.
    Empty,
}

impl ChunkGeneration {
    fn generate(&self, position: &Point3<i32>) -> Chunk {
        match *self {
            ChunkGeneration::Perlin { seed } => Chunk::perlin(position, seed),
            ChunkGeneration::Flat { ground_height } => Chunk::flat(position, ground_height),
            ChunkGeneration::Random { density, seed } => Chunk::random(position, density, seed),
            ChunkGeneration::Solid => Chunk::solid(position),
            ChunkGeneration::Empty => Chunk::empty(position),
        }
    }
}

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_pathfinder::voxels::block::block_type::BlockType;
/// use voxel_pathfinder::voxels::world::{ChunkGeneration, World};
///
/// let mut world = World::new(ChunkGeneration::Flat { ground_height: 1 });
/// world.add_chunk_at(Point3::new(0, 0, 0));
///
/// assert!(world.is_solid_at(Point3::new(3, 0, 3)).unwrap());
/// assert!(!world.is_solid_at(Point3::new(3, 1, 3)).unwrap());
///
/// world.set_block_at(Point3::new(3, 1, 3), BlockType::WOOD).unwrap();
/// assert!(world.is_solid_at(Point3::new(3, 1, 3)).unwrap());
/// ```
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<Point3<i32>, MtResource<Chunk>>,
    /// Strategy used by `add_chunk_at`.
    generation: ChunkGeneration,
}

impl World {
    /// Creates a new world with no chunks loaded.
    pub fn new(generation: ChunkGeneration) -> Self {
        World {
            chunks: HashMap::new(),
            generation,
        }
    }

    /// Adds a new chunk at the specified chunk coordinates if one doesn't already exist.
    ///
    /// The chunk is generated using the world's generation strategy.
    pub fn add_chunk_at(&mut self, position: Point3<i32>) {
        if self.chunks.contains_key(&position) {
            return;
        }

        let chunk = self.generation.generate(&position);
        self.chunks.insert(position, MtResource::new(chunk));
    }

    /// Generates every chunk in the inclusive chunk-coordinate box `min..=max`.
    pub fn add_chunks_in(&mut self, min: Point3<i32>, max: Point3<i32>) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.add_chunk_at(Point3::new(x, y, z));
                }
            }
        }
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, pos: Point3<i32>) -> Option<MtResource<Chunk>> {
        self.chunks.get(&pos).cloned()
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Sets the block at a world-space block position.
    ///
    /// Writing into an unloaded chunk creates an empty chunk first, so the
    /// write never depends on the generation strategy.
    pub fn set_block_at(&mut self, block: Point3<i32>, block_type: BlockType) -> PathfindingResult<()> {
        let (chunk_pos, local) = Self::split_block_position(block);
        let chunk = self
            .chunks
            .entry(chunk_pos)
            .or_insert_with(|| MtResource::new(Chunk::empty(&chunk_pos)));
        chunk.write()?.set_block_type(local, block_type);
        Ok(())
    }

    /// Whether the block at a world-space block position is solid.
    ///
    /// Blocks in chunks that are not loaded are air.
    pub fn is_solid_at(&self, block: Point3<i32>) -> PathfindingResult<bool> {
        let (chunk_pos, local) = Self::split_block_position(block);
        match self.chunks.get(&chunk_pos) {
            Some(chunk) => Ok(chunk.read()?.is_block_solid(local)),
            None => Ok(false),
        }
    }

    /// Chunk coordinates of the chunk containing a world-space block position.
    pub fn chunkspace_position(block: Point3<i32>) -> Point3<i32> {
        Point3::new(
            block.x.div_euclid(CHUNK_DIMENSION),
            block.y.div_euclid(CHUNK_DIMENSION),
            block.z.div_euclid(CHUNK_DIMENSION),
        )
    }

    /// Converts a world-space position into the voxel (block) that contains it.
    pub fn voxelspace_position(worldspace: Point3<f32>) -> Point3<i32> {
        Point3::new(
            worldspace.x.floor() as i32,
            worldspace.y.floor() as i32,
            worldspace.z.floor() as i32,
        )
    }

    fn split_block_position(block: Point3<i32>) -> (Point3<i32>, Point3<i32>) {
        let local = Point3::new(
            block.x.rem_euclid(CHUNK_DIMENSION),
            block.y.rem_euclid(CHUNK_DIMENSION),
            block.z.rem_euclid(CHUNK_DIMENSION),
        );
        (Self::chunkspace_position(block), local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_chunks_are_air() {
        let world = World::new(ChunkGeneration::Solid);
        assert_eq!(world.chunk_count(), 0);
        assert!(!world.is_solid_at(Point3::new(0, 0, 0)).unwrap());
    }

    #[test]
    fn add_chunk_is_idempotent() {
        let mut world = World::new(ChunkGeneration::Solid);
        world.add_chunk_at(Point3::new(0, 0, 0));
        world.set_block_at(Point3::new(1, 1, 1), BlockType::AIR).unwrap();
        world.add_chunk_at(Point3::new(0, 0, 0));

        assert_eq!(world.chunk_count(), 1);
        assert!(!world.is_solid_at(Point3::new(1, 1, 1)).unwrap());
        assert!(world.is_solid_at(Point3::new(1, 1, 2)).unwrap());
    }

    #[test]
    fn negative_coordinates_resolve_to_the_right_chunk() {
        let mut world = World::new(ChunkGeneration::Empty);
        world.set_block_at(Point3::new(-1, -17, 16), BlockType::DIRT).unwrap();

        assert_eq!(World::chunkspace_position(Point3::new(-1, -17, 16)), Point3::new(-1, -2, 1));
        assert!(world.is_solid_at(Point3::new(-1, -17, 16)).unwrap());
        assert!(!world.is_solid_at(Point3::new(15, 15, 0)).unwrap());
        assert!(world.get_chunk_at(Point3::new(-1, -2, 1)).is_some());
    }

    #[test]
    fn voxelspace_position_floors() {
        assert_eq!(
            World::voxelspace_position(Point3::new(1.9, -0.1, 3.0)),
            Point3::new(1, -1, 3)
        );
    }

    #[test]
    fn add_chunks_in_fills_the_box() {
        let mut world = World::new(ChunkGeneration::Flat { ground_height: 2 });
        world.add_chunks_in(Point3::new(-1, 0, -1), Point3::new(0, 0, 0));
        assert_eq!(world.chunk_count(), 4);
        assert!(world.is_solid_at(Point3::new(-5, 1, -5)).unwrap());
        assert!(!world.is_solid_at(Point3::new(-5, 2, -5)).unwrap());
    }

    #[test]
    fn perlin_terrain_mixes_solid_and_air() {
        let mut world = World::new(ChunkGeneration::Perlin { seed: 7 });
        // 64 blocks per axis span a whole noise lattice cell.
        world.add_chunks_in(Point3::new(0, 0, 0), Point3::new(3, 3, 3));
        assert_eq!(world.chunk_count(), 64);

        let mut solid = 0;
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    let chunk = world.get_chunk_at(Point3::new(x, y, z)).unwrap();
                    solid += chunk.read().unwrap().solid_count();
                }
            }
        }
        assert!(solid > 0);
        assert!(solid < 64 * crate::voxels::chunk::CHUNK_SIZE as usize);
        assert!(!world.is_solid_at(Point3::new(0, 0, 0)).unwrap());
    }
}
