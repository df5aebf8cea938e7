//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! For pathfinding only one property matters: whether a block type is solid.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion from the compact integer
/// representation used by chunk generators and save data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and can be walked through.
    AIR,

    /// A basic dirt block.
    DIRT,

    /// A grass block, the usual walking surface of generated terrain.
    GRASS,

    /// A wooden block.
    WOOD,

    /// A plain white block, often used for testing.
    WHITE,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// Unknown values map to `None`.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Whether an agent is blocked by this block type.
    pub fn is_solid(self) -> bool {
        self != BlockType::AIR
    }
}
