//! # Block Module
//!
//! Block type definitions for the voxel world.

pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;
