//! # Voxel World
//!
//! The block grid the pathfinder searches.
//!
//! * **Block**: block types and their solidity
//! * **Chunk**: fixed-size 3D bit arrays of block solidity
//! * **World**: sparse map of chunks with a unified block-space interface
//!
//! ## Thread Safety
//!
//! Chunks are stored in `MtResource` containers, so a world shared with the
//! pathfinder worker can be read while the owning thread edits other chunks.

pub mod block;
pub mod chunk;
pub mod world;
