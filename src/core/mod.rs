//! # Core Module
//!
//! Shared concurrency primitives used by the voxel world and the pathfinder.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//!
//! ## Usage
//! ```rust
//! use voxel_pathfinder::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.write().unwrap() += 1;
//! assert_eq!(*counter.read().unwrap(), 1);
//! ```

pub mod mt_resource;

pub use mt_resource::MtResource;
