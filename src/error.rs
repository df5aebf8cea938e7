//! # Error Types
//!
//! All fallible operations in the crate return [`PathfindingResult`]. Errors
//! raised while a request is being searched never reach the code that issued
//! the request: the worker logs them and resolves the request as not found.

use cgmath::Point3;
use thiserror::Error;

/// Errors produced by the pathfinding subsystem and its collaborators.
#[derive(Error, Debug)]
pub enum PathfindingError {
    /// The occupancy oracle could not answer a query.
    #[error("Occupancy query failed at ({}, {}, {}): {reason}", .position.x, .position.y, .position.z)]
    Oracle {
        /// The grid cell that was queried.
        position: Point3<i32>,
        /// Human readable description of the fault.
        reason: String,
    },

    /// A shared resource lock was poisoned by a panicking thread.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// A search panicked and was caught by the worker loop.
    #[error("Search panicked: {0}")]
    SearchPanicked(String),

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document could not be parsed.
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The worker thread could not be started.
    #[error("Failed to spawn pathfinder worker thread: {0}")]
    WorkerSpawn(std::io::Error),
}

/// Convenience alias used across the crate.
pub type PathfindingResult<T> = Result<T, PathfindingError>;
