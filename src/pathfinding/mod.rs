//! # Pathfinding
//!
//! Asynchronous path searches over the voxel grid.
//!
//! ## Architecture Overview
//!
//! - `PathRequest`: thread-safe description of one search, holding its eventual route
//! - `TaskQueue`: FIFO of pending requests guarded by a single lock
//! - `PathfindingWorker`: the one background thread that drains the queue
//! - `search`: the grid search run for every request
//! - `OccupancyOracle`: the "is this cell solid?" capability the search consults
//!
//! ## Request Lifecycle
//! 1. A caller creates a `PathRequest` and hands it to `PathfindingWorker::submit()`
//! 2. The worker takes requests in submission order and searches them one at a time
//! 3. The route (or its absence) is published into the request exactly once
//! 4. The caller polls `status()` / `waypoints()` or blocks on `wait()`

pub mod node;
pub mod oracle;
pub mod queue;
pub mod request;
pub mod search;
pub mod worker;

pub use oracle::{FnOracle, OccupancyOracle};
pub use queue::{PathfinderTask, TaskQueue};
pub use request::{PathRequest, PathStatus};
pub use search::{find_path, NotFoundReason, SearchOutcome, NEIGHBOR_OFFSETS};
pub use worker::{PathfindingWorker, WorkerState, WorkerStats};
