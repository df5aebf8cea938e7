#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

//! # Voxel Pathfinder
//!
//! Asynchronous pathfinding for voxel (block-grid) worlds.
//!
//! Path searches are submitted to a single background worker and resolved
//! without blocking the caller. Each request carries its own result and can be
//! polled from any thread.
//!
//! ## Key Modules
//!
//! * `pathfinding` - Requests, the task queue, the search and the worker thread
//! * `voxels` - A chunked voxel world that answers occupancy queries
//! * `core` - Shared concurrency primitives
//! * `config` - Search and worker tunables
//! * `error` - The crate error type
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use cgmath::Point3;
//! use voxel_pathfinder::config::PathfinderConfig;
//! use voxel_pathfinder::core::MtResource;
//! use voxel_pathfinder::pathfinding::{PathStatus, PathfindingWorker};
//! use voxel_pathfinder::voxels::world::{ChunkGeneration, World};
//!
//! let mut world = World::new(ChunkGeneration::Flat { ground_height: 1 });
//! world.add_chunk_at(Point3::new(0, 0, 0));
//! let world = MtResource::new(world);
//!
//! let worker = PathfindingWorker::new(world.clone(), PathfinderConfig::default()).unwrap();
//! let request = worker.find_path(Point3::new(0.5, 1.0, 0.5), Point3::new(5.5, 1.0, 2.5), true, 2);
//!
//! if request.wait(Duration::from_secs(1)) == PathStatus::Found {
//!     let route = request.waypoints().unwrap();
//!     assert_eq!(route.last(), Some(&Point3::new(5, 1, 2)));
//! }
//! ```

use std::time::Duration;

use cgmath::Point3;
use log::{info, warn};

pub mod config;
pub mod core;
pub mod error;
pub mod pathfinding;
pub mod voxels;

use config::PathfinderConfig;
use error::PathfindingResult;
use pathfinding::{PathRequest, PathStatus, PathfindingWorker};
use voxels::block::block_type::BlockType;
use voxels::world::{ChunkGeneration, World};

/// Environment variable naming a JSON file with a [`PathfinderConfig`].
pub const CONFIG_ENV_VAR: &str = "PATHFINDER_CONFIG";

const DEMO_TIMEOUT: Duration = Duration::from_secs(5);

/// Initializes `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Calling it more than once is harmless.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    let _ = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();
}

/// Runs the demo: builds a small world, submits a few path requests and logs the results.
pub fn run() -> PathfindingResult<()> {
    init_logger();
    info!("Logger initialized");

    let config = match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) => {
            info!("Loading pathfinder configuration from {path}");
            PathfinderConfig::from_json_file(path)?
        }
        Err(_) => PathfinderConfig::default(),
    };

    let mut world = World::new(ChunkGeneration::Flat { ground_height: 1 });
    world.add_chunks_in(Point3::new(-1, 0, -1), Point3::new(1, 0, 1));
    for x in -4..=4 {
        for y in 1..4 {
            world.set_block_at(Point3::new(x, y, 6), BlockType::WOOD)?;
        }
    }
    let world = core::MtResource::new(world);

    let worker = PathfindingWorker::new(world.clone(), config)?;
    let requests = [
        worker.find_path(Point3::new(0.5, 1.0, 0.5), Point3::new(8.5, 1.0, 3.5), true, 2),
        worker.submit(PathRequest::new(Point3::new(0, 1, 0), Point3::new(0, 1, 10), true, 2)),
        worker.submit(PathRequest::new(Point3::new(0, 1, 0), Point3::new(0, 6, 0), true, 2)),
    ];

    for request in &requests {
        match request.wait(DEMO_TIMEOUT) {
            PathStatus::Found => info!(
                "Path {:?} -> {:?}: {:?}",
                request.start(),
                request.goal(),
                request.waypoints().unwrap_or_default()
            ),
            PathStatus::NotFound => info!("No path {:?} -> {:?}", request.start(), request.goal()),
            PathStatus::Pending => warn!(
                "Path {:?} -> {:?} still pending after {:?}",
                request.start(),
                request.goal(),
                DEMO_TIMEOUT
            ),
        }
    }

    info!("Pathfinder stats: {:?}", worker.stats());
    Ok(())
}
