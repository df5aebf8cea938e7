//! # Voxel Pathfinder Demo
//!
//! Runs the library's `run()` demo.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release
//! ```

fn main() {
    if let Err(err) = voxel_pathfinder::run() {
        log::error!("Pathfinder demo failed: {err}");
        std::process::exit(1);
    }
}
