//! The occupancy query the pathfinder consults for every candidate cell.

use cgmath::Point3;

use crate::core::MtResource;
use crate::error::PathfindingResult;
use crate::voxels::world::World;

/// Answers whether a grid cell is solid.
///
/// Implementations are called synchronously from the worker thread and must
/// not block indefinitely: the worker has no timeout around the query, so a
/// stalled oracle stalls all pathfinding. A returned error resolves the
/// current request as not found and the worker moves on.
pub trait OccupancyOracle: Send + Sync {
    /// Whether the cell at `position` blocks movement.
    fn is_solid(&self, position: Point3<i32>) -> PathfindingResult<bool>;
}

impl OccupancyOracle for World {
    fn is_solid(&self, position: Point3<i32>) -> PathfindingResult<bool> {
        self.is_solid_at(position)
    }
}

/// A world shared with the thread that edits it.
impl OccupancyOracle for MtResource<World> {
    fn is_solid(&self, position: Point3<i32>) -> PathfindingResult<bool> {
        self.read()?.is_solid_at(position)
    }
}

/// Adapts a plain predicate into an oracle.
///
/// ```
/// use cgmath::Point3;
/// use voxel_pathfinder::pathfinding::{FnOracle, OccupancyOracle};
///
/// let floor = FnOracle::new(|p: Point3<i32>| p.y < 0);
/// assert!(floor.is_solid(Point3::new(0, -1, 0)).unwrap());
/// assert!(!floor.is_solid(Point3::new(0, 0, 0)).unwrap());
/// ```
pub struct FnOracle<F> {
    predicate: F,
}

impl<F> FnOracle<F>
where
    F: Fn(Point3<i32>) -> bool + Send + Sync,
{
    /// Wraps `predicate`.
    pub fn new(predicate: F) -> Self {
        FnOracle { predicate }
    }
}

impl<F> OccupancyOracle for FnOracle<F>
where
    F: Fn(Point3<i32>) -> bool + Send + Sync,
{
    fn is_solid(&self, position: Point3<i32>) -> PathfindingResult<bool> {
        Ok((self.predicate)(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::block_type::BlockType;
    use crate::voxels::world::ChunkGeneration;

    #[test]
    fn shared_world_sees_edits() {
        let world = MtResource::new(World::new(ChunkGeneration::Empty));
        let oracle = world.clone();
        let cell = Point3::new(4, 2, -9);

        assert!(!oracle.is_solid(cell).unwrap());
        world.write().unwrap().set_block_at(cell, BlockType::DIRT).unwrap();
        assert!(oracle.is_solid(cell).unwrap());
    }

    #[test]
    fn poisoned_world_is_an_error() {
        let world = MtResource::new(World::new(ChunkGeneration::Empty));
        let poisoner = world.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.write().unwrap();
            panic!("poison the world");
        })
        .join();

        assert!(world.is_solid(Point3::new(0, 0, 0)).is_err());
    }
}
