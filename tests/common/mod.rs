#![allow(dead_code)]

use std::collections::HashSet;

use cgmath::Point3;
use voxel_pathfinder::error::PathfindingResult;
use voxel_pathfinder::pathfinding::{OccupancyOracle, NEIGHBOR_OFFSETS};

/// A cube of `size`³ cells with explicit solid cells; everything outside is solid.
#[derive(Debug, Clone)]
pub struct BoundedGrid {
    pub size: i32,
    pub solids: HashSet<Point3<i32>>,
}

impl BoundedGrid {
    pub fn empty(size: i32) -> Self {
        BoundedGrid {
            size,
            solids: HashSet::new(),
        }
    }

    pub fn in_bounds(&self, p: Point3<i32>) -> bool {
        (0..self.size).contains(&p.x) && (0..self.size).contains(&p.y) && (0..self.size).contains(&p.z)
    }

    pub fn solid(&self, p: Point3<i32>) -> bool {
        !self.in_bounds(p) || self.solids.contains(&p)
    }
}

impl OccupancyOracle for BoundedGrid {
    fn is_solid(&self, position: Point3<i32>) -> PathfindingResult<bool> {
        Ok(self.solid(position))
    }
}

/// Checks the invariants every found route must satisfy.
pub fn assert_valid_route(
    grid: &BoundedGrid,
    route: &[Point3<i32>],
    start: Point3<i32>,
    goal: Point3<i32>,
    needs_ground: bool,
) {
    assert_eq!(route.first(), Some(&start), "route must begin at the start");
    assert_eq!(route.last(), Some(&goal), "route must end at the goal");

    for pair in route.windows(2) {
        let step = pair[1] - pair[0];
        assert!(NEIGHBOR_OFFSETS.contains(&step), "illegal move {:?}", step);
    }
    for cell in &route[1..] {
        assert!(!grid.solid(*cell), "route passes through solid {:?}", cell);
        if needs_ground {
            assert!(
                grid.solid(Point3::new(cell.x, cell.y - 1, cell.z)),
                "walking route floats at {:?}",
                cell
            );
        }
    }
}
