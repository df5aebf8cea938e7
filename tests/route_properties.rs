mod common;

use cgmath::Point3;
use common::{assert_valid_route, BoundedGrid};
use proptest::prelude::*;
use voxel_pathfinder::config::PathfinderConfig;
use voxel_pathfinder::pathfinding::{find_path, NotFoundReason, PathRequest, SearchOutcome};

const GRID_SIZE: i32 = 8;

fn cell() -> impl Strategy<Value = Point3<i32>> {
    (0..GRID_SIZE, 0..GRID_SIZE, 0..GRID_SIZE).prop_map(|(x, y, z)| Point3::new(x, y, z))
}

fn random_grid() -> impl Strategy<Value = BoundedGrid> {
    prop::collection::vec(prop::bool::weighted(0.25), (GRID_SIZE * GRID_SIZE * GRID_SIZE) as usize).prop_map(
        |cells| {
            let mut grid = BoundedGrid::empty(GRID_SIZE);
            for (i, solid) in cells.into_iter().enumerate() {
                if solid {
                    let i = i as i32;
                    grid.solids.insert(Point3::new(
                        i % GRID_SIZE,
                        (i / GRID_SIZE) % GRID_SIZE,
                        i / (GRID_SIZE * GRID_SIZE),
                    ));
                }
            }
            grid
        },
    )
}

fn check_outcome(grid: &BoundedGrid, request: &PathRequest, config: &PathfinderConfig) -> SearchOutcome {
    let outcome = find_path(request, grid, config).unwrap();
    assert!(outcome.steps() <= config.max_search_steps);
    if let SearchOutcome::Found { waypoints, .. } = &outcome {
        assert_valid_route(grid, waypoints, request.start(), request.goal(), request.needs_ground());
    }
    outcome
}

proptest! {
    #[test]
    fn found_routes_are_valid(mut grid in random_grid(), start in cell(), goal in cell()) {
        grid.solids.remove(&start);
        grid.solids.remove(&goal);
        let request = PathRequest::new(start, goal, false, 1);
        check_outcome(&grid, &request, &PathfinderConfig::default());
    }

    #[test]
    fn walking_routes_stay_on_the_ground(mut grid in random_grid(), start in cell(), goal in cell()) {
        for x in 0..GRID_SIZE {
            for z in 0..GRID_SIZE {
                grid.solids.insert(Point3::new(x, 0, z));
            }
        }
        let start = Point3::new(start.x, start.y.max(1), start.z);
        let goal = Point3::new(goal.x, goal.y.max(1), goal.z);
        grid.solids.remove(&start);
        grid.solids.remove(&goal);

        let request = PathRequest::new(start, goal, true, 2);
        check_outcome(&grid, &request, &PathfinderConfig::default());
    }

    #[test]
    fn start_equal_to_goal_is_a_single_waypoint(grid in random_grid(), start in cell()) {
        let request = PathRequest::new(start, start, true, 1);
        let outcome = find_path(&request, &grid, &PathfinderConfig::default()).unwrap();
        prop_assert_eq!(outcome, SearchOutcome::Found { waypoints: vec![start], steps: 0 });
    }

    #[test]
    fn step_cap_is_respected(mut grid in random_grid(), start in cell(), goal in cell(), cap in 1u32..20) {
        grid.solids.remove(&start);
        grid.solids.remove(&goal);
        let config = PathfinderConfig { max_search_steps: cap, ..PathfinderConfig::default() };
        let request = PathRequest::new(start, goal, false, 1);

        match check_outcome(&grid, &request, &config) {
            SearchOutcome::Found { waypoints, steps } => {
                prop_assert!(waypoints.len() as u32 <= steps + 1);
            }
            SearchOutcome::NotFound { reason, steps } => {
                prop_assert_ne!(reason, NotFoundReason::Cancelled);
                if reason == NotFoundReason::StepLimit {
                    prop_assert_eq!(steps, cap);
                }
            }
        }
    }
}
