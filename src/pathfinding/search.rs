//! # Grid Search
//!
//! A locally greedy A* variant over the voxel grid.
//!
//! Each step only compares the immediate neighbours of the current cell: the
//! traversable neighbour with the lowest `f_cost` becomes the next current cell
//! (ties go to the neighbour enumerated first in [`NEIGHBOR_OFFSETS`]), and the
//! cell that was left is closed. The walk is deterministic and bounded by the
//! configured step cap, but it is not guaranteed to find the shortest route or
//! any route at all around dead ends.
//!
//! Straight vertical moves are not candidates; height is gained or lost only
//! through the up and down diagonals.

use std::collections::{HashMap, HashSet};

use cgmath::{Point3, Vector3};

use crate::config::PathfinderConfig;
use crate::error::PathfindingResult;

use super::node::{CostModel, NodeArena, NodeId};
use super::oracle::OccupancyOracle;
use super::request::PathRequest;

const FORWARD: Vector3<i32> = Vector3 { x: 0, y: 0, z: 1 };
const BACK: Vector3<i32> = Vector3 { x: 0, y: 0, z: -1 };
const LEFT: Vector3<i32> = Vector3 { x: -1, y: 0, z: 0 };
const RIGHT: Vector3<i32> = Vector3 { x: 1, y: 0, z: 0 };
const UP: Vector3<i32> = Vector3 { x: 0, y: 1, z: 0 };
const DOWN: Vector3<i32> = Vector3 { x: 0, y: -1, z: 0 };

const fn add(a: Vector3<i32>, b: Vector3<i32>) -> Vector3<i32> {
    Vector3 {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
}

/// `cell + by`, or `None` past the edge of the `i32` grid.
fn checked_offset(cell: Point3<i32>, by: Vector3<i32>) -> Option<Point3<i32>> {
    Some(Point3::new(
        cell.x.checked_add(by.x)?,
        cell.y.checked_add(by.y)?,
        cell.z.checked_add(by.z)?,
    ))
}

/// The 16 moves considered from every cell, in tie-breaking order.
pub const NEIGHBOR_OFFSETS: [Vector3<i32>; 16] = [
    FORWARD,
    BACK,
    LEFT,
    RIGHT,
    add(FORWARD, RIGHT),
    add(FORWARD, LEFT),
    add(BACK, RIGHT),
    add(BACK, LEFT),
    add(UP, FORWARD),
    add(UP, BACK),
    add(UP, LEFT),
    add(UP, RIGHT),
    add(DOWN, FORWARD),
    add(DOWN, BACK),
    add(DOWN, LEFT),
    add(DOWN, RIGHT),
];

/// Whether `from -> to` is one of the [`NEIGHBOR_OFFSETS`].
pub fn is_legal_move(from: Point3<i32>, to: Point3<i32>) -> bool {
    NEIGHBOR_OFFSETS.contains(&(to - from))
}

/// Why a search ended without a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The current cell had no traversable neighbour.
    Exhausted,
    /// The step cap was reached before the goal.
    StepLimit,
    /// The request was cancelled.
    Cancelled,
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// A route was found.
    Found {
        /// Route from start to goal inclusive.
        waypoints: Vec<Point3<i32>>,
        /// Expansion steps taken.
        steps: u32,
    },
    /// The search ended without reaching the goal.
    NotFound {
        /// Why the search stopped.
        reason: NotFoundReason,
        /// Expansion steps taken.
        steps: u32,
    },
}

impl SearchOutcome {
    /// The route, if one was found.
    pub fn into_waypoints(self) -> Option<Vec<Point3<i32>>> {
        match self {
            SearchOutcome::Found { waypoints, .. } => Some(waypoints),
            SearchOutcome::NotFound { .. } => None,
        }
    }

    /// Expansion steps taken by the search.
    pub fn steps(&self) -> u32 {
        match self {
            SearchOutcome::Found { steps, .. } | SearchOutcome::NotFound { steps, .. } => *steps,
        }
    }
}

/// Searches a route for `request` against `oracle`.
///
/// Oracle errors abort the search and are returned to the caller; every other
/// ending is a [`SearchOutcome`].
pub fn find_path(
    request: &PathRequest,
    oracle: &dyn OccupancyOracle,
    config: &PathfinderConfig,
) -> PathfindingResult<SearchOutcome> {
    GridSearch::new(request, oracle, config).run()
}

struct GridSearch<'a> {
    request: &'a PathRequest,
    oracle: &'a dyn OccupancyOracle,
    costs: CostModel,
    max_steps: u32,
    enforce_agent_height: bool,
    goal: Point3<i32>,
    arena: NodeArena,
    open: HashMap<Point3<i32>, NodeId>,
    closed: HashSet<Point3<i32>>,
}

impl<'a> GridSearch<'a> {
    fn new(request: &'a PathRequest, oracle: &'a dyn OccupancyOracle, config: &PathfinderConfig) -> Self {
        GridSearch {
            request,
            oracle,
            costs: CostModel {
                heuristic_scale: config.heuristic_scale,
                movement_cost_scale: config.movement_cost_scale,
            },
            max_steps: config.max_search_steps,
            enforce_agent_height: config.enforce_agent_height,
            goal: request.goal(),
            arena: NodeArena::new(),
            open: HashMap::new(),
            closed: HashSet::new(),
        }
    }

    fn run(mut self) -> PathfindingResult<SearchOutcome> {
        let start = self.request.start();
        if start == self.goal {
            return Ok(SearchOutcome::Found {
                waypoints: vec![start],
                steps: 0,
            });
        }

        let root = self.arena.push_root(start, self.costs.heuristic(start, self.goal));
        self.open.insert(start, root);
        let mut current = root;
        let mut steps = 0;

        loop {
            if self.request.is_cancelled() {
                return Ok(SearchOutcome::NotFound {
                    reason: NotFoundReason::Cancelled,
                    steps,
                });
            }

            let Some(next) = self.best_neighbor(current)? else {
                return Ok(SearchOutcome::NotFound {
                    reason: NotFoundReason::Exhausted,
                    steps,
                });
            };

            self.closed.insert(self.arena.get(current).position);
            self.arena.set_parent(next, current);
            current = next;
            steps += 1;

            if self.arena.get(current).position == self.goal {
                return Ok(SearchOutcome::Found {
                    waypoints: self.arena.route_to(current),
                    steps,
                });
            }

            if steps >= self.max_steps {
                return Ok(SearchOutcome::NotFound {
                    reason: NotFoundReason::StepLimit,
                    steps,
                });
            }
        }
    }

    /// Evaluates the neighbours of `current` and returns the cheapest traversable one.
    fn best_neighbor(&mut self, current: NodeId) -> PathfindingResult<Option<NodeId>> {
        let origin = self.arena.get(current).position;
        let origin_g = self.arena.get(current).g_cost;
        let mut best: Option<NodeId> = None;

        for offset in NEIGHBOR_OFFSETS {
            let Some(candidate) = checked_offset(origin, offset) else {
                continue;
            };
            if !self.is_traversable(candidate)? {
                continue;
            }

            let id = match self.open.get(&candidate) {
                Some(&existing) => existing,
                None => {
                    let g_cost = origin_g + self.costs.movement_cost(origin, candidate);
                    let h_cost = self.costs.heuristic(candidate, self.goal);
                    let id = self.arena.push(candidate, g_cost, h_cost, current);
                    self.open.insert(candidate, id);
                    id
                }
            };

            let is_better = match best {
                Some(best_id) => self.arena.get(id).f_cost() < self.arena.get(best_id).f_cost(),
                None => true,
            };
            if is_better {
                best = Some(id);
            }
        }

        Ok(best)
    }

    fn is_traversable(&self, cell: Point3<i32>) -> PathfindingResult<bool> {
        if self.closed.contains(&cell) || self.oracle.is_solid(cell)? {
            return Ok(false);
        }
        if self.request.needs_ground() {
            // No cell exists below the bottom of the grid to stand on.
            let Some(below) = checked_offset(cell, DOWN) else {
                return Ok(false);
            };
            if !self.oracle.is_solid(below)? {
                return Ok(false);
            }
        }
        if self.enforce_agent_height {
            let height = i32::try_from(self.request.agent_height()).unwrap_or(i32::MAX);
            for dy in 1..height {
                let Some(above) = checked_offset(cell, UP * dy) else {
                    break;
                };
                if self.oracle.is_solid(above)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}
