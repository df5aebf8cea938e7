//! # Path Requests
//!
//! A [`PathRequest`] describes one search and carries its eventual result. The
//! handle is cheap to clone: the issuer keeps one clone to poll, the worker
//! holds another while it searches.
//!
//! ## Publication
//!
//! Status and waypoints live behind a single mutex and are written together,
//! exactly once, by the worker. A reader therefore sees either `Pending` with
//! no route, or the final status with its complete route.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cgmath::{InnerSpace, Point3, Vector3};
use web_time::Instant;

use crate::voxels::world::World;

/// Lifecycle of a [`PathRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStatus {
    /// Submitted (or not yet submitted) and not resolved.
    Pending,
    /// Processed; a route from start to goal was found.
    Found,
    /// Processed; no route was found, the search failed or it was cancelled.
    NotFound,
}

impl PathStatus {
    /// Whether the worker has resolved the request.
    pub fn is_processed(self) -> bool {
        self != PathStatus::Pending
    }
}

#[derive(Debug)]
struct RequestState {
    status: PathStatus,
    waypoints: Option<Arc<[Point3<i32>]>>,
}

#[derive(Debug)]
struct RequestInner {
    start: Point3<i32>,
    goal: Point3<i32>,
    needs_ground: bool,
    agent_height: u32,
    state: Mutex<RequestState>,
    resolved: Condvar,
    cancelled: AtomicBool,
    submitted: AtomicBool,
}

/// A thread-safe handle to a single path search.
///
/// Requests are single-use: once the status leaves [`PathStatus::Pending`] it
/// never changes again.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_pathfinder::pathfinding::{PathRequest, PathStatus};
///
/// let request = PathRequest::new(Point3::new(0, 1, 0), Point3::new(4, 1, 4), true, 2);
/// assert_eq!(request.status(), PathStatus::Pending);
/// assert!(request.waypoints().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct PathRequest {
    inner: Arc<RequestInner>,
}

impl PathRequest {
    /// Creates a pending request.
    ///
    /// * `start`, `goal` - Grid cells; for walking agents the lowest cell the agent occupies
    /// * `needs_ground` - Only cells with a solid cell directly below are traversable
    /// * `agent_height` - Number of cells the agent occupies vertically
    pub fn new(start: Point3<i32>, goal: Point3<i32>, needs_ground: bool, agent_height: u32) -> Self {
        PathRequest {
            inner: Arc::new(RequestInner {
                start,
                goal,
                needs_ground,
                agent_height,
                state: Mutex::new(RequestState {
                    status: PathStatus::Pending,
                    waypoints: None,
                }),
                resolved: Condvar::new(),
                cancelled: AtomicBool::new(false),
                submitted: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a pending request from world-space positions, flooring them to grid cells.
    pub fn from_worldspace(
        worldspace_start: Point3<f32>,
        worldspace_goal: Point3<f32>,
        needs_ground: bool,
        agent_height: u32,
    ) -> Self {
        Self::new(
            World::voxelspace_position(worldspace_start),
            World::voxelspace_position(worldspace_goal),
            needs_ground,
            agent_height,
        )
    }

    /// Grid cell the route starts from.
    pub fn start(&self) -> Point3<i32> {
        self.inner.start
    }

    /// Grid cell the route must reach.
    pub fn goal(&self) -> Point3<i32> {
        self.inner.goal
    }

    /// Whether every route cell must rest on a solid cell.
    pub fn needs_ground(&self) -> bool {
        self.inner.needs_ground
    }

    /// Height of the agent in cells.
    pub fn agent_height(&self) -> u32 {
        self.inner.agent_height
    }

    /// Latest published status.
    pub fn status(&self) -> PathStatus {
        self.lock_state().status
    }

    /// Whether the worker has resolved this request.
    pub fn is_processed(&self) -> bool {
        self.status().is_processed()
    }

    /// Whether a route was found.
    pub fn is_found(&self) -> bool {
        self.status() == PathStatus::Found
    }

    /// The route from start to goal inclusive, once found.
    ///
    /// `None` while pending and when no route was found.
    pub fn waypoints(&self) -> Option<Vec<Point3<i32>>> {
        self.lock_state().waypoints.as_ref().map(|w| w.to_vec())
    }

    /// Blocks until the request is resolved or `timeout` elapses, returning the status at that point.
    pub fn wait(&self, timeout: Duration) -> PathStatus {
        // A timeout too large for `Instant` means no deadline.
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.lock_state();
        while state.status == PathStatus::Pending {
            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    self.inner
                        .resolved
                        .wait_timeout(state, deadline - now)
                        .map(|(guard, _)| guard)
                        .unwrap_or_else(|e| e.into_inner().0)
                }
                None => self
                    .inner
                    .resolved
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
        state.status
    }

    /// Asks the worker to give up on this request.
    ///
    /// The flag is checked before the search starts and once per expansion
    /// step; a cancelled request resolves as [`PathStatus::NotFound`]. Has no
    /// effect on a request that is already resolved.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) was called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Direction an agent at world-space `position` should move to follow the route.
    ///
    /// Returns the normalized vector from `position` towards the waypoint after
    /// the one containing `position`. `None` if the request has no route, the
    /// agent is not on a waypoint, or the agent already stands on the goal.
    pub fn movement_direction(&self, position: Point3<f32>) -> Option<Vector3<f32>> {
        let state = self.lock_state();
        let waypoints = state.waypoints.as_ref()?;
        let voxel = World::voxelspace_position(position);
        let index = waypoints.iter().position(|w| *w == voxel)?;
        let next = waypoints.get(index + 1)?;

        let target = Point3::new(next.x as f32 + 0.5, next.y as f32, next.z as f32 + 0.5);
        let direction = target - position;
        if direction.magnitude2() == 0.0 {
            return None;
        }
        Some(direction.normalize())
    }

    /// Marks the request as submitted; `false` if it already was.
    pub(crate) fn mark_submitted(&self) -> bool {
        !self.inner.submitted.swap(true, Ordering::AcqRel)
    }

    /// Publishes the result and wakes any waiters.
    ///
    /// `Some(route)` resolves the request as found, `None` as not found. A
    /// second publication is ignored and returns `false`.
    pub(crate) fn publish(&self, waypoints: Option<Vec<Point3<i32>>>) -> bool {
        let mut state = self.lock_state();
        if state.status != PathStatus::Pending {
            return false;
        }

        state.status = match waypoints {
            Some(ref route) if !route.is_empty() => PathStatus::Found,
            _ => PathStatus::NotFound,
        };
        state.waypoints = match state.status {
            PathStatus::Found => waypoints.map(Arc::from),
            _ => None,
        };
        drop(state);

        self.inner.resolved.notify_all();
        true
    }

    /// Whether two handles refer to the same request.
    pub fn same_request(&self, other: &PathRequest) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn lock_state(&self) -> MutexGuard<'_, RequestState> {
        // The state is written in a single critical section that cannot panic
        // halfway, so a poisoned lock still guards consistent data.
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
