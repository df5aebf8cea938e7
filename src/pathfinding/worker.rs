//! # Pathfinding Worker
//!
//! One dedicated background thread that drains the [`TaskQueue`] and resolves
//! each request with [`search::find_path`]. Searches run serially; callers
//! never wait on the worker beyond the queue's critical section.
//!
//! ## Worker Loop
//! 1. Take the head of the queue
//! 2. If there is none, sleep for the configured idle interval and retry
//! 3. Otherwise run the search to completion and publish the result into the request
//! 4. Loop again immediately while work is queued
//!
//! ## Fault Isolation
//! Oracle errors and panics raised during a search are caught here, logged
//! with the request that caused them and resolved as not found. The worker
//! thread itself never terminates because of a single request.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use cgmath::Point3;
use log::{debug, error, info, warn};
use web_time::Instant;

use crate::config::PathfinderConfig;
use crate::error::{PathfindingError, PathfindingResult};

use super::oracle::OccupancyOracle;
use super::queue::{PathfinderTask, TaskQueue};
use super::request::PathRequest;
use super::search::{self, NotFoundReason, SearchOutcome};

/// What the worker thread is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Queue empty, sleeping between polls.
    Idle,
    /// Resolving a request.
    Searching,
    /// The loop has exited after a shutdown.
    Stopped,
}

impl WorkerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Idle,
            1 => WorkerState::Searching,
            _ => WorkerState::Stopped,
        }
    }
}

/// Counters describing the work done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Requests resolved, in any way.
    pub processed: u64,
    /// Requests resolved with a route.
    pub found: u64,
    /// Requests resolved without a route.
    pub not_found: u64,
    /// Searches aborted by an oracle error or a panic.
    pub faults: u64,
    /// Requests resolved because they were cancelled.
    pub cancelled: u64,
}

#[derive(Default)]
struct Counters {
    processed: AtomicU64,
    found: AtomicU64,
    not_found: AtomicU64,
    faults: AtomicU64,
    cancelled: AtomicU64,
}

impl Counters {
    fn record(&self, found: bool) {
        let counter = if found { &self.found } else { &self.not_found };
        counter.fetch_add(1, Ordering::Relaxed);
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> WorkerStats {
        WorkerStats {
            processed: self.processed.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }
}

/// State shared between the worker handle and its thread.
struct WorkerShared {
    queue: TaskQueue,
    state: AtomicU8,
    shutdown: AtomicBool,
    counters: Counters,
}

impl WorkerShared {
    fn set_state(&self, state: WorkerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Resolves a request without searching it.
    fn reject(&self, request: &PathRequest) {
        self.counters.record(false);
        request.publish(None);
    }
}

/// Handle to the background pathfinding thread.
///
/// The worker is owned by the world or game context that created it; callers
/// that need to submit from several threads can share it behind an `Arc`.
/// Dropping the handle stops the thread.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cgmath::Point3;
/// use voxel_pathfinder::config::PathfinderConfig;
/// use voxel_pathfinder::pathfinding::{FnOracle, PathRequest, PathStatus, PathfindingWorker};
///
/// let oracle = FnOracle::new(|p: Point3<i32>| p.y < 0);
/// let worker = PathfindingWorker::new(oracle, PathfinderConfig::default()).unwrap();
///
/// let request = worker.submit(PathRequest::new(Point3::new(0, 0, 0), Point3::new(3, 0, 3), true, 1));
/// assert_eq!(request.wait(Duration::from_secs(5)), PathStatus::Found);
/// assert_eq!(request.waypoints().unwrap().last(), Some(&Point3::new(3, 0, 3)));
/// ```
pub struct PathfindingWorker {
    shared: Arc<WorkerShared>,
    handle: Option<JoinHandle<()>>,
}

impl PathfindingWorker {
    /// Validates `config` and starts the worker thread.
    pub fn new<O>(oracle: O, config: PathfinderConfig) -> PathfindingResult<Self>
    where
        O: OccupancyOracle + 'static,
    {
        Self::with_shared_oracle(Arc::new(oracle), config)
    }

    /// Starts the worker thread with an oracle that is also used elsewhere.
    pub fn with_shared_oracle(
        oracle: Arc<dyn OccupancyOracle>,
        config: PathfinderConfig,
    ) -> PathfindingResult<Self> {
        config.validate()?;

        let shared = Arc::new(WorkerShared {
            queue: TaskQueue::new(),
            state: AtomicU8::new(WorkerState::Idle as u8),
            shutdown: AtomicBool::new(false),
            counters: Counters::default(),
        });

        let thread_shared = shared.clone();
        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run_worker_loop(&thread_shared, oracle.as_ref(), &config))
            .map_err(PathfindingError::WorkerSpawn)?;

        Ok(PathfindingWorker {
            shared,
            handle: Some(handle),
        })
    }

    /// Queues `request` and returns the same handle for polling.
    ///
    /// Submitting a request that was already submitted is ignored. After
    /// [`shutdown`](Self::shutdown) requests are resolved as not found
    /// immediately.
    pub fn submit(&self, request: PathRequest) -> PathRequest {
        if !request.mark_submitted() {
            warn!(
                "Ignoring duplicate submission of path request {:?} -> {:?}",
                request.start(),
                request.goal()
            );
            return request;
        }

        if self.shared.shutdown.load(Ordering::Acquire) {
            warn!("Pathfinder is shut down; rejecting request {:?} -> {:?}", request.start(), request.goal());
            self.shared.reject(&request);
            return request;
        }

        self.shared.queue.enqueue(request.clone());
        request
    }

    /// Converts world-space positions to grid cells and submits a request for them.
    pub fn find_path(
        &self,
        worldspace_start: Point3<f32>,
        worldspace_end: Point3<f32>,
        needs_ground: bool,
        agent_height: u32,
    ) -> PathRequest {
        self.submit(PathRequest::from_worldspace(
            worldspace_start,
            worldspace_end,
            needs_ground,
            agent_height,
        ))
    }

    /// What the worker thread is doing right now.
    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// Snapshot of the work counters.
    pub fn stats(&self) -> WorkerStats {
        self.shared.counters.snapshot()
    }

    /// Number of requests waiting to be started.
    pub fn queued(&self) -> usize {
        self.shared.queue.len()
    }

    /// Stops the worker thread and waits for it to exit.
    ///
    /// The search in progress, if any, completes first. Requests still queued
    /// are resolved as not found.
    pub fn shutdown(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Pathfinder worker thread panicked");
                self.shared.set_state(WorkerState::Stopped);
            }
        }
    }
}

impl Drop for PathfindingWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker_loop(shared: &WorkerShared, oracle: &dyn OccupancyOracle, config: &PathfinderConfig) {
    info!("Pathfinder worker started");

    while !shared.shutdown.load(Ordering::Acquire) {
        match shared.queue.drain_one() {
            Some(task) => {
                shared.set_state(WorkerState::Searching);
                process_task(shared, oracle, config, task);
                shared.set_state(WorkerState::Idle);
            }
            None => thread::sleep(config.idle_sleep()),
        }
    }

    let leftovers = shared.queue.drain_all();
    if !leftovers.is_empty() {
        warn!("Pathfinder shutting down with {} queued requests", leftovers.len());
    }
    for task in leftovers {
        shared.reject(&task.request);
    }

    shared.set_state(WorkerState::Stopped);
    info!("Pathfinder worker stopped");
}

fn process_task(
    shared: &WorkerShared,
    oracle: &dyn OccupancyOracle,
    config: &PathfinderConfig,
    task: PathfinderTask,
) {
    let request = task.request;

    if request.is_cancelled() {
        debug!("Skipping cancelled path request {:?} -> {:?}", request.start(), request.goal());
        shared.counters.cancelled.fetch_add(1, Ordering::Relaxed);
        shared.reject(&request);
        return;
    }

    let started = Instant::now();
    let queued_for = started.duration_since(task.enqueued_at);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        search::find_path(&request, oracle, config)
    }));

    let waypoints = match result {
        Ok(Ok(outcome)) => {
            log_outcome(&request, &outcome);
            if let SearchOutcome::NotFound {
                reason: NotFoundReason::Cancelled,
                ..
            } = outcome
            {
                shared.counters.cancelled.fetch_add(1, Ordering::Relaxed);
            }
            outcome.into_waypoints()
        }
        Ok(Err(err)) => {
            report_fault(shared, &request, &err);
            None
        }
        Err(payload) => {
            let err = PathfindingError::SearchPanicked(panic_message(payload.as_ref()));
            report_fault(shared, &request, &err);
            None
        }
    };

    debug!(
        "Path request {:?} -> {:?} resolved in {:?} after {:?} in queue",
        request.start(),
        request.goal(),
        started.elapsed(),
        queued_for
    );

    shared.counters.record(waypoints.is_some());
    request.publish(waypoints);
}

fn log_outcome(request: &PathRequest, outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Found { waypoints, steps } => debug!(
            "Found path {:?} -> {:?}: {} waypoints in {} steps",
            request.start(),
            request.goal(),
            waypoints.len(),
            steps
        ),
        SearchOutcome::NotFound { reason, steps } => debug!(
            "No path {:?} -> {:?}: {:?} after {} steps",
            request.start(),
            request.goal(),
            reason,
            steps
        ),
    }
}

fn report_fault(shared: &WorkerShared, request: &PathRequest, err: &PathfindingError) {
    error!(
        "Pathfinder fault for request {:?} -> {:?} (needs_ground: {}, agent_height: {}): {}",
        request.start(),
        request.goal(),
        request.needs_ground(),
        request.agent_height(),
        err
    );
    shared.counters.faults.fetch_add(1, Ordering::Relaxed);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::oracle::FnOracle;
    use crate::pathfinding::request::PathStatus;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn open_air() -> FnOracle<impl Fn(Point3<i32>) -> bool + Send + Sync> {
        FnOracle::new(|_| false)
    }

    #[test]
    fn invalid_config_is_rejected_before_spawning() {
        let config = PathfinderConfig {
            max_search_steps: 0,
            ..PathfinderConfig::default()
        };
        assert!(matches!(
            PathfindingWorker::new(open_air(), config),
            Err(PathfindingError::Config(_))
        ));
    }

    #[test]
    fn resolves_a_request_and_counts_it() {
        let worker = PathfindingWorker::new(open_air(), PathfinderConfig::default()).unwrap();
        let request = worker.submit(PathRequest::new(Point3::new(0, 0, 0), Point3::new(0, 0, 3), false, 1));

        assert_eq!(request.wait(TIMEOUT), PathStatus::Found);
        let stats = worker.stats();
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.found, 1);
        assert_eq!(stats.faults, 0);
    }

    #[test]
    fn find_path_uses_worldspace_positions() {
        let worker = PathfindingWorker::new(open_air(), PathfinderConfig::default()).unwrap();
        let request = worker.find_path(Point3::new(0.4, 0.9, 0.1), Point3::new(2.7, 0.2, 2.2), false, 1);

        assert_eq!(request.start(), Point3::new(0, 0, 0));
        assert_eq!(request.goal(), Point3::new(2, 0, 2));
        assert_eq!(request.wait(TIMEOUT), PathStatus::Found);
    }

    #[test]
    fn duplicate_submission_is_processed_once() {
        let worker = PathfindingWorker::new(open_air(), PathfinderConfig::default()).unwrap();
        let request = PathRequest::new(Point3::new(0, 0, 0), Point3::new(4, 0, 0), false, 1);
        worker.submit(request.clone());
        worker.submit(request.clone());

        assert_eq!(request.wait(TIMEOUT), PathStatus::Found);
        // A follow-up request proves the queue was drained past any duplicate.
        let next = worker.submit(PathRequest::new(Point3::new(1, 0, 0), Point3::new(1, 0, 1), false, 1));
        assert_eq!(next.wait(TIMEOUT), PathStatus::Found);
        assert_eq!(worker.stats().processed, 2);
    }

    #[test]
    fn cancelled_before_start_is_not_found() {
        let worker = PathfindingWorker::new(open_air(), PathfinderConfig::default()).unwrap();
        let request = PathRequest::new(Point3::new(0, 0, 0), Point3::new(9, 0, 9), false, 1);
        request.cancel();
        worker.submit(request.clone());

        assert_eq!(request.wait(TIMEOUT), PathStatus::NotFound);
        assert_eq!(worker.stats().cancelled, 1);
    }

    #[test]
    fn submit_after_shutdown_resolves_immediately() {
        let mut worker = PathfindingWorker::new(open_air(), PathfinderConfig::default()).unwrap();
        worker.shutdown();
        assert_eq!(worker.state(), WorkerState::Stopped);

        let request = worker.submit(PathRequest::new(Point3::new(0, 0, 0), Point3::new(1, 0, 0), false, 1));
        assert_eq!(request.status(), PathStatus::NotFound);
    }

    #[test]
    fn idle_worker_reports_idle() {
        let worker = PathfindingWorker::new(open_air(), PathfinderConfig::default()).unwrap();
        let request = worker.submit(PathRequest::new(Point3::new(0, 0, 0), Point3::new(0, 0, 1), false, 1));
        request.wait(TIMEOUT);

        let deadline = Instant::now() + TIMEOUT;
        while worker.state() != WorkerState::Idle && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(worker.state(), WorkerState::Idle);
        assert_eq!(worker.queued(), 0);
    }

    #[test]
    fn panic_messages_are_extracted() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");
        let payload: Box<dyn Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
