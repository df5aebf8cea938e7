//! # Task Queue
//!
//! FIFO queue of pending path requests shared between the submitting threads
//! and the worker. A single mutex guards both ends, so every dequeue is seen
//! by exactly one consumer and a request is started in submission order.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use web_time::Instant;

use super::request::PathRequest;

/// A queued unit of work for the pathfinder worker.
#[derive(Debug)]
pub struct PathfinderTask {
    /// The request to resolve.
    pub request: PathRequest,
    /// When the request entered the queue.
    pub enqueued_at: Instant,
}

impl PathfinderTask {
    /// Wraps `request`, stamped with the current time.
    pub fn new(request: PathRequest) -> Self {
        PathfinderTask {
            request,
            enqueued_at: Instant::now(),
        }
    }
}

/// Thread-safe FIFO of [`PathfinderTask`]s.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<PathfinderTask>>,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        TaskQueue {
            tasks: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends a request at the tail.
    pub fn enqueue(&self, request: PathRequest) {
        self.lock().push_back(PathfinderTask::new(request));
    }

    /// Removes and returns the head, or `None` if the queue is empty.
    pub fn drain_one(&self) -> Option<PathfinderTask> {
        self.lock().pop_front()
    }

    /// Removes every queued task, oldest first.
    pub fn drain_all(&self) -> Vec<PathfinderTask> {
        self.lock().drain(..).collect()
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no task is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<PathfinderTask>> {
        // Push and pop cannot leave the deque half-modified, so a poisoned
        // queue is still usable.
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
