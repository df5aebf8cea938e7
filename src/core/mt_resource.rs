use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{PathfindingError, PathfindingResult};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// between the thread that owns the world and the pathfinder worker. Cloning the
/// container clones the handle, not the value.
///
/// # Examples
///
/// ```
/// use voxel_pathfinder::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let counter_clone = counter.clone();
///
/// let handle = std::thread::spawn(move || {
///     *counter_clone.write().unwrap() += 1;
/// });
///
/// handle.join().unwrap();
/// assert_eq!(*counter.read().unwrap(), 1);
/// ```
///
/// # Poisoning
/// A lock poisoned by a panicking writer is reported as
/// [`PathfindingError::LockPoisoned`] instead of panicking the reader, so an
/// occupancy query against a damaged world fails one search rather than the
/// worker thread.
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard for the contained value.
    pub fn read(&self) -> PathfindingResult<RwLockReadGuard<'_, T>> {
        self.resource
            .read()
            .map_err(|e| PathfindingError::LockPoisoned(e.to_string()))
    }

    /// Returns an exclusive guard for the contained value.
    pub fn write(&self) -> PathfindingResult<RwLockWriteGuard<'_, T>> {
        self.resource
            .write()
            .map_err(|e| PathfindingError::LockPoisoned(e.to_string()))
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_value() {
        let resource = MtResource::new(vec![1, 2]);
        let other = resource.clone();
        other.write().unwrap().push(3);
        assert_eq!(*resource.read().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let resource = MtResource::new(0u32);
        let other = resource.clone();
        let _ = std::thread::spawn(move || {
            let _guard = other.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(
            resource.read(),
            Err(PathfindingError::LockPoisoned(_))
        ));
    }
}
