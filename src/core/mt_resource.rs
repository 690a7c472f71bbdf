//! Thread-safe shared resource.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource with read-write locking.
///
/// Chunks live in `MtResource`s so mesh workers can read a chunk and its neighbours
/// while the producer thread keeps ownership of the world.
///
/// # Examples
/// ```
/// use cgmath::Point3;
/// use voxel_render_core::core::MtResource;
/// use voxel_render_core::engine_state::voxels::chunk::Chunk;
///
/// let chunk = MtResource::new(Chunk::empty(Point3::new(0, 0, 0)));
/// let worker_view = chunk.clone();
///
/// std::thread::spawn(move || {
///     assert!(worker_view.get().is_empty());
/// })
/// .join()
/// .unwrap();
///
/// chunk.get_mut().set_block(1, 2, 3, 1);
/// assert!(!chunk.get().is_empty());
/// ```
///
/// # Panics
/// `get` and `get_mut` panic if another holder panicked while holding the lock.
pub struct MtResource<T: Send + Sync> {
    /// The shared, lock-protected value
    pub resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Wraps `resource` for shared access.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Shared read access. Concurrent readers do not block each other.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Exclusive write access.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }

    /// Whether both handles point at the same resource.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
