//! Single-threaded shared resource.

use std::{
    rc::Rc,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// Used for bookkeeping shared between single-threaded systems, such as the
/// per-buffer analytics table.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use voxel_render_core::core::StResource;
///
/// let analytics = StResource::new(HashMap::new());
/// let view = analytics.clone();
///
/// analytics.get_mut().insert("mesh_arena_vertices", 64u64);
/// assert_eq!(view.get().get("mesh_arena_vertices"), Some(&64));
/// ```
///
/// # Panics
/// Panics on re-entrant write access from the same thread.
pub struct StResource<T> {
    /// The shared, lock-protected value
    pub resource: Rc<RwLock<T>>,
}

impl<T> StResource<T> {
    /// Wraps `resource` for shared single-threaded access.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RwLock::new(resource)),
        }
    }

    /// Read access to the contained value.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Write access to the contained value.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
