//! Single-threaded container for long-lived systems.

use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded container for long-lived systems.
///
/// The GPU backend is held in an `StSystem` so the mesh arena, the frame ring and the
/// renderer can all reach the same device without threading `&mut` borrows through
/// every call. Borrows are checked at runtime; hold them only for the duration of a
/// single backend call.
///
/// # Examples
/// ```rust
/// use voxel_render_core::core::StSystem;
///
/// let system = StSystem::new(Box::new(vec![0u32; 4]));
/// let shared = system.clone();
///
/// system.get_mut()[2] = 7;
/// assert_eq!(shared.get()[2], 7);
/// assert!(system.ptr_eq(&shared));
/// ```
///
/// # Panics
/// - Panics if a borrow is held while trying to mutably borrow
/// - Panics if a mutable borrow is held while trying to borrow
pub struct StSystem<T: ?Sized> {
    /// The shared system
    pub system: Rc<RefCell<Box<T>>>,
}

impl<T: ?Sized> StSystem<T> {
    /// Creates a new `StSystem` containing the given boxed system.
    pub fn new(system: Box<T>) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Returns an immutable reference to the contained system.
    pub fn get(&self) -> Ref<'_, Box<T>> {
        self.system.borrow()
    }

    /// Returns a mutable reference to the contained system.
    pub fn get_mut(&self) -> RefMut<'_, Box<T>> {
        self.system.borrow_mut()
    }

    /// Whether both handles share one system.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.system, &other.system)
    }
}

impl<T: ?Sized> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}
