//! Per-frame bind group storage.
//!
//! Bind groups created while recording a frame live in the recording slot's pool and
//! are released together when the slot is reused.

use crate::engine_state::rendering::gpu_backend::GpuBackend;

/// Bind groups owned by one frame slot.
pub struct DescriptorPool<B: GpuBackend> {
    bind_groups: Vec<B::BindGroup>,
}

impl<B: GpuBackend> Default for DescriptorPool<B> {
    fn default() -> Self {
        Self {
            bind_groups: Vec::new(),
        }
    }
}

impl<B: GpuBackend> DescriptorPool<B> {
    /// Stores a bind group for the rest of the frame.
    ///
    /// # Returns
    /// A reference to the stored bind group, valid until the next reset.
    pub fn allocate(&mut self, bind_group: B::BindGroup) -> &B::BindGroup {
        self.bind_groups.push(bind_group);
        &self.bind_groups[self.bind_groups.len() - 1]
    }

    /// Releases every bind group in the pool.
    pub fn reset(&mut self, backend: &mut B) {
        for bind_group in self.bind_groups.drain(..) {
            backend.destroy_bind_group(bind_group);
        }
    }

    /// Number of live bind groups.
    pub fn len(&self) -> usize {
        self.bind_groups.len()
    }

    /// Whether the pool holds nothing.
    pub fn is_empty(&self) -> bool {
        self.bind_groups.is_empty()
    }
}
