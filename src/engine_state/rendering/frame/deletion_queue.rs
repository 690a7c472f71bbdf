//! Deferred destruction of GPU resources.
//!
//! A resource that may still be referenced by in-flight GPU work is queued on the
//! frame slot that last used it. The queue is flushed when that slot is reused, after
//! its fence has signalled. Entries are tagged values rather than closures, so a
//! queue can be inspected.

use crate::engine_state::rendering::gpu_backend::GpuBackend;

/// What kind of resource an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A device buffer
    Buffer,
    /// A bind group
    BindGroup,
    /// A texture
    Texture,
}

/// A resource waiting to be destroyed.
pub enum DeferredResource<B: GpuBackend> {
    /// A device buffer
    Buffer(B::Buffer),
    /// A bind group
    BindGroup(B::BindGroup),
    /// A texture
    Texture(B::Texture),
}

impl<B: GpuBackend> DeferredResource<B> {
    /// The kind of the held resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            DeferredResource::Buffer(_) => ResourceKind::Buffer,
            DeferredResource::BindGroup(_) => ResourceKind::BindGroup,
            DeferredResource::Texture(_) => ResourceKind::Texture,
        }
    }

    /// Destroys the resource now.
    pub fn destroy(self, backend: &mut B) {
        match self {
            DeferredResource::Buffer(buffer) => backend.destroy_buffer(buffer),
            DeferredResource::BindGroup(bind_group) => backend.destroy_bind_group(bind_group),
            DeferredResource::Texture(texture) => backend.destroy_texture(texture),
        }
    }
}

/// Resources scheduled for destruction when a frame slot is reused.
pub struct DeletionQueue<B: GpuBackend> {
    entries: Vec<DeferredResource<B>>,
}

impl<B: GpuBackend> Default for DeletionQueue<B> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<B: GpuBackend> DeletionQueue<B> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `resource` for destruction.
    pub fn push(&mut self, resource: DeferredResource<B>) {
        self.entries.push(resource);
    }

    /// Destroys every queued resource, most recently queued first.
    ///
    /// # Returns
    /// The number of resources destroyed.
    pub fn flush(&mut self, backend: &mut B) -> usize {
        let count = self.entries.len();
        while let Some(resource) = self.entries.pop() {
            resource.destroy(backend);
        }
        count
    }

    /// Kinds of the queued resources in queue order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        self.entries.iter().map(DeferredResource::kind).collect()
    }

    /// Number of queued resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::mock_backend::{MockBackend, MockOp};

    #[test]
    fn test_flush_destroys_in_reverse_order() {
        let mut backend = MockBackend::new();
        let buffer = backend
            .create_buffer("old_target", 16, wgpu::BufferUsages::COPY_SRC)
            .unwrap();
        let buffer_id = buffer.id;
        backend.clear_ops();

        let mut queue = DeletionQueue::<MockBackend>::new();
        queue.push(DeferredResource::Buffer(buffer));
        queue.push(DeferredResource::BindGroup(7));
        queue.push(DeferredResource::Texture(9));
        assert_eq!(
            queue.kinds(),
            vec![ResourceKind::Buffer, ResourceKind::BindGroup, ResourceKind::Texture]
        );

        assert_eq!(queue.flush(&mut backend), 3);
        assert!(queue.is_empty());
        assert_eq!(
            backend.ops(),
            vec![
                MockOp::DestroyTexture(9),
                MockOp::DestroyBindGroup(7),
                MockOp::DestroyBuffer(buffer_id),
            ]
        );
    }

    #[test]
    fn test_flushing_an_empty_queue_is_a_no_op() {
        let mut backend = MockBackend::new();
        let mut queue = DeletionQueue::<MockBackend>::new();
        assert_eq!(queue.flush(&mut backend), 0);
        assert!(backend.ops().is_empty());
    }
}
