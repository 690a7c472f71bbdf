//! # GPU Backend
//!
//! The narrow set of device operations the mesh arena and the frame ring need:
//! buffer creation and destruction, buffer-to-buffer copies recorded on an encoder,
//! submission, and blocking waits on a submission's fence.
//!
//! [`BufferState`](crate::engine_state::buffer_state::BufferState) implements this trait
//! on top of wgpu. Tests use an in-memory backend that records every call and models
//! the GPU timeline, so allocator and synchronisation behaviour can be checked without
//! a device.

use wgpu::BufferUsages;

use crate::engine_state::error::{RenderError, RenderResult};

/// Device operations used by the rendering core.
pub trait GpuBackend {
    /// A device buffer.
    type Buffer;
    /// A command recorder.
    type Encoder;
    /// Completion signal for one submission.
    type Fence: Clone;
    /// A bound set of shader resources.
    type BindGroup;
    /// A device texture.
    type Texture;

    /// Creates an uninitialised device buffer.
    ///
    /// # Arguments
    /// * `label` - Debug label, also the key for buffer analytics
    /// * `size` - Size in bytes
    /// * `usage` - Allowed usages
    fn create_buffer(
        &mut self,
        label: &'static str,
        size: u64,
        usage: BufferUsages,
    ) -> RenderResult<Self::Buffer>;

    /// Creates a host-visible buffer holding `contents`, usable as a copy source.
    fn create_staging_buffer(
        &mut self,
        label: &'static str,
        contents: &[u8],
    ) -> RenderResult<Self::Buffer>;

    /// Queues a write of `data` at `offset` into `buffer`.
    ///
    /// # Errors
    /// `RenderError::WriteOutOfBounds` if the write would pass the end of the buffer.
    /// Nothing is written in that case.
    fn write_buffer(&self, buffer: &Self::Buffer, offset: u64, data: &[u8]) -> RenderResult<()>;

    /// Releases a buffer. The caller guarantees no pending GPU work references it.
    fn destroy_buffer(&mut self, buffer: Self::Buffer);

    /// Releases a bind group.
    fn destroy_bind_group(&mut self, bind_group: Self::BindGroup);

    /// Releases a texture.
    fn destroy_texture(&mut self, texture: Self::Texture);

    /// Starts recording commands.
    fn create_encoder(&self, label: &str) -> Self::Encoder;

    /// Records a copy of `size` bytes from the start of `source` into `destination`.
    fn copy_buffer_to_buffer(
        &self,
        encoder: &mut Self::Encoder,
        source: &Self::Buffer,
        destination: &Self::Buffer,
        destination_offset: u64,
        size: u64,
    );

    /// Hands recorded commands to the queue.
    ///
    /// # Returns
    /// A fence that signals when the GPU has finished this submission.
    fn submit(&self, encoder: Self::Encoder) -> Self::Fence;

    /// Blocks until `fence` has signalled. There is no timeout.
    fn wait(&self, fence: &Self::Fence) -> RenderResult<()>;

    /// Records one-shot commands, submits them and waits for completion.
    ///
    /// This is the default submit function handed to the mesh arena.
    fn immediate_submit(
        &self,
        label: &str,
        record: &mut dyn FnMut(&mut Self::Encoder),
    ) -> RenderResult<()> {
        let mut encoder = self.create_encoder(label);
        record(&mut encoder);
        let fence = self.submit(encoder);
        self.wait(&fence)
    }
}

/// Rejects a write of `len` bytes at `offset` into a buffer of `size` bytes if it
/// would pass the end.
pub fn check_write_bounds(label: &str, offset: u64, len: u64, size: u64) -> RenderResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(RenderError::WriteOutOfBounds {
            label: label.to_string(),
            offset,
            len,
            size,
        }),
    }
}
