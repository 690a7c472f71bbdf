//! # Buffer State Module
//!
//! This module provides the wgpu implementation of [`GpuBackend`] together with a
//! centralized record of every GPU buffer the rendering core allocates.
//!
//! ## Key Features
//!
//! * Buffer creation that reports device errors as values instead of panics
//! * Buffer usage analytics and memory tracking
//! * Bounds-checked writes
//! * Submission fences backed by wgpu submission indices
//!
//! ## Architecture
//!
//! `BufferState` owns shared handles to the device and queue. Each buffer it creates
//! is returned as a [`TrackedBuffer`] carrying an analytics key, so writes and
//! destruction keep the totals current. The arena, the frame ring and the renderer all
//! reach the device through one `StSystem<BufferState>`.
//!
//! ## Performance Considerations
//!
//! * Creation is wrapped in error scopes, which costs a round-trip per buffer; buffers
//!   are created at startup or on resize, never per frame
//! * Staging buffers are created mapped and filled in one step

use std::collections::HashMap;

use log::{debug, info};
use wgpu::{
    util::DeviceExt, BufferAsyncError, BufferUsages, CommandEncoder, Device, MapMode, Queue,
    SubmissionIndex, WasmNotSend,
};

use crate::{
    core::{StResource, StSystem},
    engine_state::{
        error::{RenderError, RenderResult},
        rendering::gpu_backend::{check_write_bounds, GpuBackend},
    },
};

/// Analytics data for a GPU buffer
///
/// Tracks memory allocation, usage, and write operations for a buffer
/// to help identify optimization opportunities.
#[derive(Debug, Clone)]
pub struct BufferAnalytics {
    /// Debug label of the buffer
    pub label: &'static str,
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// Highest byte written so far
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

/// A wgpu buffer together with its analytics key.
#[derive(Debug)]
pub struct TrackedBuffer {
    /// Key into the analytics table
    pub id: u64,
    /// Debug label the buffer was created with
    pub label: &'static str,
    /// The underlying buffer
    pub buffer: wgpu::Buffer,
}

impl TrackedBuffer {
    /// Size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        self.buffer.size()
    }
}

/// Central manager for GPU buffers and submissions.
///
/// # Examples
///
/// ```no_run
/// use voxel_render_core::engine_state::{
///     buffer_state::BufferState, graphics_context::GraphicsContext,
///     rendering::gpu_backend::GpuBackend,
/// };
///
/// let context = GraphicsContext::new_headless().unwrap();
/// let mut buffer_state = BufferState::new(context.device.clone(), context.queue.clone());
///
/// let uniforms = buffer_state
///     .create_buffer(
///         "camera_uniform",
///         64,
///         wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
///     )
///     .unwrap();
/// buffer_state.write_buffer(&uniforms, 0, &[0u8; 64]).unwrap();
/// assert_eq!(buffer_state.get_total_used_memory(), 64);
/// ```
pub struct BufferState {
    /// Reference to the GPU device
    pub device: StSystem<Device>,
    /// Reference to the GPU command queue
    pub queue: StSystem<Queue>,
    /// Analytics data for each live buffer
    buffer_analytics: StResource<HashMap<u64, BufferAnalytics>>,
    /// Next analytics key
    next_buffer_id: u64,
}

impl BufferState {
    /// Creates a new buffer state manager
    ///
    /// # Arguments
    ///
    /// * `device` - Reference to the GPU device
    /// * `queue` - Reference to the GPU command queue
    pub fn new(device: StSystem<Device>, queue: StSystem<Queue>) -> Self {
        Self {
            device,
            queue,
            buffer_analytics: StResource::new(HashMap::new()),
            next_buffer_id: 0,
        }
    }

    /// Registers a freshly created buffer in the analytics table.
    fn track(&mut self, buffer: wgpu::Buffer, label: &'static str, used: u64) -> TrackedBuffer {
        self.next_buffer_id += 1;
        let id = self.next_buffer_id;
        self.buffer_analytics.get_mut().insert(
            id,
            BufferAnalytics {
                label,
                allocated_memory: buffer.size(),
                used_memory: used,
                times_written: u64::from(used > 0),
            },
        );
        TrackedBuffer { id, label, buffer }
    }

    /// Runs `create` inside validation and out-of-memory error scopes.
    fn scoped<T>(&self, label: &'static str, create: impl FnOnce(&Device) -> T) -> RenderResult<T> {
        let device_ref = self.device.get();
        let device: &Device = &device_ref;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let resource = create(device);
        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());

        match validation.or(out_of_memory) {
            Some(error) => Err(RenderError::ResourceCreation {
                label: label.to_string(),
                message: error.to_string(),
            }),
            None => Ok(resource),
        }
    }

    /// Maps a buffer asynchronously for CPU access
    ///
    /// # Arguments
    ///
    /// * `buffer` - The buffer to map
    /// * `mode` - Mapping mode (read or write)
    /// * `callback` - Function to call when mapping is complete
    pub fn map_async(
        &self,
        buffer: &TrackedBuffer,
        mode: MapMode,
        callback: impl FnOnce(Result<(), BufferAsyncError>) + WasmNotSend + 'static,
    ) {
        buffer.buffer.slice(..).map_async(mode, callback)
    }

    /// Blocks until all queued GPU work has finished.
    pub fn wait_idle(&self) -> RenderResult<()> {
        self.device.get().poll(wgpu::PollType::Wait)?;
        Ok(())
    }

    /// Snapshot of the analytics of every live buffer.
    pub fn analytics(&self) -> Vec<BufferAnalytics> {
        let mut analytics: Vec<_> = self.buffer_analytics.get().values().cloned().collect();
        analytics.sort_by_key(|entry| entry.label);
        analytics
    }

    /// Gets the total allocated memory across all buffers
    ///
    /// # Returns
    ///
    /// Total allocated memory in bytes
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.buffer_analytics
            .get()
            .iter()
            .fold(0, |acc, (_, buffer_analytics)| {
                acc + buffer_analytics.allocated_memory
            })
    }

    /// Gets the total used memory across all buffers
    ///
    /// # Returns
    ///
    /// Total used memory in bytes
    pub fn get_total_used_memory(&self) -> u64 {
        self.buffer_analytics
            .get()
            .iter()
            .fold(0, |acc, (_, buffer_analytics)| {
                acc + buffer_analytics.used_memory
            })
    }

    /// Logs allocated and used totals, and each buffer at debug level.
    pub fn log_totals(&self) {
        for entry in self.analytics() {
            debug!(
                "Buffer '{}': {} of {} bytes used, {} writes",
                entry.label, entry.used_memory, entry.allocated_memory, entry.times_written
            );
        }
        info!(
            "GPU buffers: {} allocated, {} used across {} buffers",
            self.get_total_allocated_memory(),
            self.get_total_used_memory(),
            self.buffer_analytics.get().len()
        );
    }
}

impl GpuBackend for BufferState {
    type Buffer = TrackedBuffer;
    type Encoder = CommandEncoder;
    type Fence = SubmissionIndex;
    type BindGroup = wgpu::BindGroup;
    type Texture = wgpu::Texture;

    fn create_buffer(
        &mut self,
        label: &'static str,
        size: u64,
        usage: BufferUsages,
    ) -> RenderResult<TrackedBuffer> {
        let max = self.device.get().limits().max_buffer_size;
        if size > max {
            return Err(RenderError::BufferTooLarge {
                label: label.to_string(),
                size,
                max,
            });
        }

        let buffer = self.scoped(label, |device| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage,
                mapped_at_creation: false,
            })
        })?;
        debug!("Created buffer '{}' ({} bytes)", label, size);
        Ok(self.track(buffer, label, 0))
    }

    fn create_staging_buffer(
        &mut self,
        label: &'static str,
        contents: &[u8],
    ) -> RenderResult<TrackedBuffer> {
        let buffer = self.scoped(label, |device| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: BufferUsages::COPY_SRC,
            })
        })?;
        Ok(self.track(buffer, label, contents.len() as u64))
    }

    fn write_buffer(&self, buffer: &TrackedBuffer, offset: u64, data: &[u8]) -> RenderResult<()> {
        let data_size = data.len() as u64;
        check_write_bounds(buffer.label, offset, data_size, buffer.size())?;

        self.queue.get().write_buffer(&buffer.buffer, offset, data);
        let mut buffer_dictionary = self.buffer_analytics.get_mut();
        if let Some(buffer_analytics) = buffer_dictionary.get_mut(&buffer.id) {
            buffer_analytics.used_memory = buffer_analytics.used_memory.max(offset + data_size);
            buffer_analytics.times_written += 1;
        }
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: TrackedBuffer) {
        self.buffer_analytics.get_mut().remove(&buffer.id);
        buffer.buffer.destroy();
    }

    fn destroy_bind_group(&mut self, bind_group: wgpu::BindGroup) {
        drop(bind_group);
    }

    fn destroy_texture(&mut self, texture: wgpu::Texture) {
        texture.destroy();
    }

    fn create_encoder(&self, label: &str) -> CommandEncoder {
        self.device
            .get()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    fn copy_buffer_to_buffer(
        &self,
        encoder: &mut CommandEncoder,
        source: &TrackedBuffer,
        destination: &TrackedBuffer,
        destination_offset: u64,
        size: u64,
    ) {
        encoder.copy_buffer_to_buffer(
            &source.buffer,
            0,
            &destination.buffer,
            destination_offset,
            size,
        );
        if let Some(analytics) = self.buffer_analytics.get_mut().get_mut(&destination.id) {
            analytics.used_memory = analytics.used_memory.max(destination_offset + size);
            analytics.times_written += 1;
        }
    }

    fn submit(&self, encoder: CommandEncoder) -> SubmissionIndex {
        self.queue.get().submit(std::iter::once(encoder.finish()))
    }

    fn wait(&self, fence: &SubmissionIndex) -> RenderResult<()> {
        self.device
            .get()
            .poll(wgpu::PollType::WaitForSubmissionIndex(fence.clone()))?;
        Ok(())
    }
}
