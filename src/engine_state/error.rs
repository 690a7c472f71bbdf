//! # Render Error Types
//!
//! All errors that can occur while building, uploading and drawing voxel geometry.

use std::fmt;

use thiserror::Error;

use super::{config::ConfigError, voxels::block::block_registry::RegistryError};

/// Which of the two arena buffers an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaBuffer {
    /// The shared vertex buffer.
    Vertex,
    /// The shared index buffer.
    Index,
}

impl fmt::Display for ArenaBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaBuffer::Vertex => write!(f, "vertex"),
            ArenaBuffer::Index => write!(f, "index"),
        }
    }
}

/// Errors raised by the mesh arena.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// An upload would run past the end of a reserved buffer.
    #[error(
        "mesh arena {buffer} buffer exhausted: need {requested_bytes} bytes, {remaining_bytes} remaining"
    )]
    CapacityExceeded {
        /// The buffer that ran out.
        buffer: ArenaBuffer,
        /// Bytes the upload needed.
        requested_bytes: u64,
        /// Bytes left before the upload.
        remaining_bytes: u64,
    },

    /// An allocation handed out before the last reset was used.
    #[error("stale mesh allocation from generation {allocation_generation}, arena is at {arena_generation}")]
    StaleAllocation {
        /// Generation stamped on the allocation.
        allocation_generation: u32,
        /// Current arena generation.
        arena_generation: u32,
    },

    /// The vertex cursor no longer fits a signed base vertex.
    #[error("vertex offset {0} does not fit in a signed base vertex")]
    VertexOffsetOverflow(u64),
}

/// Top-level error for the rendering core.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No adapter matched the requested options.
    #[error("no suitable graphics adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device.
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    /// The adapter lacks features the batched draw path needs.
    #[error("adapter is missing required features: {0:?}")]
    MissingFeatures(wgpu::Features),

    /// A buffer larger than the device allows was requested.
    #[error("buffer '{label}' of {size} bytes exceeds the device limit of {max} bytes")]
    BufferTooLarge {
        /// Label of the rejected buffer.
        label: String,
        /// Requested size in bytes.
        size: u64,
        /// Device maximum in bytes.
        max: u64,
    },

    /// A write would run past the end of a buffer.
    #[error("write of {len} bytes at offset {offset} overruns buffer '{label}' of {size} bytes")]
    WriteOutOfBounds {
        /// Label of the buffer.
        label: String,
        /// Byte offset of the write.
        offset: u64,
        /// Bytes written.
        len: u64,
        /// Buffer size in bytes.
        size: u64,
    },

    /// The device reported an error while creating a resource.
    #[error("failed to create '{label}': {message}")]
    ResourceCreation {
        /// Label of the resource.
        label: String,
        /// Driver message.
        message: String,
    },

    /// Waiting on a submission failed.
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    /// Mapping a readback buffer failed.
    #[error("buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    /// More visible instances than the draw-list buffers hold.
    #[error("draw list holds at most {capacity} instances, {requested} requested")]
    InstanceCapacityExceeded {
        /// Instances in the draw list.
        requested: usize,
        /// Reserved instance slots.
        capacity: usize,
    },

    /// `begin_frame` was called while a frame is still being recorded.
    #[error("frame slot {slot} is already recording")]
    AlreadyRecording {
        /// The slot in question.
        slot: usize,
    },

    /// A recording-only operation was called outside of a frame.
    #[error("no frame is being recorded")]
    NotRecording,

    /// A mesh worker thread went away.
    #[error("mesh worker {0} disconnected")]
    WorkerDisconnected(usize),

    /// Mesh arena failure.
    #[error(transparent)]
    Arena(#[from] ArenaError),

    /// Block registry failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Frame capture encoding failure.
    #[error("failed to encode capture: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message_names_the_buffer() {
        let error = ArenaError::CapacityExceeded {
            buffer: ArenaBuffer::Index,
            requested_bytes: 24,
            remaining_bytes: 8,
        };
        assert_eq!(
            error.to_string(),
            "mesh arena index buffer exhausted: need 24 bytes, 8 remaining"
        );
    }

    #[test]
    fn test_arena_error_converts_into_render_error() {
        let error: RenderError = ArenaError::VertexOffsetOverflow(1 << 40).into();
        assert!(matches!(error, RenderError::Arena(ArenaError::VertexOffsetOverflow(_))));
    }
}
