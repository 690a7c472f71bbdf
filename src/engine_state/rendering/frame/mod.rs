//! # Frame Resource Ring
//!
//! A fixed ring of frame slots that lets the CPU record frame `n + 1` while the GPU is
//! still executing frame `n`. Slots are used round-robin by frame number.
//!
//! ## Slot Lifecycle
//!
//! `Idle -> Recording -> Submitted -> Idle`
//!
//! * `begin_frame` waits on the slot's fence from its previous use, then flushes the
//!   slot's deletion queue, resets its descriptor pool and opens a fresh encoder. The
//!   wait is the only place the CPU blocks on the GPU and bounds how far ahead it can
//!   run.
//! * `submit_frame` hands the encoder to the queue and keeps the returned fence.
//! * `drain` waits on every slot and releases everything they still hold. Call it
//!   before destroying any resource a frame may reference.
//!
//! Per-frame buffers are indexed by slot so that a buffer is only written while its
//! slot is recording.

pub mod deletion_queue;
pub mod descriptor_pool;

use log::{debug, info};

use crate::{
    core::StSystem,
    engine_state::{
        config::ConfigError,
        error::{RenderError, RenderResult},
        rendering::gpu_backend::GpuBackend,
    },
};

use deletion_queue::{DeferredResource, DeletionQueue, ResourceKind};
use descriptor_pool::DescriptorPool;

/// Lifecycle state of one frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Free to record; any previous GPU work is complete
    Idle,
    /// Commands are being recorded
    Recording,
    /// Handed to the GPU; may still be executing
    Submitted,
}

/// Recording resources for one frame in flight.
pub struct FrameSlot<B: GpuBackend> {
    state: SlotState,
    fence: Option<B::Fence>,
    encoder: Option<B::Encoder>,
    deletion_queue: DeletionQueue<B>,
    descriptors: DescriptorPool<B>,
}

impl<B: GpuBackend> FrameSlot<B> {
    fn new() -> Self {
        Self {
            state: SlotState::Idle,
            fence: None,
            encoder: None,
            deletion_queue: DeletionQueue::new(),
            descriptors: DescriptorPool::default(),
        }
    }

    /// Waits for the slot's last submission, then releases deferred resources.
    fn retire(&mut self, backend: &StSystem<B>) -> RenderResult<()> {
        if let Some(fence) = &self.fence {
            backend.get().wait(fence)?;
        }
        self.fence = None;

        let mut backend = backend.get_mut();
        let destroyed = self.deletion_queue.flush(&mut **backend);
        if destroyed > 0 {
            debug!("Released {} deferred resources", destroyed);
        }
        self.descriptors.reset(&mut **backend);
        self.state = SlotState::Idle;
        Ok(())
    }
}

/// Round-robin set of frame slots.
pub struct FrameResourceRing<B: GpuBackend> {
    backend: StSystem<B>,
    slots: Vec<FrameSlot<B>>,
    frame_number: u64,
    last_submitted: Option<usize>,
}

impl<B: GpuBackend> FrameResourceRing<B> {
    /// Creates a ring of `frames_in_flight` idle slots.
    ///
    /// # Errors
    /// `ConfigError::Invalid` if `frames_in_flight` is zero.
    pub fn new(backend: StSystem<B>, frames_in_flight: usize) -> RenderResult<Self> {
        if frames_in_flight == 0 {
            return Err(ConfigError::Invalid {
                field: "frames_in_flight",
                reason: "at least one frame slot is required".to_string(),
            }
            .into());
        }
        Ok(Self {
            backend,
            slots: (0..frames_in_flight).map(|_| FrameSlot::new()).collect(),
            frame_number: 0,
            last_submitted: None,
        })
    }

    /// Starts recording the next frame.
    ///
    /// Blocks until the GPU has finished the previous use of the selected slot.
    ///
    /// # Returns
    /// The index of the slot now recording.
    ///
    /// # Errors
    /// `RenderError::AlreadyRecording` if the current frame was begun but not
    /// submitted, or the backend's wait error.
    pub fn begin_frame(&mut self, label: &str) -> RenderResult<usize> {
        let index = self.current_slot_index();
        let slot = &mut self.slots[index];
        if slot.state == SlotState::Recording {
            return Err(RenderError::AlreadyRecording { slot: index });
        }

        if slot.state == SlotState::Submitted {
            debug!(
                "Frame {} waiting on slot {} from an earlier frame",
                self.frame_number, index
            );
        }
        slot.retire(&self.backend)?;

        slot.encoder = Some(self.backend.get().create_encoder(label));
        slot.state = SlotState::Recording;
        Ok(index)
    }

    /// The encoder and bind group pool of the recording slot.
    pub fn recording_parts(&mut self) -> RenderResult<(&mut B::Encoder, &mut DescriptorPool<B>)> {
        let index = self.current_slot_index();
        let slot = &mut self.slots[index];
        match (slot.state, slot.encoder.as_mut()) {
            (SlotState::Recording, Some(encoder)) => Ok((encoder, &mut slot.descriptors)),
            _ => Err(RenderError::NotRecording),
        }
    }

    /// Submits the recording slot and advances to the next frame.
    ///
    /// # Returns
    /// The fence of this submission.
    pub fn submit_frame(&mut self) -> RenderResult<B::Fence> {
        let index = self.current_slot_index();
        let slot = &mut self.slots[index];
        if slot.state != SlotState::Recording {
            return Err(RenderError::NotRecording);
        }
        let encoder = slot.encoder.take().ok_or(RenderError::NotRecording)?;

        let fence = self.backend.get().submit(encoder);
        slot.fence = Some(fence.clone());
        slot.state = SlotState::Submitted;
        self.last_submitted = Some(index);
        self.frame_number += 1;
        Ok(fence)
    }

    /// Schedules `resource` for destruction once the GPU can no longer use it.
    ///
    /// While a frame is recording the resource joins that slot's queue. Otherwise it
    /// joins the queue of the most recently submitted slot. If nothing was ever
    /// submitted, no GPU work can reference it and it is destroyed immediately.
    pub fn defer_destruction(&mut self, resource: DeferredResource<B>) {
        let current = self.current_slot_index();
        let target = if self.slots[current].state == SlotState::Recording {
            Some(current)
        } else {
            self.last_submitted
        };

        match target {
            Some(index) => self.slots[index].deletion_queue.push(resource),
            None => resource.destroy(&mut **self.backend.get_mut()),
        }
    }

    /// Waits for every slot and releases all deferred resources and bind groups.
    ///
    /// A frame that was begun but never submitted is discarded.
    pub fn drain(&mut self) -> RenderResult<()> {
        for slot in &mut self.slots {
            slot.encoder = None;
            slot.retire(&self.backend)?;
        }
        info!("Frame ring drained after {} frames", self.frame_number);
        Ok(())
    }

    /// Index of the slot the next or current frame uses.
    pub fn current_slot_index(&self) -> usize {
        (self.frame_number % self.slots.len() as u64) as usize
    }

    /// Number of frames submitted so far.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Number of slots.
    pub fn frames_in_flight(&self) -> usize {
        self.slots.len()
    }

    /// State of slot `index`.
    pub fn slot_state(&self, index: usize) -> SlotState {
        self.slots[index].state
    }

    /// Kinds of the resources queued on slot `index`.
    pub fn pending_destruction(&self, index: usize) -> Vec<ResourceKind> {
        self.slots[index].deletion_queue.kinds()
    }

    /// Bind groups held by slot `index`.
    pub fn descriptor_count(&self, index: usize) -> usize {
        self.slots[index].descriptors.len()
    }
}
