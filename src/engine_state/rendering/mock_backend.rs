//! In-memory [`GpuBackend`] for tests.
//!
//! Buffers are byte vectors, copies are applied when recorded, and every call is
//! appended to an operation log. Fences are submission numbers on a shared timeline;
//! with auto-completion off they only signal when a test calls
//! [`MockTimeline::complete`], which lets tests observe blocking waits.

use std::{
    cell::RefCell,
    collections::HashMap,
    sync::{Arc, Condvar, Mutex},
};

use wgpu::BufferUsages;

use super::gpu_backend::{check_write_bounds, GpuBackend};
use crate::engine_state::error::RenderResult;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOp {
    CreateBuffer { id: u64, label: &'static str, size: u64 },
    CreateStaging { id: u64, label: &'static str, size: u64 },
    Write { buffer: u64, offset: u64, len: u64 },
    DestroyBuffer(u64),
    DestroyBindGroup(u64),
    DestroyTexture(u64),
    Copy { source: u64, destination: u64, destination_offset: u64, size: u64 },
    Submit { fence: u64, copies: usize },
    Wait(u64),
}

#[derive(Debug)]
pub struct MockBuffer {
    pub id: u64,
    pub label: &'static str,
    pub usage: BufferUsages,
}

#[derive(Debug, Default)]
pub struct MockEncoder {
    pub copies: usize,
}

/// Completion state shared between the backend and the test driving it.
#[derive(Debug, Default)]
pub struct MockTimeline {
    completed: Mutex<u64>,
    signal: Condvar,
}

impl MockTimeline {
    /// Marks every submission up to and including `fence` as finished.
    pub fn complete(&self, fence: u64) {
        let mut completed = self.completed.lock().unwrap();
        *completed = (*completed).max(fence);
        self.signal.notify_all();
    }

    pub fn completed(&self) -> u64 {
        *self.completed.lock().unwrap()
    }

    fn wait_for(&self, fence: u64) {
        let mut completed = self.completed.lock().unwrap();
        while *completed < fence {
            completed = self.signal.wait(completed).unwrap();
        }
    }
}

pub struct MockBackend {
    pub max_buffer_size: u64,
    auto_complete: bool,
    timeline: Arc<MockTimeline>,
    next_id: RefCell<u64>,
    next_fence: RefCell<u64>,
    contents: RefCell<HashMap<u64, Vec<u8>>>,
    ops: RefCell<Vec<MockOp>>,
}

impl MockBackend {
    /// A backend whose submissions finish immediately.
    pub fn new() -> Self {
        Self {
            max_buffer_size: 1 << 28,
            auto_complete: true,
            timeline: Arc::new(MockTimeline::default()),
            next_id: RefCell::new(0),
            next_fence: RefCell::new(0),
            contents: RefCell::new(HashMap::new()),
            ops: RefCell::new(Vec::new()),
        }
    }

    /// A backend whose submissions only finish through [`MockTimeline::complete`].
    pub fn manual() -> Self {
        Self {
            auto_complete: false,
            ..Self::new()
        }
    }

    pub fn timeline(&self) -> Arc<MockTimeline> {
        self.timeline.clone()
    }

    pub fn ops(&self) -> Vec<MockOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
    }

    pub fn count_ops(&self, matches: impl Fn(&MockOp) -> bool) -> usize {
        self.ops.borrow().iter().filter(|op| matches(*op)).count()
    }

    /// Buffers created and not yet destroyed.
    pub fn live_buffers(&self) -> usize {
        self.contents.borrow().len()
    }

    /// Bytes currently stored in a buffer.
    pub fn read(&self, buffer: &MockBuffer, offset: usize, len: usize) -> Vec<u8> {
        self.contents.borrow()[&buffer.id][offset..offset + len].to_vec()
    }

    fn allocate(&self, bytes: Vec<u8>) -> u64 {
        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        self.contents.borrow_mut().insert(*next_id, bytes);
        *next_id
    }

    fn log(&self, op: MockOp) {
        self.ops.borrow_mut().push(op);
    }
}

impl GpuBackend for MockBackend {
    type Buffer = MockBuffer;
    type Encoder = MockEncoder;
    type Fence = u64;
    type BindGroup = u64;
    type Texture = u64;

    fn create_buffer(
        &mut self,
        label: &'static str,
        size: u64,
        usage: BufferUsages,
    ) -> RenderResult<MockBuffer> {
        if size > self.max_buffer_size {
            return Err(crate::engine_state::error::RenderError::BufferTooLarge {
                label: label.to_string(),
                size,
                max: self.max_buffer_size,
            });
        }
        let id = self.allocate(vec![0; size as usize]);
        self.log(MockOp::CreateBuffer { id, label, size });
        Ok(MockBuffer { id, label, usage })
    }

    fn create_staging_buffer(
        &mut self,
        label: &'static str,
        contents: &[u8],
    ) -> RenderResult<MockBuffer> {
        let id = self.allocate(contents.to_vec());
        self.log(MockOp::CreateStaging {
            id,
            label,
            size: contents.len() as u64,
        });
        Ok(MockBuffer {
            id,
            label,
            usage: BufferUsages::COPY_SRC,
        })
    }

    fn write_buffer(&self, buffer: &MockBuffer, offset: u64, data: &[u8]) -> RenderResult<()> {
        let mut contents = self.contents.borrow_mut();
        let stored = contents.get_mut(&buffer.id).unwrap();
        check_write_bounds(buffer.label, offset, data.len() as u64, stored.len() as u64)?;
        let offset = offset as usize;
        stored[offset..offset + data.len()].copy_from_slice(data);
        drop(contents);
        self.log(MockOp::Write {
            buffer: buffer.id,
            offset: offset as u64,
            len: data.len() as u64,
        });
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: MockBuffer) {
        self.contents.borrow_mut().remove(&buffer.id);
        self.log(MockOp::DestroyBuffer(buffer.id));
    }

    fn destroy_bind_group(&mut self, bind_group: u64) {
        self.log(MockOp::DestroyBindGroup(bind_group));
    }

    fn destroy_texture(&mut self, texture: u64) {
        self.log(MockOp::DestroyTexture(texture));
    }

    fn create_encoder(&self, _label: &str) -> MockEncoder {
        MockEncoder::default()
    }

    fn copy_buffer_to_buffer(
        &self,
        encoder: &mut MockEncoder,
        source: &MockBuffer,
        destination: &MockBuffer,
        destination_offset: u64,
        size: u64,
    ) {
        let mut contents = self.contents.borrow_mut();
        let bytes = contents[&source.id][..size as usize].to_vec();
        let start = destination_offset as usize;
        contents.get_mut(&destination.id).unwrap()[start..start + bytes.len()]
            .copy_from_slice(&bytes);
        drop(contents);

        encoder.copies += 1;
        self.log(MockOp::Copy {
            source: source.id,
            destination: destination.id,
            destination_offset,
            size,
        });
    }

    fn submit(&self, encoder: MockEncoder) -> u64 {
        let mut next_fence = self.next_fence.borrow_mut();
        *next_fence += 1;
        let fence = *next_fence;
        self.log(MockOp::Submit {
            fence,
            copies: encoder.copies,
        });
        if self.auto_complete {
            self.timeline.complete(fence);
        }
        fence
    }

    fn wait(&self, fence: &u64) -> RenderResult<()> {
        self.log(MockOp::Wait(*fence));
        self.timeline.wait_for(*fence);
        Ok(())
    }
}
