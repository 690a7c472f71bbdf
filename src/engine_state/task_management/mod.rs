//! # Task Management System
//!
//! Runs CPU-bound work, such as chunk meshing, on a pool of worker threads.
//!
//! ## Architecture Overview
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work with a typed output
//! - `TaskChannel`: Communication channel between the main thread and one worker
//!
//! Each worker owns a dedicated pair of channels. Tasks are handed out round-robin
//! and a worker never holds more than [`MAX_TASKS_IN_FLIGHT`] at once; the rest wait
//! in a FIFO queue on the main thread.
//!
//! With zero workers every task runs on the calling thread inside
//! `process_queued_tasks`, which keeps the same call sequence usable in tests and on
//! single-core targets.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager sends each to an available worker or queues it
//! 3. Workers process tasks and send back their outputs
//! 4. Outputs are collected on the main thread in `process_completed_tasks()`
//!
//! ## Example Usage
//! ```
//! use voxel_render_core::engine_state::task_management::{task::Task, TaskManager};
//!
//! struct Square(u64);
//!
//! impl Task for Square {
//!     type Output = u64;
//!     fn process(self) -> u64 {
//!         self.0 * self.0
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(2);
//! let mut outputs = task_manager
//!     .run_to_completion((1..=4).map(Square))
//!     .unwrap();
//! outputs.sort();
//! assert_eq!(outputs, vec![1, 4, 9, 16]);
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use super::error::{RenderError, RenderResult};
use task::Task;

/// A communication channel between the main thread and a worker thread.
#[derive(Debug)]
pub struct TaskChannel<T: Task> {
    task_sender: Sender<T>,
    result_receiver: Receiver<T::Output>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Dropping the manager closes every task channel and joins the workers.
pub struct TaskManager<T: Task> {
    channels: Vec<TaskChannel<T>>,
    queued_tasks: VecDeque<T>,
    completed_inline: Vec<T::Output>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl<T: Task> TaskManager<T> {
    /// Creates a new `TaskManager` with `num_workers` worker threads.
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<T>();
            let (result_tx, result_rx) = channel::<T::Output>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    if result_tx.send(task.process()).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::spawn(task_closure);

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker,
            });
        }

        info!(
            "Task manager started {} workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            completed_inline: Vec::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// The task back if the worker has disconnected.
    fn try_send_task(&mut self, task: T, channel_idx: usize) -> Result<(), T> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: T) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    warn!("Worker {} disconnected; task queued", channel_idx);
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers that have room, oldest first.
    ///
    /// Without workers, runs every queued task on the calling thread.
    pub fn process_queued_tasks(&mut self) {
        if self.channels.is_empty() {
            while let Some(task) = self.queued_tasks.pop_front() {
                self.completed_inline.push(task.process());
            }
            return;
        }

        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Collects every output that is ready, without blocking, and refills idle
    /// workers from the queue.
    pub fn process_completed_tasks(&mut self) -> Vec<T::Output> {
        let mut outputs = std::mem::take(&mut self.completed_inline);
        for channel in &mut self.channels {
            while let Ok(output) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                outputs.push(output);
            }
        }
        self.process_queued_tasks();
        outputs
    }

    /// Blocks until at least one in-flight task of each busy worker has finished.
    ///
    /// # Errors
    /// `RenderError::WorkerDisconnected` if a busy worker has exited, which happens
    /// when a task panics.
    pub fn wait_for_completed_tasks(&mut self) -> RenderResult<Vec<T::Output>> {
        let mut outputs = std::mem::take(&mut self.completed_inline);
        for (channel_idx, channel) in self.channels.iter_mut().enumerate() {
            if channel.num_tasks_in_flight == 0 {
                continue;
            }
            let output = channel
                .result_receiver
                .recv()
                .map_err(|_| RenderError::WorkerDisconnected(channel_idx))?;
            channel.num_tasks_in_flight -= 1;
            outputs.push(output);
            while let Ok(output) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                outputs.push(output);
            }
        }
        self.process_queued_tasks();
        Ok(outputs)
    }

    /// Runs `tasks` and blocks until every one has produced its output.
    ///
    /// Outputs arrive in completion order, not publication order.
    pub fn run_to_completion(
        &mut self,
        tasks: impl IntoIterator<Item = T>,
    ) -> RenderResult<Vec<T::Output>> {
        for task in tasks {
            self.publish_task(task);
        }
        self.process_queued_tasks();

        let mut outputs = Vec::new();
        while !self.is_idle() {
            if self.tasks_in_flight() == 0 {
                // Tasks are queued but no worker accepted them.
                return Err(RenderError::WorkerDisconnected(self.current_channel));
            }
            outputs.extend(self.wait_for_completed_tasks()?);
        }
        outputs.extend(std::mem::take(&mut self.completed_inline));
        debug!("Task batch finished with {} outputs", outputs.len());
        Ok(outputs)
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Tasks currently held by workers.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }

    /// Tasks waiting for a worker.
    pub fn queued_tasks(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Whether no task is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.tasks_in_flight() == 0
    }
}

impl<T: Task> Drop for TaskManager<T> {
    fn drop(&mut self) {
        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender,
                result_receiver,
                worker,
                ..
            } = channel;
            drop(task_sender);
            drop(result_receiver);
            if worker.join().is_err() {
                warn!("A task worker panicked");
            }
        }
    }
}
