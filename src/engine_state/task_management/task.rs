//! # Task System Core Trait
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The output is sent back and collected on the main thread by
//!    `TaskManager::process_completed_tasks()`
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - The output must be `Send` to be transferred back to the main thread
//! - Shared inputs are held through `MtResource` or `Arc`

/// A unit of work that can be executed on a worker thread.
///
/// Tasks should own everything they need. Holding references to data that might be
/// modified elsewhere is not possible, since tasks must be `'static`.
pub trait Task: Send + 'static {
    /// What the task produces.
    type Output: Send + 'static;

    /// Performs the work.
    ///
    /// Runs on a background thread, or on the calling thread when the manager has no
    /// workers.
    fn process(self) -> Self::Output;
}
