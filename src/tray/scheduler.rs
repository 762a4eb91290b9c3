//! Deferred execution of click handlers.
//!
//! Handlers never run inside the native callback. They are handed to a
//! [`Scheduler`] which runs them later, in the order they were scheduled.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Mutex, PoisonError};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send>;

/// Runs tasks on a later cooperative turn, in FIFO order.
pub trait Scheduler: Send + Sync + 'static {
    fn schedule(&self, task: Task);
}

/// Queue drained by its owner, e.g. once per frame from a Godot `process` callback.
pub struct DeferredQueue {
    sender: Sender<Task>,
    receiver: Mutex<Receiver<Task>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Runs every task queued so far and returns how many ran.
    ///
    /// Tasks scheduled while draining wait for the next call.
    pub fn run_pending(&self) -> usize {
        let tasks: Vec<Task> = {
            let receiver = self.receiver.lock().unwrap_or_else(PoisonError::into_inner);
            receiver.try_iter().collect()
        };

        let count = tasks.len();
        for task in tasks {
            run_task(task);
        }
        count
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for DeferredQueue {
    fn schedule(&self, task: Task) {
        // The receiver lives in the same struct, so sending cannot fail.
        let _ = self.sender.send(task);
    }
}

/// Runs tasks one at a time on a dedicated task of a tokio runtime.
pub struct TokioScheduler {
    sender: UnboundedSender<Task>,
}

impl TokioScheduler {
    /// Spawns the dispatcher task on `handle`.
    pub fn spawn(handle: &Handle) -> Self {
        let (sender, mut receiver) = unbounded_channel::<Task>();
        handle.spawn(async move {
            while let Some(task) = receiver.recv().await {
                run_task(task);
            }
        });
        Self { sender }
    }

    /// Spawns the dispatcher task on the runtime of the current context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::spawn(&Handle::current())
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, task: Task) {
        if self.sender.send(task).is_err() {
            tracing::warn!("tray click dispatcher stopped; dropping click handler");
        }
    }
}

fn run_task(task: Task) {
    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
        tracing::error!("tray click handler panicked");
    }
}
