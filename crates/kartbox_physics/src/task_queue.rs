//! Concurrent buffer for deferred mutations
//!
//! Any thread appends tasks with [`TaskQueue::add`]; the simulation thread
//! drains them once per tick with [`TaskQueue::run`]. Tasks receive exclusive
//! access to the state they mutate, so nothing outside the draining thread
//! ever touches it.

use std::mem;
use std::sync::Mutex;

/// A deferred action, capturing its parameters by value at enqueue time
pub type Task<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Thread-safe FIFO of deferred calls against a state value of type `S`
pub struct TaskQueue<S> {
    pending: Mutex<Vec<Task<S>>>,
}

impl<S> TaskQueue<S> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Append a task; callable from any thread, never blocks on execution
    pub fn add(&self, task: impl FnOnce(&mut S) + Send + 'static) {
        self.pending
            .lock()
            .expect("task queue poisoned by a panicked thread")
            .push(Box::new(task));
    }

    /// Drain and execute all pending tasks in enqueue order
    ///
    /// The whole buffer is swapped out under the lock, then executed with no
    /// lock held. A task is therefore free to call [`TaskQueue::add`] on the
    /// same queue; such re-entrant tasks land in the *next* drain, one tick
    /// later.
    pub fn run(&self, state: &mut S) {
        let drained = mem::take(
            &mut *self
                .pending
                .lock()
                .expect("task queue poisoned by a panicked thread"),
        );
        for task in drained {
            task(state);
        }
    }

    /// Number of tasks waiting for the next drain
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .expect("task queue poisoned by a panicked thread")
            .len()
    }

    /// Whether no tasks are waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> Default for TaskQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}
