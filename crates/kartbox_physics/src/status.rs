//! Lifecycle state of the simulation thread
//!
//! The thread is driven by a single atomic tri-state flag. All transitions
//! go through compare-and-swap so two threads can never both spawn a ticker,
//! and `stop()` stays idempotent even when called mid-shutdown:
//!
//! ```text
//! Idle -> Running    run() spawns the thread
//! Running -> Stopping    stop() requests shutdown
//! Stopping -> Idle    the thread itself, just before exiting
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPING: u8 = 2;

/// Lifecycle state of the simulation thread
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// No thread; the world may be stepped synchronously
    Idle,
    /// The background thread is ticking
    Running,
    /// Shutdown requested; the thread is finishing its current iteration
    Stopping,
}

/// Outcome of an attempted `Idle -> Running` transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StartAttempt {
    /// We won the transition; the caller must spawn the thread
    Started,
    /// A thread is already ticking; nothing to do
    AlreadyRunning,
    /// A stop is in flight; wait for it, then try again
    StopInFlight,
}

/// Atomic cell holding a [`Status`], with the three sanctioned transitions
pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub fn new() -> Self {
        Self(AtomicU8::new(IDLE))
    }

    pub fn load(&self) -> Status {
        match self.0.load(Ordering::Acquire) {
            IDLE => Status::Idle,
            RUNNING => Status::Running,
            STOPPING => Status::Stopping,
            other => unreachable!("corrupt status value {other}"),
        }
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire) == RUNNING
    }

    /// Attempt `Idle -> Running`
    pub fn try_start(&self) -> StartAttempt {
        match self
            .0
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => StartAttempt::Started,
            Err(RUNNING) => StartAttempt::AlreadyRunning,
            Err(_) => StartAttempt::StopInFlight,
        }
    }

    /// Attempt `Running -> Stopping`; harmless if a stop is already in flight
    pub fn request_stop(&self) {
        let _ = self
            .0
            .compare_exchange(RUNNING, STOPPING, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Perform `Stopping -> Idle`; called by the thread just before it exits
    ///
    /// Failure means the state machine was bypassed, which the concurrency
    /// contract rules out. Not recoverable.
    pub fn finish_stop(&self) {
        self.0
            .compare_exchange(STOPPING, IDLE, Ordering::AcqRel, Ordering::Acquire)
            .expect("simulation thread exited without a stop request");
    }
}
