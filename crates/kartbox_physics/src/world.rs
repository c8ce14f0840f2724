//! The public physics world facade
//!
//! [`PhysicsWorld`] is safe to share across threads. Mutating calls enqueue
//! tasks instead of touching the solver, so the solver is only ever driven
//! by one thread: the background ticker while running, or the caller inside
//! [`PhysicsWorld::single_step`] while idle. Each tick drains the task
//! queue, advances the solver by one fixed step, and hands updated poses to
//! the change buffer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rapier3d::math::Real;

use crate::changes::ChangeBuffer;
use crate::simulation::Simulation;
use crate::status::{StartAttempt, Status, StatusCell};
use crate::task_queue::TaskQueue;
use crate::transform::Transform;
use crate::ObjectId;

/// Fixed simulation timestep in seconds
pub const TICK_SECONDS: Real = 1.0 / 60.0;

/// Wall-clock period of one tick
const TICK_PERIOD: Duration = Duration::from_nanos(1_000_000_000 / 60);

const POISONED: &str = "physics state poisoned by a panicked thread";

/// Configuration for the physics world
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Gravity acceleration along Y (negative = down)
    pub gravity: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { gravity: -10.0 }
    }
}

impl WorldConfig {
    /// Create a config with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

/// State shared between the facade and the tick thread
struct Shared {
    status: StatusCell,
    tasks: TaskQueue<Simulation>,
    changes: Arc<ChangeBuffer>,
    simulation: Mutex<Simulation>,
}

/// A scene of rigid boxes and vehicles advanced on a background tick thread
pub struct PhysicsWorld {
    shared: Arc<Shared>,
    /// Join handle of the ticker. The mutex also serializes `run`/`stop`,
    /// so every `stop` caller blocks until the thread has really exited.
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl PhysicsWorld {
    /// Create a world with default configuration
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Create a world with custom configuration
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                status: StatusCell::new(),
                tasks: TaskQueue::new(),
                changes: Arc::new(ChangeBuffer::new()),
                simulation: Mutex::new(Simulation::new(&config)),
            }),
            ticker: Mutex::new(None),
        }
    }

    /// Queue insertion of a box
    ///
    /// `mass` 0 makes the box an immovable static that never reports pose
    /// changes. Reusing a live `id` without removing it first is a caller
    /// error (documented precondition, not enforced).
    pub fn add_box(&self, id: ObjectId, transform: Transform, mass: f32, half_extents: [f32; 3]) {
        self.shared.tasks.add(move |simulation: &mut Simulation| {
            simulation.add_box(id, &transform, mass, half_extents);
        });
    }

    /// Queue insertion of a four-wheeled vehicle
    pub fn add_vehicle(&self, id: ObjectId, transform: Transform) {
        self.shared.tasks.add(move |simulation: &mut Simulation| {
            simulation.add_vehicle(id, &transform);
        });
    }

    /// Queue removal of an object; unknown ids are silently ignored
    ///
    /// Removal also purges any pose change recorded for the object earlier
    /// in the same tick, so a removed object never appears in a later
    /// [`PhysicsWorld::get_and_reset_changes`] result.
    pub fn remove(&self, id: ObjectId) {
        let changes = Arc::clone(&self.shared.changes);
        self.shared.tasks.add(move |simulation: &mut Simulation| {
            changes.forget(id);
            simulation.remove(id);
        });
    }

    /// Queue switching a vehicle's rear-wheel engine force on or off
    pub fn set_engine_force(&self, id: ObjectId, active: bool) {
        self.shared.tasks.add(move |simulation: &mut Simulation| {
            simulation.set_engine_force(id, active);
        });
    }

    /// Queue setting a vehicle's front-wheel steering value
    pub fn set_steering(&self, id: ObjectId, value: f32) {
        self.shared.tasks.add(move |simulation: &mut Simulation| {
            simulation.set_steering(id, value);
        });
    }

    /// Take all pose changes accumulated since the previous call
    ///
    /// Callable from any thread; each change is delivered exactly once, to
    /// whichever thread calls this next.
    pub fn get_and_reset_changes(&self) -> HashMap<ObjectId, Transform> {
        self.shared.changes.get_and_reset()
    }

    /// Current lifecycle status of the simulation thread
    pub fn status(&self) -> Status {
        self.shared.status.load()
    }

    /// Drain pending tasks and advance one fixed step on the caller's thread
    ///
    /// # Panics
    ///
    /// Panics unless the status is [`Status::Idle`] - stepping while the
    /// background thread runs would mean two threads driving the solver.
    pub fn single_step(&self) {
        assert_eq!(
            self.shared.status.load(),
            Status::Idle,
            "single_step requires a stopped simulation"
        );
        let mut simulation = self.shared.simulation.lock().expect(POISONED);
        self.shared.tasks.run(&mut simulation);
        simulation.step(self.shared.changes.as_ref());
    }

    /// Start the background tick thread
    ///
    /// No-op if already running. If a stop is in flight, waits for it to
    /// complete first; the outcome is always "running".
    pub fn run(&self) {
        let mut ticker = self.ticker.lock().expect(POISONED);
        loop {
            match self.shared.status.try_start() {
                StartAttempt::AlreadyRunning => return,
                StartAttempt::StopInFlight => {
                    if let Some(handle) = ticker.take() {
                        handle.join().expect("simulation thread panicked");
                    } else {
                        thread::yield_now();
                    }
                }
                StartAttempt::Started => break,
            }
        }

        let shared = Arc::clone(&self.shared);
        let handle = thread::Builder::new()
            .name("kartbox-tick".into())
            .spawn(move || tick_loop(shared))
            .expect("failed to spawn simulation thread");
        *ticker = Some(handle);
        log::debug!("simulation thread started");
    }

    /// Stop the background tick thread and wait for it to exit
    ///
    /// Safe to call from any thread, including concurrently with other
    /// `stop` or `run` calls; every caller returns only after the thread is
    /// gone. No-op while idle.
    pub fn stop(&self) {
        let mut ticker = self.ticker.lock().expect(POISONED);
        self.shared.status.request_stop();
        if let Some(handle) = ticker.take() {
            handle.join().expect("simulation thread panicked");
            log::debug!("simulation thread stopped");
        }
    }

    /// Diagnostic listing of every live object, for manual inspection only
    pub fn debug_dump(&self) -> String {
        self.shared.simulation.lock().expect(POISONED).debug_dump()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PhysicsWorld {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of the background tick thread
///
/// Each iteration drains the task queue, steps the solver once, then sleeps
/// out the remainder of the tick period. An overlong step is not caught up:
/// the next iteration simply starts immediately, and simulation time falls
/// behind wall-clock time under load.
fn tick_loop(shared: Arc<Shared>) {
    while shared.status.is_running() {
        let tick_started = Instant::now();
        {
            let mut simulation = shared.simulation.lock().expect(POISONED);
            shared.tasks.run(&mut simulation);
            simulation.step(shared.changes.as_ref());
        }
        if let Some(remaining) = TICK_PERIOD.checked_sub(tick_started.elapsed()) {
            thread::sleep(remaining);
        }
    }
    shared.status.finish_stop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::translation;

    #[test]
    fn test_mutations_wait_for_a_tick() {
        let world = PhysicsWorld::new();
        world.add_box(1, translation(0.0, 5.0, 0.0), 1.0, [1.0, 1.0, 1.0]);

        // Nothing applied yet: the task is still queued
        assert!(world.debug_dump().contains("0 objects"));

        world.single_step();
        assert!(world.debug_dump().contains("#1 box"));
    }

    #[test]
    fn test_tasks_apply_in_submission_order() {
        let world = PhysicsWorld::new();
        // The later mutations only work if the earlier insertion has been
        // applied by the time they run
        world.add_vehicle(7, translation(0.0, 2.0, 0.0));
        world.set_engine_force(7, true);
        world.set_steering(7, 0.3);
        world.single_step();

        let simulation = world.shared.simulation.lock().unwrap();
        assert!(simulation.rear_engine_force(7).unwrap() > 0.0);
        assert_eq!(simulation.front_steering(7), Some(0.3));
    }

    #[test]
    fn test_add_then_remove_before_any_step() {
        let world = PhysicsWorld::new();
        world.add_box(1, translation(0.0, 15.0, 0.0), 1.0, [1.0, 1.0, 1.0]);
        world.remove(1);
        world.single_step();

        assert!(!world.shared.simulation.lock().unwrap().contains(1));
        assert!(!world.get_and_reset_changes().contains_key(&1));
    }

    #[test]
    fn test_run_twice_then_stop() {
        let world = PhysicsWorld::new();
        world.run();
        world.run();
        assert_eq!(world.status(), Status::Running);

        world.stop();
        assert_eq!(world.status(), Status::Idle);
    }

    #[test]
    fn test_stop_without_run_is_a_noop() {
        let world = PhysicsWorld::new();
        world.stop();
        assert_eq!(world.status(), Status::Idle);
    }

    #[test]
    fn test_run_after_stop_restarts() {
        let world = PhysicsWorld::new();
        world.run();
        world.stop();
        world.run();
        assert_eq!(world.status(), Status::Running);
        world.stop();
    }

    #[test]
    #[should_panic(expected = "single_step requires a stopped simulation")]
    fn test_single_step_while_running_is_fatal() {
        let world = PhysicsWorld::new();
        world.run();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            world.single_step();
        }));
        // Shut the thread down before re-raising, so the test process does
        // not leak a ticker
        world.stop();
        if let Err(payload) = result {
            std::panic::resume_unwind(payload);
        }
    }
}
