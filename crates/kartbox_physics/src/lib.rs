//! Concurrent physics world for kartbox
//!
//! This crate owns the only subsystem with real concurrency: a rigid body
//! world advanced on a background tick thread while other threads request
//! mutations and observe results. The pieces:
//!
//! - [`TaskQueue`] - thread-safe deferred-call buffer; mutations never touch
//!   the solver directly
//! - [`ChangeBuffer`] - last-writer-wins hand-off of updated poses from the
//!   simulation thread to a consumer thread
//! - [`Status`] - the `Idle`/`Running`/`Stopping` lifecycle of the tick thread
//! - [`PhysicsWorld`] - the public facade composing the above around the
//!   rapier3d solver
//!
//! Object handles ([`ObjectId`]) are assigned by the owning game layer; the
//! world never recycles them on its own.

pub mod changes;
pub mod status;
pub mod task_queue;
pub mod transform;
pub mod world;

mod object;
mod simulation;

pub use changes::ChangeBuffer;
pub use status::Status;
pub use task_queue::{Task, TaskQueue};
pub use transform::{matrix_from_pose, pose_from_matrix, translation, translation_of, Transform};
pub use world::{PhysicsWorld, WorldConfig, TICK_SECONDS};

/// Opaque handle for an object in the world, assigned by the game layer
pub type ObjectId = u64;
