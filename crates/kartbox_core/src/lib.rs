//! Game integration layer for kartbox
//!
//! Thin plumbing around the concurrent physics world:
//!
//! - [`Renderer`] - the seam a drawing backend plugs into
//! - [`Game`] - id allocation and fan-out of object lifecycle to both the
//!   physics world and the renderer
//!
//! This crate only calls thread-safe world operations, since it is driven
//! by external threads (scripting, UI).

mod game;
mod renderer;

pub use game::{Game, GROUND_ID};
pub use renderer::{NullRenderer, Renderer};

// Re-export physics types for convenient access through kartbox_core
pub use kartbox_physics::{ObjectId, PhysicsWorld, Status, Transform, WorldConfig};
