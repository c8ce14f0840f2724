//! Renderer seam
//!
//! The physics side never draws; it only tells a renderer which objects
//! exist and where they are. Real backends own their draw resources and
//! window lifecycle elsewhere.

use kartbox_physics::{ObjectId, Transform};

/// What the game layer needs from a drawing backend
pub trait Renderer {
    /// A new object appeared at the given pose
    fn add(&mut self, id: ObjectId, transform: Transform);
    /// An existing object moved
    fn set_transform(&mut self, id: ObjectId, transform: Transform);
    /// An object is gone
    fn remove(&mut self, id: ObjectId);
}

/// Renderer that draws nothing; used by headless drivers and tests
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn add(&mut self, _id: ObjectId, _transform: Transform) {}
    fn set_transform(&mut self, _id: ObjectId, _transform: Transform) {}
    fn remove(&mut self, _id: ObjectId) {}
}
