//! Hand-off buffer for updated poses
//!
//! The simulation thread records the latest transform of every dynamic
//! object that moved; a consumer thread periodically swaps the whole map out
//! with [`ChangeBuffer::get_and_reset`]. Each change is delivered exactly
//! once, to whichever thread performs the next swap.

use std::collections::HashMap;
use std::mem;
use std::sync::Mutex;

use crate::transform::Transform;
use crate::ObjectId;

/// Last-writer-wins map of object id to its most recent transform
pub struct ChangeBuffer {
    latest: Mutex<HashMap<ObjectId, Transform>>,
}

impl ChangeBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(HashMap::new()),
        }
    }

    /// Record the latest transform for `id`, overwriting any prior entry
    pub fn record(&self, id: ObjectId, transform: Transform) {
        self.latest
            .lock()
            .expect("change buffer poisoned by a panicked thread")
            .insert(id, transform);
    }

    /// Drop any pending entry for `id`
    ///
    /// Called when an object is removed, so a pose recorded earlier in the
    /// same tick never outlives the object.
    pub fn forget(&self, id: ObjectId) {
        self.latest
            .lock()
            .expect("change buffer poisoned by a panicked thread")
            .remove(&id);
    }

    /// Atomically take all accumulated changes, leaving the buffer empty
    pub fn get_and_reset(&self) -> HashMap<ObjectId, Transform> {
        mem::take(
            &mut *self
                .latest
                .lock()
                .expect("change buffer poisoned by a panicked thread"),
        )
    }
}

impl Default for ChangeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
