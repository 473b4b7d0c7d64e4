//! Identifiers for scene objects and frame callbacks.

use serde::{Deserialize, Serialize};

/// Index of a scene object in traversal order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Ticket for one scheduled frame callback. Only the most recently issued
/// token of the current run is honored by the render loop.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FrameToken {
    pub generation: u64,
    pub frame: u64,
}

/// Monotonic allocator for ObjectId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_object: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_object(&mut self) -> ObjectId {
        let id = ObjectId(self.next_object);
        self.next_object = self.next_object.wrapping_add(1);
        id
    }
}
