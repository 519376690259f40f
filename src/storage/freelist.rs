//! Free list management.
//!
//! Tracks released node slots so the arena can reuse them before growing.

use crate::types::NodeId;
use std::collections::VecDeque;

/// Manages free node slots for reuse
#[derive(Debug, Default)]
pub struct FreeList {
    /// Queue of free node ids
    slots: VecDeque<NodeId>,
}

impl FreeList {
    /// Create a new empty free list
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
        }
    }

    /// Add a slot to the free list
    pub fn push(&mut self, id: NodeId) {
        self.slots.push_back(id);
    }

    /// Get a free slot, if available
    pub fn pop(&mut self) -> Option<NodeId> {
        self.slots.pop_front()
    }

    /// Get the number of free slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the free list is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget every free slot
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
