//! Common types used throughout the tree.

mod node_id;

pub use node_id::NodeId;

use crate::error::{Result, TreeError};
use serde::{Deserialize, Serialize};

/// Smallest order that still yields a balanced tree (two keys per full node)
pub const MIN_ORDER: usize = 3;

/// Default order (visualization-friendly: four keys per node at most)
pub const DEFAULT_ORDER: usize = 5;

/// Tree configuration
///
/// The order is the maximum number of children a node may have. A node holds
/// between `floor((order - 1) / 2)` and `order - 1` keys; the root is exempt
/// from the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeConfig {
    /// Maximum number of children per node
    pub order: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
        }
    }
}

impl TreeConfig {
    /// Create a config with the given order
    pub fn new(order: usize) -> Self {
        Self { order }
    }

    /// Set the order
    pub fn order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Check that the order can form a B-tree
    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(TreeError::InvalidOrder {
                order: self.order,
                min: MIN_ORDER,
            });
        }
        Ok(())
    }

    /// Maximum keys per node
    pub fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// Minimum keys per non-root node
    ///
    /// This is also the index of the key promoted when a node splits.
    pub fn min_keys(&self) -> usize {
        (self.order - 1) / 2
    }

    /// Minimum children per internal non-root node
    pub fn min_children(&self) -> usize {
        self.min_keys() + 1
    }
}

/// Result of an insert
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was added
    Inserted,
    /// The key was already present; the tree is unchanged
    Duplicate,
}

impl InsertOutcome {
    /// Whether the tree changed
    pub fn is_inserted(self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Result of a remove
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The key was removed
    Removed,
    /// The key was not in the tree; the tree is unchanged
    NotPresent,
}

impl RemoveOutcome {
    /// Whether the tree changed
    pub fn is_removed(self) -> bool {
        matches!(self, Self::Removed)
    }
}
