//! Read-only diagnostics computed by walking the tree.

use crate::btree::BTree;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Tree statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    /// Maximum children per node
    pub order: usize,
    /// Number of levels, 0 for an empty tree
    pub height: usize,
    /// Number of nodes
    pub node_count: usize,
    /// Number of stored keys
    pub key_count: usize,
    /// Stored keys as a percentage of total key capacity
    pub fullness: f64,
}

impl<K> BTree<K> {
    /// Visit every node breadth-first
    fn for_each_node(&self, mut visit: impl FnMut(NodeId)) {
        let Some(root) = self.root else {
            return;
        };

        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            visit(id);
            queue.extend(self.arena[id].children().iter().copied());
        }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.for_each_node(|_| count += 1);
        count
    }

    /// Number of keys
    pub fn key_count(&self) -> usize {
        let mut count = 0;
        self.for_each_node(|id| count += self.arena[id].key_count());
        count
    }

    /// Number of levels; all leaves sit at the same depth
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(id) = current {
            height += 1;
            current = self.arena[id].children().first().copied();
        }
        height
    }

    /// Stored keys as a percentage of `node_count * (order - 1)`
    pub fn fullness_percent(&self) -> f64 {
        let capacity = self.node_count() * self.max_keys();
        if capacity == 0 {
            return 0.0;
        }
        self.key_count() as f64 / capacity as f64 * 100.0
    }

    /// Collect all diagnostics at once
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            order: self.order(),
            height: self.height(),
            node_count: self.node_count(),
            key_count: self.key_count(),
            fullness: self.fullness_percent(),
        }
    }

    /// All keys in ascending order
    pub fn keys(&self) -> Vec<&K> {
        crate::btree::cursor::Cursor::new(&self.arena, self.root).collect()
    }
}
