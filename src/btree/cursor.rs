//! B-tree cursor for in-order traversal.
//!
//! The cursor walks every key of the tree in ascending order. It maintains a
//! stack of (node_id, key_index) pairs representing the path to the next key,
//! so the walk never recurses.

use crate::storage::NodeArena;
use crate::types::NodeId;

/// An in-order cursor over all keys of a tree
pub(crate) struct Cursor<'a, K> {
    /// The arena holding the nodes
    arena: &'a NodeArena<K>,
    /// Path to the next key: node and index of its next key to yield
    stack: Vec<(NodeId, usize)>,
}

impl<'a, K> Cursor<'a, K> {
    /// Create a cursor positioned at the smallest key
    pub(crate) fn new(arena: &'a NodeArena<K>, root: Option<NodeId>) -> Self {
        let mut cursor = Self {
            arena,
            stack: Vec::new(),
        };
        if let Some(root) = root {
            cursor.descend_to_leftmost(root);
        }
        cursor
    }

    /// Push the path from `id` down to its leftmost leaf
    fn descend_to_leftmost(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(id) = current {
            self.stack.push((id, 0));
            current = self.arena[id].children().first().copied();
        }
    }
}

impl<'a, K> Iterator for Cursor<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let arena = self.arena;

        loop {
            let (id, idx) = self.stack.last_mut()?;
            let node = &arena[*id];

            if *idx < node.keys().len() {
                let key = &node.keys()[*idx];
                *idx += 1;
                // The subtree right of this key comes before the next key
                if let Some(&child) = node.children().get(*idx) {
                    self.descend_to_leftmost(child);
                }
                return Some(key);
            }

            self.stack.pop();
        }
    }
}
