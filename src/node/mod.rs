//! Node layer: a single B-tree node and its key-local operations.
//!
//! A node holds:
//! - Keys in strictly ascending order
//! - Child ids (empty for a leaf, `keys.len() + 1` entries otherwise)
//! - A parent id used only for sibling lookup and upward propagation
//!
//! Operations that need to look at other nodes (siblings, descendants,
//! reparenting) live on [`NodeArena`](crate::storage::NodeArena).

use crate::types::NodeId;

/// A node in the B-tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<K> Node<K> {
    /// Create an empty node with no parent
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Create a leaf holding a single key
    pub fn leaf(key: K, parent: Option<NodeId>) -> Self {
        Self {
            keys: vec![key],
            children: Vec::new(),
            parent,
        }
    }

    /// Create a node from already ordered parts
    pub(crate) fn from_parts(keys: Vec<K>, children: Vec<NodeId>, parent: Option<NodeId>) -> Self {
        Self {
            keys,
            children,
            parent,
        }
    }

    /// Keys in ascending order
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Child ids in key order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of keys
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

impl<K: Ord> Node<K> {
    /// Insert a key at its sorted position.
    ///
    /// Does not check for duplicates.
    pub fn insert_sorted(&mut self, key: K) {
        let idx = match self.keys.binary_search(&key) {
            Ok(idx) | Err(idx) => idx,
        };
        self.keys.insert(idx, key);
    }

    /// Remove a key, returning it if it was present
    pub fn remove_key(&mut self, key: &K) -> Option<K> {
        match self.keys.binary_search(key) {
            Ok(idx) => Some(self.keys.remove(idx)),
            Err(_) => None,
        }
    }

    /// Check whether the node holds a key
    pub fn contains_key(&self, key: &K) -> bool {
        self.keys.binary_search(key).is_ok()
    }

    /// Position of a key, or `keys.len()` if absent
    pub fn key_index(&self, key: &K) -> usize {
        self.keys.binary_search(key).unwrap_or(self.keys.len())
    }

    /// Locate a key in this node.
    ///
    /// Returns `Ok(index)` if the key is here, otherwise `Err(child)` where
    /// `child` is the first index whose key is greater, i.e. the child
    /// subtree that would hold the key.
    pub fn search(&self, key: &K) -> Result<usize, usize> {
        self.keys.binary_search(key)
    }
}

impl<K> Default for Node<K> {
    fn default() -> Self {
        Self::new()
    }
}
