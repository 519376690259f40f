//! # BTree Core
//!
//! An in-memory B-tree of unique, ordered keys.
//!
//! ## Architecture
//!
//! The crate is composed of small layers:
//!
//! - **Node Layer** (`node`): a single node's keys, children and parent link
//! - **Storage Layer** (`storage`): node arena with slot recycling
//! - **B-Tree Layer** (`btree`): insert/find/remove with split, borrow and
//!   merge fixups, plus diagnostics, validation and rendering
//!
//! Nodes live in an arena owned by the tree and are addressed by
//! [`NodeId`]. Child lists are the ownership hierarchy; parent ids are plain
//! lookups used for sibling discovery and upward propagation. Fixups are
//! loops, so deep trees never exhaust the call stack.
//!
//! ## Usage
//!
//! ```rust
//! use btree_core::{BTree, InsertOutcome, RemoveOutcome};
//!
//! let mut tree = BTree::new(5)?;
//!
//! for key in [5, 7, 8, 3, 2] {
//!     assert_eq!(tree.insert(key), InsertOutcome::Inserted);
//! }
//! assert_eq!(tree.insert(5), InsertOutcome::Duplicate);
//!
//! assert!(tree.contains(&8));
//! assert_eq!(tree.remove(&100), RemoveOutcome::NotPresent);
//! assert_eq!(tree.height(), 2);
//!
//! println!("{}", tree);
//! println!("{}", tree.stats());
//! # Ok::<(), btree_core::TreeError>(())
//! ```

pub mod btree;
pub mod error;
pub mod node;
pub mod storage;
pub mod types;

pub use error::{Result, TreeError};
pub use types::{InsertOutcome, NodeId, RemoveOutcome, TreeConfig, DEFAULT_ORDER, MIN_ORDER};

// Re-export main public API
pub use btree::{BTree, TreeStats};
pub use node::Node;

use serde::{Deserialize, Serialize};

/// Node type for visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Arena slot of the node
    pub node_id: u32,
    /// Whether this is a leaf node
    pub is_leaf: bool,
    /// Keys in this node
    pub keys: Vec<String>,
    /// Child nodes (only for interior nodes)
    pub children: Vec<TreeNode>,
}

impl<K: ToString> BTree<K> {
    /// Export the tree structure for visualization
    pub fn export(&self) -> Option<TreeNode> {
        self.root.map(|root| self.export_node(root))
    }

    fn export_node(&self, id: NodeId) -> TreeNode {
        let node = &self.arena[id];
        TreeNode {
            node_id: id.value(),
            is_leaf: node.is_leaf(),
            keys: node.keys().iter().map(ToString::to_string).collect(),
            children: node
                .children()
                .iter()
                .map(|&child| self.export_node(child))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() -> Result<()> {
        let mut tree = BTree::new(DEFAULT_ORDER)?;

        // Test insert and find
        assert_eq!(tree.insert(1), InsertOutcome::Inserted);
        assert!(tree.contains(&1));

        // Test duplicate
        assert_eq!(tree.insert(1), InsertOutcome::Duplicate);
        assert_eq!(tree.key_count(), 1);

        // Test remove
        assert_eq!(tree.remove(&1), RemoveOutcome::Removed);
        assert!(!tree.contains(&1));

        // Test non-existent key
        assert_eq!(tree.remove(&1), RemoveOutcome::NotPresent);
        assert!(tree.is_empty());

        Ok(())
    }

    #[test]
    fn test_export_tree() -> Result<()> {
        let mut tree = BTree::with_config(TreeConfig::default())?;
        assert_eq!(tree.export(), None);

        for key in [5, 7, 8, 3, 2] {
            let _ = tree.insert(key);
        }

        let exported = tree.export().unwrap();
        assert!(!exported.is_leaf);
        assert_eq!(exported.keys, vec!["5"]);
        assert_eq!(exported.children.len(), 2);
        assert_eq!(exported.children[0].keys, vec!["2", "3"]);
        assert_eq!(exported.children[1].keys, vec!["7", "8"]);
        assert!(exported.children.iter().all(|child| child.is_leaf));

        let json = serde_json::to_value(&exported).unwrap();
        assert_eq!(json["isLeaf"], false);
        assert_eq!(json["children"][1]["keys"][0], "7");

        Ok(())
    }

    #[test]
    fn test_generic_accessors() -> Result<()> {
        let mut tree = BTree::new(5)?;
        for key in [5, 7, 8, 3, 2] {
            let _ = tree.insert(key);
        }

        let root = tree.root_id().unwrap();
        let root_node = tree.node(root).unwrap();
        assert_eq!(root_node.keys(), &[5]);
        assert_eq!(root_node.parent(), None);
        for &child in root_node.children() {
            assert_eq!(tree.node(child).unwrap().parent(), Some(root));
        }

        Ok(())
    }
}
