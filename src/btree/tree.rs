//! B-tree core implementation.
//!
//! This module provides the main BTree struct with operations for:
//! - insert: Sorted insertion with split-on-overflow
//! - contains: Point lookups
//! - remove: Removal with borrow/merge rebalancing
//!
//! Both fixup passes walk upward with an explicit current node id instead
//! of recursing, so the call stack never grows with tree height.

use crate::error::Result;
use crate::node::Node;
use crate::storage::NodeArena;
use crate::types::{InsertOutcome, NodeId, RemoveOutcome, TreeConfig};
use log::{debug, trace};
use std::mem;

/// An in-memory B-tree of unique keys
#[derive(Debug)]
pub struct BTree<K> {
    /// Storage for every node of the tree
    pub(crate) arena: NodeArena<K>,
    /// Root node (`None` means empty tree)
    pub(crate) root: Option<NodeId>,
    /// Order and derived node limits
    pub(crate) config: TreeConfig,
}

impl<K> BTree<K> {
    /// Create an empty tree of the given order.
    ///
    /// Fails with [`TreeError::InvalidOrder`](crate::TreeError::InvalidOrder)
    /// when `order < 3`.
    pub fn new(order: usize) -> Result<Self> {
        Self::with_config(TreeConfig::new(order))
    }

    /// Create an empty tree from a config
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            arena: NodeArena::new(),
            root: None,
            config,
        })
    }

    /// Get the tree configuration
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Maximum number of children per node
    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Maximum keys per node
    pub fn max_keys(&self) -> usize {
        self.config.max_keys()
    }

    /// Minimum keys per non-root node
    pub fn min_keys(&self) -> usize {
        self.config.min_keys()
    }

    /// Check if the tree holds no keys
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Get the root node id
    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node<K>> {
        self.arena.get(id)
    }

    /// Remove every key, keeping the order
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }
}

impl<K: Ord> BTree<K> {
    /// Insert a key.
    ///
    /// Returns [`InsertOutcome::Duplicate`] without touching the tree if the
    /// key is already present.
    pub fn insert(&mut self, key: K) -> InsertOutcome {
        let Some(root) = self.root else {
            let id = self.arena.alloc(Node::leaf(key, None));
            self.root = Some(id);
            debug!("created root {}", id);
            return InsertOutcome::Inserted;
        };

        // Find the leaf, bailing out if the key shows up on the way down
        let mut current = root;
        loop {
            let node = &self.arena[current];
            match node.search(&key) {
                Ok(_) => return InsertOutcome::Duplicate,
                Err(child) => {
                    if node.is_leaf() {
                        break;
                    }
                    trace!("insert: descending from {} to child {}", current, child);
                    current = node.children[child];
                }
            }
        }

        self.arena[current].insert_sorted(key);
        self.split(current);
        InsertOutcome::Inserted
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &K) -> bool {
        let Some(mut current) = self.root else {
            return false;
        };

        loop {
            let node = &self.arena[current];
            match node.search(key) {
                Ok(_) => return true,
                Err(_) if node.is_leaf() => return false,
                Err(child) => current = node.children[child],
            }
        }
    }

    /// Remove a key.
    ///
    /// Returns [`RemoveOutcome::NotPresent`] without touching the tree if
    /// the key is absent.
    pub fn remove(&mut self, key: &K) -> RemoveOutcome {
        let Some(mut current) = self.root else {
            return RemoveOutcome::NotPresent;
        };

        loop {
            let node = &self.arena[current];
            match node.search(key) {
                Ok(idx) if node.is_leaf() => {
                    self.arena[current].keys.remove(idx);
                    self.rebalance(current);
                    return RemoveOutcome::Removed;
                }
                Ok(idx) => {
                    self.replace_separator(current, idx);
                    return RemoveOutcome::Removed;
                }
                Err(_) if node.is_leaf() => return RemoveOutcome::NotPresent,
                Err(child) => {
                    trace!("remove: descending from {} to child {}", current, child);
                    current = node.children[child];
                }
            }
        }
    }

    /// Split `node` and its ancestors until none overflows.
    ///
    /// A node overflows when it holds `order` keys, one more than allowed.
    fn split(&mut self, mut node: NodeId) {
        let mid = self.config.min_keys();

        while self.arena[node].keys.len() > self.config.max_keys() {
            let parent = match self.arena[node].parent {
                Some(parent) => parent,
                None => self.grow_root(node),
            };

            let (separator, right_keys, right_children) = {
                let n = &mut self.arena[node];
                let right_keys = n.keys.split_off(mid + 1);
                let right_children = if n.is_leaf() {
                    Vec::new()
                } else {
                    n.children.split_off(mid + 1)
                };
                let Some(separator) = n.keys.pop() else {
                    return;
                };
                (separator, right_keys, right_children)
            };

            let right = self
                .arena
                .alloc(Node::from_parts(right_keys, right_children, Some(parent)));
            self.arena.reparent_children(right);

            let position = self
                .arena
                .index_in_parent(node)
                .map_or(0, |index| index + 1);
            let p = &mut self.arena[parent];
            p.insert_sorted(separator);
            p.children.insert(position, right);

            debug!("split {}: new right sibling {} under {}", node, right, parent);
            node = parent;
        }
    }

    /// Put a new empty root above `old_root` and return it
    fn grow_root(&mut self, old_root: NodeId) -> NodeId {
        let new_root = self
            .arena
            .alloc(Node::from_parts(Vec::new(), vec![old_root], None));
        self.arena.reparent_children(new_root);
        self.root = Some(new_root);
        debug!("tree grew: new root {} above {}", new_root, old_root);
        new_root
    }

    /// Replace the separator at `idx` of internal node `node` with its
    /// in-order neighbour taken from a leaf, then rebalance that leaf.
    ///
    /// The successor is preferred when its leaf can spare a key; otherwise
    /// the predecessor is used.
    fn replace_separator(&mut self, node: NodeId, idx: usize) {
        let (left_child, right_child) = {
            let n = &self.arena[node];
            (n.children[idx], n.children[idx + 1])
        };
        let left_donor = self.arena.rightmost_descendant(left_child);
        let right_donor = self.arena.leftmost_descendant(right_child);

        let (donor, stolen) = if self.arena[right_donor].keys.len() > self.config.min_keys() {
            (right_donor, self.arena[right_donor].keys.remove(0))
        } else {
            let Some(stolen) = self.arena[left_donor].keys.pop() else {
                return;
            };
            (left_donor, stolen)
        };

        debug!("replaced separator in {} with a key from leaf {}", node, donor);
        self.arena[node].keys[idx] = stolen;
        self.rebalance(donor);
    }

    /// Restore the minimum key count from `node` upward.
    fn rebalance(&mut self, mut node: NodeId) {
        let min = self.config.min_keys();

        loop {
            if self.arena[node].keys.len() >= min {
                return;
            }

            let Some(parent) = self.arena[node].parent else {
                self.shrink_root(node);
                return;
            };

            let Some(index) = self.arena.index_in_parent(node) else {
                return;
            };
            let left = self.arena.left_sibling(node);
            let right = self.arena.right_sibling(node);

            let can_spare = |id: NodeId| self.arena[id].keys.len() > min;
            let lender_left = left.filter(|&l| can_spare(l));
            let lender_right = right.filter(|&r| can_spare(r));

            if let Some(left) = lender_left {
                self.borrow_from_left(parent, index - 1, left, node);
            } else if let Some(right) = lender_right {
                self.borrow_from_right(parent, index, node, right);
            } else {
                let (survivor, absorbed, separator) = match (left, right) {
                    (Some(left), _) => (left, node, index - 1),
                    (None, Some(right)) => (node, right, index),
                    (None, None) => return,
                };
                self.merge(parent, separator, survivor, absorbed);
            }

            node = parent;
        }
    }

    /// Drop an empty root, promoting its only child if it has one
    fn shrink_root(&mut self, root: NodeId) {
        if !self.arena[root].keys.is_empty() {
            return;
        }

        let child = self.arena[root].children.first().copied();
        self.arena.release(root);
        match child {
            Some(child) => {
                self.arena[child].parent = None;
                self.root = Some(child);
                debug!("tree shrank: new root {}", child);
            }
            None => {
                self.root = None;
                debug!("tree is now empty");
            }
        }
    }

    /// Rotate one key from `left` through the parent into the front of `node`
    fn borrow_from_left(&mut self, parent: NodeId, separator: usize, left: NodeId, node: NodeId) {
        let (moved_key, moved_child) = {
            let l = &mut self.arena[left];
            let Some(key) = l.keys.pop() else {
                return;
            };
            (key, l.children.pop())
        };

        let down = mem::replace(&mut self.arena[parent].keys[separator], moved_key);

        let n = &mut self.arena[node];
        n.keys.insert(0, down);
        if let Some(child) = moved_child {
            n.children.insert(0, child);
            self.arena.reparent_children(node);
        }
        debug!("{} borrowed from left sibling {}", node, left);
    }

    /// Rotate one key from `right` through the parent onto the back of `node`
    fn borrow_from_right(&mut self, parent: NodeId, separator: usize, node: NodeId, right: NodeId) {
        let (moved_key, moved_child) = {
            let r = &mut self.arena[right];
            if r.keys.is_empty() {
                return;
            }
            let key = r.keys.remove(0);
            let child = if r.is_leaf() {
                None
            } else {
                Some(r.children.remove(0))
            };
            (key, child)
        };

        let down = mem::replace(&mut self.arena[parent].keys[separator], moved_key);

        let n = &mut self.arena[node];
        n.keys.push(down);
        if let Some(child) = moved_child {
            n.children.push(child);
            self.arena.reparent_children(node);
        }
        debug!("{} borrowed from right sibling {}", node, right);
    }

    /// Fold `absorbed` and the separator between them into `survivor`.
    ///
    /// `survivor` must be the left neighbour of `absorbed`.
    fn merge(&mut self, parent: NodeId, separator: usize, survivor: NodeId, absorbed: NodeId) {
        let down = {
            let p = &mut self.arena[parent];
            p.children.remove(separator + 1);
            p.keys.remove(separator)
        };
        let Some(absorbed_node) = self.arena.release(absorbed) else {
            return;
        };

        let s = &mut self.arena[survivor];
        s.keys.push(down);
        s.keys.extend(absorbed_node.keys);
        if !absorbed_node.children.is_empty() {
            s.children.extend(absorbed_node.children);
            self.arena.reparent_children(survivor);
        }
        debug!("merged {} into {}", absorbed, survivor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn keys_of<K: Clone>(tree: &BTree<K>, id: NodeId) -> Vec<K> {
        tree.node(id).unwrap().keys().to_vec()
    }

    fn root_keys<K: Clone>(tree: &BTree<K>) -> Vec<K> {
        keys_of(tree, tree.root_id().unwrap())
    }

    fn child_keys<K: Clone>(tree: &BTree<K>, id: NodeId) -> Vec<Vec<K>> {
        tree.node(id)
            .unwrap()
            .children()
            .iter()
            .map(|&child| keys_of(tree, child))
            .collect()
    }

    fn build(order: usize, keys: &[i32]) -> BTree<i32> {
        let mut tree = BTree::new(order).unwrap();
        for &key in keys {
            let _ = tree.insert(key);
        }
        tree
    }

    #[test]
    fn test_invalid_order() {
        assert_eq!(
            BTree::<i32>::new(2).unwrap_err(),
            TreeError::InvalidOrder { order: 2, min: 3 }
        );
        assert!(BTree::<i32>::new(0).is_err());
        assert!(BTree::<i32>::new(3).is_ok());
    }

    #[test]
    fn test_empty_tree() {
        let mut tree = BTree::<i32>::new(5).unwrap();
        assert!(tree.is_empty());
        assert!(!tree.contains(&1));
        assert_eq!(tree.remove(&1), RemoveOutcome::NotPresent);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn test_first_split() {
        let tree = build(5, &[5, 7, 8, 3, 2]);
        let root = tree.root_id().unwrap();

        assert_eq!(root_keys(&tree), vec![5]);
        assert_eq!(child_keys(&tree, root), vec![vec![2, 3], vec![7, 8]]);
        assert!(tree.contains(&8));
        assert!(!tree.contains(&10));
        assert_eq!(tree.height(), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn test_duplicate_insert() {
        let mut tree = build(5, &[5, 7, 8, 3, 2]);
        assert_eq!(tree.insert(5), InsertOutcome::Duplicate);
        assert_eq!(tree.insert(2), InsertOutcome::Duplicate);
        assert_eq!(tree.key_count(), 5);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_absent() {
        let mut tree = build(5, &[5, 7, 8, 3, 2]);
        let before = tree.keys().into_iter().copied().collect::<Vec<_>>();
        assert_eq!(tree.remove(&100), RemoveOutcome::NotPresent);
        assert_eq!(tree.keys().into_iter().copied().collect::<Vec<_>>(), before);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_merge_collapses_root() {
        let mut tree = build(5, &[5, 7, 8, 3, 2]);
        assert_eq!(tree.height(), 2);

        // [7 8] -> [7] underflows, [2 3] has nothing to spare
        assert_eq!(tree.remove(&8), RemoveOutcome::Removed);
        assert_eq!(tree.height(), 1);
        assert_eq!(root_keys(&tree), vec![2, 3, 5, 7]);
        assert_eq!(tree.node_count(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn test_merge_with_right_sibling() {
        let mut tree = build(5, &[5, 7, 8, 3, 2]);

        // Leftmost leaf has no left sibling, so it absorbs its right one
        assert_eq!(tree.remove(&2), RemoveOutcome::Removed);
        assert_eq!(root_keys(&tree), vec![3, 5, 7, 8]);
        assert_eq!(tree.height(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn test_borrow_from_left() {
        let mut tree = build(5, &[5, 7, 8, 3, 2, 1]);
        let root = tree.root_id().unwrap();
        assert_eq!(child_keys(&tree, root), vec![vec![1, 2, 3], vec![7, 8]]);

        assert_eq!(tree.remove(&8), RemoveOutcome::Removed);
        assert_eq!(root_keys(&tree), vec![3]);
        assert_eq!(child_keys(&tree, root), vec![vec![1, 2], vec![5, 7]]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_borrow_from_right() {
        let mut tree = build(5, &[5, 7, 8, 3, 2, 9]);
        let root = tree.root_id().unwrap();
        assert_eq!(child_keys(&tree, root), vec![vec![2, 3], vec![7, 8, 9]]);

        assert_eq!(tree.remove(&2), RemoveOutcome::Removed);
        assert_eq!(root_keys(&tree), vec![7]);
        assert_eq!(child_keys(&tree, root), vec![vec![3, 5], vec![8, 9]]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_borrow_prefers_left() {
        let mut tree = build(5, &[10, 20, 30, 40, 50, 60, 70, 80, 1, 90]);
        let root = tree.root_id().unwrap();
        assert_eq!(root_keys(&tree), vec![30, 60]);
        assert_eq!(
            child_keys(&tree, root),
            vec![vec![1, 10, 20], vec![40, 50], vec![70, 80, 90]]
        );

        // Both neighbours of [50] can spare a key; the left one is used
        assert_eq!(tree.remove(&40), RemoveOutcome::Removed);
        assert_eq!(root_keys(&tree), vec![20, 60]);
        assert_eq!(
            child_keys(&tree, root),
            vec![vec![1, 10], vec![30, 50], vec![70, 80, 90]]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_internal_key_uses_successor() {
        let mut tree = build(5, &[5, 7, 8, 3, 2, 9]);
        let root = tree.root_id().unwrap();

        // Right leaf [7 8 9] can spare its smallest key
        assert_eq!(tree.remove(&5), RemoveOutcome::Removed);
        assert_eq!(root_keys(&tree), vec![7]);
        assert_eq!(child_keys(&tree, root), vec![vec![2, 3], vec![8, 9]]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_internal_key_uses_predecessor() {
        let mut tree = build(5, &[5, 7, 8, 3, 2, 1]);
        let root = tree.root_id().unwrap();

        // Right leaf [7 8] is at the minimum, so [1 2 3] gives up 3
        assert_eq!(tree.remove(&5), RemoveOutcome::Removed);
        assert_eq!(root_keys(&tree), vec![3]);
        assert_eq!(child_keys(&tree, root), vec![vec![1, 2], vec![7, 8]]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_internal_key_then_merge() {
        let mut tree = build(5, &[5, 7, 8, 3, 2]);

        // Both donors are at the minimum: predecessor 3 moves up, [2] merges
        assert_eq!(tree.remove(&5), RemoveOutcome::Removed);
        assert_eq!(root_keys(&tree), vec![2, 3, 7, 8]);
        assert_eq!(tree.height(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn test_root_split_grows_height() {
        let mut tree = BTree::new(3).unwrap();
        let mut last_height = 0;
        for key in 0..64 {
            assert_eq!(tree.insert(key), InsertOutcome::Inserted);
            let height = tree.height();
            assert!(height == last_height || height == last_height + 1);
            last_height = height;
            tree.validate().unwrap();
        }
        assert!(tree.height() >= 4);
    }

    #[test]
    fn test_full_drain_in_insert_order() {
        for order in 3..=8 {
            let mut tree = BTree::new(order).unwrap();
            for key in 0..200 {
                let _ = tree.insert(key);
            }
            for key in 0..200 {
                assert_eq!(tree.remove(&key), RemoveOutcome::Removed, "order {}", order);
                tree.validate().unwrap();
            }
            assert!(tree.is_empty());
            assert_eq!(tree.root_id(), None);
            assert!(tree.arena.is_empty());
        }
    }

    #[test]
    fn test_full_drain_reverse_order() {
        let mut tree = BTree::new(4).unwrap();
        for key in 0..150 {
            let _ = tree.insert(key);
        }
        for key in (0..150).rev() {
            assert_eq!(tree.remove(&key), RemoveOutcome::Removed);
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn test_random_workload_matches_set() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for order in [3, 4, 5, 6, 7, 10, 16] {
            let mut tree = BTree::new(order).unwrap();
            let mut model = BTreeSet::new();

            for _ in 0..2000 {
                let key: i32 = rng.gen_range(0..500);
                if rng.gen_bool(0.6) {
                    let expected = if model.insert(key) {
                        InsertOutcome::Inserted
                    } else {
                        InsertOutcome::Duplicate
                    };
                    assert_eq!(tree.insert(key), expected);
                } else {
                    let expected = if model.remove(&key) {
                        RemoveOutcome::Removed
                    } else {
                        RemoveOutcome::NotPresent
                    };
                    assert_eq!(tree.remove(&key), expected);
                }
                tree.validate().unwrap();
            }

            assert_eq!(tree.key_count(), model.len());
            let in_order: Vec<i32> = tree.keys().into_iter().copied().collect();
            let expected: Vec<i32> = model.iter().copied().collect();
            assert_eq!(in_order, expected);
            for key in 0..500 {
                assert_eq!(tree.contains(&key), model.contains(&key));
            }
        }
    }

    #[test]
    fn test_shuffled_drain() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut keys: Vec<i32> = (0..500).collect();
        keys.shuffle(&mut rng);

        let mut tree = BTree::new(5).unwrap();
        for &key in &keys {
            assert!(tree.insert(key).is_inserted());
        }
        assert_eq!(tree.key_count(), 500);

        keys.shuffle(&mut rng);
        for (removed, &key) in keys.iter().enumerate() {
            assert!(tree.remove(&key).is_removed());
            assert!(!tree.contains(&key));
            assert_eq!(tree.key_count(), 500 - removed - 1);
        }
        tree.validate().unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_string_keys() {
        let mut tree = BTree::new(4).unwrap();
        for word in ["pear", "apple", "fig", "kiwi", "plum", "date", "lime"] {
            assert!(tree.insert(word.to_string()).is_inserted());
        }
        assert!(tree.contains(&"kiwi".to_string()));
        assert!(!tree.insert("fig".to_string()).is_inserted());
        assert!(tree.remove(&"apple".to_string()).is_removed());
        assert_eq!(
            tree.keys(),
            vec!["date", "fig", "kiwi", "lime", "pear", "plum"]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn test_clear() {
        let mut tree = build(5, &[1, 2, 3, 4, 5, 6, 7]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.order(), 5);
        assert!(tree.insert(3).is_inserted());
        assert_eq!(tree.node_count(), 1);
    }
}
