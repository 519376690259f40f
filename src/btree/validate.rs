//! Structural invariant checks.

use crate::btree::BTree;
use crate::error::{Result, TreeError};
use crate::types::NodeId;
use std::fmt::Debug;

impl<K: Ord + Debug> BTree<K> {
    /// Check every structural invariant of the tree.
    ///
    /// Verifies key limits, child counts, parent links, key ordering within
    /// and across nodes, and that all leaves share one depth.
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root else {
            return if self.arena.is_empty() {
                Ok(())
            } else {
                Err(TreeError::corruption(format!(
                    "empty tree still holds {} nodes",
                    self.arena.len()
                )))
            };
        };

        let root_node = self.arena.get(root).ok_or(TreeError::NodeNotFound(root))?;
        if root_node.parent().is_some() {
            return Err(TreeError::corruption(format!("root {} has a parent", root)));
        }

        // (node, depth, exclusive lower bound, exclusive upper bound)
        let mut stack: Vec<(NodeId, usize, Option<&K>, Option<&K>)> = vec![(root, 1, None, None)];
        let mut leaf_depth = None;
        let mut seen = 0;

        while let Some((id, depth, lower, upper)) = stack.pop() {
            let node = self.arena.get(id).ok_or(TreeError::NodeNotFound(id))?;
            let keys = node.keys();
            seen += 1;

            if keys.len() > self.max_keys() {
                return Err(TreeError::corruption(format!(
                    "node {} holds {} keys, max is {}",
                    id,
                    keys.len(),
                    self.max_keys()
                )));
            }
            if id == root {
                if keys.is_empty() {
                    return Err(TreeError::corruption("root holds no keys"));
                }
            } else if keys.len() < self.min_keys() {
                return Err(TreeError::corruption(format!(
                    "node {} holds {} keys, min is {}",
                    id,
                    keys.len(),
                    self.min_keys()
                )));
            }

            if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
                return Err(TreeError::corruption(format!(
                    "node {} keys out of order: {:?} before {:?}",
                    id, pair[0], pair[1]
                )));
            }
            if let (Some(lower), Some(first)) = (lower, keys.first()) {
                if first <= lower {
                    return Err(TreeError::corruption(format!(
                        "node {} key {:?} not above separator {:?}",
                        id, first, lower
                    )));
                }
            }
            if let (Some(upper), Some(last)) = (upper, keys.last()) {
                if last >= upper {
                    return Err(TreeError::corruption(format!(
                        "node {} key {:?} not below separator {:?}",
                        id, last, upper
                    )));
                }
            }

            if node.is_leaf() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(TreeError::corruption(format!(
                            "leaf {} at depth {}, expected {}",
                            id, depth, expected
                        )));
                    }
                    Some(_) => {}
                }
                continue;
            }

            if node.children().len() != keys.len() + 1 {
                return Err(TreeError::corruption(format!(
                    "node {} has {} keys but {} children",
                    id,
                    keys.len(),
                    node.children().len()
                )));
            }

            for (i, &child) in node.children().iter().enumerate() {
                let child_node = self.arena.get(child).ok_or(TreeError::NodeNotFound(child))?;
                if child_node.parent() != Some(id) {
                    return Err(TreeError::corruption(format!(
                        "child {} of {} points at parent {:?}",
                        child,
                        id,
                        child_node.parent()
                    )));
                }
                let child_lower = if i == 0 { lower } else { keys.get(i - 1) };
                let child_upper = if i == keys.len() { upper } else { keys.get(i) };
                stack.push((child, depth + 1, child_lower, child_upper));
            }
        }

        if seen != self.arena.len() {
            return Err(TreeError::corruption(format!(
                "{} nodes reachable but {} allocated",
                seen,
                self.arena.len()
            )));
        }

        Ok(())
    }
}
