//! Node arena implementation.
//!
//! The arena is a vector of node slots indexed by [`NodeId`]. Released slots
//! are recycled through a [`FreeList`]. Structural queries that cross node
//! boundaries (siblings, extremal descendants, reparenting) are answered
//! here because only the arena can follow ids.

use crate::node::Node;
use crate::storage::FreeList;
use crate::types::NodeId;
use std::ops::{Index, IndexMut};

/// Slot storage for the nodes of one tree
#[derive(Debug)]
pub struct NodeArena<K> {
    /// Node slots, `None` when released
    slots: Vec<Option<Node<K>>>,
    /// Released slots available for reuse
    free_list: FreeList,
    /// Number of live nodes
    live: usize,
}

impl<K> NodeArena<K> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: FreeList::new(),
            live: 0,
        }
    }

    /// Store a node and return its id
    pub fn alloc(&mut self, node: Node<K>) -> NodeId {
        self.live += 1;
        if let Some(id) = self.free_list.pop() {
            self.slots[id.index()] = Some(node);
            return id;
        }
        let id = NodeId::new(self.slots.len() as u32);
        self.slots.push(Some(node));
        id
    }

    /// Take a node out of the arena, freeing its slot.
    ///
    /// Children of the released node are left untouched; the caller must
    /// have moved them elsewhere or release them too.
    pub fn release(&mut self, id: NodeId) -> Option<Node<K>> {
        let node = self.slots.get_mut(id.index())?.take()?;
        self.live -= 1;
        self.free_list.push(id);
        Some(node)
    }

    /// Look up a live node
    pub fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.slots.get(id.index())?.as_ref()
    }

    /// Look up a live node for writing
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K>> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if no nodes are live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every node and forget all slots
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.live = 0;
    }

    /// Position of a node among its parent's children, `None` for a root
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self[id].parent?;
        self[parent].children.iter().position(|&child| child == id)
    }

    /// The child of the same parent immediately to the left
    pub fn left_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self[id].parent?;
        let index = self.index_in_parent(id)?;
        let prev = index.checked_sub(1)?;
        Some(self[parent].children[prev])
    }

    /// The child of the same parent immediately to the right
    pub fn right_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self[id].parent?;
        let index = self.index_in_parent(id)?;
        self[parent].children.get(index + 1).copied()
    }

    /// Follow first children down to a leaf
    pub fn leftmost_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&first) = self[current].children.first() {
            current = first;
        }
        current
    }

    /// Follow last children down to a leaf
    pub fn rightmost_descendant(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&last) = self[current].children.last() {
            current = last;
        }
        current
    }

    /// Point every direct child of `id` back at `id`
    pub fn reparent_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self[id].children);
        for &child in &children {
            self[child].parent = Some(id);
        }
        self[id].children = children;
    }
}

impl<K> Default for NodeArena<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Index<NodeId> for NodeArena<K> {
    type Output = Node<K>;

    fn index(&self, id: NodeId) -> &Node<K> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {} is not live in this arena", id),
        }
    }
}

impl<K> IndexMut<NodeId> for NodeArena<K> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("node {} is not live in this arena", id),
        }
    }
}
