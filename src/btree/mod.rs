//! B-tree implementation.
//!
//! This module provides an in-memory B-tree that supports:
//! - Insertions with split-on-overflow
//! - Point lookups
//! - Deletions with borrow/merge rebalancing
//! - Read-only diagnostics, validation and rendering

mod cursor;
mod render;
mod stats;
mod tree;
mod validate;

pub use stats::TreeStats;
pub use tree::BTree;
