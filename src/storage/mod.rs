//! Storage layer: node arena and slot recycling.
//!
//! Every node of a tree lives in one arena owned by that tree. Child lists
//! are the only ownership edges; parent ids are plain lookups.

mod arena;
mod freelist;

pub use arena::NodeArena;
pub use freelist::FreeList;
