//! Error types for the B-tree.

use thiserror::Error;

/// Result type alias for tree operations
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur when building or checking a tree
///
/// Inserting a key that is already present and removing a key that is
/// absent are not errors; they are reported through
/// [`InsertOutcome`](crate::InsertOutcome) and
/// [`RemoveOutcome`](crate::RemoveOutcome).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The requested order cannot hold a balanced tree
    #[error("tree of order {order} is not possible to make (minimum order is {min})")]
    InvalidOrder { order: usize, min: usize },

    /// A structural invariant does not hold
    #[error("Corruption detected: {0}")]
    Corruption(String),

    /// A node id does not refer to a live node
    #[error("Node {0} not found")]
    NodeNotFound(crate::types::NodeId),
}

impl TreeError {
    /// Create a corruption error with a message
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::Corruption(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TreeError::InvalidOrder { order: 2, min: 3 };
        assert_eq!(
            err.to_string(),
            "tree of order 2 is not possible to make (minimum order is 3)"
        );

        let err = TreeError::corruption("keys out of order");
        assert_eq!(err.to_string(), "Corruption detected: keys out of order");
    }
}
