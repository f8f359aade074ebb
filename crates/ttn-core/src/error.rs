//! Error types for tensor network containers

use thiserror::Error;

use crate::index::IndexId;

/// Result type for tensor network container operations
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors that can occur while building or querying a tensor network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Two tensors share an index but disagree on its dimension
    ///
    /// The container has no site naming, so physical legs display as `site[i]`.
    #[error("Dimension mismatch on index {index}: {expected} != {got}")]
    DimensionMismatch {
        /// The shared index
        index: IndexId,
        /// Dimension already registered for the index
        expected: usize,
        /// Dimension found on the new tensor
        got: usize,
    },

    /// An index is shared by more tensors than a pairwise bond allows
    #[error("Index {index} appears in {count} tensors, but at most 2 are allowed when checking collisions")]
    IndexCollision {
        /// The offending index
        index: IndexId,
        /// Number of tensors carrying the index
        count: usize,
    },

    /// A naming template does not contain exactly one `{}` placeholder
    #[error("Invalid template {template:?}: expected exactly one '{{}}' placeholder")]
    InvalidTemplate {
        /// The rejected template
        template: String,
    },

    /// Array shape does not match the data or the index list it is attached to
    #[error("Shape mismatch: expected {expected} elements/legs, got {got}")]
    ShapeMismatch {
        /// Expected element count or rank
        expected: usize,
        /// Actual element count or rank
        got: usize,
    },

    /// A node handle does not belong to the network
    #[error("Node not found: {node}")]
    NodeNotFound {
        /// Debug rendering of the node handle
        node: String,
    },
}
