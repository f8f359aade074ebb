//! Error types for tree tensor network construction

use thiserror::Error;

/// Errors that can occur while building a tree tensor network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeTNError {
    /// Branching factor below 2
    #[error("Invalid branching factor {base}: must be at least 2")]
    InvalidBase {
        /// The rejected branching factor
        base: usize,
    },

    /// No sites at all
    #[error("Invalid number of sites {n}: must be at least 1")]
    InvalidSiteCount {
        /// The rejected site count
        n: usize,
    },

    /// Site count is not `base^k` for some `k >= 1`
    #[error("Number of sites {n} is not a positive power of base {base}")]
    NotPowerOfBase {
        /// Number of sites
        n: usize,
        /// Branching factor
        base: usize,
    },

    /// A cyclic supply was given no arrays to cycle through
    #[error("Array supply is empty")]
    EmptyArraySupply,

    /// A non-cyclic supply ran out of arrays
    #[error("Array supply exhausted after {drawn} arrays (layer {layer}, position {position})")]
    ArraySupplyExhausted {
        /// Number of arrays drawn before exhaustion
        drawn: usize,
        /// Layer of the tensor that could not be filled
        layer: usize,
        /// Position of the tensor within its layer
        position: usize,
    },

    /// Array rank differs from the number of legs of the tensor it fills
    #[error("Array of rank {got} cannot fill tensor at layer {layer}, position {position} (needs rank {expected})")]
    RankMismatch {
        /// Layer of the tensor
        layer: usize,
        /// Position of the tensor within its layer
        position: usize,
        /// Number of legs of the tensor
        expected: usize,
        /// Rank of the supplied array
        got: usize,
    },
}
