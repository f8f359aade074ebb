//! Index types for tensor network operations.
//!
//! This module provides:
//!
//! - [`BondId`]: Process-unique identity of one family of bond indices
//! - [`IndexId`]: Typed identity of a leg (site, bond or free-form name)
//! - [`Index`]: An identity together with its dimension
//!
//! Two tensors carrying the same [`IndexId`] are connected along that leg.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::template::Template;

/// Identity of one family of bond indices.
///
/// A family groups the indices minted for one layer boundary of a network;
/// individual legs are told apart by their slot (see [`IndexId::Bond`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BondId(pub u64);

static NEXT_BOND_ID: AtomicU64 = AtomicU64::new(1);

impl BondId {
    /// Mint a fresh bond family id.
    ///
    /// Ids come from a process-local monotonically increasing counter, so two
    /// calls never return the same value and runs are reproducible given the
    /// same call sequence.
    pub fn fresh() -> Self {
        BondId(generate_id())
    }
}

/// Generate a process-unique id (thread-safe).
pub(crate) fn generate_id() -> u64 {
    NEXT_BOND_ID.fetch_add(1, Ordering::Relaxed)
}

/// Typed identity of a tensor leg.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexId {
    /// Physical leg of a site, rendered through the network's site-index template.
    Site(usize),
    /// Virtual leg `slot` of the bond family `family`.
    Bond {
        /// Family the leg belongs to
        family: BondId,
        /// Position within the family
        slot: usize,
    },
    /// Free-form named leg.
    Named(Arc<str>),
}

impl IndexId {
    /// Create a free-form named index id.
    pub fn named(name: &str) -> Self {
        IndexId::Named(Arc::from(name))
    }

    /// Render the id as an index name, formatting site legs with `site_ind_id`.
    pub fn render(&self, site_ind_id: &Template) -> String {
        match self {
            IndexId::Site(site) => site_ind_id.format(*site),
            other => other.to_string(),
        }
    }

    /// Site number if this is a physical leg.
    pub fn site(&self) -> Option<usize> {
        match self {
            IndexId::Site(site) => Some(*site),
            _ => None,
        }
    }

    /// Returns true if this is a virtual (bond) leg.
    pub fn is_bond(&self) -> bool {
        matches!(self, IndexId::Bond { .. })
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexId::Site(site) => write!(f, "site[{}]", site),
            IndexId::Bond { family, slot } => write!(f, "_{:08x}_{}", family.0, slot),
            IndexId::Named(name) => f.write_str(name),
        }
    }
}

/// Index with a typed identity and a dimension.
///
/// **Equality**: Two `Index` values are considered equal if and only if their `id` fields match.
/// The dimension is not used for equality comparison.
#[derive(Debug, Clone)]
pub struct Index {
    /// The identifier for this index.
    pub id: IndexId,
    /// The dimension (size) of this index.
    pub dim: usize,
}

impl Index {
    /// Create a new index with the given identity and dimension.
    pub fn new(id: IndexId, dim: usize) -> Self {
        Self { id, dim }
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Index {}

impl std::hash::Hash for Index {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
