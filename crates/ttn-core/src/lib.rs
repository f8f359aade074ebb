#![warn(missing_docs)]
//! Tensor network container library
//!
//! This crate provides the vocabulary shared by network builders:
//! - [`IndexId`] / [`Index`]: typed leg identities with dimensions
//! - [`TagSet`]: copy-on-write tag sets
//! - [`DenseArray`]: array payloads, shared between tensors via `Arc`
//! - [`Tensor`]: array + ordered legs + tags
//! - [`TensorNetwork`]: tag-indexed container resolving shared legs into connections
//!
//! # Example
//!
//! ```
//! use ttn_core::{DenseArray, IndexId, NetworkOptions, TagSet, Tensor, TensorContainer, TensorNetwork};
//!
//! let a = Tensor::new(
//!     DenseArray::ones_f64(&[2, 3]).unwrap(),
//!     vec![IndexId::Site(0), IndexId::named("bond")],
//!     TagSet::from_tags(["A"]),
//! ).unwrap();
//! let b = Tensor::new(
//!     DenseArray::ones_f64(&[3, 2]).unwrap(),
//!     vec![IndexId::named("bond"), IndexId::Site(1)],
//!     TagSet::from_tags(["B"]),
//! ).unwrap();
//!
//! let tn = TensorNetwork::from_tensors([a, b], &NetworkOptions::default()).unwrap();
//! assert_eq!(tn.edge_count(), 1);
//! assert_eq!(tn.select_neighbors("A"), tn.select("B"));
//! ```

pub mod error;
pub mod index;
pub mod network;
pub mod storage;
pub mod tagset;
pub mod template;
pub mod tensor;

pub use error::{NetworkError, Result};
pub use index::{BondId, Index, IndexId};
pub use network::{NetworkOptions, TensorContainer, TensorNetwork};
pub use storage::{DenseArray, DenseStorage};
pub use tagset::TagSet;
pub use template::Template;
pub use tensor::Tensor;

pub use petgraph::stable_graph::NodeIndex;
