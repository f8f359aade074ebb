#![warn(missing_docs)]
//! Tree Tensor Network (TTN) builder
//!
//! This crate builds complete `base`-ary trees of tensors over `n` physical
//! sites and tags them for lookup by site, by layer and by causal cone:
//! - [`TreeTN`]: the built network plus its naming scheme
//! - [`TreeTensorGenerator`]: lazy, layer-major tensor descriptions
//! - [`ArraySupply`]: where array payloads come from (cyclic, once, random)
//! - [`TreeTNOptions`]: branching factor, templates and topology policy
//!
//! # Example
//!
//! ```
//! use ttn_core::{DenseArray, TensorContainer};
//! use ttn_tree::{CyclicArrays, DefaultTreeTN, TreeTNOptions};
//!
//! let array = DenseArray::ones_f64(&[2, 2, 2]).unwrap();
//! let ttn = DefaultTreeTN::new(8, CyclicArrays::single(array), &TreeTNOptions::default()).unwrap();
//!
//! // 4 leaves, 2 inner tensors, 1 top tensor
//! assert_eq!(ttn.node_count(), 7);
//! // the top tensor lies in the causal cone of every site
//! let top = ttn.select_layer(2)[0];
//! assert!((0..8).all(|site| ttn.tensor(top).unwrap().has_tag(&ttn.site_tag(site))));
//! assert_eq!(ttn.network().select("I3").len(), 3);
//! ```

pub mod error;
pub mod generator;
pub mod layout;
pub mod options;
pub mod supply;
pub mod treetn;

pub use error::TreeTNError;
pub use generator::{TensorDescriptor, TreeTensorGenerator};
pub use layout::{layer_tag, IndexFamily, TreeLayout, TreeNaming};
pub use options::{IrregularLayerPolicy, TreeTNOptions};
pub use supply::{ArraySupply, CyclicArrays, OnceArrays, RandomArrays, RandomDims, SlotSpec};
pub use treetn::{DefaultTreeTN, TreeTN};
