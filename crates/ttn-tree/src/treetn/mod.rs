//! Tree Tensor Network construction.
//!
//! This module provides the [`TreeTN`] type: a complete `base`-ary tree of
//! tensors over `n` physical sites, stored in a tag-indexed tensor container.
//!
//! ```text
//!            __________O__________             layer 2
//!           /                     \
//!       ___O___                 ___O___        layer 1
//!      /       \               /       \
//!     O         O             O         O      layer 0
//!    / \       / \           / \       / \
//!   k0  k1    k2  k3        k4  k5    k6  k7   physical legs
//! ```
//!
//! Construction runs two phases:
//! 1. A [`TreeTensorGenerator`] lazily describes every tensor; each
//!    description is paired with an array from an [`ArraySupply`] and the
//!    resulting stream is drained by [`TensorContainer::from_tensors`].
//! 2. Site tags are propagated to every ancestor of their leaf, so the tensors
//!    forming the causal cone of a site can be selected by its tag.

mod causal_cone;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{debug, warn};
use ttn_core::{BondId, IndexId, NetworkError, NodeIndex, Template, Tensor, TensorContainer, TensorNetwork};

use crate::error::TreeTNError;
use crate::generator::{TensorDescriptor, TreeTensorGenerator};
use crate::layout::{layer_tag, TreeLayout, TreeNaming};
use crate::options::TreeTNOptions;
use crate::supply::{ArraySupply, RandomArrays, RandomDims, SlotSpec};

/// Tree Tensor Network.
///
/// Holds the populated container plus the naming scheme and the `cyclic`
/// flag. The flag is always true for built trees: with
/// [`IrregularLayerPolicy::Wrap`](crate::IrregularLayerPolicy::Wrap), groups at the end of a layer wrap around to
/// its first slots, and downstream consumers are told to expect that.
///
/// # Type Parameters
/// - `C`: Tensor container holding the tensors (default: [`TensorNetwork`])
#[derive(Debug, Clone)]
pub struct TreeTN<C = TensorNetwork> {
    network: C,
    naming: TreeNaming,
    cyclic: bool,
    layout: TreeLayout,
    /// Upward bond family of each layer.
    families: Vec<BondId>,
    dangle: bool,
}

/// TreeTN backed by the default [`TensorNetwork`] container.
pub type DefaultTreeTN = TreeTN<TensorNetwork>;

impl<C: TensorContainer> TreeTN<C> {
    /// Build a tree over `n` sites, filling tensors from `supply`.
    ///
    /// # Errors
    /// - invalid templates, branching factor or site count (see [`TreeTNError`])
    /// - the supply fails or runs out ([`TreeTNError::ArraySupplyExhausted`])
    /// - an array's rank differs from `base + 1` ([`TreeTNError::RankMismatch`])
    /// - arrays disagree on the dimension of a shared leg; the message names the
    ///   leg as rendered through `site_ind_id`, while the wrapped
    ///   [`NetworkError::DimensionMismatch`] keeps the typed [`IndexId`]
    ///
    /// # Example
    /// ```
    /// use ttn_core::DenseArray;
    /// use ttn_tree::{CyclicArrays, DefaultTreeTN, TreeTNOptions};
    ///
    /// let array = DenseArray::ones_f64(&[2, 2, 2]).unwrap();
    /// let ttn = DefaultTreeTN::new(8, CyclicArrays::single(array), &TreeTNOptions::default()).unwrap();
    ///
    /// assert_eq!(ttn.nlayers(), 3);
    /// assert_eq!(ttn.causal_cone(5).len(), 3);
    /// ```
    pub fn new<S: ArraySupply>(n: usize, mut supply: S, options: &TreeTNOptions) -> Result<Self> {
        let site_ind_id = Template::parse(&options.site_ind_id).context("TreeTN::new: invalid site_ind_id")?;
        let site_tag_id = Template::parse(&options.site_tag_id).context("TreeTN::new: invalid site_tag_id")?;
        let naming = TreeNaming::new(site_ind_id, site_tag_id);

        let layout = TreeLayout::new(n, options.base, options.policy).context("TreeTN::new: invalid tree shape")?;
        if options.dangle {
            warn!("`dangle` is reserved and has no effect on the tree topology");
        }
        if !layout.is_regular() {
            warn!(
                n,
                base = layout.base(),
                nlayers = layout.nlayers(),
                "site count is not a power of base; wrapping layer groups"
            );
        }

        let generator = TreeTensorGenerator::with_fresh_families(layout, naming.clone());
        let families = generator.families().to_vec();

        // The container drains the generator; the first failure stops the stream.
        let mut failure = None;
        let tensors = generator.map_while(|descriptor| match fill(&mut supply, descriptor) {
            Ok(tensor) => Some(tensor),
            Err(err) => {
                failure = Some(err);
                None
            }
        });
        let ingested = C::from_tensors(tensors, &options.container_options());
        if let Some(err) = failure {
            return Err(err).context("TreeTN::new: failed to generate tree tensors");
        }
        let mut network = ingested.map_err(|err| {
            let message = match &err {
                NetworkError::DimensionMismatch { index, .. } => format!(
                    "TreeTN::new: arrays disagree on the dimension of leg `{}`",
                    index.render(naming.site_ind_id())
                ),
                _ => "TreeTN::new: failed to ingest tree tensors".to_string(),
            };
            anyhow::Error::new(err).context(message)
        })?;

        let cone_tags = causal_cone::tag_causal_cones(&mut network, &layout, &naming)
            .context("TreeTN::new: failed to tag causal cones")?;

        debug!(
            n,
            base = layout.base(),
            nlayers = layout.nlayers(),
            tensors = network.node_count(),
            cone_tags,
            "built tree tensor network"
        );

        Ok(Self {
            network,
            naming,
            cyclic: true,
            layout,
            families,
            dangle: options.dangle,
        })
    }

    /// Build a tree with random arrays drawn from `rng`.
    ///
    /// Leaf tensors get shape `[phys_dim; base] + [bond_dim]`, all others
    /// `[bond_dim; base + 1]`.
    pub fn rand<R: Rng>(rng: &mut R, n: usize, dims: RandomDims, options: &TreeTNOptions) -> Result<Self> {
        Self::new(n, RandomArrays::new(rng, dims), options)
    }

    /// Copy an existing tree.
    ///
    /// The container is copied structurally, tags and legs included, while
    /// array payloads stay shared. Tagging the copy does not affect `other`.
    pub fn from_existing(other: &Self) -> Self {
        other.clone()
    }

    /// Number of sites.
    pub fn nsites(&self) -> usize {
        self.layout.nsites()
    }

    /// Branching factor.
    pub fn base(&self) -> usize {
        self.layout.base()
    }

    /// Number of layers.
    pub fn nlayers(&self) -> usize {
        self.layout.nlayers()
    }

    /// Layer structure.
    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    /// Whether downstream consumers should assume wrap-around connectivity.
    pub fn cyclic(&self) -> bool {
        self.cyclic
    }

    /// Value of the reserved `dangle` option.
    pub fn dangle(&self) -> bool {
        self.dangle
    }

    /// Physical index template.
    pub fn site_ind_id(&self) -> &Template {
        self.naming.site_ind_id()
    }

    /// Site tag template.
    pub fn site_tag_id(&self) -> &Template {
        self.naming.site_tag_id()
    }

    /// Name of the physical index of `site`.
    pub fn site_ind(&self, site: usize) -> String {
        self.naming.site_ind(site)
    }

    /// Tag of `site`.
    pub fn site_tag(&self, site: usize) -> String {
        self.naming.site_tag(site)
    }

    /// Tag of `layer`.
    pub fn layer_tag(&self, layer: usize) -> String {
        layer_tag(layer)
    }

    /// Rendered name of an index of this tree.
    pub fn index_name(&self, id: &IndexId) -> String {
        id.render(self.naming.site_ind_id())
    }

    /// Id of upward leg `slot` of `layer`.
    pub fn bond_ind(&self, layer: usize, slot: usize) -> Option<IndexId> {
        self.families
            .get(layer)
            .map(|&family| IndexId::Bond { family, slot })
    }

    /// Tensors of `layer`, in left-to-right order.
    pub fn select_layer(&self, layer: usize) -> Vec<NodeIndex> {
        self.network.select(&layer_tag(layer))
    }

    /// Tensors forming the causal cone of `site`: its leaf and every ancestor.
    pub fn causal_cone(&self, site: usize) -> Vec<NodeIndex> {
        self.network.select(&self.site_tag(site))
    }

    /// Leaf tensor owning the physical leg of `site`.
    pub fn leaf_of(&self, site: usize) -> Option<NodeIndex> {
        let leaf_tag = layer_tag(0);
        self.causal_cone(site)
            .into_iter()
            .find(|n| self.network.tensor(*n).is_some_and(|t| t.has_tag(&leaf_tag)))
    }

    /// Get the tensor at `node`.
    pub fn tensor(&self, node: NodeIndex) -> Option<&Tensor> {
        self.network.tensor(node)
    }

    /// Add `tag` to the tensor at `node`. Returns true if the tag is new.
    pub fn add_tag(&mut self, node: NodeIndex, tag: &str) -> Result<bool> {
        self.network
            .add_tag(node, tag)
            .with_context(|| format!("TreeTN::add_tag: cannot tag node {:?}", node))
    }

    /// Number of tensors.
    pub fn node_count(&self) -> usize {
        self.network.node_count()
    }

    /// Get a reference to the underlying container.
    pub fn network(&self) -> &C {
        &self.network
    }
}

/// Pair a descriptor with the next array of `supply`.
fn fill<S: ArraySupply>(supply: &mut S, descriptor: TensorDescriptor) -> Result<Tensor> {
    let slot = SlotSpec {
        layer: descriptor.layer,
        position: descriptor.position,
        rank: descriptor.indices.len(),
    };
    let array = supply.draw(&slot)?;
    if array.rank() != slot.rank {
        return Err(TreeTNError::RankMismatch {
            layer: slot.layer,
            position: slot.position,
            expected: slot.rank,
            got: array.rank(),
        }
        .into());
    }
    Ok(Tensor::new(array, descriptor.indices, descriptor.tags)?)
}
