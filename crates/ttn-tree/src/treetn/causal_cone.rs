//! Causal-cone tagging.
//!
//! After ingestion, every site tag is propagated upward one layer at a time:
//! at step `i`, each tensor of layer `i + 1` that shares a leg with a tensor
//! already carrying the tag of site `j` receives that tag too. After the last
//! step, the tag of `j` sits on exactly the tensors of the leaf-to-top path of
//! `j` (for a regular layout).

use tracing::trace;
use ttn_core::{NetworkError, TensorContainer};

use crate::layout::{layer_tag, TreeLayout, TreeNaming};

/// Propagate site tags up the tree. Returns the number of tags added.
///
/// The step for the top layer queries `_LAYER{nlayers}`, which no tensor
/// carries, so it adds nothing.
pub(crate) fn tag_causal_cones<C: TensorContainer>(
    network: &mut C,
    layout: &TreeLayout,
    naming: &TreeNaming,
) -> Result<usize, NetworkError> {
    let mut added = 0;
    for layer in 0..layout.nlayers() {
        let above = layer_tag(layer + 1);
        for site in 0..layout.nsites() {
            let tag = naming.site_tag(site);
            for node in network.select_neighbors(&tag) {
                let in_layer_above = network.tensor(node).is_some_and(|t| t.has_tag(&above));
                if in_layer_above && network.add_tag(node, &tag)? {
                    added += 1;
                }
            }
        }
        trace!(layer, added, "propagated site tags");
    }
    Ok(added)
}
