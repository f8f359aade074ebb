//! Lazy generation of tree tensor descriptors.
//!
//! [`TreeTensorGenerator`] walks the tree layer by layer (leaves first), left
//! to right within each layer, and yields one [`TensorDescriptor`] per tensor.
//! The downward legs of layer `i` reuse the upward family of layer `i - 1`
//! (the physical legs for `i == 0`), which is what glues consecutive layers
//! together.

use std::iter::FusedIterator;

use ttn_core::{BondId, IndexId, TagSet};

use crate::layout::{layer_tag, IndexFamily, TreeLayout, TreeNaming};

/// Everything about one tensor except its array payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorDescriptor {
    /// Layer the tensor belongs to.
    pub layer: usize,
    /// Position of the tensor within its layer.
    pub position: usize,
    /// Child slots in the layer below (site numbers for layer 0).
    pub children: Vec<usize>,
    /// Legs: `base` downward legs, then one upward leg.
    pub indices: Vec<IndexId>,
    /// Layer tag, plus the owned site tags for layer 0.
    pub tags: TagSet,
}

/// Iterator over the tensors of a tree, in layer-major order.
#[derive(Debug, Clone)]
pub struct TreeTensorGenerator {
    layout: TreeLayout,
    naming: TreeNaming,
    /// Upward family of each layer; exactly `layout.nlayers()` entries.
    families: Vec<BondId>,
    layer: usize,
    position: usize,
}

impl TreeTensorGenerator {
    /// Create a generator with freshly minted bond families, one per layer.
    ///
    /// `families()[i]` names the legs between layer `i` and `i + 1`.
    pub fn with_fresh_families(layout: TreeLayout, naming: TreeNaming) -> Self {
        let families = (0..layout.nlayers()).map(|_| BondId::fresh()).collect();
        Self {
            layout,
            naming,
            families,
            layer: 0,
            position: 0,
        }
    }

    /// Bond families used by this generator, one per layer.
    pub fn families(&self) -> &[BondId] {
        &self.families
    }

    fn lower_family(&self, layer: usize) -> IndexFamily {
        match layer {
            0 => IndexFamily::Site,
            _ => IndexFamily::Bond(self.families[layer - 1]),
        }
    }

    fn describe(&self, layer: usize, position: usize) -> TensorDescriptor {
        let lower = self.lower_family(layer);
        let upper = IndexFamily::Bond(self.families[layer]);
        let children = self.layout.children(layer, position);

        let mut indices: Vec<IndexId> = children.iter().map(|&c| lower.index_id(c)).collect();
        indices.push(upper.index_id(position));

        let mut tags = TagSet::new();
        tags.add_tag(&layer_tag(layer));
        if layer == 0 {
            for &site in &children {
                tags.add_tag(&self.naming.site_tag(site));
            }
        }

        TensorDescriptor {
            layer,
            position,
            children,
            indices,
            tags,
        }
    }

    fn remaining(&self) -> usize {
        let current = self.layout.layer_len(self.layer).saturating_sub(self.position);
        let above: usize = (self.layer + 1..self.layout.nlayers())
            .map(|l| self.layout.layer_len(l))
            .sum();
        current + above
    }
}

impl Iterator for TreeTensorGenerator {
    type Item = TensorDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        while self.layer < self.layout.nlayers() {
            if self.position < self.layout.layer_len(self.layer) {
                let descriptor = self.describe(self.layer, self.position);
                self.position += 1;
                return Some(descriptor);
            }
            self.layer += 1;
            self.position = 0;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for TreeTensorGenerator {}

impl FusedIterator for TreeTensorGenerator {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::IrregularLayerPolicy;
    use std::collections::HashMap;
    use ttn_core::Template;

    fn naming() -> TreeNaming {
        TreeNaming::new(Template::parse("k{}").unwrap(), Template::parse("I{}").unwrap())
    }

    fn generator(n: usize, base: usize, policy: IrregularLayerPolicy) -> TreeTensorGenerator {
        let layout = TreeLayout::new(n, base, policy).unwrap();
        TreeTensorGenerator::with_fresh_families(layout, naming())
    }

    #[test]
    fn test_layer_major_order() {
        let descriptors: Vec<_> = generator(8, 2, IrregularLayerPolicy::Reject).collect();
        let order: Vec<(usize, usize)> = descriptors.iter().map(|d| (d.layer, d.position)).collect();
        assert_eq!(
            order,
            vec![(0, 0), (0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (2, 0)]
        );
    }

    #[test]
    fn test_one_fresh_family_per_layer() {
        let iter = generator(27, 3, IrregularLayerPolicy::Reject);
        let families = iter.families().to_vec();
        assert_eq!(families.len(), 3);
        assert!(families.windows(2).all(|w| w[0] != w[1]));

        let top = iter.last().unwrap();
        assert_eq!(top.indices[3], IndexId::Bond { family: families[2], slot: 0 });
    }

    #[test]
    fn test_exact_size() {
        let mut iter = generator(16, 2, IrregularLayerPolicy::Reject);
        assert_eq!(iter.len(), 15);
        iter.next();
        assert_eq!(iter.len(), 14);
        assert_eq!(iter.by_ref().count(), 14);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_leaf_descriptor() {
        let iter = generator(8, 2, IrregularLayerPolicy::Reject);
        let up = iter.families()[0];
        let leaves: Vec<_> = iter.take(4).collect();

        let leaf = &leaves[1];
        assert_eq!(leaf.children, vec![2, 3]);
        assert_eq!(
            leaf.indices,
            vec![
                IndexId::Site(2),
                IndexId::Site(3),
                IndexId::Bond { family: up, slot: 1 }
            ]
        );
        assert_eq!(leaf.tags.iter().collect::<Vec<_>>(), vec!["I2", "I3", "_LAYER0"]);
    }

    #[test]
    fn test_layers_chain_through_families() {
        let iter = generator(9, 3, IrregularLayerPolicy::Reject);
        let families = iter.families().to_vec();
        let descriptors: Vec<_> = iter.collect();
        assert_eq!(descriptors.len(), 4);

        let top = &descriptors[3];
        assert_eq!(top.layer, 1);
        assert_eq!(
            top.indices,
            vec![
                IndexId::Bond { family: families[0], slot: 0 },
                IndexId::Bond { family: families[0], slot: 1 },
                IndexId::Bond { family: families[0], slot: 2 },
                IndexId::Bond { family: families[1], slot: 0 },
            ]
        );
        assert_eq!(top.tags.iter().collect::<Vec<_>>(), vec!["_LAYER1"]);
    }

    #[test]
    fn test_every_bond_pairs_child_with_parent() {
        let descriptors: Vec<_> = generator(64, 4, IrregularLayerPolicy::Reject).collect();
        let mut counts: HashMap<IndexId, usize> = HashMap::new();
        for d in &descriptors {
            assert_eq!(d.indices.len(), 5);
            for id in &d.indices {
                *counts.entry(id.clone()).or_default() += 1;
            }
        }
        let top_legs: Vec<_> = descriptors
            .iter()
            .filter(|d| d.layer == 2)
            .map(|d| d.indices[4].clone())
            .collect();
        for (id, count) in counts {
            let expected = if id.site().is_some() || top_legs.contains(&id) { 1 } else { 2 };
            assert_eq!(count, expected, "index {} used {} times", id, count);
        }
    }

    #[test]
    fn test_wrap_reuses_early_slots() {
        let iter = generator(6, 2, IrregularLayerPolicy::Wrap);
        let families = iter.families().to_vec();
        let descriptors: Vec<_> = iter.collect();
        // layers of 3, 2 and 1 tensors
        assert_eq!(descriptors.len(), 6);

        let wrapped = &descriptors[4];
        assert_eq!((wrapped.layer, wrapped.position), (1, 1));
        assert_eq!(wrapped.children, vec![2, 0]);
        assert_eq!(wrapped.indices[1], IndexId::Bond { family: families[0], slot: 0 });
    }
}
