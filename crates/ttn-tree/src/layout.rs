//! Tree layout and naming.
//!
//! [`TreeLayout`] derives the layer structure of a complete `base`-ary tree
//! over `n` sites. [`TreeNaming`] maps sites and layer boundaries to typed
//! index ids and tags.
//!
//! Layer `i` has `width(i) = n / base^i` slots, grouped `base` at a time into
//! `ceil(width(i) / base)` tensors. Tensor `p` of layer `i` owns slots
//! `p*base .. p*base + base` (taken modulo the width) and points upward to
//! slot `p` of layer `i + 1`.

use std::ops::Range;

use ttn_core::{BondId, IndexId, Template};

use crate::error::TreeTNError;
use crate::options::IrregularLayerPolicy;

/// Layer structure of a tree over `n` sites with branching factor `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLayout {
    n: usize,
    base: usize,
    nlayers: usize,
    policy: IrregularLayerPolicy,
}

impl TreeLayout {
    /// Derive the layout, validating `n` against `policy`.
    ///
    /// # Example
    /// ```
    /// use ttn_tree::{IrregularLayerPolicy, TreeLayout};
    ///
    /// let layout = TreeLayout::new(8, 2, IrregularLayerPolicy::Reject).unwrap();
    /// assert_eq!(layout.nlayers(), 3);
    /// assert_eq!(layout.total_tensors(), 7);
    /// assert!(TreeLayout::new(6, 2, IrregularLayerPolicy::Reject).is_err());
    /// ```
    pub fn new(n: usize, base: usize, policy: IrregularLayerPolicy) -> Result<Self, TreeTNError> {
        if base < 2 {
            return Err(TreeTNError::InvalidBase { base });
        }
        if n == 0 {
            return Err(TreeTNError::InvalidSiteCount { n });
        }
        let nlayers = match policy {
            IrregularLayerPolicy::Reject => exact_log(n, base).ok_or(TreeTNError::NotPowerOfBase { n, base })?,
            IrregularLayerPolicy::Wrap => rounded_log(n, base),
        };
        Ok(Self {
            n,
            base,
            nlayers,
            policy,
        })
    }

    /// Number of sites.
    pub fn nsites(&self) -> usize {
        self.n
    }

    /// Branching factor.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Number of layers.
    pub fn nlayers(&self) -> usize {
        self.nlayers
    }

    /// Policy the layout was derived with.
    pub fn policy(&self) -> IrregularLayerPolicy {
        self.policy
    }

    /// Number of slots in `layer` (`n / base^layer`).
    pub fn layer_width(&self, layer: usize) -> usize {
        match u32::try_from(layer).ok().and_then(|l| self.base.checked_pow(l)) {
            Some(stride) => self.n / stride,
            None => 0,
        }
    }

    /// Number of tensors in `layer`.
    pub fn layer_len(&self, layer: usize) -> usize {
        if layer >= self.nlayers {
            return 0;
        }
        self.layer_width(layer).div_ceil(self.base)
    }

    /// Total number of tensors over all layers.
    pub fn total_tensors(&self) -> usize {
        (0..self.nlayers).map(|l| self.layer_len(l)).sum()
    }

    /// Child slots of tensor `position` in `layer`.
    ///
    /// Slots past the end of the layer wrap to its start.
    pub fn children(&self, layer: usize, position: usize) -> Vec<usize> {
        let width = self.layer_width(layer);
        if width == 0 {
            return Vec::new();
        }
        let start = position * self.base;
        (0..self.base).map(|b| (start + b) % width).collect()
    }

    /// Whether `n == base^nlayers`, i.e. no layer wraps.
    pub fn is_regular(&self) -> bool {
        u32::try_from(self.nlayers)
            .ok()
            .and_then(|k| self.base.checked_pow(k))
            == Some(self.n)
    }

    /// Sites in the subtree of tensor `position` in `layer`.
    ///
    /// `None` for irregular layouts, where subtrees overlap, or for a
    /// position outside the layer.
    pub fn subtree_sites(&self, layer: usize, position: usize) -> Option<Range<usize>> {
        if !self.is_regular() || position >= self.layer_len(layer) {
            return None;
        }
        let span = self.subtree_span(layer);
        Some(position * span..(position + 1) * span)
    }

    /// Position of the tensor in `layer` whose subtree holds `site`.
    ///
    /// `None` for irregular layouts, for `site >= n` or `layer >= nlayers`.
    pub fn ancestor(&self, site: usize, layer: usize) -> Option<usize> {
        if !self.is_regular() || site >= self.n || layer >= self.nlayers {
            return None;
        }
        Some(site / self.subtree_span(layer))
    }

    /// Sites below one tensor of `layer` in a regular layout: `base^(layer + 1)`.
    fn subtree_span(&self, layer: usize) -> usize {
        self.n / self.layer_width(layer + 1).max(1)
    }
}

/// `k` such that `base^k == n` and `k >= 1`.
fn exact_log(n: usize, base: usize) -> Option<usize> {
    let mut m = n;
    let mut k = 0;
    while m > 1 && m % base == 0 {
        m /= base;
        k += 1;
    }
    (m == 1 && k >= 1).then_some(k)
}

/// `log_base(n)` rounded half to even.
fn rounded_log(n: usize, base: usize) -> usize {
    let exact = (n as f64).log2() / (base as f64).log2();
    exact.round_ties_even().max(0.0) as usize
}

/// Tag carried by every tensor of `layer`.
pub fn layer_tag(layer: usize) -> String {
    format!("_LAYER{}", layer)
}

/// Family of indices connecting one layer to the layer below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFamily {
    /// Physical legs, below layer 0.
    Site,
    /// Virtual legs minted for one layer boundary.
    Bond(BondId),
}

impl IndexFamily {
    /// Index id of `slot` in this family.
    pub fn index_id(self, slot: usize) -> IndexId {
        match self {
            IndexFamily::Site => IndexId::Site(slot),
            IndexFamily::Bond(family) => IndexId::Bond { family, slot },
        }
    }
}

/// Naming scheme for sites: index template and tag template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNaming {
    site_ind_id: Template,
    site_tag_id: Template,
}

impl TreeNaming {
    /// Create a naming scheme from parsed templates.
    pub fn new(site_ind_id: Template, site_tag_id: Template) -> Self {
        Self {
            site_ind_id,
            site_tag_id,
        }
    }

    /// Name of the physical index of `site`.
    pub fn site_ind(&self, site: usize) -> String {
        self.site_ind_id.format(site)
    }

    /// Tag of `site`.
    pub fn site_tag(&self, site: usize) -> String {
        self.site_tag_id.format(site)
    }

    /// Physical index template.
    pub fn site_ind_id(&self) -> &Template {
        &self.site_ind_id
    }

    /// Site tag template.
    pub fn site_tag_id(&self) -> &Template {
        &self.site_tag_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_powers() {
        assert_eq!(exact_log(8, 2), Some(3));
        assert_eq!(exact_log(27, 3), Some(3));
        assert_eq!(exact_log(2, 2), Some(1));
        assert_eq!(exact_log(1, 2), None);
        assert_eq!(exact_log(12, 2), None);
    }

    #[test]
    fn test_rounded_log_ties_to_even() {
        assert_eq!(rounded_log(6, 2), 3);
        assert_eq!(rounded_log(5, 2), 2);
        // log_4(8) = 1.5, log_4(2) = 0.5
        assert_eq!(rounded_log(8, 4), 2);
        assert_eq!(rounded_log(2, 4), 0);
    }

    #[test]
    fn test_layer_sizes() {
        let layout = TreeLayout::new(27, 3, IrregularLayerPolicy::Reject).unwrap();
        assert_eq!(layout.nlayers(), 3);
        assert_eq!(
            (0..3).map(|l| layout.layer_width(l)).collect::<Vec<_>>(),
            vec![27, 9, 3]
        );
        assert_eq!(
            (0..4).map(|l| layout.layer_len(l)).collect::<Vec<_>>(),
            vec![9, 3, 1, 0]
        );
        assert_eq!(layout.total_tensors(), 13);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            TreeLayout::new(8, 1, IrregularLayerPolicy::Reject),
            Err(TreeTNError::InvalidBase { base: 1 })
        );
        assert_eq!(
            TreeLayout::new(0, 2, IrregularLayerPolicy::Wrap),
            Err(TreeTNError::InvalidSiteCount { n: 0 })
        );
        assert_eq!(
            TreeLayout::new(1, 2, IrregularLayerPolicy::Reject),
            Err(TreeTNError::NotPowerOfBase { n: 1, base: 2 })
        );
    }

    #[test]
    fn test_children_wrap() {
        let layout = TreeLayout::new(6, 2, IrregularLayerPolicy::Wrap).unwrap();
        assert_eq!(layout.nlayers(), 3);
        // layer 1 has width 3: the second group wraps to slot 0
        assert_eq!(layout.children(1, 0), vec![0, 1]);
        assert_eq!(layout.children(1, 1), vec![2, 0]);
        // layer 2 has width 1: both children collapse onto slot 0
        assert_eq!(layout.children(2, 0), vec![0, 0]);
    }

    #[test]
    fn test_subtree_and_ancestor() {
        let layout = TreeLayout::new(8, 2, IrregularLayerPolicy::Reject).unwrap();
        assert_eq!(layout.subtree_sites(0, 3), Some(6..8));
        assert_eq!(layout.subtree_sites(1, 1), Some(4..8));
        assert_eq!(layout.subtree_sites(2, 0), Some(0..8));
        assert_eq!(layout.subtree_sites(2, 1), None);
        assert_eq!(layout.ancestor(5, 0), Some(2));
        assert_eq!(layout.ancestor(5, 1), Some(1));
        assert_eq!(layout.ancestor(5, 2), Some(0));
        assert_eq!(layout.ancestor(8, 0), None);
        assert_eq!(layout.ancestor(5, 3), None);
    }

    #[test]
    fn test_irregular_layout_has_no_subtrees() {
        let exact = TreeLayout::new(16, 2, IrregularLayerPolicy::Wrap).unwrap();
        assert!(exact.is_regular());
        assert_eq!(exact.ancestor(9, 1), Some(2));

        let wrapped = TreeLayout::new(6, 2, IrregularLayerPolicy::Wrap).unwrap();
        assert!(!wrapped.is_regular());
        assert_eq!(wrapped.subtree_sites(0, 0), None);
        assert_eq!(wrapped.ancestor(4, 1), None);
    }

    #[test]
    fn test_naming() {
        let naming = TreeNaming::new(Template::parse("k{}").unwrap(), Template::parse("I{}").unwrap());
        assert_eq!(naming.site_ind(4), "k4");
        assert_eq!(naming.site_tag(4), "I4");
        assert_eq!(layer_tag(2), "_LAYER2");
        assert_eq!(IndexFamily::Site.index_id(3), IndexId::Site(3));
        let family = BondId(9);
        assert_eq!(
            IndexFamily::Bond(family).index_id(1),
            IndexId::Bond { family, slot: 1 }
        );
    }
}
