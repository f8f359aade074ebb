//! Options for tree tensor network construction.
//!
//! Provides:
//! - [`TreeTNOptions`]: branching factor, naming templates, topology policy
//! - [`IrregularLayerPolicy`]: what to do when the site count is not a power of the base

use ttn_core::NetworkOptions;

/// Policy for site counts that are not an exact power of the branching factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IrregularLayerPolicy {
    /// Require `n == base^k` with `k >= 1`.
    #[default]
    Reject,
    /// Derive the layer count by rounding `log_base(n)` and wrap child slots
    /// modulo the layer width. Groups that run past the end of a layer connect
    /// back to the first slots of that layer, and some sites may be left
    /// without a complete causal cone.
    Wrap,
}

/// Options for building a [`TreeTN`](crate::TreeTN).
///
/// # Builder Pattern
///
/// ```
/// use ttn_tree::{IrregularLayerPolicy, TreeTNOptions};
///
/// let options = TreeTNOptions::default()
///     .with_base(3)
///     .with_site_tag_id("SITE{}")
///     .with_policy(IrregularLayerPolicy::Wrap);
/// assert_eq!(options.base, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeTNOptions {
    /// Branching factor: number of children per tensor.
    pub base: usize,
    /// Reserved for dangling legs; accepted but has no effect on the topology.
    pub dangle: bool,
    /// Template for physical index names, one `{}` placeholder.
    pub site_ind_id: String,
    /// Template for site tags, one `{}` placeholder.
    pub site_tag_id: String,
    /// Policy for site counts that are not a power of `base`.
    pub policy: IrregularLayerPolicy,
    /// Options forwarded to the tensor container.
    ///
    /// `check_collisions` and `structure` are overridden by the builder.
    pub network: NetworkOptions,
}

impl Default for TreeTNOptions {
    fn default() -> Self {
        Self {
            base: 2,
            dangle: false,
            site_ind_id: "k{}".to_string(),
            site_tag_id: "I{}".to_string(),
            policy: IrregularLayerPolicy::Reject,
            network: NetworkOptions::default(),
        }
    }
}

impl TreeTNOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the branching factor.
    pub fn with_base(mut self, base: usize) -> Self {
        self.base = base;
        self
    }

    /// Set the reserved `dangle` flag.
    pub fn with_dangle(mut self, dangle: bool) -> Self {
        self.dangle = dangle;
        self
    }

    /// Set the physical index template.
    pub fn with_site_ind_id(mut self, site_ind_id: &str) -> Self {
        self.site_ind_id = site_ind_id.to_string();
        self
    }

    /// Set the site tag template.
    pub fn with_site_tag_id(mut self, site_tag_id: &str) -> Self {
        self.site_tag_id = site_tag_id.to_string();
        self
    }

    /// Set the irregular layer policy.
    pub fn with_policy(mut self, policy: IrregularLayerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the options forwarded to the tensor container.
    pub fn with_network_options(mut self, network: NetworkOptions) -> Self {
        self.network = network;
        self
    }

    /// Container options with the builder's overrides applied.
    pub(crate) fn container_options(&self) -> NetworkOptions {
        self.network
            .clone()
            .with_check_collisions(false)
            .with_structure(&self.site_tag_id)
    }
}
