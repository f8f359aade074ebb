//! Generic tensor network container.
//!
//! A [`TensorNetwork`] stores tensors as nodes of an undirected petgraph
//! `StableGraph`. Tensors that share an [`IndexId`] are connected by an edge
//! carrying that id. Two lookup tables are maintained incrementally:
//!
//! - tag -> nodes, for O(1) group lookup by tag
//! - index id -> nodes, for resolving shared legs into connections
//!
//! Once built, the network is mutable by tag only.

use std::collections::{BTreeSet, HashMap};

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Undirected;
use tracing::{debug, trace};

use crate::error::{NetworkError, Result};
use crate::index::IndexId;
use crate::template::Template;
use crate::tensor::Tensor;

/// Options for building a [`TensorNetwork`].
///
/// # Builder Pattern
///
/// ```
/// use ttn_core::NetworkOptions;
///
/// let options = NetworkOptions::default()
///     .with_check_collisions(false)
///     .with_structure("I{}");
/// assert!(!options.check_collisions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkOptions {
    /// If true, an index may be shared by at most two tensors.
    /// If false, hyper-indices are accepted and every pair of holders is connected.
    pub check_collisions: bool,
    /// Site-tag template describing how sites are tagged, if the network has sites.
    pub structure: Option<String>,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            check_collisions: true,
            structure: None,
        }
    }
}

impl NetworkOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the pairwise-bond check.
    pub fn with_check_collisions(mut self, check: bool) -> Self {
        self.check_collisions = check;
        self
    }

    /// Set the site-tag template.
    pub fn with_structure(mut self, structure: &str) -> Self {
        self.structure = Some(structure.to_string());
        self
    }
}

/// Operations a tensor container must provide to be populated by a builder.
///
/// The builder ingests a sequence of tensors once, then only reads tensors,
/// runs neighbor queries and adds tags.
pub trait TensorContainer: Clone + Sized {
    /// Build a container by draining `tensors` in order.
    fn from_tensors<I>(tensors: I, options: &NetworkOptions) -> Result<Self>
    where
        I: IntoIterator<Item = Tensor>;

    /// Get the tensor stored at `node`.
    fn tensor(&self, node: NodeIndex) -> Option<&Tensor>;

    /// Nodes whose tensor carries `tag`, in insertion order.
    fn select(&self, tag: &str) -> Vec<NodeIndex>;

    /// Nodes sharing at least one index with a tensor tagged `tag`,
    /// excluding the tagged tensors themselves, in insertion order.
    fn select_neighbors(&self, tag: &str) -> Vec<NodeIndex>;

    /// Add `tag` to the tensor at `node`. Returns true if the tag is new.
    fn add_tag(&mut self, node: NodeIndex, tag: &str) -> Result<bool>;

    /// Number of tensors.
    fn node_count(&self) -> usize;
}

/// Tag-indexed tensor network.
#[derive(Debug, Clone, Default)]
pub struct TensorNetwork {
    /// Tensors as nodes; edges carry the shared index id.
    graph: StableGraph<Tensor, IndexId, Undirected>,
    /// Node handles in insertion order.
    order: Vec<NodeIndex>,
    /// Mapping: tag -> nodes carrying it
    tag_map: HashMap<String, BTreeSet<NodeIndex>>,
    /// Mapping: index id -> nodes carrying it (each node at most once)
    ind_map: HashMap<IndexId, Vec<NodeIndex>>,
    /// Site-tag template, if any.
    structure: Option<Template>,
    check_collisions: bool,
}

impl TensorNetwork {
    /// Create an empty network.
    pub fn new(options: &NetworkOptions) -> Result<Self> {
        let structure = options
            .structure
            .as_deref()
            .map(Template::parse)
            .transpose()?;
        Ok(Self {
            structure,
            check_collisions: options.check_collisions,
            ..Self::default()
        })
    }

    /// Add a tensor, connecting it to every tensor already holding one of its indices.
    ///
    /// Returns an error (leaving the network unchanged) if a shared index has a
    /// different dimension, or if collision checking is on and an index would
    /// end up on more than two tensors.
    pub fn push_tensor(&mut self, tensor: Tensor) -> Result<NodeIndex> {
        self.validate_indices(&tensor)?;

        let ids: Vec<IndexId> = tensor.index_ids().cloned().collect();
        let tags: Vec<String> = tensor.tags.iter().map(str::to_string).collect();
        let node = self.graph.add_node(tensor);
        self.order.push(node);

        for tag in tags {
            self.tag_map.entry(tag).or_default().insert(node);
        }

        for id in ids {
            let holders = self.ind_map.entry(id.clone()).or_default();
            if holders.contains(&node) {
                continue;
            }
            let peers = holders.clone();
            holders.push(node);
            for peer in peers {
                self.graph.add_edge(peer, node, id.clone());
            }
        }

        trace!(node = node.index(), "added tensor to network");
        Ok(node)
    }

    fn validate_indices(&self, tensor: &Tensor) -> Result<()> {
        let mut seen: HashMap<&IndexId, usize> = HashMap::new();
        for index in &tensor.indices {
            if let Some(&dim) = seen.get(&index.id) {
                if dim != index.dim {
                    return Err(NetworkError::DimensionMismatch {
                        index: index.id.clone(),
                        expected: dim,
                        got: index.dim,
                    });
                }
                continue;
            }
            seen.insert(&index.id, index.dim);

            let Some(holders) = self.ind_map.get(&index.id) else {
                continue;
            };
            if let Some(expected) = holders.first().and_then(|n| self.index_dim(*n, &index.id)) {
                if expected != index.dim {
                    return Err(NetworkError::DimensionMismatch {
                        index: index.id.clone(),
                        expected,
                        got: index.dim,
                    });
                }
            }
            if self.check_collisions && holders.len() >= 2 {
                return Err(NetworkError::IndexCollision {
                    index: index.id.clone(),
                    count: holders.len() + 1,
                });
            }
        }
        Ok(())
    }

    fn index_dim(&self, node: NodeIndex, id: &IndexId) -> Option<usize> {
        self.graph
            .node_weight(node)?
            .indices
            .iter()
            .find(|i| &i.id == id)
            .map(|i| i.dim)
    }

    /// Number of connections (one edge per pair of tensors per shared index).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over `(node, tensor)` pairs in insertion order.
    pub fn tensors(&self) -> impl Iterator<Item = (NodeIndex, &Tensor)> + '_ {
        self.order
            .iter()
            .filter_map(move |n| self.graph.node_weight(*n).map(|t| (*n, t)))
    }

    /// Node handles in insertion order.
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.order
    }

    /// Tensors connected to `node`, in insertion order.
    pub fn neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        if !self.graph.contains_node(node) {
            return Vec::new();
        }
        self.graph
            .neighbors(node)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of tensors carrying the index `id`.
    pub fn index_count(&self, id: &IndexId) -> usize {
        self.ind_map.get(id).map_or(0, Vec::len)
    }

    /// Indices appearing exactly once in the whole network, sorted.
    pub fn outer_indices(&self) -> Vec<IndexId> {
        let mut outer: Vec<IndexId> = self
            .ind_map
            .iter()
            .filter(|(id, holders)| {
                holders.len() == 1
                    && self.graph.node_weight(holders[0]).is_some_and(|t| {
                        t.index_ids().filter(|other| other == id).count() == 1
                    })
            })
            .map(|(id, _)| id.clone())
            .collect();
        outer.sort();
        outer
    }

    /// All tags present in the network, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tag_map.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Tag of `site` under the network's structure template.
    pub fn site_tag(&self, site: usize) -> Option<String> {
        self.structure.as_ref().map(|t| t.format(site))
    }
}

impl TensorContainer for TensorNetwork {
    fn from_tensors<I>(tensors: I, options: &NetworkOptions) -> Result<Self>
    where
        I: IntoIterator<Item = Tensor>,
    {
        let mut tn = Self::new(options)?;
        for tensor in tensors {
            tn.push_tensor(tensor)?;
        }
        debug!(
            tensors = tn.order.len(),
            edges = tn.graph.edge_count(),
            check_collisions = tn.check_collisions,
            "built tensor network"
        );
        Ok(tn)
    }

    fn tensor(&self, node: NodeIndex) -> Option<&Tensor> {
        self.graph.node_weight(node)
    }

    fn select(&self, tag: &str) -> Vec<NodeIndex> {
        self.tag_map
            .get(tag)
            .map(|nodes| nodes.iter().copied().collect())
            .unwrap_or_default()
    }

    fn select_neighbors(&self, tag: &str) -> Vec<NodeIndex> {
        let Some(tagged) = self.tag_map.get(tag) else {
            return Vec::new();
        };
        tagged
            .iter()
            .flat_map(|n| self.graph.neighbors(*n))
            .filter(|n| !tagged.contains(n))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn add_tag(&mut self, node: NodeIndex, tag: &str) -> Result<bool> {
        let tensor = self
            .graph
            .node_weight_mut(node)
            .ok_or_else(|| NetworkError::NodeNotFound {
                node: format!("{:?}", node),
            })?;
        let added = tensor.tags.add_tag(tag);
        if added {
            self.tag_map.entry(tag.to_string()).or_default().insert(node);
        }
        Ok(added)
    }

    fn node_count(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DenseArray;
    use crate::tagset::TagSet;

    fn tensor(ids: &[&str], dims: &[usize], tags: &[&str]) -> Tensor {
        Tensor::new(
            DenseArray::ones_f64(dims).unwrap(),
            ids.iter().map(|s| IndexId::named(s)).collect(),
            TagSet::from_tags(tags.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn test_chain_connections() {
        let tensors = vec![
            tensor(&["p0", "b01"], &[2, 3], &["A"]),
            tensor(&["b01", "p1", "b12"], &[3, 2, 4], &["B"]),
            tensor(&["b12", "p2"], &[4, 2], &["C"]),
        ];
        let tn = TensorNetwork::from_tensors(tensors, &NetworkOptions::default()).unwrap();

        assert_eq!(tn.node_count(), 3);
        assert_eq!(tn.edge_count(), 2);
        let nodes = tn.nodes().to_vec();
        assert_eq!(tn.neighbors(nodes[1]), vec![nodes[0], nodes[2]]);
        assert_eq!(
            tn.outer_indices(),
            vec![IndexId::named("p0"), IndexId::named("p1"), IndexId::named("p2")]
        );
    }

    #[test]
    fn test_select_neighbors_excludes_tagged() {
        let tensors = vec![
            tensor(&["p0", "b01"], &[2, 3], &["A", "X"]),
            tensor(&["b01", "b12"], &[3, 4], &["B", "X"]),
            tensor(&["b12", "p2"], &[4, 2], &["C"]),
        ];
        let tn = TensorNetwork::from_tensors(tensors, &NetworkOptions::default()).unwrap();
        let nodes = tn.nodes().to_vec();

        assert_eq!(tn.select("X"), vec![nodes[0], nodes[1]]);
        assert_eq!(tn.select_neighbors("X"), vec![nodes[2]]);
        assert_eq!(tn.select_neighbors("A"), vec![nodes[1]]);
        assert!(tn.select_neighbors("missing").is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let tensors = vec![
            tensor(&["a", "b"], &[2, 3], &[]),
            tensor(&["b", "c"], &[4, 2], &[]),
        ];
        let err = TensorNetwork::from_tensors(tensors, &NetworkOptions::default()).unwrap_err();
        assert_eq!(
            err,
            NetworkError::DimensionMismatch {
                index: IndexId::named("b"),
                expected: 3,
                got: 4
            }
        );
    }

    #[test]
    fn test_hyperindex_collision_policy() {
        let make = || {
            vec![
                tensor(&["h", "a"], &[2, 2], &[]),
                tensor(&["h", "b"], &[2, 2], &[]),
                tensor(&["h", "c"], &[2, 2], &[]),
            ]
        };

        let err = TensorNetwork::from_tensors(make(), &NetworkOptions::default()).unwrap_err();
        assert_eq!(
            err,
            NetworkError::IndexCollision {
                index: IndexId::named("h"),
                count: 3
            }
        );

        let options = NetworkOptions::default().with_check_collisions(false);
        let tn = TensorNetwork::from_tensors(make(), &options).unwrap();
        assert_eq!(tn.index_count(&IndexId::named("h")), 3);
        assert_eq!(tn.edge_count(), 3);
    }

    #[test]
    fn test_add_tag_updates_lookup() {
        let tensors = vec![tensor(&["a"], &[2], &[])];
        let mut tn = TensorNetwork::from_tensors(tensors, &NetworkOptions::default()).unwrap();
        let node = tn.nodes()[0];

        assert!(tn.add_tag(node, "T").unwrap());
        assert!(!tn.add_tag(node, "T").unwrap());
        assert_eq!(tn.select("T"), vec![node]);
        assert_eq!(tn.tags(), vec!["T"]);

        let missing = NodeIndex::new(42);
        assert!(matches!(tn.add_tag(missing, "T"), Err(NetworkError::NodeNotFound { .. })));
    }

    #[test]
    fn test_structure_template() {
        let options = NetworkOptions::default().with_structure("I{}");
        let tn = TensorNetwork::new(&options).unwrap();
        assert_eq!(tn.site_tag(3).as_deref(), Some("I3"));

        let bad = NetworkOptions::default().with_structure("I");
        assert!(TensorNetwork::new(&bad).is_err());
    }
}
