//! Tensors: an array payload with ordered legs and tags.

use std::sync::Arc;

use crate::error::{NetworkError, Result};
use crate::index::{Index, IndexId};
use crate::storage::DenseArray;
use crate::tagset::TagSet;

/// A tensor: one shared array payload, an ordered tuple of legs and a tag set.
///
/// Leg dimensions are taken from the array shape, leg `k` matching axis `k`.
#[derive(Debug, Clone)]
pub struct Tensor {
    /// Ordered legs, one per array axis.
    pub indices: Vec<Index>,
    /// Tags used for group-wise lookup.
    pub tags: TagSet,
    /// Array payload, possibly shared with other tensors.
    pub data: Arc<DenseArray>,
}

impl Tensor {
    /// Create a tensor from an array and one index id per axis.
    ///
    /// Returns [`NetworkError::ShapeMismatch`] if the number of ids differs
    /// from the array rank.
    pub fn new(data: Arc<DenseArray>, ids: Vec<IndexId>, tags: TagSet) -> Result<Self> {
        let dims = data.dims();
        if dims.len() != ids.len() {
            return Err(NetworkError::ShapeMismatch {
                expected: dims.len(),
                got: ids.len(),
            });
        }
        let indices = ids
            .into_iter()
            .zip(dims)
            .map(|(id, dim)| Index::new(id, dim))
            .collect();
        Ok(Self { indices, tags, data })
    }

    /// Get the rank (number of legs).
    pub fn rank(&self) -> usize {
        self.indices.len()
    }

    /// Get the dimensions of all legs, in order.
    pub fn dims(&self) -> Vec<usize> {
        self.indices.iter().map(|i| i.dim).collect()
    }

    /// Get the ids of all legs, in order.
    pub fn index_ids(&self) -> impl Iterator<Item = &IndexId> + '_ {
        self.indices.iter().map(|i| &i.id)
    }

    /// Check whether the tensor has a leg with the given id.
    pub fn has_index(&self, id: &IndexId) -> bool {
        self.indices.iter().any(|i| &i.id == id)
    }

    /// Check if a tag is present.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.has_tag(tag)
    }

    /// Returns true if both tensors point at the same array payload.
    pub fn shares_data_with(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_takes_dims_from_array() {
        let data = DenseArray::ones_f64(&[2, 3, 4]).unwrap();
        let t = Tensor::new(
            data,
            vec![IndexId::Site(0), IndexId::Site(1), IndexId::named("up")],
            TagSet::from_tags(["A"]),
        )
        .unwrap();
        assert_eq!(t.rank(), 3);
        assert_eq!(t.dims(), vec![2, 3, 4]);
        assert!(t.has_index(&IndexId::named("up")));
        assert!(t.has_tag("A"));
    }

    #[test]
    fn test_rank_mismatch() {
        let data = DenseArray::ones_f64(&[2, 2]).unwrap();
        let err = Tensor::new(data, vec![IndexId::Site(0)], TagSet::new()).unwrap_err();
        assert_eq!(err, NetworkError::ShapeMismatch { expected: 2, got: 1 });
    }

    #[test]
    fn test_shared_payload() {
        let data = DenseArray::ones_f64(&[2]).unwrap();
        let a = Tensor::new(data.clone(), vec![IndexId::Site(0)], TagSet::new()).unwrap();
        let b = Tensor::new(data, vec![IndexId::Site(1)], TagSet::new()).unwrap();
        assert!(a.shares_data_with(&b));
    }
}
