//! Dense array payloads carried by tensors.
//!
//! Arrays are always handed around as `Arc<DenseArray>`: several tensors may
//! point at the same payload, and cloning a network never copies array data.

use mdarray::{DynRank, Shape, Tensor};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::sync::Arc;

use crate::error::{NetworkError, Result};

/// Dense storage for array elements, wrapping mdarray's Tensor with dynamic rank.
#[derive(Debug, Clone)]
pub struct DenseStorage<T>(Tensor<T, DynRank>);

impl<T> DenseStorage<T> {
    /// Create a new DenseStorage from a Vec with explicit shape.
    ///
    /// Returns an error if the product of dims doesn't match vec.len().
    pub fn from_vec_with_shape(vec: Vec<T>, dims: &[usize]) -> Result<Self> {
        let expected_len: usize = dims.iter().product();
        if vec.len() != expected_len {
            return Err(NetworkError::ShapeMismatch {
                expected: expected_len,
                got: vec.len(),
            });
        }
        let tensor = Tensor::from(vec).into_shape(DynRank::from_dims(dims));
        Ok(Self(tensor))
    }

    /// Get the shape (dimensions) of the storage.
    pub fn dims(&self) -> Vec<usize> {
        self.0.shape().with_dims(|d| d.to_vec())
    }

    /// Get the rank (number of dimensions).
    pub fn rank(&self) -> usize {
        self.0.rank()
    }

    /// Get underlying data as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.0[..]
    }
}

impl DenseStorage<f64> {
    /// Create storage with standard normal values with explicit shape.
    pub fn random<R: Rng>(rng: &mut R, dims: &[usize]) -> Result<Self> {
        let size: usize = dims.iter().product();
        let data: Vec<f64> = (0..size).map(|_| StandardNormal.sample(rng)).collect();
        Self::from_vec_with_shape(data, dims)
    }
}

impl DenseStorage<Complex64> {
    /// Create storage with random complex values (re, im both from standard normal).
    pub fn random<R: Rng>(rng: &mut R, dims: &[usize]) -> Result<Self> {
        let size: usize = dims.iter().product();
        let data: Vec<Complex64> = (0..size)
            .map(|_| Complex64::new(StandardNormal.sample(rng), StandardNormal.sample(rng)))
            .collect();
        Self::from_vec_with_shape(data, dims)
    }
}

/// Type-erased dense array payload.
#[derive(Debug, Clone)]
pub enum DenseArray {
    /// Real-valued array
    F64(DenseStorage<f64>),
    /// Complex-valued array
    C64(DenseStorage<Complex64>),
}

impl DenseArray {
    /// Create a shared real array from a Vec with explicit shape.
    pub fn from_vec_f64(data: Vec<f64>, dims: &[usize]) -> Result<Arc<Self>> {
        Ok(Arc::new(DenseArray::F64(DenseStorage::from_vec_with_shape(data, dims)?)))
    }

    /// Create a shared real array filled with ones.
    pub fn ones_f64(dims: &[usize]) -> Result<Arc<Self>> {
        let size: usize = dims.iter().product();
        Self::from_vec_f64(vec![1.0; size], dims)
    }

    /// Create a shared real array with standard normal entries.
    pub fn random_f64<R: Rng>(rng: &mut R, dims: &[usize]) -> Result<Arc<Self>> {
        Ok(Arc::new(DenseArray::F64(DenseStorage::<f64>::random(rng, dims)?)))
    }

    /// Create a shared complex array with standard normal real and imaginary parts.
    pub fn random_c64<R: Rng>(rng: &mut R, dims: &[usize]) -> Result<Arc<Self>> {
        Ok(Arc::new(DenseArray::C64(DenseStorage::<Complex64>::random(rng, dims)?)))
    }

    /// Get the shape (dimensions) of the array.
    pub fn dims(&self) -> Vec<usize> {
        match self {
            DenseArray::F64(s) => s.dims(),
            DenseArray::C64(s) => s.dims(),
        }
    }

    /// Get the rank (number of dimensions).
    pub fn rank(&self) -> usize {
        match self {
            DenseArray::F64(s) => s.rank(),
            DenseArray::C64(s) => s.rank(),
        }
    }

    /// Returns true for complex-valued arrays.
    pub fn is_complex(&self) -> bool {
        matches!(self, DenseArray::C64(_))
    }
}
