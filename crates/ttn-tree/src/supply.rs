//! Array payload supplies.
//!
//! A supply hands out one array per generated tensor. Arrays are shared
//! (`Arc`), so a supply may give the same payload to several tensors.

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use rand::Rng;
use ttn_core::DenseArray;

use crate::error::TreeTNError;

/// The tensor an array is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    /// Layer of the tensor.
    pub layer: usize,
    /// Position of the tensor within its layer.
    pub position: usize,
    /// Number of legs the array must provide.
    pub rank: usize,
}

/// Source of array payloads for tree construction.
pub trait ArraySupply {
    /// Draw the array for `slot`.
    fn draw(&mut self, slot: &SlotSpec) -> Result<Arc<DenseArray>>;
}

impl<S: ArraySupply + ?Sized> ArraySupply for &mut S {
    fn draw(&mut self, slot: &SlotSpec) -> Result<Arc<DenseArray>> {
        (**self).draw(slot)
    }
}

/// Cycles through a finite collection of arrays, forever.
///
/// With fewer arrays than tensors, tensors share payloads.
#[derive(Debug, Clone)]
pub struct CyclicArrays {
    arrays: Vec<Arc<DenseArray>>,
    next: usize,
}

impl CyclicArrays {
    /// Cycle through `arrays`. Returns an error if `arrays` is empty.
    pub fn new(arrays: Vec<Arc<DenseArray>>) -> Result<Self, TreeTNError> {
        if arrays.is_empty() {
            return Err(TreeTNError::EmptyArraySupply);
        }
        Ok(Self { arrays, next: 0 })
    }

    /// Repeat a single array.
    pub fn single(array: Arc<DenseArray>) -> Self {
        Self {
            arrays: vec![array],
            next: 0,
        }
    }
}

impl From<Arc<DenseArray>> for CyclicArrays {
    fn from(array: Arc<DenseArray>) -> Self {
        Self::single(array)
    }
}

impl ArraySupply for CyclicArrays {
    fn draw(&mut self, _slot: &SlotSpec) -> Result<Arc<DenseArray>> {
        let array = self.arrays[self.next].clone();
        self.next = (self.next + 1) % self.arrays.len();
        Ok(array)
    }
}

/// Hands out each array once, in order.
#[derive(Debug, Clone, Default)]
pub struct OnceArrays {
    arrays: VecDeque<Arc<DenseArray>>,
    drawn: usize,
}

impl OnceArrays {
    /// Use each of `arrays` exactly once.
    pub fn new(arrays: impl IntoIterator<Item = Arc<DenseArray>>) -> Self {
        Self {
            arrays: arrays.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Number of arrays not drawn yet.
    pub fn remaining(&self) -> usize {
        self.arrays.len()
    }
}

impl ArraySupply for OnceArrays {
    fn draw(&mut self, slot: &SlotSpec) -> Result<Arc<DenseArray>> {
        let array = self
            .arrays
            .pop_front()
            .ok_or(TreeTNError::ArraySupplyExhausted {
                drawn: self.drawn,
                layer: slot.layer,
                position: slot.position,
            })?;
        self.drawn += 1;
        Ok(array)
    }
}

/// Leg dimensions for randomly generated trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDims {
    /// Dimension of the physical legs.
    pub phys_dim: usize,
    /// Dimension of the virtual legs.
    pub bond_dim: usize,
    /// Generate complex entries instead of real ones.
    pub complex: bool,
}

impl RandomDims {
    /// Real-valued arrays with the given physical and bond dimensions.
    pub fn new(phys_dim: usize, bond_dim: usize) -> Self {
        Self {
            phys_dim,
            bond_dim,
            complex: false,
        }
    }

    /// Switch to complex-valued arrays.
    pub fn complex(mut self) -> Self {
        self.complex = true;
        self
    }

    /// Shape of the array filling `slot`: physical legs below layer 0, bond legs elsewhere.
    pub fn shape(&self, slot: &SlotSpec) -> Vec<usize> {
        let down = if slot.layer == 0 { self.phys_dim } else { self.bond_dim };
        let mut dims = vec![down; slot.rank.saturating_sub(1)];
        dims.push(self.bond_dim);
        dims
    }
}

/// Generates a fresh array with standard normal entries for every slot.
#[derive(Debug)]
pub struct RandomArrays<'a, R: Rng> {
    rng: &'a mut R,
    dims: RandomDims,
}

impl<'a, R: Rng> RandomArrays<'a, R> {
    /// Draw entries from `rng`.
    pub fn new(rng: &'a mut R, dims: RandomDims) -> Self {
        Self { rng, dims }
    }
}

impl<R: Rng> ArraySupply for RandomArrays<'_, R> {
    fn draw(&mut self, slot: &SlotSpec) -> Result<Arc<DenseArray>> {
        let shape = self.dims.shape(slot);
        let array = if self.dims.complex {
            DenseArray::random_c64(&mut *self.rng, &shape)?
        } else {
            DenseArray::random_f64(&mut *self.rng, &shape)?
        };
        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SLOT: SlotSpec = SlotSpec {
        layer: 0,
        position: 0,
        rank: 3,
    };

    #[test]
    fn test_cyclic_aliases() {
        let a = DenseArray::ones_f64(&[2, 2, 2]).unwrap();
        let b = DenseArray::ones_f64(&[2, 2, 2]).unwrap();
        let mut supply = CyclicArrays::new(vec![a.clone(), b.clone()]).unwrap();

        let drawn: Vec<_> = (0..5).map(|_| supply.draw(&SLOT).unwrap()).collect();
        assert!(Arc::ptr_eq(&drawn[0], &a));
        assert!(Arc::ptr_eq(&drawn[1], &b));
        assert!(Arc::ptr_eq(&drawn[2], &a));
        assert!(Arc::ptr_eq(&drawn[4], &a));
    }

    #[test]
    fn test_cyclic_rejects_empty() {
        assert_eq!(CyclicArrays::new(Vec::new()).unwrap_err(), TreeTNError::EmptyArraySupply);
    }

    #[test]
    fn test_once_exhausts() {
        let a = DenseArray::ones_f64(&[2, 2, 2]).unwrap();
        let mut supply = OnceArrays::new([a]);
        assert!(supply.draw(&SLOT).is_ok());
        assert_eq!(supply.remaining(), 0);

        let slot = SlotSpec {
            layer: 1,
            position: 3,
            rank: 3,
        };
        let err = supply.draw(&slot).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TreeTNError>(),
            Some(&TreeTNError::ArraySupplyExhausted {
                drawn: 1,
                layer: 1,
                position: 3
            })
        );
    }

    #[test]
    fn test_random_shapes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut supply = RandomArrays::new(&mut rng, RandomDims::new(2, 5));

        let leaf = supply.draw(&SLOT).unwrap();
        assert_eq!(leaf.dims(), vec![2, 2, 5]);

        let inner = supply
            .draw(&SlotSpec {
                layer: 2,
                position: 0,
                rank: 4,
            })
            .unwrap();
        assert_eq!(inner.dims(), vec![5, 5, 5, 5]);
        assert!(!inner.is_complex());
    }
}
