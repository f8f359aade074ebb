//! Container behaviour seen from outside the crate.

use std::sync::Arc;

use ttn_core::{DenseArray, IndexId, NetworkOptions, TagSet, Tensor, TensorContainer, TensorNetwork};

fn star(shared: &Arc<DenseArray>, check_collisions: bool) -> ttn_core::Result<TensorNetwork> {
    let arms = (0..3).map(|i| {
        Tensor::new(
            shared.clone(),
            vec![IndexId::named("hub"), IndexId::Site(i)],
            TagSet::from_tags([format!("ARM{}", i)]),
        )
    });
    let tensors = arms.collect::<ttn_core::Result<Vec<_>>>()?;
    let options = NetworkOptions::default().with_check_collisions(check_collisions);
    TensorNetwork::from_tensors(tensors, &options)
}

#[test]
fn test_clone_copies_tags_and_shares_arrays() {
    let shared = DenseArray::ones_f64(&[2, 2]).unwrap();
    let original = star(&shared, false).unwrap();
    let mut copy = original.clone();

    let node = copy.nodes()[1];
    assert!(copy.add_tag(node, "MARKED").unwrap());

    assert_eq!(copy.select("MARKED"), vec![node]);
    assert!(original.select("MARKED").is_empty());
    assert!(!original.tensor(node).unwrap().has_tag("MARKED"));

    for ((_, a), (_, b)) in original.tensors().zip(copy.tensors()) {
        assert!(a.shares_data_with(b));
        assert!(Arc::ptr_eq(&a.data, &shared));
    }
}

#[test]
fn test_hyperindex_connects_every_pair() {
    let shared = DenseArray::ones_f64(&[2, 2]).unwrap();
    assert!(star(&shared, true).is_err());

    let tn = star(&shared, false).unwrap();
    assert_eq!(tn.index_count(&IndexId::named("hub")), 3);
    assert_eq!(tn.edge_count(), 3);
    assert_eq!(
        tn.outer_indices(),
        vec![IndexId::Site(0), IndexId::Site(1), IndexId::Site(2)]
    );

    let nodes = tn.nodes().to_vec();
    assert_eq!(tn.select_neighbors("ARM0"), vec![nodes[1], nodes[2]]);
}

#[test]
fn test_tags_are_sorted() {
    let shared = DenseArray::ones_f64(&[2, 2]).unwrap();
    let tn = star(&shared, false).unwrap();
    assert_eq!(tn.tags(), vec!["ARM0", "ARM1", "ARM2"]);
}
