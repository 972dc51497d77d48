//! Property-based tests for key trees
//!
//! These tests verify the sharing invariants:
//!
//! 1. **Exact cover**: Revealed nodes tile the requested range with no gap or overlap
//! 2. **Agreement**: A receiver derives bit-identical leaves to the owner
//! 3. **Containment**: A receiver cannot derive leaves outside its range
//! 4. **Batch equivalence**: `seeds(from, to)` equals `seed(id)` for each id
//! 5. **Transport**: Revealed nodes survive the wire encoding

use proptest::prelude::*;
use timecrypt_crypto::{
    AesBackend, KeyTree, KeyTreeConfig, KeyTreeError, Prf, SeedNode, decode_nodes, encode_nodes,
};

fn prf() -> Prf {
    Prf::new(AesBackend::new())
}

fn owner(root: &[u8; 16], fanout: u32, depth: u16) -> KeyTree {
    KeyTree::owner(prf(), root, KeyTreeConfig::new(depth).with_fanout(fanout)).unwrap()
}

/// Small tree shape plus an inclusive leaf range inside it
fn shape_and_range() -> impl Strategy<Value = (u32, u16, u64, u64)> {
    (2u32..=6, 1u16..=5)
        .prop_flat_map(|(fanout, depth)| {
            let leaves = u64::from(fanout).pow(u32::from(depth));
            (Just(fanout), Just(depth), 0..leaves, 0..leaves)
        })
        .prop_map(|(fanout, depth, a, b)| (fanout, depth, a.min(b), a.max(b)))
}

fn covered_range(config: &KeyTreeConfig, node: &SeedNode) -> (u64, u64) {
    let span = u64::from(config.fanout).pow(u32::from(config.depth - node.depth()));
    let first = node.node_nr() * span;
    (first, first + span - 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_revealed_nodes_tile_range(
        root in any::<[u8; 16]>(),
        (fanout, depth, from, to) in shape_and_range(),
    ) {
        let tree = owner(&root, fanout, depth);
        let nodes = tree.reveal_seeds(from, to).unwrap();

        let mut next = from;
        for node in &nodes {
            prop_assert!(node.depth() <= depth);
            let (first, last) = covered_range(tree.config(), node);
            prop_assert_eq!(first, next);
            next = last + 1;
        }
        prop_assert_eq!(next, to + 1);
    }

    #[test]
    fn prop_cover_is_small(
        root in any::<[u8; 16]>(),
        (fanout, depth, from, to) in shape_and_range(),
    ) {
        // At most k-1 nodes per level on each edge of the range
        let tree = owner(&root, fanout, depth);
        let nodes = tree.reveal_seeds(from, to).unwrap();

        let bound = 2 * (fanout as usize - 1) * (usize::from(depth) + 1);
        prop_assert!(nodes.len() <= bound, "{} nodes, bound {}", nodes.len(), bound);
    }

    #[test]
    fn prop_receiver_agrees_with_owner(
        root in any::<[u8; 16]>(),
        (fanout, depth, from, to) in shape_and_range(),
    ) {
        let tree = owner(&root, fanout, depth);
        let nodes = tree.reveal_seeds(from, to).unwrap();
        let receiver = KeyTree::receiver(prf(), nodes, *tree.config()).unwrap();

        prop_assert_eq!(receiver.key_interval(), (from, to));
        prop_assert_eq!(receiver.seeds(from, to).unwrap(), tree.seeds(from, to).unwrap());
    }

    #[test]
    fn prop_receiver_is_contained(
        root in any::<[u8; 16]>(),
        (fanout, depth, from, to) in shape_and_range(),
    ) {
        let tree = owner(&root, fanout, depth);
        let nodes = tree.reveal_seeds(from, to).unwrap();
        let receiver = KeyTree::receiver(prf(), nodes, *tree.config()).unwrap();

        if from > 0 {
            prop_assert_eq!(
                receiver.seed(from - 1),
                Err(KeyTreeError::KeyOutOfRange { id: from - 1, first: from, last: to })
            );
        }
        prop_assert!(receiver.seed(to + 1).is_err());
        prop_assert_eq!(receiver.reveal_seeds(from, to), Err(KeyTreeError::NotOwner));
    }

    #[test]
    fn prop_seeds_match_seed(
        root in any::<[u8; 16]>(),
        (fanout, depth, from, to) in shape_and_range(),
    ) {
        let tree = owner(&root, fanout, depth);

        let batch = tree.seeds(from, to).unwrap();
        let single: Vec<_> = (from..=to).map(|id| tree.seed(id).unwrap()).collect();

        prop_assert_eq!(batch, single);
    }

    #[test]
    fn prop_seed_is_root_path(
        root in any::<[u8; 16]>(),
        (fanout, depth, id, _) in shape_and_range(),
    ) {
        let tree = owner(&root, fanout, depth);

        let mut path = vec![0u32; usize::from(depth)];
        let mut rest = id;
        for digit in path.iter_mut().rev() {
            *digit = (rest % u64::from(fanout)) as u32;
            rest /= u64::from(fanout);
        }

        prop_assert_eq!(tree.seed(id).unwrap(), prf().multiapply(&root, &path).unwrap());
    }

    #[test]
    fn prop_nodes_survive_transport(
        root in any::<[u8; 16]>(),
        (fanout, depth, from, to) in shape_and_range(),
    ) {
        let tree = owner(&root, fanout, depth);
        let wire = encode_nodes(&tree.reveal_seeds(from, to).unwrap());

        let receiver = KeyTree::receiver(prf(), decode_nodes(&wire).unwrap(), *tree.config()).unwrap();

        prop_assert_eq!(receiver.seed(to).unwrap(), tree.seed(to).unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_deep_tree_sharing(
        root in any::<[u8; 16]>(),
        a in 0u64..(1 << 40),
        b in 0u64..(1 << 40),
    ) {
        let (from, to) = (a.min(b), a.max(b));
        let tree = owner(&root, 2, 40);
        let nodes = tree.reveal_seeds(from, to).unwrap();
        let receiver = KeyTree::receiver(prf(), nodes, *tree.config()).unwrap();

        let mid = from + (to - from) / 2;
        for id in [from, mid, to] {
            prop_assert_eq!(receiver.seed(id).unwrap(), tree.seed(id).unwrap());
        }
    }
}

#[test]
fn reveal_range_shared_over_depth_twenty() {
    let tree = owner(&[0x5C; 16], 2, 20);
    let nodes = tree.reveal_seeds(2000, 3000).unwrap();
    let receiver = KeyTree::receiver(prf(), nodes, *tree.config()).unwrap();

    assert_eq!(receiver.seeds(2000, 3000).unwrap(), tree.seeds(2000, 3000).unwrap());
    assert_eq!(
        receiver.seed(99),
        Err(KeyTreeError::KeyOutOfRange { id: 99, first: 2000, last: 3000 })
    );
}

#[test]
fn reveal_rejects_out_of_tree_range() {
    let tree = owner(&[0u8; 16], 2, 4);

    assert_eq!(
        tree.reveal_seeds(3, 16),
        Err(KeyTreeError::KeyOutOfRange { id: 16, first: 0, last: 15 })
    );
    assert_eq!(tree.reveal_seeds(5, 4), Err(KeyTreeError::InvalidRange { from: 5, to: 4 }));
}
