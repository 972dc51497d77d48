//! Fuzz target for key tree sharing
//!
//! # Strategy
//!
//! - Arbitrary tree shapes (clamped to cheap sizes)
//! - Arbitrary leaf ranges, including inverted and out-of-tree ones
//! - Revealed nodes sent through the wire encoding
//! - Arbitrary node sets handed to a receiver
//!
//! # Invariants
//!
//! - Invalid ranges are rejected, never panic
//! - Revealed nodes rebuild a receiver covering exactly the range
//! - Receiver leaves equal owner leaves at the range edges
//! - Receiver construction from arbitrary nodes never panics

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use timecrypt_crypto::{
    AesBackend, KeyTree, KeyTreeConfig, Prf, SeedNode, decode_nodes, encode_nodes,
};

#[derive(Debug, Clone, Arbitrary)]
struct ArbitraryNode {
    seed: [u8; 16],
    depth: u16,
    node_nr: u64,
}

#[derive(Debug, Clone, Arbitrary)]
struct TreeScenario {
    root: [u8; 16],
    depth: u8,
    fanout: u8,
    from: u64,
    to: u64,
    foreign_nodes: Vec<ArbitraryNode>,
}

fn prf() -> Prf {
    Prf::new(AesBackend::new())
}

fuzz_target!(|scenario: TreeScenario| {
    let config = KeyTreeConfig::new(u16::from(scenario.depth % 24))
        .with_fanout(u32::from(scenario.fanout % 8));

    let Ok(owner) = KeyTree::owner(prf(), &scenario.root, config) else {
        // Degenerate fan-out
        assert!(config.validate().is_err());
        return;
    };
    let (_, last) = owner.key_interval();

    // INVARIANT 1: Bad ranges are errors
    let revealed = owner.reveal_seeds(scenario.from, scenario.to);
    if scenario.from > scenario.to || scenario.to > last {
        assert!(revealed.is_err());
    } else {
        let nodes = revealed.unwrap();

        // INVARIANT 2: Nodes survive the wire encoding
        let decoded = decode_nodes(&encode_nodes(&nodes)).unwrap();
        assert_eq!(decoded, nodes);

        // INVARIANT 3: Receiver covers exactly the revealed range
        let receiver = KeyTree::receiver(prf(), decoded, config).unwrap();
        assert_eq!(receiver.key_interval(), (scenario.from, scenario.to));

        // INVARIANT 4: Receiver and owner agree
        for id in [scenario.from, scenario.to] {
            assert_eq!(receiver.seed(id).unwrap(), owner.seed(id).unwrap());
        }
    }

    // INVARIANT 5: Arbitrary node sets never panic
    let nodes: Vec<SeedNode> = scenario
        .foreign_nodes
        .iter()
        .map(|node| SeedNode::new(node.seed.into(), node.depth, node.node_nr))
        .collect();
    if let Ok(receiver) = KeyTree::receiver(prf(), nodes, config) {
        let (first, last) = receiver.key_interval();
        assert!(first <= last);
        assert!(receiver.seed(last).is_ok());
    }
});
