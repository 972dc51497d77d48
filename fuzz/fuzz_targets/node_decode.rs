//! Fuzz target for seed node list decoding
//!
//! Arbitrary bytes must decode to a node list or return an error, never
//! panic. Whatever decodes must encode back to the same bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use timecrypt_crypto::{decode_nodes, encode_nodes};

fuzz_target!(|data: &[u8]| {
    if let Ok(nodes) = decode_nodes(data) {
        assert_eq!(encode_nodes(&nodes), data);
    }
});
