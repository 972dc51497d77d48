//! Fuzz target for PRF derivation
//!
//! # Strategy
//!
//! - Seeds of arbitrary length (mostly 16 bytes, sometimes not)
//! - Single-step indices across the one-byte boundary
//! - Arbitrary paths, split at an arbitrary point
//!
//! # Invariants
//!
//! - Wrong seed lengths are rejected, never panic
//! - `apply` accepts exactly the indices `0..=255`
//! - Derivation is deterministic
//! - The empty path returns the seed
//! - Deriving a prefix then the suffix equals deriving the whole path

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use timecrypt_crypto::{CryptoError, MAX_APPLY_INDEX, Prf};

#[derive(Debug, Clone, Arbitrary)]
enum Seed {
    Valid([u8; 16]),
    Arbitrary(Vec<u8>),
}

impl Seed {
    fn as_bytes(&self) -> &[u8] {
        match self {
            Seed::Valid(b) => b,
            Seed::Arbitrary(b) => b,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
struct PrfScenario {
    seed: Seed,
    index: u32,
    path: Vec<u32>,
    split: usize,
}

fuzz_target!(|scenario: PrfScenario| {
    let prf: Prf = Prf::default();
    let seed = scenario.seed.as_bytes();

    // INVARIANT 1: Only 16-byte seeds are accepted
    if seed.len() != 16 {
        assert_eq!(
            prf.apply(seed, 0),
            Err(CryptoError::InvalidKeyLength { expected: 16, actual: seed.len() })
        );
        assert!(prf.multiapply(seed, &scenario.path).is_err());
        return;
    }

    // INVARIANT 2: apply enforces the one-byte index range
    let applied = prf.apply(seed, scenario.index);
    if scenario.index > MAX_APPLY_INDEX {
        assert_eq!(
            applied,
            Err(CryptoError::IndexOutOfRange { index: scenario.index, max: MAX_APPLY_INDEX })
        );
    } else {
        // INVARIANT 3: apply agrees with a one-element path
        assert_eq!(applied, prf.multiapply(seed, &[scenario.index]));
    }

    // INVARIANT 4: Derivation is deterministic
    let whole = prf.multiapply(seed, &scenario.path).unwrap();
    assert_eq!(whole, prf.multiapply(seed, &scenario.path).unwrap());

    // INVARIANT 5: Empty path is identity
    assert_eq!(prf.multiapply(seed, &[]).unwrap().as_bytes()[..], seed[..]);

    // INVARIANT 6: Paths compose
    let mid = scenario.split % (scenario.path.len() + 1);
    let prefix = prf.multiapply(seed, &scenario.path[..mid]).unwrap();
    let composed = prf.multiapply(prefix.as_bytes(), &scenario.path[mid..]).unwrap();
    assert_eq!(whole, composed, "prefix then suffix must equal whole path");
});
