//! Fuzz target for single-block sealing
//!
//! # Strategy
//!
//! - Arbitrary key, header, plaintext and nonce
//! - Arbitrary corruption of the sealed block, header or nonce
//! - Arbitrary bytes presented as a sealed block
//!
//! # Invariants
//!
//! - Sealing valid-sized inputs never fails
//! - Opening what was sealed returns the plaintext
//! - Any corruption fails with `AuthenticationFailure`
//! - Opening arbitrary bytes never panics

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use timecrypt_crypto::{BlockCipher, CryptoError, SEALED_SIZE};

#[derive(Debug, Clone, Arbitrary)]
enum Corruption {
    None,
    Sealed { position: u8, mask: u8 },
    Header { position: u8, mask: u8 },
    Nonce { position: u8, mask: u8 },
}

#[derive(Debug, Clone, Arbitrary)]
struct SealScenario {
    key: [u8; 16],
    aad: [u8; 4],
    plaintext: [u8; 16],
    nonce: [u8; 12],
    corruption: Corruption,
    garbage: Vec<u8>,
}

fuzz_target!(|scenario: SealScenario| {
    let cipher: BlockCipher = BlockCipher::default();

    // INVARIANT 1: Sealing correctly sized inputs succeeds
    let sealed = cipher
        .seal_block(&scenario.key, &scenario.aad, &scenario.plaintext, &scenario.nonce)
        .unwrap();

    let mut sealed_in = sealed;
    let mut aad = scenario.aad;
    let mut nonce = scenario.nonce;
    let corrupted = match scenario.corruption {
        Corruption::None => false,
        Corruption::Sealed { position, mask } => {
            sealed_in[usize::from(position) % SEALED_SIZE] ^= mask;
            mask != 0
        },
        Corruption::Header { position, mask } => {
            aad[usize::from(position) % aad.len()] ^= mask;
            mask != 0
        },
        Corruption::Nonce { position, mask } => {
            nonce[usize::from(position) % nonce.len()] ^= mask;
            mask != 0
        },
    };

    let opened = cipher.open_block(&scenario.key, &aad, &sealed_in, &nonce);
    if corrupted {
        // INVARIANT 2: Corruption is always detected
        assert_eq!(opened, Err(CryptoError::AuthenticationFailure));
    } else {
        // INVARIANT 3: Round-trip recovers the plaintext
        assert_eq!(opened, Ok(scenario.plaintext));
    }

    // INVARIANT 4: Arbitrary bytes never panic
    let _ = cipher.open_block(&scenario.key, &scenario.aad, &scenario.garbage, &scenario.nonce);
});
