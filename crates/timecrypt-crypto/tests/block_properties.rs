//! Property-based tests for single-block sealing
//!
//! These tests verify the sealing contract:
//!
//! 1. **Round-trip**: open(seal(p)) == p for every key, header, block and nonce
//! 2. **Integrity**: Any change to the sealed block, header or nonce is rejected
//! 3. **Key binding**: A different key never opens the block

use proptest::prelude::*;
use timecrypt_crypto::{AesBackend, BlockCipher, CryptoError, SEALED_SIZE, split_sealed};

fn cipher() -> BlockCipher {
    BlockCipher::new(AesBackend::new())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_seal_open_roundtrip(
        key in any::<[u8; 16]>(),
        aad in any::<[u8; 4]>(),
        plaintext in any::<[u8; 16]>(),
        nonce in any::<[u8; 12]>(),
    ) {
        let cipher = cipher();

        let sealed = cipher.seal_block(&key, &aad, &plaintext, &nonce).unwrap();
        let opened = cipher.open_block(&key, &aad, &sealed, &nonce).unwrap();

        prop_assert_eq!(opened, plaintext);
    }

    #[test]
    fn prop_seal_is_deterministic(
        key in any::<[u8; 16]>(),
        aad in any::<[u8; 4]>(),
        plaintext in any::<[u8; 16]>(),
        nonce in any::<[u8; 12]>(),
    ) {
        let cipher = cipher();

        prop_assert_eq!(
            cipher.seal_block(&key, &aad, &plaintext, &nonce).unwrap(),
            cipher.seal_block(&key, &aad, &plaintext, &nonce).unwrap()
        );
    }

    #[test]
    fn prop_header_only_affects_tag(
        key in any::<[u8; 16]>(),
        aad_a in any::<[u8; 4]>(),
        aad_b in any::<[u8; 4]>(),
        plaintext in any::<[u8; 16]>(),
        nonce in any::<[u8; 12]>(),
    ) {
        // The header only feeds the tag
        let cipher = cipher();

        let sealed_a = cipher.seal_block(&key, &aad_a, &plaintext, &nonce).unwrap();
        let sealed_b = cipher.seal_block(&key, &aad_b, &plaintext, &nonce).unwrap();

        prop_assert_eq!(split_sealed(&sealed_a).0, split_sealed(&sealed_b).0);
    }

    #[test]
    fn prop_tampered_sealed_block_is_rejected(
        key in any::<[u8; 16]>(),
        aad in any::<[u8; 4]>(),
        plaintext in any::<[u8; 16]>(),
        nonce in any::<[u8; 12]>(),
        position in 0..SEALED_SIZE,
        flip in 1..=u8::MAX,
    ) {
        let cipher = cipher();
        let mut sealed = cipher.seal_block(&key, &aad, &plaintext, &nonce).unwrap();
        sealed[position] ^= flip;

        prop_assert_eq!(
            cipher.open_block(&key, &aad, &sealed, &nonce),
            Err(CryptoError::AuthenticationFailure)
        );
    }

    #[test]
    fn prop_wrong_header_or_nonce_is_rejected(
        key in any::<[u8; 16]>(),
        aad in any::<[u8; 4]>(),
        other_aad in any::<[u8; 4]>(),
        plaintext in any::<[u8; 16]>(),
        nonce in any::<[u8; 12]>(),
        other_nonce in any::<[u8; 12]>(),
    ) {
        prop_assume!(aad != other_aad && nonce != other_nonce);
        let cipher = cipher();
        let sealed = cipher.seal_block(&key, &aad, &plaintext, &nonce).unwrap();

        prop_assert_eq!(
            cipher.open_block(&key, &other_aad, &sealed, &nonce),
            Err(CryptoError::AuthenticationFailure)
        );
        prop_assert_eq!(
            cipher.open_block(&key, &aad, &sealed, &other_nonce),
            Err(CryptoError::AuthenticationFailure)
        );
    }

    #[test]
    fn prop_wrong_key_is_rejected(
        key in any::<[u8; 16]>(),
        other_key in any::<[u8; 16]>(),
        aad in any::<[u8; 4]>(),
        plaintext in any::<[u8; 16]>(),
        nonce in any::<[u8; 12]>(),
    ) {
        prop_assume!(key != other_key);
        let cipher = cipher();
        let sealed = cipher.seal_block(&key, &aad, &plaintext, &nonce).unwrap();

        prop_assert_eq!(
            cipher.open_block(&other_key, &aad, &sealed, &nonce),
            Err(CryptoError::AuthenticationFailure)
        );
    }
}
