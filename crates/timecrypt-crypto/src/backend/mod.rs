//! Block cipher capability used by the PRF engine and the block cipher
//!
//! [`crate::Prf`] and [`crate::BlockCipher`] are written against
//! [`CipherBackend`] only. A backend is chosen by type when the engine is
//! constructed, so swapping implementations never touches derivation or
//! sealing logic.
//!
//! # Contract
//!
//! - Inputs arrive already length-checked as fixed-size arrays
//! - `block_encrypt` is plain single-block AES-128 (ECB on one block)
//! - `aead_seal` / `aead_open` are AES-128-GCM with a 96-bit nonce and a
//!   128-bit tag kept separate from the ciphertext
//! - `aead_open` verifies the tag before releasing plaintext and reports
//!   every failure as [`CryptoError::AuthenticationFailure`]
//! - Implementations are constant-time with respect to key and data

mod rustcrypto;

pub use self::rustcrypto::AesBackend;
use crate::{
    error::CryptoError,
    key::{AAD_SIZE, BLOCK_SIZE, KEY_SIZE, NONCE_SIZE, TAG_SIZE},
};

/// Single-block AES-128 and AES-128-GCM primitives.
pub trait CipherBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Encrypt exactly one block under `key`.
    fn block_encrypt(&self, key: &[u8; KEY_SIZE], block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE];

    /// Seal one block, returning `(ciphertext, tag)`.
    ///
    /// # Errors
    ///
    /// - `EncryptionFailure`: the primitive reported an internal error
    fn aead_seal(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        aad: &[u8; AAD_SIZE],
        plaintext: &[u8; BLOCK_SIZE],
    ) -> Result<([u8; BLOCK_SIZE], [u8; TAG_SIZE]), CryptoError>;

    /// Verify `tag` and decrypt one block.
    ///
    /// # Errors
    ///
    /// - `AuthenticationFailure`: tag does not match key, nonce, aad and
    ///   ciphertext
    fn aead_open(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        aad: &[u8; AAD_SIZE],
        ciphertext: &[u8; BLOCK_SIZE],
        tag: &[u8; TAG_SIZE],
    ) -> Result<[u8; BLOCK_SIZE], CryptoError>;
}
