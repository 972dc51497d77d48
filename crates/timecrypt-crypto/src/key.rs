//! Fixed-size buffers and the [`Key`] type
//!
//! Every buffer crossing the public API has a single legal length. Slices
//! are checked here, once, and converted into arrays so the rest of the
//! crate never reasons about lengths again.

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// AES-128 key size (16 bytes)
pub const KEY_SIZE: usize = 16;

/// Cipher block size (16 bytes)
pub const BLOCK_SIZE: usize = 16;

/// GCM nonce size (12 bytes)
pub const NONCE_SIZE: usize = 12;

/// Associated data size (4 bytes)
pub const AAD_SIZE: usize = 4;

/// GCM tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Sealed block size: ciphertext followed by tag (32 bytes)
pub const SEALED_SIZE: usize = BLOCK_SIZE + TAG_SIZE;

/// A 128-bit symmetric key: a tree root or a derived node key.
///
/// The bytes are zeroized on drop, compared in constant time, and never
/// printed by `Debug`.
#[derive(Clone)]
pub struct Key([u8; KEY_SIZE]);

impl Key {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Copy a key out of a caller-supplied slice.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: slice is not exactly [`KEY_SIZE`] bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        to_array(bytes, |expected, actual| CryptoError::InvalidKeyLength { expected, actual })
            .map(Self)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl From<[u8; KEY_SIZE]> for Key {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for Key {}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Convert a slice into a fixed-size array, reporting a mismatch through
/// `on_mismatch(expected, actual)`.
pub(crate) fn to_array<const N: usize>(
    bytes: &[u8],
    on_mismatch: impl FnOnce(usize, usize) -> CryptoError,
) -> Result<[u8; N], CryptoError> {
    <[u8; N]>::try_from(bytes).map_err(|_| on_mismatch(N, bytes.len()))
}
