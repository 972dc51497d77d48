//! PRF engine: hierarchical key derivation from a block cipher
//!
//! A child key is the encryption of the child's index under the parent key.
//! The index is encoded right-aligned and big-endian in an otherwise zero
//! block:
//!
//! ```text
//!  0                                      11 12          15
//! +------------------------------------------+-------------+
//! |             twelve zero bytes            | index (BE)  |
//! +------------------------------------------+-------------+
//! ```
//!
//! Chaining the step along a path derives any node of the tree from the
//! root. A node key yields every descendant but, because each step is a
//! keyed PRF evaluation, reveals nothing about its parent or its siblings.
//!
//! # Entry points
//!
//! - [`Prf::apply`] takes one index and only accepts `0..=255`
//! - [`Prf::multiapply`] takes a path and accepts the full `u32` range per
//!   element, with the same encoding
//!
//! The two limits differ on purpose and must stay that way for
//! compatibility with existing trees: a single-element `multiapply` is the
//! way to derive a child with an index above 255.

use crate::{
    backend::{AesBackend, CipherBackend},
    error::CryptoError,
    key::{BLOCK_SIZE, Key, to_array},
};

/// Largest index accepted by [`Prf::apply`]
pub const MAX_APPLY_INDEX: u32 = 255;

/// Encode a path index as the PRF input block.
pub fn encode_index(index: u32) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[BLOCK_SIZE - 4..].copy_from_slice(&index.to_be_bytes());
    block
}

/// Keyed PRF over a [`CipherBackend`].
#[derive(Debug, Clone)]
pub struct Prf<B = AesBackend> {
    backend: B,
}

impl Default for Prf<AesBackend> {
    fn default() -> Self {
        Self::new(AesBackend::new())
    }
}

impl<B: CipherBackend> Prf<B> {
    /// Create an engine on top of `backend`.
    pub fn new(backend: B) -> Self {
        tracing::debug!(backend = backend.name(), "prf engine initialized");
        Self { backend }
    }

    /// The backend this engine evaluates the PRF with.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Derive the child key at `index` below `seed`.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `seed` is not 16 bytes
    /// - `IndexOutOfRange`: `index` is above [`MAX_APPLY_INDEX`]
    pub fn apply(&self, seed: &[u8], index: u32) -> Result<Key, CryptoError> {
        let seed = Key::from_slice(seed)?;
        if index > MAX_APPLY_INDEX {
            return Err(CryptoError::IndexOutOfRange { index, max: MAX_APPLY_INDEX });
        }

        Ok(self.derive_child(&seed, index))
    }

    /// Derive the key at `path` below `seed`, applying `path[0]` first.
    ///
    /// An empty path returns `seed` unchanged. Path elements are not range
    /// checked beyond their `u32` width.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `seed` is not 16 bytes
    pub fn multiapply(&self, seed: &[u8], path: &[u32]) -> Result<Key, CryptoError> {
        let seed = Key::from_slice(seed)?;
        Ok(self.derive_path(seed, path))
    }

    /// Evaluate the PRF at an arbitrary 16-byte input.
    ///
    /// Used for domain-separated derivations that do not follow the index
    /// encoding (see [`crate::derive`]).
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `seed` is not 16 bytes
    /// - `InvalidBlockLength`: `input` is not 16 bytes
    pub fn apply_block(&self, seed: &[u8], input: &[u8]) -> Result<Key, CryptoError> {
        let seed = Key::from_slice(seed)?;
        let input = to_array::<BLOCK_SIZE>(input, |expected, actual| {
            CryptoError::InvalidBlockLength { expected, actual }
        })?;

        Ok(Key::new(self.backend.block_encrypt(seed.as_bytes(), &input)))
    }

    /// One derivation step without the single-byte index check.
    ///
    /// Callers guarantee the index is in range for their tree.
    pub(crate) fn derive_child(&self, parent: &Key, index: u32) -> Key {
        Key::new(self.backend.block_encrypt(parent.as_bytes(), &encode_index(index)))
    }

    /// Fold [`Self::derive_child`] over `path`.
    ///
    /// Each intermediate key is dropped, and therefore zeroized, as soon as
    /// the next one exists.
    pub(crate) fn derive_path(&self, seed: Key, path: &[u32]) -> Key {
        path.iter().fold(seed, |key, &index| self.derive_child(&key, index))
    }
}
