//! Additive encryption of 64-bit values under consecutive leaf keys
//!
//! The value at time `t` is masked with the difference of two neighbouring
//! leaf keys:
//!
//! ```text
//! c_t = m_t + k_t - k_(t+1)            (mod 2^64)
//!
//! c_a + ... + c_b = (m_a + ... + m_b) + k_a - k_(b+1)
//! ```
//!
//! Inner keys cancel in any sum of consecutive ciphertexts, so an
//! aggregate over `[a, b]` decrypts with the two boundary keys only. A
//! receiver holding leaves `a..=b+1` can decrypt any sub-range aggregate
//! and nothing outside it.
//!
//! Plain keys come from [`derive_leaf_u64`]. Metadata keys add the
//! metadata id through [`derive_metadata_u64`] so that several values
//! recorded at the same time use unrelated masks.

use crate::{
    backend::{AesBackend, CipherBackend},
    derive::{KeyPurpose, derive_leaf_u64, derive_metadata_u64},
    key::Key,
    key_tree::{KeyTree, KeyTreeError},
};

/// Mask `msg` with the key pair `(key1, key2)`.
pub fn encrypt_with_keys(msg: u64, key1: u64, key2: u64) -> u64 {
    msg.wrapping_add(key1).wrapping_sub(key2)
}

/// Remove the mask `(key1, key2)` from `ciphertext`.
pub fn decrypt_with_keys(ciphertext: u64, key1: u64, key2: u64) -> u64 {
    ciphertext.wrapping_sub(key1).wrapping_add(key2)
}

/// Additive encryption keyed by the leaves of a [`KeyTree`].
#[derive(Debug, Clone, Copy)]
pub struct Heac<'a, B = AesBackend> {
    tree: &'a KeyTree<B>,
}

impl<'a, B: CipherBackend> Heac<'a, B> {
    /// Encrypt with the leaves of `tree`.
    pub fn new(tree: &'a KeyTree<B>) -> Self {
        Self { tree }
    }

    /// Encrypt the value recorded at time `id`.
    ///
    /// # Errors
    ///
    /// - `KeyOutOfRange`: leaf `id` or `id + 1` is not derivable
    pub fn encrypt(&self, msg: u64, id: u64) -> Result<u64, KeyTreeError> {
        let (first, next) = self.boundary_seeds(id, id)?;
        Ok(encrypt_with_keys(msg, self.leaf_key(&first)?, self.leaf_key(&next)?))
    }

    /// Decrypt a ciphertext, or a sum of ciphertexts, covering `from..=to`.
    ///
    /// # Errors
    ///
    /// - `InvalidRange`: `from > to`
    /// - `KeyOutOfRange`: leaf `from` or `to + 1` is not derivable
    pub fn decrypt(&self, ciphertext: u64, from: u64, to: u64) -> Result<u64, KeyTreeError> {
        let (first, next) = self.boundary_seeds(from, to)?;
        Ok(decrypt_with_keys(ciphertext, self.leaf_key(&first)?, self.leaf_key(&next)?))
    }

    /// Encrypt metadata value `metadata_id` recorded at time `id`.
    ///
    /// # Errors
    ///
    /// - `KeyOutOfRange`: leaf `id` or `id + 1` is not derivable
    pub fn encrypt_metadata(
        &self,
        msg: u64,
        id: u64,
        metadata_id: u64,
    ) -> Result<u64, KeyTreeError> {
        let (first, next) = self.boundary_seeds(id, id)?;
        let (key1, key2) = self.metadata_keys(&first, &next, metadata_id)?;
        Ok(encrypt_with_keys(msg, key1, key2))
    }

    /// Decrypt an aggregate of metadata value `metadata_id` over
    /// `from..=to`.
    ///
    /// # Errors
    ///
    /// - `InvalidRange`: `from > to`
    /// - `KeyOutOfRange`: leaf `from` or `to + 1` is not derivable
    pub fn decrypt_metadata(
        &self,
        ciphertext: u64,
        from: u64,
        to: u64,
        metadata_id: u64,
    ) -> Result<u64, KeyTreeError> {
        let (first, next) = self.boundary_seeds(from, to)?;
        let (key1, key2) = self.metadata_keys(&first, &next, metadata_id)?;
        Ok(decrypt_with_keys(ciphertext, key1, key2))
    }

    /// Encrypt several `(metadata_id, value)` pairs recorded at time `id`.
    ///
    /// The two leaf seeds are derived once for the whole batch.
    pub fn encrypt_metadata_batch(
        &self,
        id: u64,
        values: &[(u64, u64)],
    ) -> Result<Vec<u64>, KeyTreeError> {
        let (first, next) = self.boundary_seeds(id, id)?;
        values
            .iter()
            .map(|&(metadata_id, msg)| {
                let (key1, key2) = self.metadata_keys(&first, &next, metadata_id)?;
                Ok(encrypt_with_keys(msg, key1, key2))
            })
            .collect()
    }

    /// Decrypt several `(metadata_id, aggregate)` pairs over `from..=to`.
    pub fn decrypt_metadata_batch(
        &self,
        from: u64,
        to: u64,
        values: &[(u64, u64)],
    ) -> Result<Vec<u64>, KeyTreeError> {
        let (first, next) = self.boundary_seeds(from, to)?;
        values
            .iter()
            .map(|&(metadata_id, ciphertext)| {
                let (key1, key2) = self.metadata_keys(&first, &next, metadata_id)?;
                Ok(decrypt_with_keys(ciphertext, key1, key2))
            })
            .collect()
    }

    /// Seeds of leaf `from` and leaf `to + 1`.
    fn boundary_seeds(&self, from: u64, to: u64) -> Result<(Key, Key), KeyTreeError> {
        if from > to {
            return Err(KeyTreeError::InvalidRange { from, to });
        }
        let (first, last) = self.tree.key_interval();
        let Some(next) = to.checked_add(1) else {
            return Err(KeyTreeError::KeyOutOfRange { id: to, first, last });
        };

        Ok((self.tree.seed(from)?, self.tree.seed(next)?))
    }

    fn leaf_key(&self, seed: &Key) -> Result<u64, KeyTreeError> {
        Ok(derive_leaf_u64(self.tree.prf(), seed.as_bytes())?)
    }

    fn metadata_keys(
        &self,
        first: &Key,
        next: &Key,
        metadata_id: u64,
    ) -> Result<(u64, u64), KeyTreeError> {
        let prf = self.tree.prf();
        let key1 = derive_metadata_u64(prf, first.as_bytes(), KeyPurpose::Encryption, metadata_id)?;
        let key2 = derive_metadata_u64(prf, next.as_bytes(), KeyPurpose::Encryption, metadata_id)?;
        Ok((key1, key2))
    }
}
