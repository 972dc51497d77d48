//! Sealing and opening single 16-byte blocks under a derived key
//!
//! Sealed layout:
//!
//! ```text
//!  0            15 16           31
//! +---------------+---------------+
//! |  ciphertext   |   GCM tag     |
//! +---------------+---------------+
//! ```
//!
//! All lengths are checked before the backend runs, and local plaintext
//! copies are zeroized on return.
//! Opening is all-or-nothing: either the tag verifies and the plaintext is
//! returned, or [`CryptoError::AuthenticationFailure`] is returned and no
//! plaintext leaves the backend. Nonce uniqueness per key is the caller's
//! responsibility.

use zeroize::Zeroizing;

use crate::{
    backend::{AesBackend, CipherBackend},
    error::CryptoError,
    key::{AAD_SIZE, BLOCK_SIZE, Key, NONCE_SIZE, SEALED_SIZE, TAG_SIZE, to_array},
};

/// Split a sealed block into `(ciphertext, tag)`.
pub fn split_sealed(sealed: &[u8; SEALED_SIZE]) -> (&[u8; BLOCK_SIZE], &[u8; TAG_SIZE]) {
    let (ciphertext, tag) = sealed.split_at(BLOCK_SIZE);
    let Ok(ciphertext) = <&[u8; BLOCK_SIZE]>::try_from(ciphertext) else {
        unreachable!("sealed block prefix is exactly one block");
    };
    let Ok(tag) = <&[u8; TAG_SIZE]>::try_from(tag) else {
        unreachable!("sealed block suffix is exactly one tag");
    };
    (ciphertext, tag)
}

/// Single-block cipher over a [`CipherBackend`].
#[derive(Debug, Clone)]
pub struct BlockCipher<B = AesBackend> {
    backend: B,
}

impl Default for BlockCipher<AesBackend> {
    fn default() -> Self {
        Self::new(AesBackend::new())
    }
}

impl<B: CipherBackend> BlockCipher<B> {
    /// Create a block cipher on top of `backend`.
    pub fn new(backend: B) -> Self {
        tracing::debug!(backend = backend.name(), "block cipher initialized");
        Self { backend }
    }

    /// Encrypt one block without authentication.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `key` is not 16 bytes
    /// - `InvalidBlockLength`: `plaintext` is not 16 bytes
    pub fn encrypt_block(
        &self,
        key: &[u8],
        plaintext: &[u8],
    ) -> Result<[u8; BLOCK_SIZE], CryptoError> {
        let key = Key::from_slice(key)?;
        let plaintext = Zeroizing::new(block(plaintext)?);

        Ok(self.backend.block_encrypt(key.as_bytes(), &plaintext))
    }

    /// Seal one block, returning ciphertext followed by the tag.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`, `InvalidBlockLength`, `InvalidNonceLength`,
    ///   `InvalidAadLength`: an argument has the wrong size
    /// - `EncryptionFailure`: the backend failed internally
    pub fn seal_block(
        &self,
        key: &[u8],
        aad: &[u8],
        plaintext: &[u8],
        nonce: &[u8],
    ) -> Result<[u8; SEALED_SIZE], CryptoError> {
        let key = Key::from_slice(key)?;
        let plaintext = Zeroizing::new(block(plaintext)?);
        let nonce = nonce_array(nonce)?;
        let aad = aad_array(aad)?;

        let (ciphertext, tag) = self.backend.aead_seal(key.as_bytes(), &nonce, &aad, &plaintext)?;

        let mut sealed = [0u8; SEALED_SIZE];
        sealed[..BLOCK_SIZE].copy_from_slice(&ciphertext);
        sealed[BLOCK_SIZE..].copy_from_slice(&tag);
        Ok(sealed)
    }

    /// Verify and decrypt a sealed block.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`, `InvalidSealedLength`, `InvalidNonceLength`,
    ///   `InvalidAadLength`: an argument has the wrong size
    /// - `AuthenticationFailure`: wrong key, nonce or aad, or the sealed
    ///   block was modified
    pub fn open_block(
        &self,
        key: &[u8],
        aad: &[u8],
        sealed: &[u8],
        nonce: &[u8],
    ) -> Result<[u8; BLOCK_SIZE], CryptoError> {
        let key = Key::from_slice(key)?;
        let sealed = to_array::<SEALED_SIZE>(sealed, |expected, actual| {
            CryptoError::InvalidSealedLength { expected, actual }
        })?;
        let nonce = nonce_array(nonce)?;
        let aad = aad_array(aad)?;

        let (ciphertext, tag) = split_sealed(&sealed);
        self.backend.aead_open(key.as_bytes(), &nonce, &aad, ciphertext, tag).inspect_err(|_| {
            tracing::debug!("sealed block failed authentication");
        })
    }
}

fn block(bytes: &[u8]) -> Result<[u8; BLOCK_SIZE], CryptoError> {
    to_array(bytes, |expected, actual| CryptoError::InvalidBlockLength { expected, actual })
}

fn nonce_array(bytes: &[u8]) -> Result<[u8; NONCE_SIZE], CryptoError> {
    to_array(bytes, |expected, actual| CryptoError::InvalidNonceLength { expected, actual })
}

fn aad_array(bytes: &[u8]) -> Result<[u8; AAD_SIZE], CryptoError> {
    to_array(bytes, |expected, actual| CryptoError::InvalidAadLength { expected, actual })
}
