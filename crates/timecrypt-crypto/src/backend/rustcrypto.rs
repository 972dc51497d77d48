//! AES-128 / AES-128-GCM backend on the `aes` and `aes-gcm` crates
//!
//! Both crates detect AES-NI (x86) and the ARMv8 crypto extensions at
//! runtime and fall back to a bitsliced constant-time software
//! implementation, so one backend covers accelerated and portable hosts.

use aes::{
    Aes128,
    cipher::{BlockEncrypt, KeyInit},
};
use aes_gcm::{
    Aes128Gcm, Nonce,
    aead::{AeadInPlace, generic_array::GenericArray},
};
use zeroize::Zeroize;

use super::CipherBackend;
use crate::{
    error::CryptoError,
    key::{AAD_SIZE, BLOCK_SIZE, KEY_SIZE, NONCE_SIZE, TAG_SIZE},
};

/// RustCrypto AES backend.
///
/// Stateless: a key schedule is expanded per call and zeroized when it
/// goes out of scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AesBackend;

impl AesBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

impl CipherBackend for AesBackend {
    fn name(&self) -> &'static str {
        "rustcrypto-aes"
    }

    fn block_encrypt(&self, key: &[u8; KEY_SIZE], block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        let cipher = Aes128::new(key.into());
        let mut buffer = aes::Block::from(*block);
        cipher.encrypt_block(&mut buffer);

        let mut out = [0u8; BLOCK_SIZE];
        out.copy_from_slice(&buffer);
        buffer.as_mut_slice().zeroize();
        out
    }

    fn aead_seal(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        aad: &[u8; AAD_SIZE],
        plaintext: &[u8; BLOCK_SIZE],
    ) -> Result<([u8; BLOCK_SIZE], [u8; TAG_SIZE]), CryptoError> {
        let cipher = Aes128Gcm::new(key.into());
        let mut buffer = *plaintext;

        let tag = match cipher.encrypt_in_place_detached(Nonce::from_slice(nonce), aad, &mut buffer)
        {
            Ok(tag) => tag,
            Err(_) => {
                buffer.zeroize();
                return Err(CryptoError::EncryptionFailure);
            },
        };

        let mut tag_bytes = [0u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&tag);
        Ok((buffer, tag_bytes))
    }

    fn aead_open(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        aad: &[u8; AAD_SIZE],
        ciphertext: &[u8; BLOCK_SIZE],
        tag: &[u8; TAG_SIZE],
    ) -> Result<[u8; BLOCK_SIZE], CryptoError> {
        let cipher = Aes128Gcm::new(key.into());
        let mut buffer = *ciphertext;

        // aes-gcm checks the tag before applying the keystream, so a failed
        // open never materializes plaintext in `buffer`.
        let verified = cipher.decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            aad,
            &mut buffer,
            GenericArray::from_slice(tag),
        );

        if verified.is_err() {
            buffer.zeroize();
            return Err(CryptoError::AuthenticationFailure);
        }

        Ok(buffer)
    }
}
