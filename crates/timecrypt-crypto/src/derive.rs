//! Domain-separated derivation of 64-bit values from leaf keys
//!
//! Metadata chunks need two independent integer keys per chunk id, one to
//! encrypt and one to authenticate. Both come from the same leaf seed; the
//! PRF input keeps them apart:
//!
//! ```text
//!              0          7 8         15
//!             +------------+------------+
//! Encryption  |  FF x 8    |  id (BE)   |
//!             +------------+------------+
//! Mac         |  id (BE)   |  FF x 8    |
//!             +------------+------------+
//! ```

use crate::{
    backend::CipherBackend,
    error::CryptoError,
    key::BLOCK_SIZE,
    prf::Prf,
};

/// Bytes of padding on either side of the id
const PAD: usize = BLOCK_SIZE / 2;

/// What a derived metadata key is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPurpose {
    /// Encrypting metadata
    Encryption,
    /// Authenticating metadata
    Mac,
}

/// PRF input block for the metadata key of chunk `id`.
pub fn metadata_input(purpose: KeyPurpose, id: u64) -> [u8; BLOCK_SIZE] {
    let mut input = [0xFFu8; BLOCK_SIZE];
    let id = id.to_be_bytes();
    match purpose {
        KeyPurpose::Encryption => input[PAD..].copy_from_slice(&id),
        KeyPurpose::Mac => input[..PAD].copy_from_slice(&id),
    }
    input
}

/// Fold the PRF output at `input` into a `u64`.
///
/// The two halves of the 16-byte output are XORed and read big-endian.
///
/// # Errors
///
/// - `InvalidKeyLength`: `seed` is not 16 bytes
/// - `InvalidBlockLength`: `input` is not 16 bytes
pub fn derive_u64<B: CipherBackend>(
    prf: &Prf<B>,
    seed: &[u8],
    input: &[u8],
) -> Result<u64, CryptoError> {
    let key = prf.apply_block(seed, input)?;
    let (high, low) = key.as_bytes().split_at(PAD);

    let mut folded = [0u8; PAD];
    for ((out, a), b) in folded.iter_mut().zip(high).zip(low) {
        *out = a ^ b;
    }
    Ok(u64::from_be_bytes(folded))
}

/// Value of a leaf seed itself, independent of any chunk id.
pub fn derive_leaf_u64<B: CipherBackend>(prf: &Prf<B>, seed: &[u8]) -> Result<u64, CryptoError> {
    derive_u64(prf, seed, &[0xFF; BLOCK_SIZE])
}

/// Metadata key of chunk `id` for `purpose`.
pub fn derive_metadata_u64<B: CipherBackend>(
    prf: &Prf<B>,
    seed: &[u8],
    purpose: KeyPurpose,
    id: u64,
) -> Result<u64, CryptoError> {
    derive_u64(prf, seed, &metadata_input(purpose, id))
}
