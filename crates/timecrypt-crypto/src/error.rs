//! Error types for PRF derivation and block sealing

use thiserror::Error;

/// Errors from the PRF engine, the block cipher and the cipher backends.
///
/// Every length error is raised before any cryptographic work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key material is not exactly one AES-128 key long
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Required key length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Plaintext or PRF input is not exactly one cipher block long
    #[error("invalid block length: expected {expected}, got {actual}")]
    InvalidBlockLength {
        /// Required block length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// GCM nonce has the wrong length
    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Required nonce length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Associated data has the wrong length
    #[error("invalid aad length: expected {expected}, got {actual}")]
    InvalidAadLength {
        /// Required associated data length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Sealed block is not ciphertext plus tag
    #[error("invalid sealed block length: expected {expected}, got {actual}")]
    InvalidSealedLength {
        /// Required sealed block length
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Single-step derivation index does not fit in one byte
    #[error("index {index} out of range: single-step apply accepts at most {max}")]
    IndexOutOfRange {
        /// The rejected index
        index: u32,
        /// Largest accepted index
        max: u32,
    },

    /// The AEAD primitive reported an internal failure while sealing
    #[error("encryption failed")]
    EncryptionFailure,

    /// Tag verification failed; no plaintext is released
    #[error("authentication failed")]
    AuthenticationFailure,
}

impl CryptoError {
    /// Returns true if the caller supplied malformed input.
    ///
    /// Input errors are deterministic: the same call fails the same way
    /// every time. The remaining variants are outcomes of the cipher itself
    /// and must be handled as security events (tampering, wrong key) or
    /// primitive faults.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InvalidKeyLength { .. }
            | Self::InvalidBlockLength { .. }
            | Self::InvalidNonceLength { .. }
            | Self::InvalidAadLength { .. }
            | Self::InvalidSealedLength { .. }
            | Self::IndexOutOfRange { .. } => true,

            Self::EncryptionFailure | Self::AuthenticationFailure => false,
        }
    }
}
