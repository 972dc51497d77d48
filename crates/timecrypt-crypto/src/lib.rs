//! TimeCrypt Cryptographic Primitives
//!
//! Key derivation and single-block sealing for encrypted time series.
//! Every operation is a pure function of its inputs: the same seed and path
//! always give the same key, and callers supply nonces.
//!
//! # Key Hierarchy
//!
//! A stream's keys form a tree. Each edge is one PRF step: the child key is
//! AES-128 of the child's index under the parent key.
//!
//! ```text
//! Stream Master Key
//!        │
//!        ▼
//! Split Tree → metadata root, MAC key, sharing master
//!        │
//!        ▼
//! Key Tree (depth D, fan-out k) → one leaf key per chunk
//!        │
//!        ▼
//! derive_metadata_u64 / seal_block → protected chunk metadata
//! Heac                               → summable u64 ciphertexts
//! ```
//!
//! Access to a time range is granted by revealing the few inner nodes whose
//! subtrees tile exactly that range of leaves.
//!
//! # Security
//!
//! Derivation:
//! - A node key yields all of its descendants and nothing else
//! - Siblings and ancestors cannot be computed from a revealed node
//! - Path order matters: `[a, b]` and `[b, a]` give unrelated keys
//!
//! Sealing:
//! - AES-128-GCM with a 4-byte header as associated data
//! - Tag is verified before any plaintext is released
//! - Every verification failure looks the same to the caller
//!
//! Hygiene:
//! - Key buffers are zeroized on drop and compared in constant time
//! - Key material never appears in `Debug` output or log events

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod backend;
pub mod block;
pub mod derive;
pub mod error;
pub mod heac;
pub mod key;
pub mod key_tree;
pub mod prf;
pub mod stream_keys;

pub use backend::{AesBackend, CipherBackend};
pub use block::{BlockCipher, split_sealed};
pub use derive::{KeyPurpose, derive_leaf_u64, derive_metadata_u64, derive_u64, metadata_input};
pub use error::CryptoError;
pub use heac::{Heac, decrypt_with_keys, encrypt_with_keys};
pub use key::{AAD_SIZE, BLOCK_SIZE, KEY_SIZE, Key, NONCE_SIZE, SEALED_SIZE, TAG_SIZE};
pub use key_tree::{
    KeyTree, KeyTreeConfig, KeyTreeError, NODE_ENCODED_SIZE, SeedNode, decode_nodes, encode_nodes,
};
pub use prf::{MAX_APPLY_INDEX, Prf, encode_index};
pub use stream_keys::StreamKeys;
