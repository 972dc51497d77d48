//! Error types for key trees and stream keys

use thiserror::Error;

use crate::error::CryptoError;

/// Errors from building, querying or sharing a key tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyTreeError {
    /// Tree shape is unusable
    #[error("invalid key tree config: {reason}")]
    InvalidConfig {
        /// What is wrong with the config
        reason: String,
    },

    /// Range start lies after range end
    #[error("invalid range: {from} > {to}")]
    InvalidRange {
        /// Requested first leaf
        from: u64,
        /// Requested last leaf
        to: u64,
    },

    /// Range holds more leaf keys than can be materialized at once
    #[error("range {from}..={to} too large to materialize")]
    RangeTooLarge {
        /// Requested first leaf
        from: u64,
        /// Requested last leaf
        to: u64,
    },

    /// Leaf is outside what this tree can derive
    #[error("key {id} not derivable: tree covers {first}..={last}")]
    KeyOutOfRange {
        /// Requested leaf
        id: u64,
        /// First derivable leaf
        first: u64,
        /// Last derivable leaf
        last: u64,
    },

    /// Operation needs the root seed, but this tree was built from shared
    /// nodes
    #[error("operation requires the tree owner")]
    NotOwner,

    /// Receiver tree built from no nodes
    #[error("no seed nodes supplied")]
    EmptyNodeSet,

    /// Shared node sits below the leaf level
    #[error("node depth {depth} exceeds tree depth {max}")]
    NodeTooDeep {
        /// Depth of the offending node
        depth: u16,
        /// Tree depth
        max: u16,
    },

    /// Shared node number does not exist at its level
    #[error("node {node_nr} does not exist at depth {depth}")]
    NodeOutOfTree {
        /// Depth of the offending node
        depth: u16,
        /// Number of the offending node
        node_nr: u64,
    },

    /// Shared nodes leave a gap or overlap
    #[error("seed nodes not contiguous: expected leaf {expected_start}, node starts at {actual_start}")]
    NonContiguousNodes {
        /// First leaf the next node should cover
        expected_start: u64,
        /// First leaf it actually covers
        actual_start: u64,
    },

    /// Encoded node is truncated
    #[error("invalid node encoding: expected {expected} bytes, got {actual}")]
    InvalidNodeEncoding {
        /// Encoded node size
        expected: usize,
        /// Bytes available
        actual: usize,
    },

    /// Encoded node list ends in a partial node
    #[error("node list has {remainder} trailing bytes")]
    TrailingNodeBytes {
        /// Bytes after the last complete node
        remainder: usize,
    },

    /// Underlying PRF failure
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl KeyTreeError {
    /// Returns true if the error stems from shared material rather than a
    /// local query.
    ///
    /// Such errors mean the nodes received from the owner are malformed
    /// and must be requested again.
    pub fn is_bad_share(&self) -> bool {
        match self {
            Self::EmptyNodeSet
            | Self::NodeTooDeep { .. }
            | Self::NodeOutOfTree { .. }
            | Self::NonContiguousNodes { .. }
            | Self::InvalidNodeEncoding { .. }
            | Self::TrailingNodeBytes { .. } => true,

            Self::InvalidConfig { .. }
            | Self::InvalidRange { .. }
            | Self::RangeTooLarge { .. }
            | Self::KeyOutOfRange { .. }
            | Self::NotOwner
            | Self::Crypto(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_shares_are_bad_shares() {
        assert!(KeyTreeError::EmptyNodeSet.is_bad_share());
        assert!(
            KeyTreeError::NonContiguousNodes { expected_start: 4, actual_start: 6 }.is_bad_share()
        );
    }

    #[test]
    fn local_query_errors_are_not_bad_shares() {
        assert!(!KeyTreeError::KeyOutOfRange { id: 99, first: 100, last: 200 }.is_bad_share());
        assert!(!KeyTreeError::NotOwner.is_bad_share());
    }

    #[test]
    fn error_display() {
        let err = KeyTreeError::KeyOutOfRange { id: 99, first: 100, last: 200 };
        assert_eq!(err.to_string(), "key 99 not derivable: tree covers 100..=200");
    }

    #[test]
    fn crypto_errors_pass_through() {
        let err = KeyTreeError::from(CryptoError::InvalidKeyLength { expected: 16, actual: 4 });
        assert_eq!(err.to_string(), "invalid key length: expected 16, got 4");
    }
}
