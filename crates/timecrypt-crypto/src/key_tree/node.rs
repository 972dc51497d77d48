//! Shared seed nodes and their wire encoding
//!
//! ```text
//!  0     1 2                    9 10                        25
//! +-------+----------------------+----------------------------+
//! | depth |    node_nr (BE)      |            seed            |
//! | (BE)  |                      |                            |
//! +-------+----------------------+----------------------------+
//! ```
//!
//! A node list is the concatenation of its encoded nodes with no framing.

use super::error::KeyTreeError;
use crate::key::{KEY_SIZE, Key};

/// Size of one encoded [`SeedNode`]
pub const NODE_ENCODED_SIZE: usize = 2 + 8 + KEY_SIZE;

/// A tree node handed to a receiver: its seed and its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedNode {
    seed: Key,
    depth: u16,
    node_nr: u64,
}

impl SeedNode {
    /// Node number `node_nr` (left to right, from 0) at `depth`.
    pub fn new(seed: Key, depth: u16, node_nr: u64) -> Self {
        Self { seed, depth, node_nr }
    }

    /// Seed of the subtree rooted here.
    pub fn seed(&self) -> &Key {
        &self.seed
    }

    /// Distance from the root.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Position within its level.
    pub fn node_nr(&self) -> u64 {
        self.node_nr
    }

    /// Encode into the fixed wire layout.
    pub fn encode(&self) -> [u8; NODE_ENCODED_SIZE] {
        let mut out = [0u8; NODE_ENCODED_SIZE];
        out[0..2].copy_from_slice(&self.depth.to_be_bytes());
        out[2..10].copy_from_slice(&self.node_nr.to_be_bytes());
        out[10..].copy_from_slice(self.seed.as_bytes());
        out
    }

    /// Decode one node from the start of `bytes`.
    ///
    /// Bytes past the first node are ignored.
    ///
    /// # Errors
    ///
    /// - `InvalidNodeEncoding`: fewer than [`NODE_ENCODED_SIZE`] bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, KeyTreeError> {
        let Some(node) = bytes.get(..NODE_ENCODED_SIZE) else {
            return Err(KeyTreeError::InvalidNodeEncoding {
                expected: NODE_ENCODED_SIZE,
                actual: bytes.len(),
            });
        };

        let (depth, rest) = node.split_at(2);
        let (node_nr, seed) = rest.split_at(8);

        let mut depth_bytes = [0u8; 2];
        depth_bytes.copy_from_slice(depth);
        let mut node_nr_bytes = [0u8; 8];
        node_nr_bytes.copy_from_slice(node_nr);

        Ok(Self {
            seed: Key::from_slice(seed)?,
            depth: u16::from_be_bytes(depth_bytes),
            node_nr: u64::from_be_bytes(node_nr_bytes),
        })
    }
}

/// Encode `nodes` back to back.
pub fn encode_nodes(nodes: &[SeedNode]) -> Vec<u8> {
    let mut out = Vec::with_capacity(nodes.len() * NODE_ENCODED_SIZE);
    for node in nodes {
        out.extend_from_slice(&node.encode());
    }
    out
}

/// Decode a node list produced by [`encode_nodes`].
///
/// # Errors
///
/// - `TrailingNodeBytes`: length is not a multiple of [`NODE_ENCODED_SIZE`]
pub fn decode_nodes(bytes: &[u8]) -> Result<Vec<SeedNode>, KeyTreeError> {
    let chunks = bytes.chunks_exact(NODE_ENCODED_SIZE);
    let remainder = chunks.remainder().len();
    if remainder != 0 {
        return Err(KeyTreeError::TrailingNodeBytes { remainder });
    }

    chunks.map(SeedNode::decode).collect()
}
