//! Key regression trees
//!
//! Leaf keys of a `k`-ary tree of depth `D` are derived from a single root
//! by walking the PRF down the path to the leaf:
//!
//! ```text
//!                      root                  depth 0
//!                 /            \
//!            n(1,0)            n(1,1)        depth 1
//!            /    \            /    \
//!        leaf 0  leaf 1    leaf 2  leaf 3    depth D = 2
//! ```
//!
//! Leaves are numbered left to right, so the digits of a leaf id in base
//! `k`, most significant first, are its path from the root. Revealing an
//! inner node grants every leaf below it and nothing else; the owner grants
//! a leaf range by handing out the smallest set of nodes that tiles it.

mod config;
mod error;
mod node;
mod tree;

pub use config::{DEFAULT_FANOUT, KeyTreeConfig, MAX_FANOUT};
pub use error::KeyTreeError;
pub use node::{NODE_ENCODED_SIZE, SeedNode, decode_nodes, encode_nodes};
pub use tree::KeyTree;
