//! Key tree shape

use super::error::KeyTreeError;
use crate::prf::MAX_APPLY_INDEX;

/// Default number of children per node
pub const DEFAULT_FANOUT: u32 = 2;

const MIN_FANOUT: u32 = 2;

/// Largest fan-out: children are derived with single-step `apply`, whose
/// index is limited to one byte
pub const MAX_FANOUT: u32 = MAX_APPLY_INDEX + 1;

/// Shape of a key tree.
///
/// A tree of depth `D` and fan-out `k` has `k^D` leaves numbered
/// `0..k^D`. Depth 0 is a single leaf: the root itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTreeConfig {
    /// Number of derivation steps from the root to a leaf
    pub depth: u16,
    /// Children per inner node
    pub fanout: u32,
}

impl Default for KeyTreeConfig {
    fn default() -> Self {
        Self { depth: 0, fanout: DEFAULT_FANOUT }
    }
}

impl KeyTreeConfig {
    /// Binary tree of the given depth.
    pub fn new(depth: u16) -> Self {
        Self { depth, ..Self::default() }
    }

    /// Replace the fan-out.
    #[must_use]
    pub fn with_fanout(mut self, fanout: u32) -> Self {
        self.fanout = fanout;
        self
    }

    /// Number of leaves.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: fan-out outside `2..=256`, or more leaves than
    ///   fit in a `u64`
    pub fn leaf_count(&self) -> Result<u64, KeyTreeError> {
        if !(MIN_FANOUT..=MAX_FANOUT).contains(&self.fanout) {
            return Err(KeyTreeError::InvalidConfig {
                reason: format!("fanout {} outside {MIN_FANOUT}..={MAX_FANOUT}", self.fanout),
            });
        }

        u64::from(self.fanout).checked_pow(u32::from(self.depth)).ok_or_else(|| {
            KeyTreeError::InvalidConfig {
                reason: format!("{}^{} leaves overflow u64", self.fanout, self.depth),
            }
        })
    }

    /// Check that the shape is usable.
    pub fn validate(&self) -> Result<(), KeyTreeError> {
        self.leaf_count().map(|_| ())
    }

    /// Leaves below one node at `depth`.
    ///
    /// Only meaningful for a validated config and `depth <= self.depth`.
    pub(crate) fn span(&self, depth: u16) -> u64 {
        u64::from(self.fanout).pow(u32::from(self.depth - depth))
    }

    /// Nodes at `depth`.
    ///
    /// Only meaningful for a validated config and `depth <= self.depth`.
    pub(crate) fn width(&self, depth: u16) -> u64 {
        u64::from(self.fanout).pow(u32::from(depth))
    }
}
