//! Owner and receiver views of a key tree

use super::{config::KeyTreeConfig, error::KeyTreeError, node::SeedNode};
use crate::{
    backend::{AesBackend, CipherBackend},
    key::Key,
    prf::Prf,
};

/// Key-regression tree over a PRF.
///
/// The owner holds the root and can derive every leaf and reveal any leaf
/// range as a minimal set of [`SeedNode`]s. A receiver holds only such a
/// set and derives exactly the leaves it covers.
#[derive(Debug, Clone)]
pub struct KeyTree<B = AesBackend> {
    prf: Prf<B>,
    config: KeyTreeConfig,
    /// Sorted by first covered leaf, with no gaps or overlaps
    nodes: Vec<SeedNode>,
    first: u64,
    last: u64,
    owner: bool,
}

impl<B: CipherBackend> KeyTree<B> {
    /// Tree rooted at `root`, able to derive every leaf.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: unusable tree shape
    /// - `Crypto(InvalidKeyLength)`: `root` is not 16 bytes
    pub fn owner(prf: Prf<B>, root: &[u8], config: KeyTreeConfig) -> Result<Self, KeyTreeError> {
        let leaves = config.leaf_count()?;
        let root = Key::from_slice(root)?;

        tracing::debug!(depth = config.depth, fanout = config.fanout, "owner key tree created");

        Ok(Self {
            prf,
            config,
            nodes: vec![SeedNode::new(root, 0, 0)],
            first: 0,
            last: leaves - 1,
            owner: true,
        })
    }

    /// Tree built from nodes revealed by an owner.
    ///
    /// Nodes may arrive in any order but must cover one contiguous leaf
    /// range without overlap.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: unusable tree shape
    /// - `EmptyNodeSet`: `nodes` is empty
    /// - `NodeTooDeep`, `NodeOutOfTree`: a node does not exist in this tree
    /// - `NonContiguousNodes`: the nodes leave a gap or overlap
    pub fn receiver(
        prf: Prf<B>,
        mut nodes: Vec<SeedNode>,
        config: KeyTreeConfig,
    ) -> Result<Self, KeyTreeError> {
        config.validate()?;
        if nodes.is_empty() {
            return Err(KeyTreeError::EmptyNodeSet);
        }

        for node in &nodes {
            if node.depth() > config.depth {
                return Err(KeyTreeError::NodeTooDeep { depth: node.depth(), max: config.depth });
            }
            if node.node_nr() >= config.width(node.depth()) {
                return Err(KeyTreeError::NodeOutOfTree {
                    depth: node.depth(),
                    node_nr: node.node_nr(),
                });
            }
        }

        nodes.sort_by_key(|node| first_leaf(&config, node));

        let mut expected_start = first_leaf(&config, &nodes[0]);
        for node in &nodes {
            let actual_start = first_leaf(&config, node);
            if actual_start != expected_start {
                return Err(KeyTreeError::NonContiguousNodes { expected_start, actual_start });
            }
            expected_start = last_leaf(&config, node).wrapping_add(1);
        }

        let first = first_leaf(&config, &nodes[0]);
        let last = last_leaf(&config, &nodes[nodes.len() - 1]);

        tracing::debug!(nodes = nodes.len(), first, last, "receiver key tree created");

        Ok(Self { prf, config, nodes, first, last, owner: false })
    }

    /// Tree shape.
    pub fn config(&self) -> &KeyTreeConfig {
        &self.config
    }

    /// Inclusive range of derivable leaves.
    pub fn key_interval(&self) -> (u64, u64) {
        (self.first, self.last)
    }

    /// Whether this tree holds the root.
    pub fn is_owner(&self) -> bool {
        self.owner
    }

    /// Nodes this tree derives from, ordered by first covered leaf.
    pub fn nodes(&self) -> &[SeedNode] {
        &self.nodes
    }

    /// PRF engine used for derivation.
    pub fn prf(&self) -> &Prf<B> {
        &self.prf
    }

    /// Leaf key `id`.
    ///
    /// # Errors
    ///
    /// - `KeyOutOfRange`: `id` is outside [`Self::key_interval`]
    pub fn seed(&self, id: u64) -> Result<Key, KeyTreeError> {
        self.check_access(id)?;
        let node = self.covering_node(id)?;
        let path = base_digits(id, self.config.depth - node.depth(), self.config.fanout);

        Ok(self.prf.derive_path(node.seed().clone(), &path))
    }

    /// Leaf keys `from..=to` in order.
    ///
    /// Shares intermediate derivations between neighbouring leaves, so this
    /// is cheaper than calling [`Self::seed`] for each id.
    ///
    /// # Errors
    ///
    /// - `InvalidRange`: `from > to`
    /// - `KeyOutOfRange`: either end is outside [`Self::key_interval`]
    /// - `RangeTooLarge`: the keys cannot be allocated
    pub fn seeds(&self, from: u64, to: u64) -> Result<Vec<Key>, KeyTreeError> {
        if from > to {
            return Err(KeyTreeError::InvalidRange { from, to });
        }
        self.check_access(from)?;
        self.check_access(to)?;

        let mut keys = Vec::new();
        let count = usize::try_from(to - from).ok().and_then(|n| n.checked_add(1));
        if !count.is_some_and(|n| keys.try_reserve_exact(n).is_ok()) {
            return Err(KeyTreeError::RangeTooLarge { from, to });
        }

        for node in &self.nodes {
            let node_first = first_leaf(&self.config, node);
            let node_last = last_leaf(&self.config, node);
            if node_last < from || node_first > to {
                continue;
            }
            keys.extend(self.expand(node, from.max(node_first), to.min(node_last)));
        }

        Ok(keys)
    }

    /// Minimal set of nodes covering exactly the leaves `from..=to`.
    ///
    /// Each returned node's subtree lies entirely within the range, and the
    /// nodes come back ordered by first covered leaf, ready for
    /// [`Self::receiver`].
    ///
    /// # Errors
    ///
    /// - `NotOwner`: this tree was built from shared nodes
    /// - `InvalidRange`: `from > to`
    /// - `KeyOutOfRange`: `to` is past the last leaf
    pub fn reveal_seeds(&self, from: u64, to: u64) -> Result<Vec<SeedNode>, KeyTreeError> {
        if !self.owner {
            return Err(KeyTreeError::NotOwner);
        }
        if from > to {
            return Err(KeyTreeError::InvalidRange { from, to });
        }
        self.check_access(to)?;

        let fanout = u64::from(self.config.fanout);
        let mut positions: Vec<(u16, u64)> = Vec::new();
        let mut cover = |position: (u16, u64)| {
            if !positions.contains(&position) {
                positions.push(position);
            }
        };

        // Climb from the leaves, peeling off partial runs at both edges of
        // the range until the remainder is whole subtrees of the next level.
        let (mut lo, mut hi) = (from, to);
        'levels: for depth in (0..=self.config.depth).rev() {
            for _ in 1..fanout {
                if lo == hi {
                    cover((depth, lo));
                }
                if lo % fanout != 0 {
                    cover((depth, lo));
                    lo += 1;
                }
                if hi % fanout != fanout - 1 {
                    cover((depth, hi));
                    if hi == 0 {
                        break 'levels;
                    }
                    hi -= 1;
                }
                if lo > hi {
                    break 'levels;
                }
            }
            lo /= fanout;
            hi /= fanout;
        }

        positions.sort_by_key(|&(depth, node_nr)| node_nr * self.config.span(depth));

        let root = self.nodes[0].seed();
        let nodes: Vec<SeedNode> = positions
            .into_iter()
            .map(|(depth, node_nr)| {
                let path = base_digits(node_nr, depth, self.config.fanout);
                SeedNode::new(self.prf.derive_path(root.clone(), &path), depth, node_nr)
            })
            .collect();

        tracing::debug!(from, to, nodes = nodes.len(), "revealed seed nodes");
        Ok(nodes)
    }

    fn check_access(&self, id: u64) -> Result<(), KeyTreeError> {
        if id < self.first || id > self.last {
            return Err(KeyTreeError::KeyOutOfRange { id, first: self.first, last: self.last });
        }
        Ok(())
    }

    fn covering_node(&self, id: u64) -> Result<&SeedNode, KeyTreeError> {
        let index = self.nodes.partition_point(|node| last_leaf(&self.config, node) < id);
        self.nodes.get(index).ok_or(KeyTreeError::KeyOutOfRange {
            id,
            first: self.first,
            last: self.last,
        })
    }

    /// Leaves `from..=to` below `node`, expanded one level at a time.
    ///
    /// At each level only the first parent is clipped on the left and only
    /// the last parent on the right; every parent in between contributes
    /// all of its children.
    fn expand(&self, node: &SeedNode, from: u64, to: u64) -> Vec<Key> {
        let levels = self.config.depth - node.depth();
        let fanout = self.config.fanout;
        let path_from = base_digits(from, levels, fanout);
        let path_to = base_digits(to, levels, fanout);

        let mut level = vec![node.seed().clone()];
        for (&lo, &hi) in path_from.iter().zip(&path_to) {
            let last = level.len() - 1;
            let mut next = Vec::new();
            for (i, parent) in level.iter().enumerate() {
                let start = if i == 0 { lo } else { 0 };
                let end = if i == last { hi } else { fanout - 1 };
                next.extend((start..=end).map(|child| self.prf.derive_child(parent, child)));
            }
            level = next;
        }
        level
    }
}

fn first_leaf(config: &KeyTreeConfig, node: &SeedNode) -> u64 {
    node.node_nr() * config.span(node.depth())
}

fn last_leaf(config: &KeyTreeConfig, node: &SeedNode) -> u64 {
    first_leaf(config, node) + (config.span(node.depth()) - 1)
}

/// The lowest `count` base-`fanout` digits of `value`, most significant
/// first.
fn base_digits(value: u64, count: u16, fanout: u32) -> Vec<u32> {
    let base = u64::from(fanout);
    let mut digits = vec![0u32; usize::from(count)];
    let mut rest = value;
    for digit in digits.iter_mut().rev() {
        // Remainder is below fanout, which fits in u32
        *digit = (rest % base) as u32;
        rest /= base;
    }
    digits
}
