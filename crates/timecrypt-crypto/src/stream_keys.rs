//! Per-stream key material
//!
//! A stream owner starts from one master key and splits it with a small
//! binary tree:
//!
//! ```text
//!                 master key
//!               /            \
//!            (1,0)          (1,1)
//!           /     \        /     \
//!       unused  metadata  MAC   sharing
//!        leaf 0  leaf 1  leaf 2  leaf 3
//! ```
//!
//! The metadata root heads the stream's key tree, whose leaves key the
//! individual chunks. The sharing master roots one extra tree per
//! aggregation precision. Receivers get revealed nodes of the key tree and
//! the MAC key, never the master or the sharing master.

use crate::{
    backend::{AesBackend, CipherBackend},
    key::Key,
    key_tree::{KeyTree, KeyTreeConfig, KeyTreeError, SeedNode},
    prf::Prf,
};

/// Depth of the tree that splits the master key
const SPLIT_DEPTH: u16 = 2;

const METADATA_LEAF: u64 = 1;
const MAC_LEAF: u64 = 2;
const SHARING_LEAF: u64 = 3;

/// Keys of one stream, from the owner's or a receiver's point of view.
#[derive(Debug, Clone)]
pub struct StreamKeys<B = AesBackend> {
    key_tree: KeyTree<B>,
    mac_key: Key,
    sharing_master: Option<Key>,
}

impl<B: CipherBackend + Clone> StreamKeys<B> {
    /// Derive every stream key from `master_key`.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig`: a key tree of `key_depth` has too many leaves
    /// - `Crypto(InvalidKeyLength)`: `master_key` is not 16 bytes
    pub fn owner(prf: Prf<B>, master_key: &[u8], key_depth: u16) -> Result<Self, KeyTreeError> {
        let split = KeyTree::owner(prf.clone(), master_key, KeyTreeConfig::new(SPLIT_DEPTH))?;
        let metadata_root = split.seed(METADATA_LEAF)?;
        let mac_key = split.seed(MAC_LEAF)?;
        let sharing_master = split.seed(SHARING_LEAF)?;

        let key_tree = KeyTree::owner(prf, metadata_root.as_bytes(), KeyTreeConfig::new(key_depth))?;

        tracing::debug!(key_depth, "stream keys derived for owner");

        Ok(Self { key_tree, mac_key, sharing_master: Some(sharing_master) })
    }

    /// Stream keys from material shared by the owner.
    ///
    /// # Errors
    ///
    /// - Any error of [`KeyTree::receiver`]
    /// - `Crypto(InvalidKeyLength)`: `mac_key` is not 16 bytes
    pub fn receiver(
        prf: Prf<B>,
        nodes: Vec<SeedNode>,
        mac_key: &[u8],
        key_depth: u16,
    ) -> Result<Self, KeyTreeError> {
        let mac_key = Key::from_slice(mac_key)?;
        let key_tree = KeyTree::receiver(prf, nodes, KeyTreeConfig::new(key_depth))?;

        tracing::debug!(key_depth, "stream keys received");

        Ok(Self { key_tree, mac_key, sharing_master: None })
    }

    /// Tree keying the stream's chunks.
    pub fn key_tree(&self) -> &KeyTree<B> {
        &self.key_tree
    }

    /// Key authenticating the stream's metadata.
    pub fn mac_key(&self) -> &Key {
        &self.mac_key
    }

    /// Whether these keys were derived from the master key.
    pub fn is_owner(&self) -> bool {
        self.sharing_master.is_some()
    }

    /// Owner tree for sharing aggregates at `precision`.
    ///
    /// Each precision gets an independent tree, so granting access at one
    /// precision reveals nothing at another.
    ///
    /// # Errors
    ///
    /// - `NotOwner`: these keys were received rather than derived
    /// - `Crypto(IndexOutOfRange)`: `precision` is above 255
    /// - `InvalidConfig`: a tree of `depth` has too many leaves
    pub fn sharing_tree(&self, precision: u32, depth: u16) -> Result<KeyTree<B>, KeyTreeError> {
        let Some(sharing_master) = &self.sharing_master else {
            return Err(KeyTreeError::NotOwner);
        };

        let prf = self.key_tree.prf().clone();
        let root = prf.apply(sharing_master.as_bytes(), precision)?;

        tracing::debug!(precision, depth, "sharing tree derived");

        KeyTree::owner(prf, root.as_bytes(), KeyTreeConfig::new(depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    const MASTER: [u8; 16] = [0x4D; 16];

    fn prf() -> Prf {
        Prf::new(AesBackend::new())
    }

    fn owner(key_depth: u16) -> StreamKeys {
        StreamKeys::owner(prf(), &MASTER, key_depth).unwrap()
    }

    #[test]
    fn owner_keys_follow_split_tree() {
        let keys = owner(10);
        let engine = prf();

        let metadata_root = engine.multiapply(&MASTER, &[0, 1]).unwrap();
        let mac_key = engine.multiapply(&MASTER, &[1, 0]).unwrap();

        assert_eq!(keys.mac_key(), &mac_key);
        assert_eq!(
            keys.key_tree().seed(5).unwrap(),
            engine.multiapply(metadata_root.as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 1, 0, 1]).unwrap()
        );
        assert!(keys.is_owner());
        assert_eq!(keys.key_tree().key_interval(), (0, 1023));
    }

    #[test]
    fn sharing_tree_is_rooted_at_precision() {
        let keys = owner(10);
        let engine = prf();
        let sharing_master = engine.multiapply(&MASTER, &[1, 1]).unwrap();

        let tree = keys.sharing_tree(3, 4).unwrap();
        let root = engine.apply(sharing_master.as_bytes(), 3).unwrap();

        assert_eq!(tree.seed(0).unwrap(), engine.multiapply(root.as_bytes(), &[0, 0, 0, 0]).unwrap());
        assert_ne!(
            keys.sharing_tree(3, 4).unwrap().seed(0).unwrap(),
            keys.sharing_tree(4, 4).unwrap().seed(0).unwrap()
        );
    }

    #[test]
    fn sharing_precision_is_one_byte() {
        let result = owner(4).sharing_tree(256, 4);
        assert!(matches!(
            result,
            Err(KeyTreeError::Crypto(CryptoError::IndexOutOfRange { index: 256, max: 255 }))
        ));
    }

    #[test]
    fn receiver_matches_owner_on_shared_range() {
        let owner = owner(12);
        let nodes = owner.key_tree().reveal_seeds(100, 900).unwrap();

        let receiver =
            StreamKeys::receiver(prf(), nodes, owner.mac_key().as_bytes(), 12).unwrap();

        assert!(!receiver.is_owner());
        assert_eq!(receiver.mac_key(), owner.mac_key());
        assert_eq!(receiver.key_tree().seed(512).unwrap(), owner.key_tree().seed(512).unwrap());
        assert!(receiver.key_tree().seed(99).is_err());
    }

    #[test]
    fn receiver_cannot_share() {
        let owner = owner(6);
        let nodes = owner.key_tree().reveal_seeds(0, 10).unwrap();
        let receiver =
            StreamKeys::receiver(prf(), nodes, owner.mac_key().as_bytes(), 6).unwrap();

        assert!(matches!(receiver.sharing_tree(1, 4), Err(KeyTreeError::NotOwner)));
    }

    #[test]
    fn rejects_bad_key_lengths() {
        assert!(matches!(
            StreamKeys::owner(prf(), &[0u8; 10], 4),
            Err(KeyTreeError::Crypto(CryptoError::InvalidKeyLength { expected: 16, actual: 10 }))
        ));

        let nodes = owner(4).key_tree().reveal_seeds(0, 3).unwrap();
        assert!(matches!(
            StreamKeys::receiver(prf(), nodes, &[0u8; 20], 4),
            Err(KeyTreeError::Crypto(CryptoError::InvalidKeyLength { expected: 16, actual: 20 }))
        ));
    }
}
