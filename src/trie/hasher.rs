//! Node hashing scheme.
//!
//! Leaves and branches are domain-separated: a leaf hash always covers the 7-byte
//! [`DOMAIN_LEAF`] tag followed by a 32-byte digest (39 bytes), while a branch hash covers
//! two child hashes around a single height byte (65 bytes).

use crate::model::{Hash, HASH_LEN};
use once_cell::sync::Lazy;

/// Domain separation tag mixed into every leaf hash.
///
/// Changing this invalidates every root ever produced.
pub const DOMAIN_LEAF: [u8; 7] = [0x0d, 0xee, 0xff, 0xaa, 0xd0, 0x77, 0x83];

static MIN_LEAF_HASH: Lazy<Hash> = Lazy::new(|| tagged_leaf_hash(&[0x00; HASH_LEN]));
static MAX_LEAF_HASH: Lazy<Hash> = Lazy::new(|| tagged_leaf_hash(&[0xff; HASH_LEN]));

fn tagged_leaf_hash(digest: &[u8; HASH_LEN]) -> Hash {
    Hash::digest_many(&[&DOMAIN_LEAF[..], &digest[..]])
}

/// `H(DOMAIN_LEAF ‖ H(content))`
pub fn leaf_hash(content: &[u8]) -> Hash {
    tagged_leaf_hash(Hash::digest(content).as_bytes())
}

/// Hash of the boundary leaf at the all-zero key.
pub fn min_leaf_hash() -> Hash {
    *MIN_LEAF_HASH
}

/// Hash of the boundary leaf at the all-one key.
pub fn max_leaf_hash() -> Hash {
    *MAX_LEAF_HASH
}

/// `H(left ‖ height ‖ right)`
pub fn branch_hash(left: &Hash, height: u8, right: &Hash) -> Hash {
    Hash::digest_many(&[&left.as_bytes()[..], &[height][..], &right.as_bytes()[..]])
}
