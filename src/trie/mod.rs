//! Sparse Merkle trie
//!
//! A path-compressed binary trie over 256-bit keys where:
//! - Every leaf is addressed by the digest of its content
//! - Every branch records the height at which its two subtrees diverge
//! - The root hash commits to the full set of inserted leaves, independent of
//!   insertion order

pub mod hasher;
pub(crate) mod node;
mod shared;
mod tree;

pub use node::{BranchNode, LeafNode, Location, Node, Side};
pub use shared::SharedTrie;
pub use tree::SparseMerkleTrie;
