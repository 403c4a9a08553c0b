//! # sparse_trie
//!
//! An authenticated sparse Merkle trie over 256-bit content-derived keys.
//!
//! Every node carries a hash, so the root is a tamper-evident commitment to the full set
//! of inserted leaves regardless of the order they were inserted in.
//!
//! ## Core Concepts
//!
//! - **Leaves**: content addressed by `blake2b-256(content)`, hashed under a domain tag
//! - **Branches**: path-compressed, labelled with the height their children diverge at
//! - **Boundary leaves**: fixed at the all-zero and all-one keys, so every absent key
//!   has a neighbour on both sides
//! - **Proofs**: inclusion proofs for present keys, modification proofs naming the gap
//!   an absent key would fill
//!
//! ## Example
//!
//! ```
//! use sparse_trie::SparseMerkleTrie;
//!
//! let mut trie = SparseMerkleTrie::new();
//! trie.insert("apple (0)")?;
//! trie.insert("banana (328)")?;
//!
//! let inclusion = trie.prove_membership("apple (0)")?;
//! let gap = trie.prove_modification("cherry (0)")?;
//! assert!(inclusion.depth() > 0);
//! assert_ne!(gap.left_leaf, gap.right_leaf);
//! # Ok::<(), sparse_trie::Error>(())
//! ```

pub mod config;
pub mod model;
pub mod proof;
pub mod trie;

mod error;

pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use model::{Hash, PathKey, HASH_LEN, KEY_BITS};
pub use proof::{
    EncodedInclusionProof, EncodedModificationProof, InclusionProof, ModificationProof,
    ProofEntry, SidedEntry,
};
pub use trie::hasher::DOMAIN_LEAF;
pub use trie::{SharedTrie, Side, SparseMerkleTrie};

/// Height of the root branch, which always separates the two boundary leaves
pub const ROOT_HEIGHT: u8 = 255;
