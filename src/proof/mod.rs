//! Membership and gap proofs over the trie
//!
//! Both proofs carry sibling hashes tagged with the height of the branch they were
//! collected at, so a verifier can replay `H(left ‖ height ‖ right)` from a leaf back up
//! to the root. [`encode`] flattens them into the compact byte form.

pub mod encode;
mod inclusion;
mod modification;

use crate::model::Hash;
use crate::trie::Side;
use serde::{Deserialize, Serialize};

pub use encode::{EncodedInclusionProof, EncodedModificationProof};
pub use inclusion::InclusionProof;
pub use modification::ModificationProof;

pub(crate) use inclusion::prove_membership;
pub(crate) use modification::prove_modification;

/// A sibling hash whose side is implied by the field it is stored in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEntry {
    pub hash: Hash,
    pub height: u8,
}

impl ProofEntry {
    pub fn new(hash: Hash, height: u8) -> Self {
        ProofEntry { hash, height }
    }
}

/// A sibling hash together with the side it sits on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidedEntry {
    pub hash: Hash,
    pub height: u8,
    pub side: Side,
}

impl SidedEntry {
    pub fn new(hash: Hash, height: u8, side: Side) -> Self {
        SidedEntry { hash, height, side }
    }
}
