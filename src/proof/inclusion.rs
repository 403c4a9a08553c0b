use super::SidedEntry;
use crate::model::{Hash, PathKey};
use crate::trie::node::violation;
use crate::trie::{BranchNode, Location, Node};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Evidence that a leaf is present under a root
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Hash of the proven leaf
    pub leaf: Hash,
    /// Siblings from the leaf's parent up to the root
    pub siblings: Vec<SidedEntry>,
}

impl InclusionProof {
    /// Number of branches between the leaf and the root
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// Walk from `root` to the leaf at `key`, collecting the sibling at every branch.
pub(crate) fn prove_membership(root: &BranchNode, key: &PathKey) -> Result<InclusionProof> {
    let mut siblings = Vec::new();
    let mut branch = root;

    let leaf = loop {
        let (side, location) = branch.route(key)?;
        let sibling = side.opposite();
        siblings.push(SidedEntry::new(
            branch.child(sibling).hash(),
            branch.height,
            sibling,
        ));

        match (location, branch.child(side)) {
            (Location::Exact, Node::Leaf(leaf)) => break leaf,
            (Location::Contains, Node::Branch(child)) => branch = child,
            (Location::Diverges { .. }, _) => {
                return Err(Error::InvalidQuery(format!("key {} is not in the trie", key)))
            }
            (location, _) => {
                return Err(violation(format!(
                    "{:?} reported against the wrong node kind at height {}",
                    location, branch.height
                )))
            }
        }
    };

    // Collected root-first; proofs read leaf-first
    siblings.reverse();
    tracing::debug!(%key, depth = siblings.len(), "built inclusion proof");

    Ok(InclusionProof {
        leaf: leaf.hash,
        siblings,
    })
}
