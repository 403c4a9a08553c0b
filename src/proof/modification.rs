//! Gap (exclusion) proofs
//!
//! An absent key falls between two adjacent leaves. The search descends to the first
//! branch where the key leaves its side's subtree, resolves that subtree into one
//! neighbour, and resolves the other neighbour at the lowest branch where the two
//! neighbours' paths split. Every other sibling on the way back up lands in one of the
//! proof lists depending on how many neighbours are known at that point.

use super::{ProofEntry, SidedEntry};
use crate::model::{Hash, PathKey};
use crate::trie::node::violation;
use crate::trie::{BranchNode, Location, Node, Side};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Evidence that a key is absent, naming the two leaves bounding its gap
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationProof {
    /// Which neighbour was resolved first
    pub starting_side: Side,
    /// Hash of the greatest leaf below the key
    pub left_leaf: Hash,
    /// Hash of the least leaf above the key
    pub right_leaf: Hash,
    /// Left-hand siblings from `left_leaf` up to where its path was entered
    pub left_proofs: Vec<ProofEntry>,
    /// Right-hand siblings from `right_leaf` up to where its path was entered
    pub right_proofs: Vec<ProofEntry>,
    /// Siblings above the starting neighbour's subtree, below the common ancestor
    pub continuing_side_proofs: Vec<ProofEntry>,
    /// Siblings from the common ancestor up to the root
    pub remaining_proofs: Vec<SidedEntry>,
    /// Height of the lowest common ancestor of the two neighbours
    pub left_right_height: u8,
    /// Height of the branch whose child subtree the key sorts beside
    pub intersecting_height: u8,
}

struct Neighbour {
    leaf: Hash,
    proofs: Vec<ProofEntry>,
}

/// Descend `node` always toward `toward`, recording the sibling passed at each branch.
///
/// Toward the right this finds the subtree's greatest leaf, toward the left its least.
fn find_extreme(mut node: &Node, toward: Side) -> Neighbour {
    let mut proofs = Vec::new();
    while let Node::Branch(branch) = node {
        proofs.push(ProofEntry::new(
            branch.child(toward.opposite()).hash(),
            branch.height,
        ));
        node = branch.child(toward);
    }
    proofs.reverse();
    Neighbour {
        leaf: node.hash(),
        proofs,
    }
}

#[derive(Default)]
struct GapSearch {
    starting_side: Option<Side>,
    left: Option<Neighbour>,
    right: Option<Neighbour>,
    continuing_side_proofs: Vec<ProofEntry>,
    remaining_proofs: Vec<SidedEntry>,
    left_right_height: Option<u8>,
    intersecting_height: Option<u8>,
}

impl GapSearch {
    fn is_known(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left.is_some(),
            Side::Right => self.right.is_some(),
        }
    }

    /// Resolve the neighbour on `side` as the extreme leaf of `subtree`
    fn resolve(&mut self, side: Side, subtree: &Node) {
        // The left neighbour is the greatest leaf of its subtree
        let neighbour = find_extreme(subtree, side.opposite());
        match side {
            Side::Left => self.left = Some(neighbour),
            Side::Right => self.right = Some(neighbour),
        }
    }

    // Heights strictly decrease on the way down, so this recurses at most 256 deep
    fn visit(&mut self, branch: &BranchNode, key: &PathKey) -> Result<()> {
        let (side, location) = branch.route(key)?;
        let child = branch.child(side);

        match (location, child) {
            (Location::Contains, Node::Branch(inner)) => self.visit(inner, key)?,
            (Location::Diverges { height }, _) => {
                // The gap sits directly beside `child`
                let starting = if key.bit(height) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.starting_side = Some(starting);
                self.intersecting_height = Some(branch.height);
                self.resolve(starting, child);
            }
            (Location::Exact, _) => {
                return Err(Error::InvalidQuery(format!(
                    "key {} is present in the trie",
                    key
                )))
            }
            (location, _) => {
                return Err(violation(format!(
                    "{:?} reported against a leaf at height {}",
                    location, branch.height
                )))
            }
        }

        let sibling_side = side.opposite();
        let sibling = branch.child(sibling_side);
        if !self.is_known(sibling_side) {
            self.resolve(sibling_side, sibling);
            self.left_right_height = Some(branch.height);
        } else if !self.is_known(sibling_side.opposite()) {
            self.continuing_side_proofs
                .push(ProofEntry::new(sibling.hash(), branch.height));
        } else {
            self.remaining_proofs
                .push(SidedEntry::new(sibling.hash(), branch.height, sibling_side));
        }

        Ok(())
    }

    fn finish(self) -> Result<ModificationProof> {
        let (
            Some(starting_side),
            Some(left),
            Some(right),
            Some(left_right_height),
            Some(intersecting_height),
        ) = (
            self.starting_side,
            self.left,
            self.right,
            self.left_right_height,
            self.intersecting_height,
        )
        else {
            return Err(violation(
                "gap search finished without both neighbours".to_string(),
            ));
        };

        Ok(ModificationProof {
            starting_side,
            left_leaf: left.leaf,
            right_leaf: right.leaf,
            left_proofs: left.proofs,
            right_proofs: right.proofs,
            continuing_side_proofs: self.continuing_side_proofs,
            remaining_proofs: self.remaining_proofs,
            left_right_height,
            intersecting_height,
        })
    }
}

/// Locate the gap `key` would occupy and the two leaves bounding it.
pub(crate) fn prove_modification(root: &BranchNode, key: &PathKey) -> Result<ModificationProof> {
    let mut search = GapSearch::default();
    search.visit(root, key)?;
    let proof = search.finish()?;

    tracing::debug!(
        %key,
        starting_side = ?proof.starting_side,
        left_right_height = proof.left_right_height,
        intersecting_height = proof.intersecting_height,
        "built modification proof"
    );
    Ok(proof)
}
