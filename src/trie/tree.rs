//! Sparse Merkle trie over the 256-bit key space

use super::hasher;
use super::node::{violation, BranchNode, LeafNode, Location, Node};
use crate::model::{Hash, PathKey};
use crate::proof::{self, InclusionProof, ModificationProof};
use crate::{Error, Result, ROOT_HEIGHT};

/// An authenticated index of content-addressed leaves
///
/// The trie always holds the two boundary leaves at the all-zero and all-one keys, so
/// its root is a branch at height 255 and every other key has a neighbour on each side.
#[derive(Clone, Debug)]
pub struct SparseMerkleTrie {
    root: BranchNode,
    len: usize,
}

impl SparseMerkleTrie {
    /// Create a trie holding only the boundary leaves
    pub fn new() -> Self {
        SparseMerkleTrie {
            root: BranchNode::new(
                ROOT_HEIGHT,
                Node::Leaf(LeafNode::min()),
                Node::Leaf(LeafNode::max()),
            ),
            len: 0,
        }
    }

    /// Get the root hash
    pub fn root_hash(&self) -> Hash {
        self.root.hash
    }

    pub fn root(&self) -> &BranchNode {
        &self.root
    }

    /// Number of inserted values, boundary leaves excluded
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a value under the key derived from its digest
    pub fn insert(&mut self, value: impl AsRef<[u8]>) -> Result<()> {
        let leaf = LeafNode::new(value.as_ref());
        let key = leaf.key;
        insert_leaf(&mut self.root, leaf)?;
        self.len += 1;
        tracing::debug!(%key, root = %self.root.hash, "inserted leaf");
        Ok(())
    }

    /// Insert every value in order, stopping at the first failure
    pub fn insert_all<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        values.into_iter().try_for_each(|value| self.insert(value))
    }

    /// Check whether a value has been inserted
    pub fn contains(&self, value: impl AsRef<[u8]>) -> Result<bool> {
        self.contains_key(&PathKey::from_value(value.as_ref()))
    }

    /// Boundary leaves are not inserted values and never count as present
    pub fn contains_key(&self, key: &PathKey) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Get the content inserted at a key
    pub fn get(&self, key: &PathKey) -> Result<Option<&[u8]>> {
        Ok(self
            .find_leaf(key)?
            .filter(|leaf| !leaf.is_boundary())
            .map(|leaf| leaf.content.as_slice()))
    }

    /// All leaves in key order, boundary leaves included
    pub fn leaves(&self) -> Vec<&LeafNode> {
        let mut leaves = Vec::with_capacity(self.len + 2);
        let mut stack = vec![&*self.root.right, &*self.root.left];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(leaf) => leaves.push(leaf),
                Node::Branch(branch) => {
                    stack.push(&*branch.right);
                    stack.push(&*branch.left);
                }
            }
        }
        leaves
    }

    /// Prove that `value` has been inserted.
    ///
    /// Fails with [`Error::InvalidQuery`] if it has not.
    pub fn prove_membership(&self, value: impl AsRef<[u8]>) -> Result<InclusionProof> {
        let key = PathKey::from_value(value.as_ref());
        if self.find_leaf(&key)?.is_none() {
            return Err(Error::InvalidQuery(format!(
                "membership proof requested for absent key {}",
                key
            )));
        }
        proof::prove_membership(&self.root, &key)
    }

    /// Prove that `value` has not been inserted, naming the leaves around its gap.
    ///
    /// Fails with [`Error::InvalidQuery`] if it has.
    pub fn prove_modification(&self, value: impl AsRef<[u8]>) -> Result<ModificationProof> {
        let key = PathKey::from_value(value.as_ref());
        if self.find_leaf(&key)?.is_some() {
            return Err(Error::InvalidQuery(format!(
                "modification proof requested for present key {}",
                key
            )));
        }
        proof::prove_modification(&self.root, &key)
    }

    /// Re-derive every branch's key, height ordering, child sides and hash.
    pub fn check_invariants(&self) -> Result<()> {
        let mut stack = vec![&self.root];
        while let Some(branch) = stack.pop() {
            for (side, child) in [(false, &*branch.left), (true, &*branch.right)] {
                if child.key().bit(branch.height) != side {
                    return Err(violation(format!(
                        "child on the wrong side of the branch at height {}",
                        branch.height
                    )));
                }
                if child.key().suffix(branch.height as usize + 1) != branch.key {
                    return Err(violation(format!(
                        "child suffix differs from the branch at height {}",
                        branch.height
                    )));
                }
                if let Node::Branch(inner) = child {
                    if inner.height >= branch.height {
                        return Err(violation(format!(
                            "branch at height {} sits below height {}",
                            inner.height, branch.height
                        )));
                    }
                    stack.push(inner);
                }
            }

            let expected =
                hasher::branch_hash(&branch.left.hash(), branch.height, &branch.right.hash());
            if expected != branch.hash {
                return Err(violation(format!("stale hash at height {}", branch.height)));
            }
        }
        Ok(())
    }

    fn find_leaf(&self, key: &PathKey) -> Result<Option<&LeafNode>> {
        let mut branch = &self.root;
        loop {
            let (side, location) = branch.route(key)?;
            match (location, branch.child(side)) {
                (Location::Exact, Node::Leaf(leaf)) => return Ok(Some(leaf)),
                (Location::Contains, Node::Branch(child)) => branch = child,
                (Location::Diverges { .. }, _) => return Ok(None),
                (location, _) => {
                    return Err(violation(format!(
                        "{:?} reported against the wrong node kind at height {}",
                        location, branch.height
                    )))
                }
            }
        }
    }
}

impl Default for SparseMerkleTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite the path from `branch` down to the gap `leaf` falls into.
///
/// Nothing is modified unless the insertion succeeds.
fn insert_leaf(branch: &mut BranchNode, leaf: LeafNode) -> Result<()> {
    let (side, location) = branch.route(&leaf.key)?;
    match location {
        Location::Exact => return Err(Error::DuplicateKey(leaf.key)),
        Location::Contains => match branch.child_mut(side) {
            Node::Branch(child) => insert_leaf(child, leaf)?,
            Node::Leaf(_) => {
                return Err(violation(format!(
                    "leaf reported as containing key {}",
                    leaf.key
                )))
            }
        },
        Location::Diverges { height } => {
            branch.child_mut(side).replace_with(|existing| {
                Node::Branch(BranchNode::new(height, existing, Node::Leaf(leaf)))
            });
        }
    }
    branch.rehash();
    Ok(())
}
