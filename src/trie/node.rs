//! Trie node types

use super::hasher;
use crate::model::{Hash, PathKey};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which child of a branch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The side a key descends at a branch whose divergence bit reads `bit`
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Wire tag: `0x00` for left, `0x01` for right
    pub fn as_byte(self) -> u8 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Where a key falls relative to a child's compressed domain
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    /// The child is a leaf holding exactly this key
    Exact,
    /// The child is a branch whose shared suffix matches the key
    Contains,
    /// The key leaves the child's domain at this height
    Diverges { height: u8 },
}

impl Location {
    /// Whether descending into the child is consistent with the key
    pub fn is_within(&self) -> bool {
        matches!(self, Location::Exact | Location::Contains)
    }
}

/// A leaf holding one inserted value
#[derive(Clone, Debug)]
pub struct LeafNode {
    /// Full 256-bit address
    pub key: PathKey,
    /// The inserted value
    pub content: Vec<u8>,
    /// `H(DOMAIN_LEAF ‖ H(content))`, or the fixed boundary hash
    pub hash: Hash,
}

impl LeafNode {
    /// Create a leaf addressed by the digest of its content
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        LeafNode {
            key: PathKey::from_value(&content),
            hash: hasher::leaf_hash(&content),
            content,
        }
    }

    /// The boundary leaf at the all-zero key
    pub fn min() -> Self {
        LeafNode {
            key: PathKey::MIN,
            content: Vec::new(),
            hash: hasher::min_leaf_hash(),
        }
    }

    /// The boundary leaf at the all-one key
    pub fn max() -> Self {
        LeafNode {
            key: PathKey::MAX,
            content: Vec::new(),
            hash: hasher::max_leaf_hash(),
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.key == PathKey::MIN || self.key == PathKey::MAX
    }

    // Allocation-free stand-in while a slot is being rewritten
    fn vacant() -> Self {
        LeafNode {
            key: PathKey::MIN,
            content: Vec::new(),
            hash: Hash::ZERO,
        }
    }
}

/// An internal node joining two subtrees that diverge at `height`
#[derive(Clone, Debug)]
pub struct BranchNode {
    /// Shared suffix of every key below, positions `0..=height` cleared
    pub key: PathKey,
    pub height: u8,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub hash: Hash,
}

impl BranchNode {
    /// Join two subtrees whose representative keys diverge at `height`.
    ///
    /// The child reading `0` at `height` becomes the left child.
    pub fn new(height: u8, a: Node, b: Node) -> Self {
        debug_assert_eq!(a.key().divergence(b.key()), Some(height));
        let key = a.key().suffix(height as usize + 1);
        let (left, right) = if a.key().bit(height) {
            (b, a)
        } else {
            (a, b)
        };
        let hash = hasher::branch_hash(&left.hash(), height, &right.hash());
        BranchNode {
            key,
            height,
            left: Box::new(left),
            right: Box::new(right),
            hash,
        }
    }

    pub fn child(&self, side: Side) -> &Node {
        match side {
            Side::Left => &*self.left,
            Side::Right => &*self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Node {
        match side {
            Side::Left => &mut *self.left,
            Side::Right => &mut *self.right,
        }
    }

    /// Recompute this branch's hash from its children
    pub fn rehash(&mut self) {
        self.hash = hasher::branch_hash(&self.left.hash(), self.height, &self.right.hash());
    }

    /// Pick the child a key belongs to and locate the key against it.
    ///
    /// Fails if the key is outside this branch's domain or if both children claim it.
    pub fn route(&self, key: &PathKey) -> Result<(Side, Location)> {
        if key.suffix(self.height as usize + 1) != self.key {
            return Err(violation(format!(
                "key {} lies outside the branch at height {}",
                key, self.height
            )));
        }

        let side = Side::from_bit(key.bit(self.height));
        if self.child(side.opposite()).locate(key).is_within() {
            return Err(violation(format!(
                "both children of the branch at height {} claim key {}",
                self.height, key
            )));
        }

        let location = self.child(side).locate(key);
        if let Location::Diverges { height } = location {
            if height >= self.height {
                return Err(violation(format!(
                    "key {} diverges at {} below the branch at height {}",
                    key, height, self.height
                )));
            }
        }

        tracing::trace!(height = self.height, ?side, ?location, "route");
        Ok((side, location))
    }
}

/// A node in the trie
#[derive(Clone, Debug)]
pub enum Node {
    Leaf(LeafNode),
    Branch(BranchNode),
}

impl Node {
    /// The key this node is compared against: a leaf's full key or a branch's suffix
    pub fn key(&self) -> &PathKey {
        match self {
            Node::Leaf(leaf) => &leaf.key,
            Node::Branch(branch) => &branch.key,
        }
    }

    pub fn hash(&self) -> Hash {
        match self {
            Node::Leaf(leaf) => leaf.hash,
            Node::Branch(branch) => branch.hash,
        }
    }

    /// Branch height, `None` for leaves
    pub fn height(&self) -> Option<u8> {
        match self {
            Node::Leaf(_) => None,
            Node::Branch(branch) => Some(branch.height),
        }
    }

    /// Containment test of `key` against this node's domain
    pub fn locate(&self, key: &PathKey) -> Location {
        let (divergence, within) = match self {
            Node::Leaf(leaf) => (leaf.key.divergence(key), Location::Exact),
            Node::Branch(branch) => (
                key.suffix(branch.height as usize + 1)
                    .divergence(&branch.key),
                Location::Contains,
            ),
        };
        divergence.map_or(within, |height| Location::Diverges { height })
    }

    /// Rewrite this node in place through `f`, which receives it by value
    pub fn replace_with(&mut self, f: impl FnOnce(Node) -> Node) {
        let node = std::mem::replace(self, Node::Leaf(LeafNode::vacant()));
        *self = f(node);
    }
}

/// Build an invariant error, logging it loudly on the way out
pub(crate) fn violation(message: String) -> Error {
    tracing::error!(%message, "trie invariant violated");
    Error::InvariantViolation(message)
}
