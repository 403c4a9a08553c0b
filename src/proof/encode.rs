//! Compact byte encoding of proofs.
//!
//! Each entry is laid out so that its hash and height bytes already sit in the order
//! they take inside `H(left ‖ height ‖ right)`: a sibling on the left is written
//! `hash ‖ height`, a sibling on the right `height ‖ hash`. Sided entries lead with a
//! side byte (`0x00` left, `0x01` right). Fields are concatenated without separators;
//! their entry counts travel in the structured form.

use super::{InclusionProof, ModificationProof, ProofEntry, SidedEntry};
use crate::model::{Hash, HASH_LEN};
use crate::trie::Side;
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

/// Encoded width of an unsided entry
pub const ENTRY_LEN: usize = HASH_LEN + 1;

/// Encoded width of a sided entry
pub const SIDED_ENTRY_LEN: usize = HASH_LEN + 2;

/// Write an entry for a sibling sitting on `sibling_side`
fn put_entry(buf: &mut impl BufMut, entry: &ProofEntry, sibling_side: Side) {
    match sibling_side {
        Side::Left => {
            buf.put_slice(entry.hash.as_bytes());
            buf.put_u8(entry.height);
        }
        Side::Right => {
            buf.put_u8(entry.height);
            buf.put_slice(entry.hash.as_bytes());
        }
    }
}

fn put_sided(buf: &mut impl BufMut, entry: &SidedEntry) {
    buf.put_u8(entry.side.as_byte());
    put_entry(buf, &ProofEntry::new(entry.hash, entry.height), entry.side);
}

/// Pack entries whose siblings all sit on `sibling_side`
pub fn pack_entries(entries: &[ProofEntry], sibling_side: Side) -> Bytes {
    let mut buf = BytesMut::with_capacity(entries.len() * ENTRY_LEN);
    for entry in entries {
        put_entry(&mut buf, entry, sibling_side);
    }
    buf.freeze()
}

/// Pack entries that carry their own side
pub fn pack_sided(entries: &[SidedEntry]) -> Bytes {
    let mut buf = BytesMut::with_capacity(entries.len() * SIDED_ENTRY_LEN);
    for entry in entries {
        put_sided(&mut buf, entry);
    }
    buf.freeze()
}

impl InclusionProof {
    /// Sided siblings, leaf-first
    pub fn to_bytes(&self) -> Bytes {
        pack_sided(&self.siblings)
    }

    pub fn encode(&self) -> EncodedInclusionProof {
        EncodedInclusionProof {
            leaf: self.leaf,
            sibling_count: self.siblings.len(),
            siblings: hex::encode(self.to_bytes()),
        }
    }
}

impl ModificationProof {
    /// `leftProofs` siblings sit on the left of the path up from `left_leaf`
    pub fn left_proofs_bytes(&self) -> Bytes {
        pack_entries(&self.left_proofs, Side::Left)
    }

    pub fn right_proofs_bytes(&self) -> Bytes {
        pack_entries(&self.right_proofs, Side::Right)
    }

    /// Siblings of the starting neighbour's path sit on the same side as that neighbour
    pub fn continuing_side_proofs_bytes(&self) -> Bytes {
        pack_entries(&self.continuing_side_proofs, self.starting_side)
    }

    pub fn remaining_proofs_bytes(&self) -> Bytes {
        pack_sided(&self.remaining_proofs)
    }

    /// All four entry lists concatenated in field order
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put(self.left_proofs_bytes());
        buf.put(self.right_proofs_bytes());
        buf.put(self.continuing_side_proofs_bytes());
        buf.put(self.remaining_proofs_bytes());
        buf.freeze()
    }

    pub fn encode(&self) -> EncodedModificationProof {
        EncodedModificationProof {
            starting_side: self.starting_side,
            left_leaf: self.left_leaf,
            right_leaf: self.right_leaf,
            left_proofs: hex::encode(self.left_proofs_bytes()),
            left_proofs_count: self.left_proofs.len(),
            right_proofs: hex::encode(self.right_proofs_bytes()),
            right_proofs_count: self.right_proofs.len(),
            continuing_side_proofs: hex::encode(self.continuing_side_proofs_bytes()),
            continuing_side_proofs_count: self.continuing_side_proofs.len(),
            remaining_proofs: hex::encode(self.remaining_proofs_bytes()),
            remaining_proofs_count: self.remaining_proofs.len(),
            left_right_height: self.left_right_height,
            intersecting_height: self.intersecting_height,
        }
    }
}

/// Structured form of an [`InclusionProof`] with its siblings pre-packed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedInclusionProof {
    pub leaf: Hash,
    pub sibling_count: usize,
    pub siblings: String,
}

/// Structured form of a [`ModificationProof`] with each entry list pre-packed as hex
///
/// The counts fix the field boundaries inside [`ModificationProof::to_bytes`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedModificationProof {
    pub starting_side: Side,
    pub left_leaf: Hash,
    pub right_leaf: Hash,
    pub left_proofs: String,
    pub left_proofs_count: usize,
    pub right_proofs: String,
    pub right_proofs_count: usize,
    pub continuing_side_proofs: String,
    pub continuing_side_proofs_count: usize,
    pub remaining_proofs: String,
    pub remaining_proofs_count: usize,
    pub left_right_height: u8,
    pub intersecting_height: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(byte: u8, height: u8) -> ProofEntry {
        ProofEntry::new(Hash::from_bytes([byte; HASH_LEN]), height)
    }

    #[test]
    fn test_left_entry_is_hash_then_height() {
        let bytes = pack_entries(&[entry(0xaa, 7)], Side::Left);
        assert_eq!(bytes.len(), ENTRY_LEN);
        assert!(bytes[..HASH_LEN].iter().all(|b| *b == 0xaa));
        assert_eq!(bytes[HASH_LEN], 7);
    }

    #[test]
    fn test_right_entry_is_height_then_hash() {
        let bytes = pack_entries(&[entry(0xbb, 9), entry(0xcc, 200)], Side::Right);
        assert_eq!(bytes.len(), 2 * ENTRY_LEN);
        assert_eq!(bytes[0], 9);
        assert!(bytes[1..ENTRY_LEN].iter().all(|b| *b == 0xbb));
        assert_eq!(bytes[ENTRY_LEN], 200);
    }

    #[test]
    fn test_sided_entries_lead_with_side_byte() {
        let left = SidedEntry::new(Hash::from_bytes([1; HASH_LEN]), 4, Side::Left);
        let right = SidedEntry::new(Hash::from_bytes([2; HASH_LEN]), 5, Side::Right);
        let bytes = pack_sided(&[left, right]);

        assert_eq!(bytes.len(), 2 * SIDED_ENTRY_LEN);
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 1);
        assert_eq!(bytes[SIDED_ENTRY_LEN - 1], 4);
        assert_eq!(bytes[SIDED_ENTRY_LEN], 0x01);
        assert_eq!(bytes[SIDED_ENTRY_LEN + 1], 5);
        assert_eq!(bytes[SIDED_ENTRY_LEN + 2], 2);
    }

    #[test]
    fn test_continuing_side_follows_starting_side() {
        let mut proof = ModificationProof {
            starting_side: Side::Left,
            left_leaf: Hash::ZERO,
            right_leaf: Hash::ZERO,
            left_proofs: Vec::new(),
            right_proofs: Vec::new(),
            continuing_side_proofs: vec![entry(0xdd, 17)],
            remaining_proofs: Vec::new(),
            left_right_height: 200,
            intersecting_height: 100,
        };
        assert_eq!(proof.continuing_side_proofs_bytes()[HASH_LEN], 17);

        proof.starting_side = Side::Right;
        assert_eq!(proof.continuing_side_proofs_bytes()[0], 17);
        assert_eq!(proof.to_bytes(), proof.continuing_side_proofs_bytes());
    }

    #[test]
    fn test_encoded_field_order_is_fixed() {
        let proof = ModificationProof {
            starting_side: Side::Right,
            left_leaf: Hash::from_bytes([1; HASH_LEN]),
            right_leaf: Hash::from_bytes([2; HASH_LEN]),
            left_proofs: vec![entry(3, 1)],
            right_proofs: Vec::new(),
            continuing_side_proofs: Vec::new(),
            remaining_proofs: Vec::new(),
            left_right_height: 12,
            intersecting_height: 3,
        };
        let json = serde_json::to_string(&proof.encode()).unwrap();
        let fields = [
            "starting_side",
            "left_leaf",
            "right_leaf",
            "left_proofs",
            "right_proofs",
            "continuing_side_proofs",
            "remaining_proofs",
            "left_right_height",
            "intersecting_height",
        ];
        let positions: Vec<usize> = fields
            .iter()
            .map(|f| json.find(&format!("\"{}\"", f)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
        assert!(json.contains("\"starting_side\":\"right\""));
        assert!(json.contains(&format!("\"left_proofs\":\"{}01\"", "03".repeat(32))));
    }

    #[test]
    fn test_counts_split_packed_bytes() {
        let proof = ModificationProof {
            starting_side: Side::Left,
            left_leaf: Hash::ZERO,
            right_leaf: Hash::ZERO,
            left_proofs: vec![entry(1, 2), entry(3, 4)],
            right_proofs: vec![entry(5, 6)],
            continuing_side_proofs: Vec::new(),
            remaining_proofs: vec![SidedEntry::new(Hash::ZERO, 9, Side::Right)],
            left_right_height: 8,
            intersecting_height: 7,
        };
        let encoded = proof.encode();
        assert_eq!(encoded.left_proofs_count, 2);
        assert_eq!(encoded.right_proofs_count, 1);
        assert_eq!(encoded.continuing_side_proofs_count, 0);
        assert_eq!(encoded.remaining_proofs_count, 1);

        let bytes = proof.to_bytes();
        let split = (encoded.left_proofs_count + encoded.right_proofs_count) * ENTRY_LEN;
        assert_eq!(
            bytes.len(),
            split + encoded.remaining_proofs_count * SIDED_ENTRY_LEN
        );
        assert_eq!(bytes[split], Side::Right.as_byte());
        assert_eq!(bytes[split + 1], 9);
    }
}
