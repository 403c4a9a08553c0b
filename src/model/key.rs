//! 256-bit trie addresses
//!
//! Position `i` of a key lives in bit `i % 8` of byte `i / 8`. The trie branches on the
//! highest position first, so key order reads the bytes as a little-endian integer.

use super::Hash;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

/// Number of bit positions in a key
pub const KEY_BITS: usize = 256;

const KEY_BYTES: usize = KEY_BITS / 8;

/// A fixed-width bit vector addressing one leaf of the trie
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathKey([u8; KEY_BYTES]);

impl PathKey {
    /// The all-zero key held by the lower boundary leaf
    pub const MIN: PathKey = PathKey([0u8; KEY_BYTES]);

    /// The all-one key held by the upper boundary leaf
    pub const MAX: PathKey = PathKey([0xffu8; KEY_BYTES]);

    pub const fn from_bytes(bytes: [u8; KEY_BYTES]) -> Self {
        PathKey(bytes)
    }

    /// Derive the address of a leaf from its content
    pub fn from_value(value: &[u8]) -> Self {
        Self::from(Hash::digest(value))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_BYTES] {
        &self.0
    }

    /// Read the bit at `position`
    #[inline]
    pub fn bit(&self, position: u8) -> bool {
        let position = position as usize;
        (self.0[position / 8] >> (position % 8)) & 1 == 1
    }

    /// Set every position in `range` to `on`
    pub fn fill_range(&mut self, range: Range<usize>, on: bool) {
        for position in range.start..range.end.min(KEY_BITS) {
            let mask = 1u8 << (position % 8);
            if on {
                self.0[position / 8] |= mask;
            } else {
                self.0[position / 8] &= !mask;
            }
        }
    }

    /// Drop the first `from` positions, keeping the remaining suffix in place.
    ///
    /// Dropped positions read as zero, so two suffixes taken at the same offset are
    /// equal exactly when the keys agree on every position `>= from`.
    pub fn suffix(&self, from: usize) -> PathKey {
        let mut out = *self;
        let whole = from.min(KEY_BITS) / 8;
        out.0[..whole].fill(0);
        out.fill_range(whole * 8..from, false);
        out
    }

    /// The highest position at which the two keys differ, or `None` if they are equal.
    ///
    /// Discarding positions `0..=h` from both keys leaves identical suffixes.
    pub fn divergence(&self, other: &PathKey) -> Option<u8> {
        (0..KEY_BYTES).rev().find_map(|i| {
            let diff = self.0[i] ^ other.0[i];
            (diff != 0).then(|| (i * 8 + 7 - diff.leading_zeros() as usize) as u8)
        })
    }

    /// Convert to hex string (raw byte order)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> crate::Result<Self> {
        Hash::from_hex(s).map(PathKey::from)
    }
}

impl From<Hash> for PathKey {
    fn from(hash: Hash) -> Self {
        PathKey(*hash.as_bytes())
    }
}

impl Ord for PathKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Position 255 is the most significant
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for PathKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathKey({})", &self.to_hex()[..8])
    }
}

impl Serialize for PathKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PathKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PathKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_layout() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0b0000_0010;
        bytes[31] = 0b1000_0000;
        let key = PathKey::from_bytes(bytes);

        assert!(!key.bit(0));
        assert!(key.bit(1));
        assert!(key.bit(255));
        assert!(!key.bit(254));
    }

    #[test]
    fn test_fill_range_builds_sentinels() {
        let mut key = PathKey::MIN;
        key.fill_range(0..KEY_BITS, true);
        assert_eq!(key, PathKey::MAX);

        key.fill_range(0..KEY_BITS, false);
        assert_eq!(key, PathKey::MIN);
    }

    #[test]
    fn test_suffix_clears_prefix() {
        let key = PathKey::MAX;
        let suffix = key.suffix(12);
        for i in 0..=255u8 {
            assert_eq!(suffix.bit(i), i >= 12, "position {}", i);
        }
        assert_eq!(key.suffix(0), key);
        assert_eq!(key.suffix(KEY_BITS), PathKey::MIN);
    }

    #[test]
    fn test_divergence_is_highest_differing_position() {
        assert_eq!(PathKey::MIN.divergence(&PathKey::MIN), None);
        assert_eq!(PathKey::MIN.divergence(&PathKey::MAX), Some(255));

        let mut a = PathKey::MIN;
        a.fill_range(3..4, true);
        a.fill_range(9..10, true);
        assert_eq!(a.divergence(&PathKey::MIN), Some(9));

        let b = a.suffix(5);
        assert_eq!(a.divergence(&b), Some(3));
        assert_eq!(a.suffix(4), b.suffix(4));
    }

    #[test]
    fn test_order_follows_high_positions() {
        let mut low = PathKey::MIN;
        low.fill_range(0..255, true);
        let mut high = PathKey::MIN;
        high.fill_range(255..256, true);

        assert!(PathKey::MIN < low);
        assert!(low < high);
        assert!(high < PathKey::MAX);
    }

    #[test]
    fn test_from_value_is_deterministic() {
        let a = PathKey::from_value(b"apple (0)");
        let b = PathKey::from_value("apple (0)".as_bytes());
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), Hash::digest(b"apple (0)").to_hex());
        assert_eq!(PathKey::from_hex(&a.to_hex()).unwrap(), a);
        assert!(matches!(
            PathKey::from_hex("00ff"),
            Err(crate::Error::InvalidHash(_))
        ));
    }
}
