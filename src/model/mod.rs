//! Addressing and digest primitives

mod hash;
mod key;

pub use hash::{Hash, HASH_LEN};
pub use key::{PathKey, KEY_BITS};
