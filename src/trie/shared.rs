//! Single-writer, many-reader access to one trie

use super::SparseMerkleTrie;
use crate::model::Hash;
use crate::proof::{InclusionProof, ModificationProof};
use crate::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// A cloneable handle to a trie behind a reader/writer lock
///
/// Inserts take the write lock for the whole path rewrite; proofs and root reads share
/// the read lock, so no proof ever observes a half-rewritten path.
#[derive(Clone, Default)]
pub struct SharedTrie {
    inner: Arc<RwLock<SparseMerkleTrie>>,
}

impl SharedTrie {
    pub fn new(trie: SparseMerkleTrie) -> Self {
        SharedTrie {
            inner: Arc::new(RwLock::new(trie)),
        }
    }

    /// Insert a value and return the root it produced
    pub fn insert(&self, value: impl AsRef<[u8]>) -> Result<Hash> {
        let mut trie = self.inner.write();
        trie.insert(value)?;
        Ok(trie.root_hash())
    }

    pub fn root_hash(&self) -> Hash {
        self.inner.read().root_hash()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Prove membership, returning the root the proof was built against
    pub fn prove_membership(&self, value: impl AsRef<[u8]>) -> Result<(Hash, InclusionProof)> {
        let trie = self.inner.read();
        Ok((trie.root_hash(), trie.prove_membership(value)?))
    }

    /// Prove absence, returning the root the proof was built against
    pub fn prove_modification(
        &self,
        value: impl AsRef<[u8]>,
    ) -> Result<(Hash, ModificationProof)> {
        let trie = self.inner.read();
        Ok((trie.root_hash(), trie.prove_modification(value)?))
    }

    /// Run `f` against a consistent snapshot of the trie
    pub fn read<T>(&self, f: impl FnOnce(&SparseMerkleTrie) -> T) -> T {
        f(&*self.inner.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_inserts_match_serial_root() {
        let shared = SharedTrie::default();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        shared.insert(format!("thread {} value {}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut serial = SparseMerkleTrie::new();
        for t in 0..4 {
            for i in 0..25 {
                serial.insert(format!("thread {} value {}", t, i)).unwrap();
            }
        }

        assert_eq!(shared.len(), 100);
        assert_eq!(shared.root_hash(), serial.root_hash());
        shared.read(|trie| trie.check_invariants()).unwrap();
    }

    #[test]
    fn test_proofs_report_their_root() {
        let shared = SharedTrie::default();
        let root = shared.insert("apple (0)").unwrap();

        let (proof_root, _) = shared.prove_membership("apple (0)").unwrap();
        assert_eq!(proof_root, root);
        let (proof_root, _) = shared.prove_modification("pear (0)").unwrap();
        assert_eq!(proof_root, root);
    }
}
