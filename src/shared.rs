//! Reader/writer wrapper for trees shared between threads

use crate::nybble::NybbleCodec;
use crate::prefix::Prefix;
use crate::tree::{AddressTree, InsertSummary};
use crate::Result;
use parking_lot::RwLock;
use std::path::Path;

/// An address tree behind a single reader/writer lock
///
/// Insertions take the write lock; queries share the read lock, so they
/// run concurrently with each other but never alongside an insertion.
pub struct SharedTree<A> {
    inner: RwLock<AddressTree<A>>,
}

impl<A: NybbleCodec> SharedTree<A> {
    pub fn new(tree: AddressTree<A>) -> Self {
        SharedTree {
            inner: RwLock::new(tree),
        }
    }

    pub fn insert(&self, addr: A) -> bool {
        self.inner.write().insert(addr)
    }

    pub fn insert_many<I>(&self, addresses: I, progress_interval: usize) -> InsertSummary
    where
        I: IntoIterator<Item = A>,
    {
        self.inner.write().insert_many(addresses, progress_interval)
    }

    pub fn contains(&self, addr: &A) -> bool {
        self.inner.read().contains(addr)
    }

    pub fn len(&self) -> u64 {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn all_addresses(&self) -> Vec<A> {
        self.inner.read().all_addresses()
    }

    pub fn addresses_in_prefix(&self, prefix: &Prefix<A>) -> Result<Vec<A>> {
        self.inner.read().addresses_in_prefix(prefix)
    }

    pub fn count_in_prefix(&self, prefix: &Prefix<A>) -> Result<u64> {
        self.inner.read().count_in_prefix(prefix)
    }

    /// Run `f` with shared access to the tree
    pub fn read<R>(&self, f: impl FnOnce(&AddressTree<A>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Persist the tree while holding the read lock
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.inner.read().save(path)
    }

    pub fn into_inner(self) -> AddressTree<A> {
        self.inner.into_inner()
    }
}

impl<A: NybbleCodec> Default for SharedTree<A> {
    fn default() -> Self {
        Self::new(AddressTree::new())
    }
}

impl<A: NybbleCodec> From<AddressTree<A>> for SharedTree<A> {
    fn from(tree: AddressTree<A>) -> Self {
        Self::new(tree)
    }
}
