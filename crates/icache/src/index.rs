#[cfg(debug_assertions)]
use crate::invariants::debug_assert_chain_unique;
use crate::item::Item;
use std::collections::BTreeMap;
use std::process;
use std::sync::Arc;

/// A short run of items that share a fingerprint but are pairwise
/// deep-unequal.
///
/// Grows only: items are appended, never removed, for the lifetime of the
/// cache. In practice chains are expected to stay at length 1 — a
/// fingerprint collision between two structurally different items is the
/// exception, not the rule — so a linear scan is the right data structure.
pub(crate) struct InternedChain<T: Item> {
    items: Vec<Arc<T>>,
}

impl<T: Item> InternedChain<T> {
    fn new(item: Arc<T>) -> Self {
        Self { items: vec![item] }
    }

    /// Returns the first item deep-equal to `candidate`, scanning oldest
    /// first. Insertion order matters here: if two submissions race to
    /// extend the same chain, whichever the worker processes first becomes
    /// the permanent match for every later deep-equal submission.
    pub(crate) fn find_deep_equal(&self, candidate: &T) -> Option<&Arc<T>> {
        self.items.iter().find(|existing| existing.deep_eq(candidate))
    }

    fn push(&mut self, item: Arc<T>) {
        #[cfg(debug_assertions)]
        {
            let dup = self.find_deep_equal(&item).is_some();
            debug_assert_chain_unique!(dup);
        }
        self.items.push(item);
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

/// Maps a 64-bit fingerprint to the chain of items sharing it.
///
/// Touched only by the worker thread — no internal locking. A `BTreeMap`
/// realizes a balanced ordered map keyed by 64-bit fingerprint;
/// iteration order is never exposed to callers.
pub(crate) struct Index<T: Item> {
    chains: BTreeMap<u64, InternedChain<T>>,
}

impl<T: Item> Index<T> {
    pub(crate) fn new() -> Self {
        Self {
            chains: BTreeMap::new(),
        }
    }

    pub(crate) fn lookup_mut(&mut self, fingerprint: u64) -> Option<&mut InternedChain<T>> {
        self.chains.get_mut(&fingerprint)
    }

    /// Inserts a brand new chain for `fingerprint`.
    ///
    /// Aborts the process if `fingerprint` is already present: by the time
    /// the worker calls this, the item has already been popped off the
    /// queue and the submitter has already been released, so there is no
    /// reasonable way to hand the failure back to anyone (matches the
    /// original's `abort()` on `rbt_i64_add` failure).
    pub(crate) fn insert_new_chain(&mut self, fingerprint: u64, item: Arc<T>) {
        if self
            .chains
            .insert(fingerprint, InternedChain::new(item))
            .is_some()
        {
            process::abort();
        }
    }

    /// Appends a new variant to an already-present chain (hash collision,
    /// not a duplicate).
    pub(crate) fn push_variant(&mut self, fingerprint: u64, item: Arc<T>) {
        match self.chains.get_mut(&fingerprint) {
            Some(chain) => chain.push(item),
            None => process::abort(),
        }
    }

    #[cfg(test)]
    pub(crate) fn chain_len(&self, fingerprint: u64) -> Option<usize> {
        self.chains.get(&fingerprint).map(InternedChain::len)
    }

    /// Consumes the index, yielding every interned item reference for
    /// teardown.
    pub(crate) fn drain(self) -> impl Iterator<Item = Arc<T>> {
        self.chains.into_values().flat_map(|chain| chain.items.into_iter())
    }
}
