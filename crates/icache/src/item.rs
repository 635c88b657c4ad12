/// A structured value a probe submits to the cache.
///
/// The cache never looks inside `T` beyond these three operations — the
/// concrete representation (an S-expression list, a JSON value, a struct of
/// probe-specific fields, ...) is entirely up to the caller.
///
/// `fingerprint` need not be injective: it only narrows the search to a
/// short chain of candidates, which `deep_eq` then disambiguates. A
/// fingerprint collision between structurally different items is expected
/// and handled (see [`crate::Cache`]'s module docs), not a bug.
pub trait Item: Send + Sync + 'static {
    /// A fast, non-cryptographic hash used as the [`crate::Index`] key.
    fn fingerprint(&self) -> u64;

    /// Full structural equality, used to resolve fingerprint collisions.
    fn deep_eq(&self, other: &Self) -> bool;

    /// Stamps the item's stable identifier in place.
    ///
    /// Called by the worker exactly once per equivalence class, on whichever
    /// instance reaches the cache first. Items that turn out to be
    /// duplicates of an already-interned item are never passed to `set_id`
    /// — they inherit the canonical instance's id instead.
    fn set_id(&mut self, id: String);
}
