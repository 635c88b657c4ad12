use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for cache activity.
///
/// All fields are atomics because producers (via `submit`) and the single
/// worker both touch this concurrently. `Ordering::Relaxed` is used
/// throughout: these are statistical counters with no data dependency on
/// anything else.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Items submitted via `submit`/`collect`.
    pub submitted: AtomicU64,
    /// Items dropped by a filter in `collect` before reaching `submit`.
    pub filtered: AtomicU64,
    /// Submissions that created a brand new fingerprint chain.
    pub misses: AtomicU64,
    /// Submissions that matched an existing item by deep equality.
    pub hits: AtomicU64,
    /// Submissions that shared a fingerprint with an existing chain but
    /// were not deep-equal to any entry in it (a new variant appended to
    /// the chain, not a duplicate).
    pub collisions: AtomicU64,
    /// Barrier calls completed.
    pub barriers: AtomicU64,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_submit(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_collision(&self) {
        self.collisions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_barrier(&self) {
        self.barriers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn collisions(&self) -> u64 {
        self.collisions.load(Ordering::Relaxed)
    }

    pub fn barriers(&self) -> u64 {
        self.barriers.load(Ordering::Relaxed)
    }

    /// Number of distinct equivalence classes interned (misses + collisions
    /// — both mint a fresh id; hits reuse one).
    pub fn unique_items(&self) -> u64 {
        self.misses() + self.collisions()
    }
}
