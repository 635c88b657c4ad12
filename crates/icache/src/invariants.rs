//! Debug assertion macros for cache invariants.
//!
//! Only active in debug builds (`#[cfg(debug_assertions)]`) — zero overhead
//! in release builds. Mirrors the `INV-*`-tagged macros that document the
//! ring buffer's invariants.

// =============================================================================
// INV-RING-01: Bounded Count
// =============================================================================

/// `0 <= count <= capacity` must hold after every push/pop.
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "INV-RING-01 violated: count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

// =============================================================================
// INV-RING-02: Empty Transition
// =============================================================================

/// When a pop drains the queue (`end == begin` afterward), `begin` must not
/// have been advanced any further than `end` — the queue's next write slot
/// and next read slot coincide exactly when `count == 0`.
macro_rules! debug_assert_empty_transition {
    ($begin:expr, $end:expr, $count:expr) => {
        debug_assert!(
            $count > 0 || $begin == $end,
            "INV-RING-02 violated: count is 0 but begin {} != end {}",
            $begin,
            $end
        )
    };
}

// =============================================================================
// INV-ID-01: Monotonic Counter
// =============================================================================

/// The id counter must never be observed to decrease across `mint()` calls
/// on the same allocator (ignoring the documented wraparound case).
macro_rules! debug_assert_id_monotonic_or_wrapped {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new > $old || $old > (u32::MAX - 1_000_000),
            "INV-ID-01 violated: counter went from {} to {} without being near wraparound",
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-IDX-01: Chain Uniqueness
// =============================================================================

/// No two items in one chain may be deep-equal to each other.
macro_rules! debug_assert_chain_unique {
    ($found:expr) => {
        debug_assert!(
            !$found,
            "INV-IDX-01 violated: inserted a deep-equal duplicate into a chain"
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_chain_unique;
pub(crate) use debug_assert_empty_transition;
pub(crate) use debug_assert_id_monotonic_or_wrapped;
