#[cfg(debug_assertions)]
use crate::invariants::debug_assert_id_monotonic_or_wrapped;
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process-wide monotonic id counter.
///
/// Shared by every [`crate::Cache`] in the process — multiple caches minting
/// ids from the same counter is intentional (a probe that creates several
/// caches over its lifetime must still never hand out the same id twice).
static NEXT_ID: AtomicU32 = AtomicU32::new(0);

/// Mints a process-unique counter value.
///
/// Strictly increasing across calls for the life of the process, except
/// at the documented wraparound at 2^32 — `fetch_add` wraps the same way
/// any `u32` addition does, which is well-defined in Rust, unlike the
/// original's undefined-on-wrap counter.
pub(crate) fn mint() -> u32 {
    let old = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    #[cfg(debug_assertions)]
    debug_assert_id_monotonic_or_wrapped!(old, old.wrapping_add(1));
    old
}

/// Formats a minted counter value into the cache's stamped id string:
/// the literal digit `1`, the process id zero-padded to five digits, and
/// the decimal counter value.
pub(crate) fn format_id(counter: u32) -> String {
    format!("1{:05}{}", process::id(), counter)
}

/// Mints a fresh id and formats it in one step — the operation the worker
/// actually calls.
pub(crate) fn mint_id_string() -> String {
    format_id(mint())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_is_strictly_increasing() {
        let a = mint();
        let b = mint();
        let c = mint();
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn format_matches_contract() {
        let id = format_id(7);
        let pid = process::id();
        assert_eq!(id, format!("1{:05}{}", pid, 7));
        assert!(id.starts_with('1'));
    }
}
