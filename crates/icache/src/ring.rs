#[cfg(debug_assertions)]
use crate::invariants::{debug_assert_bounded_count, debug_assert_empty_transition};
use crate::error::CacheError;
use crate::item::Item;
use crate::sink::Append;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// One entry in the [`RingQueue`].
///
/// Either a submitted item destined for a sink, or a synchronization
/// barrier with no item at all. Modeled as an enum rather than the
/// original's "one field is null" tagged union — the compiler enforces
/// that exactly one variant is ever populated.
pub(crate) enum QueueEntry<T: Item> {
    Item {
        sink: Arc<dyn Append<T>>,
        item: Arc<T>,
    },
    Barrier {
        waiter: Arc<Waiter>,
    },
}

/// A one-shot condition used by `barrier()` to park until the worker has
/// drained past its entry. Created fresh on every call.
pub(crate) struct Waiter {
    signaled: Mutex<bool>,
    condvar: Condvar,
}

impl Waiter {
    pub(crate) fn new() -> Self {
        Self {
            signaled: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Called by the worker after it pops this barrier's entry.
    pub(crate) fn signal(&self) {
        let mut signaled = self.signaled.lock().unwrap_or_else(|_| process::abort());
        *signaled = true;
        self.condvar.notify_one();
    }

    /// Called by `barrier()` to park until `signal` runs.
    pub(crate) fn wait(&self) {
        let mut signaled = self.signaled.lock().unwrap_or_else(|_| process::abort());
        while !*signaled {
            signaled = self
                .condvar
                .wait(signaled)
                .unwrap_or_else(|_| process::abort());
        }
    }
}

struct RingState<T: Item> {
    buf: Vec<Option<QueueEntry<T>>>,
    begin: usize,
    end: usize,
    count: usize,
}

/// A fixed-capacity circular buffer of [`QueueEntry`] shared by any number
/// of producer threads and exactly one worker thread.
///
/// Guarded by one mutex plus two condition variables (`notempty`,
/// `notfull`) — the bounded-queue handshake the original implements with
/// `pthread_mutex_t`/`pthread_cond_t`. `std::sync::{Mutex, Condvar}` is the
/// direct idiomatic translation: both primitives block the calling
/// thread rather than spin, matching the blocking contract `submit` and
/// `barrier` document.
pub(crate) struct RingQueue<T: Item> {
    capacity: usize,
    state: Mutex<RingState<T>>,
    notempty: Condvar,
    notfull: Condvar,
}

impl<T: Item> RingQueue<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity);
        buf.resize_with(capacity, || None);

        Self {
            capacity,
            state: Mutex::new(RingState {
                buf,
                begin: 0,
                end: 0,
                count: 0,
            }),
            notempty: Condvar::new(),
            notfull: Condvar::new(),
        }
    }

    /// Pushes `entry`, blocking while the queue is at capacity.
    ///
    /// Mirrors `__probe_icache_add_nolock`'s retry loop: wait on `notfull`
    /// (which atomically releases the mutex while parked) and re-check
    /// once woken, since the wake may be spurious or another producer may
    /// have already taken the freed slot.
    ///
    /// Only the `notfull` *wait* itself failing (a poisoned mutex from a
    /// prior panic while the lock was held) propagates as an error, without
    /// enqueueing; every other mutex operation here still aborts the
    /// process on poison.
    pub(crate) fn push(&self, entry: QueueEntry<T>) -> Result<(), CacheError> {
        let mut state = self.state.lock().unwrap_or_else(|_| process::abort());
        while state.count == self.capacity {
            state = match self.notfull.wait(state) {
                Ok(guard) => guard,
                Err(_) => return Err(CacheError::CapacityWaitFailed),
            };
        }

        let end = state.end;
        state.buf[end] = Some(entry);
        state.end = (end + 1) % self.capacity;
        state.count += 1;

        #[cfg(debug_assertions)]
        debug_assert_bounded_count!(state.count, self.capacity);

        drop(state);
        self.notempty.notify_one();
        Ok(())
    }

    /// Pops one entry, blocking while the queue is empty, unless
    /// `shutdown` is observed true with nothing left to drain — then
    /// returns `None` so the worker can exit its loop.
    ///
    /// `begin` always advances by one slot on a successful pop. The
    /// original C queue shares a single `begin == end` sentinel between
    /// "empty" and "full" (its buffer reserves one extra slot so the two
    /// never coincide) and so skips advancing `begin` in exactly the case
    /// that would otherwise make a full queue look empty. This queue
    /// tracks `count` explicitly instead, which removes that ambiguity
    /// entirely — `begin == end` unconditionally means empty here, so no
    /// such special case is needed (see `INV-RING-02`).
    pub(crate) fn pop_or_shutdown(&self, shutdown: &AtomicBool) -> Option<QueueEntry<T>> {
        let mut state = self.state.lock().unwrap_or_else(|_| process::abort());
        loop {
            if state.count > 0 {
                let begin = state.begin;
                let entry = state.buf[begin].take();
                state.count -= 1;
                state.begin = (begin + 1) % self.capacity;

                #[cfg(debug_assertions)]
                debug_assert_empty_transition!(state.begin, state.end, state.count);

                drop(state);
                self.notfull.notify_one();
                return entry;
            }

            if shutdown.load(Ordering::Acquire) {
                return None;
            }

            state = self
                .notempty
                .wait(state)
                .unwrap_or_else(|_| process::abort());
        }
    }

    /// Wakes a worker parked on an empty queue so it can observe a
    /// shutdown request. Cooperative cancellation, not thread-level
    /// cancellation: the worker only stops once it re-checks `shutdown`
    /// itself, never mid-operation.
    pub(crate) fn wake_for_shutdown(&self) {
        let _state = self.state.lock().unwrap_or_else(|_| process::abort());
        self.notempty.notify_one();
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}
