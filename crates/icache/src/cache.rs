use crate::config::Config;
use crate::error::CacheError;
use crate::item::Item;
use crate::metrics::CacheMetrics;
use crate::ring::{QueueEntry, RingQueue, Waiter};
use crate::sink::Append;
use crate::worker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// A concurrent item-deduplication cache.
///
/// Any number of producer threads call [`Cache::submit`] concurrently; a
/// single background worker thread performs the actual dedup lookup, id
/// stamping, and sink append. Dropping a `Cache` (or calling [`Cache::free`]
/// explicitly) requests shutdown and joins the worker, draining whatever
/// was still queued.
pub struct Cache<T: Item> {
    queue: Arc<RingQueue<T>>,
    shutdown: Arc<AtomicBool>,
    poisoned: Arc<AtomicBool>,
    metrics: Arc<CacheMetrics>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Item> Cache<T> {
    /// Creates a cache and starts its worker thread.
    pub fn new(config: Config) -> Self {
        let queue = Arc::new(RingQueue::new(config.capacity));
        let shutdown = Arc::new(AtomicBool::new(false));
        let poisoned = Arc::new(AtomicBool::new(false));
        let metrics = Arc::new(CacheMetrics::new());

        let worker_queue = Arc::clone(&queue);
        let worker_shutdown = Arc::clone(&shutdown);
        let worker_poisoned = Arc::clone(&poisoned);
        let worker_metrics = Arc::clone(&metrics);
        let handle = std::thread::spawn(move || {
            worker::run(worker_queue, worker_shutdown, worker_poisoned, worker_metrics);
        });

        Self {
            queue,
            shutdown,
            poisoned,
            metrics,
            worker: Some(handle),
        }
    }

    /// Submits `item` for dedup and id stamping, to be handed to `sink` by
    /// the worker once processed.
    ///
    /// The caller cedes ownership of `item` — it must not retain an `Arc`
    /// clone of its own, or the worker's later in-place `set_id` call (via
    /// `Arc::get_mut`) would see shared ownership and panic. Blocks while
    /// the queue is at capacity.
    pub fn submit(&self, sink: Arc<dyn Append<T>>, item: Arc<T>) -> Result<(), CacheError> {
        if self.is_closed() {
            return Err(CacheError::Closed);
        }
        self.queue.push(QueueEntry::Item { sink, item })
    }

    /// Blocks until every submission enqueued before this call (from any
    /// thread) has been processed.
    ///
    /// Enqueues a barrier entry and waits on a condition private to this
    /// call; the worker signals it once popped, after everything ahead of
    /// it in the (strictly FIFO) queue has already been handled. A sink
    /// failure still signals every barrier queued at the time of failure
    /// (see the worker's post-poison drain) — the narrow remaining race is
    /// a barrier enqueued after that drain has already finished and the
    /// worker thread has exited, which nothing will ever pop.
    pub fn barrier(&self) -> Result<(), CacheError> {
        if self.is_closed() {
            return Err(CacheError::Closed);
        }
        let waiter = Arc::new(Waiter::new());
        self.queue.push(QueueEntry::Barrier {
            waiter: Arc::clone(&waiter),
        })?;
        waiter.wait();

        if self.is_closed() {
            return Err(CacheError::Closed);
        }
        Ok(())
    }

    /// Shared activity counters for this cache.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// `true` once a sink append has failed and the worker has stopped.
    pub fn is_closed(&self) -> bool {
        self.poisoned.load(Ordering::Acquire)
    }

    /// Requests shutdown and joins the worker, draining whatever was still
    /// queued. Idempotent: a second call is a no-op.
    pub fn free(&mut self) {
        if let Some(handle) = self.worker.take() {
            self.shutdown.store(true, Ordering::Release);
            self.queue.wake_for_shutdown();
            let _ = handle.join();
        }
    }
}

impl<T: Item> Drop for Cache<T> {
    fn drop(&mut self) {
        self.free();
    }
}

/// Outcome of [`collect`]: whether the item reached the cache or was
/// dropped by the filter first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collected {
    /// The item was submitted to the cache.
    Kept,
    /// The filter rejected the item before it reached the cache.
    Filtered,
}

/// Applies an optional filter predicate before submitting `item`, yielding
/// a three-outcome result: kept, filtered, or error.
///
/// `filter` returns `true` to drop the item — matching `probe_item_collect`'s
/// `probe_item_filtered(...)` check, which drops on `true`.
pub fn collect<T: Item>(
    cache: &Cache<T>,
    sink: Arc<dyn Append<T>>,
    item: Arc<T>,
    filter: impl Fn(&T) -> bool,
) -> Result<Collected, CacheError> {
    if filter(&item) {
        cache.metrics.record_filtered();
        return Ok(Collected::Filtered);
    }

    cache.submit(sink, item)?;
    Ok(Collected::Kept)
}
