use crate::error::CacheError;
use crate::id::mint_id_string;
use crate::index::Index;
use crate::item::Item;
use crate::metrics::CacheMetrics;
use crate::ring::{QueueEntry, RingQueue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Runs on the single worker thread until `shutdown` is set and the queue
/// has been fully drained.
///
/// Owns the [`Index`] outright — no lock needed around it, since nothing
/// else ever touches it. `poisoned` is shared with the facade: once a sink
/// append fails this flag is set, and the loop stops handing further items
/// to the (presumed broken) sink. It still drains whatever is already
/// queued so any barrier callers already parked get woken instead of
/// blocking forever — see [`drain_after_poison`].
pub(crate) fn run<T: Item>(
    queue: Arc<RingQueue<T>>,
    shutdown: Arc<AtomicBool>,
    poisoned: Arc<AtomicBool>,
    metrics: Arc<CacheMetrics>,
) {
    let mut index = Index::new();

    while let Some(entry) = queue.pop_or_shutdown(&shutdown) {
        match entry {
            QueueEntry::Barrier { waiter } => {
                metrics.record_barrier();
                waiter.signal();
            }
            QueueEntry::Item { sink, item } => {
                if let Err(err) = process_item(&mut index, &metrics, sink, item) {
                    eprintln!("icache worker: {err}");
                    poisoned.store(true, Ordering::Release);
                    shutdown.store(true, Ordering::Release);
                    drain_after_poison(&queue, &shutdown);
                    teardown_index(index);
                    return;
                }
            }
        }
    }

    teardown_index(index);
}

/// Releases every interned item on the way out, as an explicit teardown
/// step rather than relying on `index` simply going out of scope.
fn teardown_index<T: Item>(index: Index<T>) {
    for item in index.drain() {
        drop(item);
    }
}

/// Pops whatever is left in the queue after a sink failure, signaling any
/// barrier waiters found along the way and discarding remaining items
/// without touching the broken sink again.
///
/// Without this, a submission already queued behind the failing item, or a
/// barrier racing with the failure, would have no worker left to ever pop
/// and signal it — `Cache::barrier` would block forever instead of
/// observing the closed cache.
fn drain_after_poison<T: Item>(queue: &RingQueue<T>, shutdown: &AtomicBool) {
    while let Some(entry) = queue.pop_or_shutdown(shutdown) {
        if let QueueEntry::Barrier { waiter } = entry {
            waiter.signal();
        }
    }
}

/// The miss / true-hit / hash-collision algorithm.
///
/// Scans the fingerprint's chain oldest-first. A deep-equal match is a
/// true hit: the submitted item is dropped and the chain's existing `Arc`
/// is appended to the sink instead, so every duplicate resolves to the
/// same canonical instance and the same stamped id. No match under a
/// populated fingerprint is a hash collision: the item is a distinct
/// equivalence class that happens to share a fingerprint, so it mints its
/// own id and is pushed onto the chain as a new variant. No chain at all
/// is a miss: a fresh chain is created.
fn process_item<T: Item>(
    index: &mut Index<T>,
    metrics: &CacheMetrics,
    sink: Arc<dyn crate::sink::Append<T>>,
    mut item: Arc<T>,
) -> Result<(), CacheError> {
    metrics.record_submit();
    let fingerprint = item.fingerprint();

    if let Some(chain) = index.lookup_mut(fingerprint) {
        if let Some(existing) = chain.find_deep_equal(&item) {
            metrics.record_hit();
            let canonical = Arc::clone(existing);
            sink.append(canonical)?;
            return Ok(());
        }

        metrics.record_collision();
        stamp(&mut item);
        index.push_variant(fingerprint, Arc::clone(&item));
        sink.append(item)?;
        return Ok(());
    }

    metrics.record_miss();
    stamp(&mut item);
    index.insert_new_chain(fingerprint, Arc::clone(&item));
    sink.append(item)?;
    Ok(())
}

/// Stamps a freshly-minted id into `item` in place.
///
/// Requires sole ownership of the `Arc` at the moment of the call — this
/// always holds here because the worker is the only thread that has ever
/// seen this particular `Arc` (the submitter handed ownership off entirely;
/// see the ownership-transfer contract on [`crate::Cache::submit`]) and it
/// has not yet been cloned into the index or handed to the sink.
fn stamp<T: Item>(item: &mut Arc<T>) {
    let id = mint_id_string();
    Arc::get_mut(item)
        .expect("worker holds sole ownership of a freshly popped item before interning")
        .set_id(id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::test_support::Probe;
    use std::sync::Mutex;

    struct RecordingSink {
        appended: Mutex<Vec<Arc<Probe>>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                appended: Mutex::new(Vec::new()),
            }
        }
    }

    impl crate::sink::Append<Probe> for RecordingSink {
        fn append(&self, item: Arc<Probe>) -> Result<(), crate::error::SinkError> {
            self.appended.lock().unwrap().push(item);
            Ok(())
        }
    }

    struct FailingSink;
    impl crate::sink::Append<Probe> for FailingSink {
        fn append(&self, _item: Arc<Probe>) -> Result<(), crate::error::SinkError> {
            Err(crate::error::SinkError::new("boom"))
        }
    }

    #[test]
    fn first_submission_is_a_miss_and_gets_stamped() {
        let mut index = Index::new();
        let metrics = CacheMetrics::new();
        let sink = Arc::new(RecordingSink::new());

        process_item(&mut index, &metrics, sink.clone(), Arc::new(Probe::new(1, 100))).unwrap();

        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.hits(), 0);
        assert!(sink.appended.lock().unwrap()[0].id.is_some());
    }

    #[test]
    fn deep_equal_submission_is_a_true_hit_sharing_the_canonical_id() {
        let mut index = Index::new();
        let metrics = CacheMetrics::new();
        let sink = Arc::new(RecordingSink::new());

        process_item(&mut index, &metrics, sink.clone(), Arc::new(Probe::new(1, 100))).unwrap();
        process_item(&mut index, &metrics, sink.clone(), Arc::new(Probe::new(1, 100))).unwrap();

        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.hits(), 1);
        let appended = sink.appended.lock().unwrap();
        assert_eq!(appended[0].id, appended[1].id);
    }

    #[test]
    fn same_fingerprint_different_payload_is_a_collision_not_a_hit() {
        let mut index = Index::new();
        let metrics = CacheMetrics::new();
        let sink = Arc::new(RecordingSink::new());

        process_item(&mut index, &metrics, sink.clone(), Arc::new(Probe::new(1, 100))).unwrap();
        process_item(&mut index, &metrics, sink.clone(), Arc::new(Probe::new(1, 200))).unwrap();

        assert_eq!(metrics.misses(), 1);
        assert_eq!(metrics.collisions(), 1);
        assert_eq!(metrics.hits(), 0);
        let appended = sink.appended.lock().unwrap();
        assert_ne!(appended[0].id, appended[1].id);
    }

    #[test]
    fn sink_failure_is_propagated() {
        let mut index = Index::new();
        let metrics = CacheMetrics::new();
        let sink = Arc::new(FailingSink);

        let result = process_item(&mut index, &metrics, sink, Arc::new(Probe::new(1, 1)));
        assert!(result.is_err());
    }
}
