//! End-to-end scenarios: one complete `Cache` lifecycle per test, exercising
//! the dedup/id/collision/backpressure/concurrency/filter behavior as a
//! caller would actually observe it.

use icache::{collect, Append, Cache, Collected, Config, Item, SinkError};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct Doc {
    fp: u64,
    body: &'static str,
    id: Option<String>,
}

impl Doc {
    fn new(fp: u64, body: &'static str) -> Self {
        Self { fp, body, id: None }
    }
}

impl Item for Doc {
    fn fingerprint(&self) -> u64 {
        self.fp
    }

    fn deep_eq(&self, other: &Self) -> bool {
        self.body == other.body
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}

struct Collector {
    items: Mutex<Vec<Arc<Doc>>>,
}

impl Collector {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(Vec::new()),
        })
    }

    fn snapshot(&self) -> Vec<Arc<Doc>> {
        self.items.lock().unwrap().clone()
    }
}

impl Append<Doc> for Collector {
    fn append(&self, item: Arc<Doc>) -> Result<(), SinkError> {
        self.items.lock().unwrap().push(item);
        Ok(())
    }
}

struct FailingCollector;
impl Append<Doc> for FailingCollector {
    fn append(&self, _item: Arc<Doc>) -> Result<(), SinkError> {
        Err(SinkError::new("downstream is gone"))
    }
}

/// S1: a single unique item is stamped with an id and reaches the sink.
#[test]
fn s1_single_unique_item_gets_an_id() {
    let cache: Cache<Doc> = Cache::new(Config::default());
    let sink = Collector::new();

    cache.submit(sink.clone(), Arc::new(Doc::new(1, "alpha"))).unwrap();
    cache.barrier().unwrap();

    let items = sink.snapshot();
    assert_eq!(items.len(), 1);
    assert!(items[0].id.is_some());
    assert_eq!(cache.metrics().misses(), 1);
}

/// S2: repeated submissions of a deep-equal item all resolve to the same id
/// and are each counted as a hit after the first.
#[test]
fn s2_pure_duplicates_share_one_id() {
    let cache: Cache<Doc> = Cache::new(Config::default());
    let sink = Collector::new();

    for _ in 0..5 {
        cache.submit(sink.clone(), Arc::new(Doc::new(9, "same body"))).unwrap();
    }
    cache.barrier().unwrap();

    let items = sink.snapshot();
    assert_eq!(items.len(), 5);
    let canonical_id = items[0].id.clone();
    assert!(items.iter().all(|item| item.id == canonical_id));
    assert_eq!(cache.metrics().misses(), 1);
    assert_eq!(cache.metrics().hits(), 4);
}

/// S3: two items sharing a fingerprint but structurally distinct both get
/// their own id and both land in the sink (hash collision, not a duplicate).
#[test]
fn s3_hash_collision_keeps_both_as_distinct_ids() {
    let cache: Cache<Doc> = Cache::new(Config::default());
    let sink = Collector::new();

    cache.submit(sink.clone(), Arc::new(Doc::new(3, "first"))).unwrap();
    cache.submit(sink.clone(), Arc::new(Doc::new(3, "second"))).unwrap();
    cache.barrier().unwrap();

    let items = sink.snapshot();
    assert_eq!(items.len(), 2);
    assert_ne!(items[0].id, items[1].id);
    assert_eq!(cache.metrics().misses(), 1);
    assert_eq!(cache.metrics().collisions(), 1);
}

/// S4: a producer blocked on a full queue is unblocked once the worker
/// drains an entry; it does not lose or duplicate its item.
#[test]
fn s4_backpressure_does_not_drop_or_duplicate() {
    let cache: Cache<Doc> = Cache::new(Config::new(2));
    let sink = Collector::new();

    for i in 0..20 {
        cache
            .submit(sink.clone(), Arc::new(Doc::new(i, "backpressure body")))
            .unwrap();
    }
    cache.barrier().unwrap();

    assert_eq!(sink.snapshot().len(), 20);
    assert_eq!(cache.metrics().submitted(), 20);
}

/// S5: many producer threads submitting concurrently still dedup correctly
/// and every submission is accounted for exactly once.
#[test]
fn s5_concurrent_producers_converge_on_one_chain() {
    let cache = Arc::new(Cache::<Doc>::new(Config::default()));
    let sink = Collector::new();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let sink: Arc<dyn Append<Doc>> = sink.clone();
            std::thread::spawn(move || {
                cache
                    .submit(sink, Arc::new(Doc::new(77, "shared across threads")))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    cache.barrier().unwrap();

    let items = sink.snapshot();
    assert_eq!(items.len(), 16);
    let canonical_id = items[0].id.clone();
    assert!(items.iter().all(|item| item.id == canonical_id));
    assert_eq!(cache.metrics().misses(), 1);
    assert_eq!(cache.metrics().hits(), 15);
}

/// S6: `collect`'s filter drops items before they ever reach the cache,
/// counted separately from submissions. The predicate returns `true` to
/// drop, matching the documented contract.
#[test]
fn s6_filter_drops_before_submit() {
    let cache: Cache<Doc> = Cache::new(Config::default());
    let sink = Collector::new();

    let kept = collect(&cache, sink.clone(), Arc::new(Doc::new(1, "keep me")), |doc| {
        doc.body.starts_with('d')
    })
    .unwrap();
    let dropped = collect(&cache, sink.clone(), Arc::new(Doc::new(2, "drop me")), |doc| {
        doc.body.starts_with('d')
    })
    .unwrap();
    cache.barrier().unwrap();

    assert_eq!(kept, Collected::Kept);
    assert_eq!(dropped, Collected::Filtered);
    assert_eq!(sink.snapshot().len(), 1);
    assert_eq!(cache.metrics().filtered(), 1);
}

#[test]
fn sink_append_failure_closes_the_cache_for_future_calls() {
    let cache: Cache<Doc> = Cache::new(Config::default());

    cache.submit(Arc::new(FailingCollector), Arc::new(Doc::new(1, "boom"))).unwrap();

    // Poll rather than call barrier(): once the worker observes the sink
    // failure it stops popping new entries through the sink, so there is
    // no bound on how long a *subsequent* barrier would take to resolve.
    for _ in 0..200 {
        if cache.is_closed() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    assert!(cache.is_closed());
    assert!(cache
        .submit(Collector::new(), Arc::new(Doc::new(2, "too late")))
        .is_err());
}
