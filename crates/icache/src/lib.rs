//! icache - Concurrent Item-Deduplication Cache
//!
//! A cache that sits between probe-style producers and a downstream
//! "collected object" sink. It does two things: hands out stable unique
//! IDs, and deduplicates structurally-equal items submitted during one
//! cache instance's lifetime.
//!
//! Any number of producer threads call [`Cache::submit`] concurrently; a
//! single background worker thread performs the actual dedup lookup against
//! a fingerprint-keyed index, stamps a fresh id on the
//! first occurrence of each distinct item, and appends the result to a
//! caller-supplied [`Append`] sink. [`Cache::barrier`] blocks until every
//! submission enqueued ahead of it has been processed.
//!
//! # Example
//!
//! ```
//! use icache::{Append, Cache, Config, SinkError};
//! use std::sync::{Arc, Mutex};
//!
//! struct Doc { fp: u64, body: String, id: Option<String> }
//!
//! impl icache::Item for Doc {
//!     fn fingerprint(&self) -> u64 { self.fp }
//!     fn deep_eq(&self, other: &Self) -> bool { self.body == other.body }
//!     fn set_id(&mut self, id: String) { self.id = Some(id); }
//! }
//!
//! struct VecSink(Mutex<Vec<Arc<Doc>>>);
//! impl Append<Doc> for VecSink {
//!     fn append(&self, item: Arc<Doc>) -> Result<(), SinkError> {
//!         self.0.lock().unwrap().push(item);
//!         Ok(())
//!     }
//! }
//!
//! let cache = Cache::<Doc>::new(Config::default());
//! let sink = Arc::new(VecSink(Mutex::new(Vec::new())));
//!
//! cache.submit(sink.clone(), Arc::new(Doc { fp: 1, body: "hello".into(), id: None })).unwrap();
//! cache.barrier().unwrap();
//! ```

mod cache;
mod config;
mod error;
mod id;
mod index;
mod invariants;
mod item;
mod metrics;
mod ring;
mod sink;
mod worker;

pub use cache::{collect, Cache, Collected};
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, SMALL_CONFIG};
pub use error::{CacheError, SinkError};
pub use item::Item;
pub use metrics::CacheMetrics;
pub use sink::Append;
