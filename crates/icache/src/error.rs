use thiserror::Error;

/// Error returned by appending an item to a caller-supplied sink.
///
/// Opaque on purpose — the cache only needs to know whether the append
/// succeeded, not why it failed. Callers implementing [`crate::Append`]
/// should fold their own error types into a `String` here.
#[derive(Debug, Clone, Error)]
#[error("sink append failed: {0}")]
pub struct SinkError(pub String);

impl SinkError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Error returned by the cache's public operations.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The cache is closed and accepts no further work.
    ///
    /// A cache starts closed only after a sink append fails (see the
    /// worker's poisoning behavior) or after [`crate::Cache::free`] runs.
    /// Every call rejected this way would otherwise have raced the
    /// teardown or blocked forever on a worker that has already stopped.
    #[error("cache is closed")]
    Closed,

    /// The queue was at capacity and waiting for space failed.
    ///
    /// In practice this only happens if the queue's mutex is poisoned by a
    /// prior panic while the lock was held — a broken-invariant condition,
    /// not ordinary backpressure (ordinary backpressure blocks until space
    /// frees up and returns `Ok`).
    #[error("wait for queue capacity failed")]
    CapacityWaitFailed,

    /// The worker's attempt to append a processed item to its sink failed.
    #[error("sink append failed while processing item: {0}")]
    SinkAppendFailed(#[from] SinkError),
}
