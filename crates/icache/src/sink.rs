use crate::error::SinkError;
use crate::item::Item;
use std::sync::Arc;

/// The downstream "collected object" a processed item is appended to.
///
/// Implemented by the caller over whatever container holds the probe's
/// results; the cache never constructs or inspects one. Only the worker
/// thread ever calls `append`, so an implementation does not need to
/// synchronize against concurrent `append` calls from multiple cache
/// threads — it only needs to be safe to share with however many
/// `Cache::submit` callers reference the same sink.
pub trait Append<T: Item>: Send + Sync {
    /// Appends a processed item (already deduplicated and id-stamped) to
    /// this sink.
    fn append(&self, item: Arc<T>) -> Result<(), SinkError>;
}
