use crate::file_entry::FileEntry;
use icache::{Append, SinkError};
use std::sync::{Arc, Mutex};

/// The demo's "collected object": a `Vec` guarded by a mutex.
///
/// Only the cache's worker thread ever calls `append`, but the collector
/// itself is shared with the CLI's final reporting pass, so it still needs
/// interior mutability to be read back after the cache shuts down.
#[derive(Default)]
pub struct VecCollector {
    entries: Mutex<Vec<Arc<FileEntry>>>,
}

impl VecCollector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Append<FileEntry> for VecCollector {
    fn append(&self, item: Arc<FileEntry>) -> Result<(), SinkError> {
        self.entries.lock().unwrap().push(item);
        Ok(())
    }
}
