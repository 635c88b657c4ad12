use icache::Item;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

/// One file observed by the demo probe.
///
/// `fingerprint` hashes size and modification time — cheap metadata that
/// narrows candidates without reading file contents. `deep_eq` then
/// confirms on the full metadata tuple, so two different files that happen
/// to share a size and mtime land in the same chain as distinct variants
/// rather than being collapsed into one.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified_secs: u64,
    pub id: Option<String>,
}

impl FileEntry {
    pub fn new(path: PathBuf, size: u64, modified_secs: u64) -> Self {
        Self {
            path,
            size,
            modified_secs,
            id: None,
        }
    }
}

impl Item for FileEntry {
    fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.size.hash(&mut hasher);
        self.modified_secs.hash(&mut hasher);
        hasher.finish()
    }

    fn deep_eq(&self, other: &Self) -> bool {
        self.size == other.size && self.modified_secs == other.modified_secs
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
