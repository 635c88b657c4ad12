//! icache-probe - worked-example consumer of `icache`
//!
//! Walks a directory tree and submits one [`FileEntry`] per file, deduping
//! files whose size and modification time match — a stand-in for the kind
//! of probe the original cache was built to sit behind.

pub mod collector;
pub mod file_entry;

pub use collector::VecCollector;
pub use file_entry::FileEntry;
