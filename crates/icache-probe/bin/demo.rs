//! CLI demo: walks a directory tree with several producer threads and
//! reports how many distinct file-metadata equivalence classes were found.
//!
//! Usage: `icache-probe-demo <directory> [thread-count]`

use anyhow::{Context, Result};
use icache::{Cache, Config};
use icache_probe::{FileEntry, VecCollector};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let directory: PathBuf = args
        .next()
        .context("usage: icache-probe-demo <directory> [thread-count]")?
        .into();
    let thread_count: usize = args
        .next()
        .map(|n| n.parse())
        .transpose()?
        .unwrap_or(4);

    let paths: Vec<PathBuf> = WalkDir::new(&directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();

    let cache = Arc::new(Cache::<FileEntry>::new(Config::default()));
    let sink = VecCollector::new();
    let chunk_size = paths.len().div_ceil(thread_count.max(1));

    let handles: Vec<_> = paths
        .chunks(chunk_size.max(1))
        .map(|chunk| {
            let cache = Arc::clone(&cache);
            let sink = Arc::clone(&sink);
            let chunk = chunk.to_vec();
            std::thread::spawn(move || -> Result<()> {
                for path in chunk {
                    let metadata = std::fs::metadata(&path)?;
                    let modified_secs = metadata
                        .modified()
                        .ok()
                        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                        .map(|duration| duration.as_secs())
                        .unwrap_or(0);
                    let entry = FileEntry::new(path, metadata.len(), modified_secs);
                    cache.submit(sink.clone(), Arc::new(entry))?;
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer thread panicked")?;
    }
    cache.barrier()?;

    println!("files walked:      {}", cache.metrics().submitted());
    println!("unique entries:    {}", cache.metrics().unique_items());
    println!("duplicate hits:    {}", cache.metrics().hits());
    println!("hash collisions:   {}", cache.metrics().collisions());
    println!("sink size:         {}", sink.len());

    Ok(())
}
