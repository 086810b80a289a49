//! Output tree index for idempotent skip checks
//!
//! A simplistic file-skipping strategy: a file counts as already materialized
//! if the output tree contains an entry with the same basename and the same
//! size. Contents are never compared.
//!
//! The index is built once at startup and treated as immutable for the rest
//! of the run; it does not observe links created during the run's own
//! materialization phase. Staleness is acceptable.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Basename -> size index of the output tree
#[derive(Debug, Default)]
pub struct OutputCache {
    entries: HashMap<String, u64>,
}

impl OutputCache {
    /// Build the cache by recursively scanning the output root
    ///
    /// A missing root yields an empty cache (first run). Basename collisions
    /// across subdirectories are last-wins in enumeration order.
    pub fn load(outdir: &Path) -> std::io::Result<Self> {
        let mut entries = HashMap::new();

        if !outdir.exists() {
            debug!(outdir = %outdir.display(), "Output directory absent, cache is empty");
            return Ok(Self { entries });
        }

        for entry in WalkDir::new(outdir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable output entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.insert(name, size);
        }

        info!(files = entries.len(), "Loaded output cache");
        Ok(Self { entries })
    }

    /// Check whether a file of this exact basename and exact size is
    /// already present in the output tree
    pub fn contains(&self, basename: &str, size: u64) -> bool {
        self.entries.get(basename) == Some(&size)
    }

    /// Recorded size for a basename, if any
    pub fn size_of(&self, basename: &str) -> Option<u64> {
        self.entries.get(basename).copied()
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no files are indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_outdir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = OutputCache::load(&tmp.path().join("not-there")).unwrap();
        assert!(cache.is_empty());
        assert!(!cache.contains("a.jpg", 0));
    }

    #[test]
    fn test_indexes_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        let day = tmp.path().join("2020-01-01");
        fs::create_dir_all(&day).unwrap();
        fs::write(day.join("a.jpg"), vec![0u8; 100]).unwrap();
        fs::write(tmp.path().join("b.jpg"), vec![0u8; 50]).unwrap();

        let cache = OutputCache::load(tmp.path()).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a.jpg", 100));
        assert!(cache.contains("b.jpg", 50));
        assert_eq!(cache.size_of("a.jpg"), Some(100));
    }

    #[test]
    fn test_size_mismatch_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.jpg"), vec![0u8; 100]).unwrap();

        let cache = OutputCache::load(tmp.path()).unwrap();
        assert!(!cache.contains("a.jpg", 99));
        assert!(!cache.contains("missing.jpg", 100));
    }

    #[test]
    fn test_directories_are_not_indexed() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("2020-01-01")).unwrap();

        let cache = OutputCache::load(tmp.path()).unwrap();
        assert!(cache.is_empty());
    }
}
