//! Link materialization - builds the shadow tree from extraction results
//!
//! Runs single-threaded after the worker pool has fully joined; no concurrent
//! writers remain at that point by construction. For each result a hardlink
//! is created at `<outdir>/<date>/<basename>`. Pre-existing destinations are
//! skipped; any other filesystem failure aborts the run.

use crate::error::LinkError;
use crate::pipeline::queue::ResultReceiver;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Counters from a completed materialization pass
#[derive(Debug, Default, Clone)]
pub struct LinkStats {
    /// Hardlinks created
    pub created: u64,

    /// Destinations that already existed
    pub skipped: u64,
}

/// Drain the result queue and create one hardlink per entry
pub fn materialize_links(results: ResultReceiver, outdir: &Path) -> Result<LinkStats, LinkError> {
    let mut stats = LinkStats::default();

    while let Some(file) = results.try_recv() {
        // Should not occur given the upstream contract, validated anyway
        if file.path.as_os_str().is_empty() {
            return Err(LinkError::MissingSource);
        }
        if file.date.is_empty() {
            return Err(LinkError::MissingDate { path: file.path });
        }

        let dest_dir = outdir.join(&file.date);
        fs::create_dir_all(&dest_dir).map_err(|source| LinkError::CreateDir {
            path: dest_dir.clone(),
            source,
        })?;

        let basename = file.path.file_name().ok_or(LinkError::MissingSource)?;
        let dest = dest_dir.join(basename);

        if dest.exists() {
            debug!(dest = %dest.display(), "Skipping existing link");
            stats.skipped += 1;
            continue;
        }

        info!(src = %file.path.display(), dest = %dest.display(), "Linking");
        fs::hard_link(&file.path, &dest).map_err(|source| LinkError::LinkFailed {
            src: file.path.clone(),
            dest,
            source,
        })?;
        stats.created += 1;
    }

    info!(
        created = stats.created,
        skipped = stats.skipped,
        "Link materialization complete"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::queue::{DatedFile, ResultQueue};
    use std::path::PathBuf;

    fn results_from(files: Vec<DatedFile>) -> ResultReceiver {
        let queue = ResultQueue::unbounded();
        let tx = queue.sender();
        for file in files {
            tx.send(file).unwrap();
        }
        drop(tx);
        queue.into_receiver()
    }

    #[test]
    fn test_creates_hardlink_in_date_dir() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("a.jpg");
        fs::write(&src, vec![0u8; 100]).unwrap();

        let results = results_from(vec![DatedFile::new(&src, "2020-01-01")]);
        let stats = materialize_links(results, out_dir.path()).unwrap();

        assert_eq!(stats.created, 1);
        assert_eq!(stats.skipped, 0);

        let dest = out_dir.path().join("2020-01-01").join("a.jpg");
        assert!(dest.exists());
        assert_eq!(fs::metadata(&dest).unwrap().len(), 100);
    }

    #[cfg(unix)]
    #[test]
    fn test_link_shares_inode_with_source() {
        use std::os::unix::fs::MetadataExt;

        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("a.jpg");
        fs::write(&src, b"data").unwrap();

        let results = results_from(vec![DatedFile::new(&src, "2020-01-01")]);
        materialize_links(results, out_dir.path()).unwrap();

        let dest = out_dir.path().join("2020-01-01").join("a.jpg");
        assert_eq!(
            fs::metadata(&src).unwrap().ino(),
            fs::metadata(&dest).unwrap().ino()
        );
    }

    #[test]
    fn test_no_exif_sentinel_names_directory() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("c.png");
        fs::write(&src, vec![0u8; 50]).unwrap();

        let results = results_from(vec![DatedFile::new(&src, "No-Exif")]);
        materialize_links(results, out_dir.path()).unwrap();

        assert!(out_dir.path().join("No-Exif").join("c.png").exists());
    }

    #[test]
    fn test_existing_destination_skipped() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("a.jpg");
        fs::write(&src, b"data").unwrap();

        let day = out_dir.path().join("2020-01-01");
        fs::create_dir_all(&day).unwrap();
        fs::write(day.join("a.jpg"), b"already here").unwrap();

        let results = results_from(vec![DatedFile::new(&src, "2020-01-01")]);
        let stats = materialize_links(results, out_dir.path()).unwrap();

        assert_eq!(stats.created, 0);
        assert_eq!(stats.skipped, 1);

        // No overwrite
        assert_eq!(fs::read(day.join("a.jpg")).unwrap(), b"already here");
    }

    #[test]
    fn test_empty_date_is_fatal() {
        let src_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("a.jpg");
        fs::write(&src, b"data").unwrap();

        let results = results_from(vec![DatedFile::new(&src, "")]);
        let err = materialize_links(results, out_dir.path()).unwrap_err();
        assert!(matches!(err, LinkError::MissingDate { .. }));
    }

    #[test]
    fn test_empty_path_is_fatal() {
        let out_dir = tempfile::tempdir().unwrap();
        let results = results_from(vec![DatedFile::new(PathBuf::new(), "2020-01-01")]);
        let err = materialize_links(results, out_dir.path()).unwrap_err();
        assert!(matches!(err, LinkError::MissingSource));
    }

    #[test]
    fn test_missing_source_aborts() {
        let out_dir = tempfile::tempdir().unwrap();
        let results = results_from(vec![DatedFile::new("/nonexistent/a.jpg", "2020-01-01")]);
        let err = materialize_links(results, out_dir.path()).unwrap_err();
        assert!(matches!(err, LinkError::LinkFailed { .. }));
    }
}
