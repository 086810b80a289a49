//! Input tree scan that populates the work queue
//!
//! Walks the input directory once, classifies files by extension, consults
//! the output cache for name+size matches, and enqueues the absolute path of
//! every image that still needs a link. Runs to completion before any worker
//! starts, so workers can treat an empty pop as final.

use crate::cache::OutputCache;
use crate::error::Result;
use crate::pipeline::queue::WorkSender;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Extensions classified as images (case-insensitive)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "heic", "png", "dng"];

/// Classify a file as an image by its final extension
///
/// Matching is anchored: only `Path::extension()` is considered, so
/// `photo.jpgsomething` is not an image while `photo.backup.JPG` is.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Counters from a completed scan
#[derive(Debug, Default, Clone)]
pub struct ScanReport {
    /// Regular files seen
    pub scanned: u64,

    /// Paths enqueued for extraction
    pub queued: u64,

    /// Sum of sizes of enqueued files
    pub queued_bytes: u64,

    /// Files excluded by extension
    pub skipped_non_image: u64,

    /// Files excluded by the output cache (name+size hit)
    pub skipped_existing: u64,
}

/// Walk the input directory and populate the work queue
///
/// Directories are skipped; unreadable entries are logged and skipped.
/// Each enqueued path is canonicalized to an absolute path; a path enters
/// the queue at most once because the filesystem is enumerated once.
pub fn build_queue(
    input_dir: &Path,
    cache: &OutputCache,
    queue_tx: &WorkSender,
) -> Result<ScanReport> {
    info!(dir = %input_dir.display(), "Scanning input directory");

    let mut report = ScanReport::default();

    for entry in WalkDir::new(input_dir) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        report.scanned += 1;
        let path = entry.path();

        if !is_image(path) {
            debug!(path = %path.display(), "Skipping non-image file");
            report.skipped_non_image += 1;
            continue;
        }

        let abs_path = match std::fs::canonicalize(path) {
            Ok(p) => p,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping file that cannot be resolved");
                continue;
            }
        };

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping file that cannot be stat'd");
                continue;
            }
        };

        let basename = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Same name and size in the output tree: good enough to skip
        if cache.contains(&basename, size) {
            debug!(path = %abs_path.display(), "Skipping existing file");
            report.skipped_existing += 1;
            continue;
        }

        if queue_tx.send(abs_path).is_err() {
            warn!("Work queue closed during scan");
            break;
        }
        report.queued += 1;
        report.queued_bytes += size;
    }

    info!(
        scanned = report.scanned,
        queued = report.queued,
        skipped_existing = report.skipped_existing,
        "Scan complete"
    );

    Ok(report)
}
