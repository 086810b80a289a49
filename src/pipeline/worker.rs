//! Worker thread logic for parallel metadata extraction
//!
//! Each worker:
//! - Owns its own `ExifReader` (one subprocess per file, no shared state)
//! - Pops paths from the work queue without blocking
//! - Publishes a `DatedFile` per successful extraction
//! - Logs and drops files whose extraction fails
//! - Exits on the first empty pop (the queue is closed before workers start)

use crate::config::ShadowConfig;
use crate::error::{ExtractOutcome, WorkerError};
use crate::exif::{ExifReader, NO_EXIF};
use crate::pipeline::queue::{DatedFile, ResultSender, WorkReceiver};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Files with a resolved date
    pub extracted: AtomicU64,

    /// Files that resolved to the No-Exif sentinel
    pub no_exif: AtomicU64,

    /// Files dropped after an extraction failure
    pub failed: AtomicU64,
}

impl WorkerStats {
    fn record_extracted(&self, date: &str) {
        self.extracted.fetch_add(1, Ordering::Relaxed);
        if date == NO_EXIF {
            self.no_exif.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// A worker thread that drains the work queue
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        config: Arc<ShadowConfig>,
        work_rx: WorkReceiver,
        results_tx: ResultSender,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("extract-{}", id))
            .spawn(move || worker_loop(id, config, work_rx, results_tx, stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get a handle to the worker's statistics
    ///
    /// The handle stays valid after `join` consumes the worker.
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WorkerError::Panicked { id: self.id }),
            None => Ok(()),
        }
    }
}

/// Main worker loop: pop-or-none until the queue is drained
fn worker_loop(
    id: usize,
    config: Arc<ShadowConfig>,
    work_rx: WorkReceiver,
    results_tx: ResultSender,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, "Worker starting");

    let reader = ExifReader::new(&config.exiftool);

    while let Some(path) = work_rx.try_recv() {
        let outcome = match reader.read_date(&path) {
            Ok(date) => ExtractOutcome::Extracted { path, date },
            Err(error) => ExtractOutcome::Failed { path, error },
        };

        match outcome {
            ExtractOutcome::Extracted { path, date } => {
                info!(worker = id, path = %path.display(), date = %date, "Date extracted");
                stats.record_extracted(&date);

                if results_tx.send(DatedFile::new(path, date)).is_err() {
                    // Result side gone; nothing left to do
                    error!(worker = id, "Result queue closed, worker stopping");
                    break;
                }
            }
            ExtractOutcome::Failed { path, error } => {
                // Drop on failure: no retry, the run continues
                warn!(worker = id, path = %path.display(), error = %error, "Extraction failed, file dropped");
                stats.record_failed();
            }
        }
    }

    debug!(
        worker = id,
        extracted = stats.extracted.load(Ordering::Relaxed),
        failed = stats.failed.load(Ordering::Relaxed),
        "Work queue drained, worker exiting"
    );
}

/// Aggregate statistics from multiple workers
///
/// Only meaningful after every contributing worker has joined.
/// Returns (extracted, no_exif, failed) totals.
pub fn aggregate_stats(stats: &[Arc<WorkerStats>]) -> (u64, u64, u64) {
    let mut extracted = 0u64;
    let mut no_exif = 0u64;
    let mut failed = 0u64;

    for s in stats {
        extracted += s.extracted.load(Ordering::Relaxed);
        no_exif += s.no_exif.load(Ordering::Relaxed);
        failed += s.failed.load(Ordering::Relaxed);
    }

    (extracted, no_exif, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats() {
        let stats = WorkerStats::default();

        stats.record_extracted("2020-01-01");
        stats.record_extracted(NO_EXIF);
        stats.record_failed();

        assert_eq!(stats.extracted.load(Ordering::Relaxed), 2);
        assert_eq!(stats.no_exif.load(Ordering::Relaxed), 1);
        assert_eq!(stats.failed.load(Ordering::Relaxed), 1);
    }
}
