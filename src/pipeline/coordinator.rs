//! Pipeline coordinator - orchestrates the scan, extraction, and linking
//!
//! Phases run strictly in order:
//! 1. Index the output tree (OutputCache)
//! 2. Populate and close the work queue (scanner)
//! 3. Spawn the worker pool and join every worker
//! 4. Drain the result queue and materialize hardlinks
//!
//! The full join between phases 3 and 4 is the only synchronization barrier
//! in the system; because the work queue is closed before any worker starts,
//! an empty pop can never race with late enqueues.

use crate::cache::OutputCache;
use crate::config::ShadowConfig;
use crate::error::Result;
use crate::link::materialize_links;
use crate::pipeline::queue::{ResultQueue, WorkQueue};
use crate::pipeline::scanner::build_queue;
use crate::pipeline::worker::{aggregate_stats, Worker};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Result of a completed run
#[derive(Debug)]
pub struct ShadowReport {
    /// Regular files seen in the input tree
    pub scanned: u64,

    /// Paths enqueued for extraction
    pub queued: u64,

    /// Sum of sizes of enqueued files
    pub queued_bytes: u64,

    /// Files excluded by extension
    pub skipped_non_image: u64,

    /// Files excluded by the output cache
    pub skipped_existing: u64,

    /// Files with a resolved date (includes No-Exif)
    pub extracted: u64,

    /// Files that resolved to the No-Exif sentinel
    pub no_exif: u64,

    /// Files dropped after extraction failures
    pub failed: u64,

    /// Hardlinks created
    pub links_created: u64,

    /// Link destinations that already existed
    pub links_skipped: u64,

    /// Wall-clock time for the run
    pub duration: Duration,
}

/// Coordinates the full scan/extract/link run
pub struct Pipeline {
    config: Arc<ShadowConfig>,
}

impl Pipeline {
    /// Create a pipeline from validated configuration
    pub fn new(config: ShadowConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Run the pipeline to completion
    pub fn run(self) -> Result<ShadowReport> {
        let start = Instant::now();

        info!(
            dir = %self.config.input_dir.display(),
            outdir = %self.config.output_dir.display(),
            workers = self.config.worker_count,
            "Starting shadow tree build"
        );

        // Phase 1: index the output tree
        let cache = OutputCache::load(&self.config.output_dir)?;

        // Phase 2: populate and close the work queue
        let queue = WorkQueue::unbounded();
        let scan = {
            let queue_tx = queue.sender();
            build_queue(&self.config.input_dir, &cache, &queue_tx)?
        };
        let work_rx = queue.into_receiver();

        // Phase 3: spawn the pool and wait for the full join
        let results = ResultQueue::unbounded();
        let mut workers = Vec::with_capacity(self.config.worker_count);
        for id in 0..self.config.worker_count {
            let worker = Worker::spawn(
                id,
                Arc::clone(&self.config),
                work_rx.clone(),
                results.sender(),
            )?;
            workers.push(worker);
        }
        info!(count = workers.len(), "Workers spawned");

        let (extracted, no_exif, failed) = Self::join_workers(workers);

        // Phase 4: single-threaded link materialization
        let link_stats = materialize_links(results.into_receiver(), &self.config.output_dir)?;

        let duration = start.elapsed();
        info!(
            extracted = extracted,
            failed = failed,
            links = link_stats.created,
            duration_secs = duration.as_secs(),
            "Shadow tree build complete"
        );

        Ok(ShadowReport {
            scanned: scan.scanned,
            queued: scan.queued,
            queued_bytes: scan.queued_bytes,
            skipped_non_image: scan.skipped_non_image,
            skipped_existing: scan.skipped_existing,
            extracted,
            no_exif,
            failed,
            links_created: link_stats.created,
            links_skipped: link_stats.skipped,
            duration,
        })
    }

    /// Join all worker threads, then collect final stats
    fn join_workers(workers: Vec<Worker>) -> (u64, u64, u64) {
        // Stats live past the join through the shared Arcs
        let stat_handles: Vec<_> = workers.iter().map(Worker::stats).collect();

        for worker in workers {
            let id = worker.id();
            if let Err(e) = worker.join() {
                warn!(worker = id, error = %e, "Worker failed to join cleanly");
            }
        }

        aggregate_stats(&stat_handles)
    }
}
