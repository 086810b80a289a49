//! Work and result queues for the extraction pipeline
//!
//! Both queues are unbounded crossbeam channels wrapped in small handle
//! types. The work queue is write-once (populated in full by the scanner,
//! then closed) and read-many (drained by the workers). The result queue is
//! write-many (the workers) and read-once (the link materializer, strictly
//! after the pool has joined).
//!
//! Dequeue is always pop-or-none: an empty pop is the normal termination
//! signal, not an error.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A source file paired with its resolved date string
///
/// Produced by a worker, consumed by the link materializer. The date is
/// either `YYYY-MM-DD` or the `No-Exif` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedFile {
    /// Absolute path to the original file
    pub path: PathBuf,

    /// Resolved date string (names the output subdirectory)
    pub date: String,
}

impl DatedFile {
    /// Create a new dated file record
    pub fn new(path: impl Into<PathBuf>, date: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            date: date.into(),
        }
    }
}

/// Statistics shared by a queue's handles
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total items enqueued
    pub enqueued: AtomicU64,

    /// Total items dequeued
    pub dequeued: AtomicU64,
}

impl QueueStats {
    /// Number of items enqueued so far
    pub fn enqueued_count(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Number of items dequeued so far
    pub fn dequeued_count(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }
}

/// Queue of absolute file paths awaiting metadata extraction
pub struct WorkQueue {
    sender: Sender<PathBuf>,
    receiver: Receiver<PathBuf>,
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create a new unbounded work queue
    pub fn unbounded() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender,
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender handle for the scanner
    pub fn sender(&self) -> WorkSender {
        WorkSender {
            sender: self.sender.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Close the producing side and return the shared receiver
    ///
    /// Once the returned handle (and any clones) holds the only reference,
    /// workers observe a finite queue: pops yield the remaining items and
    /// then `None` forever. Must be called after the scanner has finished
    /// and dropped its sender.
    pub fn into_receiver(self) -> WorkReceiver {
        drop(self.sender);

        WorkReceiver {
            receiver: self.receiver,
            stats: self.stats,
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Handle for enqueuing work items
#[derive(Clone)]
pub struct WorkSender {
    sender: Sender<PathBuf>,
    stats: Arc<QueueStats>,
}

impl WorkSender {
    /// Enqueue a path
    ///
    /// The queue is unbounded, so this never blocks; it only fails if the
    /// receiving side is gone, which cannot happen while the scanner runs.
    pub fn send(&self, path: PathBuf) -> Result<(), ()> {
        self.sender.send(path).map_err(|_| ())?;
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Handle for dequeuing work items (clone one per worker)
#[derive(Clone)]
pub struct WorkReceiver {
    receiver: Receiver<PathBuf>,
    stats: Arc<QueueStats>,
}

impl WorkReceiver {
    /// Pop-or-none: take the next path without blocking
    ///
    /// `None` means the queue is drained; a worker's loop terminates on the
    /// first `None` it sees.
    pub fn try_recv(&self) -> Option<PathBuf> {
        match self.receiver.try_recv() {
            Ok(path) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(path)
            }
            Err(_) => None,
        }
    }

    /// Current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Queue of dated files awaiting link materialization
pub struct ResultQueue {
    sender: Sender<DatedFile>,
    receiver: Receiver<DatedFile>,
    stats: Arc<QueueStats>,
}

impl ResultQueue {
    /// Create a new unbounded result queue
    pub fn unbounded() -> Self {
        let (sender, receiver) = unbounded();

        Self {
            sender,
            receiver,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender handle (clone one per worker)
    pub fn sender(&self) -> ResultSender {
        ResultSender {
            sender: self.sender.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Close the producing side and return the consuming handle
    ///
    /// Called after the worker pool has fully joined, so no concurrent
    /// writers remain by construction.
    pub fn into_receiver(self) -> ResultReceiver {
        drop(self.sender);

        ResultReceiver {
            receiver: self.receiver,
            stats: self.stats,
        }
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

/// Handle for publishing extraction results
#[derive(Clone)]
pub struct ResultSender {
    sender: Sender<DatedFile>,
    stats: Arc<QueueStats>,
}

impl ResultSender {
    /// Publish a dated file
    pub fn send(&self, file: DatedFile) -> Result<(), ()> {
        self.sender.send(file).map_err(|_| ())?;
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Handle for draining extraction results
pub struct ResultReceiver {
    receiver: Receiver<DatedFile>,
    stats: Arc<QueueStats>,
}

impl ResultReceiver {
    /// Pop-or-none: take the next result without blocking
    pub fn try_recv(&self) -> Option<DatedFile> {
        match self.receiver.try_recv() {
            Ok(file) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(file)
            }
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_queue_basic() {
        let queue = WorkQueue::unbounded();
        let sender = queue.sender();

        sender.send("/photos/a.jpg".into()).unwrap();
        assert_eq!(queue.len(), 1);
        assert!(!queue.is_empty());

        let stats = queue.stats();
        let rx = queue.into_receiver();
        assert_eq!(rx.try_recv(), Some(PathBuf::from("/photos/a.jpg")));
        assert_eq!(rx.try_recv(), None);
        assert_eq!(stats.enqueued_count(), 1);
        assert_eq!(stats.dequeued_count(), 1);
    }

    #[test]
    fn test_work_queue_pop_or_none_after_close() {
        let queue = WorkQueue::unbounded();
        let sender = queue.sender();
        sender.send("/a".into()).unwrap();
        sender.send("/b".into()).unwrap();
        drop(sender);

        let rx = queue.into_receiver();
        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_some());

        // Closed and drained: every further pop is None
        assert_eq!(rx.try_recv(), None);
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_work_receiver_clones_share_queue() {
        let queue = WorkQueue::unbounded();
        let sender = queue.sender();
        sender.send("/a".into()).unwrap();
        sender.send("/b".into()).unwrap();
        drop(sender);

        let rx1 = queue.into_receiver();
        let rx2 = rx1.clone();

        assert!(rx1.try_recv().is_some());
        assert!(rx2.try_recv().is_some());
        assert_eq!(rx1.try_recv(), None);
        assert_eq!(rx2.try_recv(), None);
    }

    #[test]
    fn test_result_queue_roundtrip() {
        let queue = ResultQueue::unbounded();
        let sender = queue.sender();

        sender
            .send(DatedFile::new("/photos/a.jpg", "2020-01-01"))
            .unwrap();
        sender
            .send(DatedFile::new("/photos/c.png", "No-Exif"))
            .unwrap();
        drop(sender);

        let rx = queue.into_receiver();
        let first = rx.try_recv().unwrap();
        assert_eq!(first.date, "2020-01-01");
        assert_eq!(rx.try_recv().unwrap().date, "No-Exif");
        assert!(rx.try_recv().is_none());
    }
}
