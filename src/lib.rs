//! photo-shadow - date-organized shadow tree of hardlinks
//!
//! Crawls a photo library, extracts capture dates from EXIF metadata via an
//! external exiftool process, and builds a folder-per-day output tree where
//! each photo is a hardlink to the original. Nothing is copied; re-running
//! against the same pair of directories is idempotent.
//!
//! # Architecture
//!
//! ```text
//!   input tree ──> Scanner ──> Work Queue (closed before workers start)
//!                                  │
//!                    ┌─────────────┼─────────────┐
//!                    ▼             ▼             ▼
//!               Worker 1      Worker 2  ...  Worker N
//!               (exiftool)    (exiftool)     (exiftool)
//!                    │             │             │
//!                    └─────────────┼─────────────┘
//!                                  ▼
//!                            Result Queue
//!                                  │   (after full join)
//!                                  ▼
//!                          Link Materializer ──> <outdir>/<YYYY-MM-DD>/...
//! ```
//!
//! The scanner consults a one-shot index of the output tree (basename + size)
//! so already-materialized files never enter the queue. Workers drain the
//! queue with non-blocking pops and exit on the first empty one; the full
//! join of the pool is the only synchronization barrier before links are
//! created.

pub mod cache;
pub mod config;
pub mod error;
pub mod exif;
pub mod link;
pub mod pipeline;
pub mod progress;

pub use cache::OutputCache;
pub use config::{CliArgs, ShadowConfig};
pub use error::{Result, ShadowError};
pub use exif::{ExifReader, NO_EXIF};
pub use pipeline::{DatedFile, Pipeline, ShadowReport};
