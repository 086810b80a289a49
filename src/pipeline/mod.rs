//! The extraction pipeline: scanner -> worker pool -> link materializer

pub mod coordinator;
pub mod queue;
pub mod scanner;
pub mod worker;

pub use coordinator::{Pipeline, ShadowReport};
pub use queue::{DatedFile, ResultQueue, WorkQueue};
pub use scanner::{build_queue, is_image, ScanReport};
pub use worker::Worker;
