//! Error types for photo-shadow
//!
//! This module defines the error hierarchy covering:
//! - Configuration and CLI errors
//! - Metadata extraction (exiftool subprocess) errors
//! - Worker thread errors
//! - Link materialization errors
//!
//! Propagation policy: extraction errors are caught per-file inside a worker,
//! logged, and the file is dropped (fail-soft). Materialization errors are
//! fatal and abort the run (fail-fast).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the photo-shadow application
#[derive(Error, Debug)]
pub enum ShadowError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Metadata extraction errors
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Link materialization errors
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// I/O errors (directory scans, stat calls, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata extraction errors
///
/// Every variant is caught by the owning worker, logged as a warning, and
/// swallowed. None of these abort the run.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The metadata tool could not be launched
    #[error("Failed to launch '{}': {source}", .tool.display())]
    Spawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The metadata tool exited non-zero
    #[error("Metadata tool failed on '{}' (exit code {code:?}): {stderr}", .path.display())]
    ToolFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// The tool's output was not valid JSON
    #[error("Malformed metadata output for '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The tool emitted an empty record array
    #[error("Metadata tool emitted no records for '{}'", .path.display())]
    EmptyOutput { path: PathBuf },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Input directory missing or not a directory
    #[error("Input directory '{}' does not exist or is not a directory", .path.display())]
    InputDirNotFound { path: PathBuf },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker thread could not be spawned
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Worker panicked
    #[error("Worker {id} panicked")]
    Panicked { id: usize },
}

/// Link materialization errors
///
/// All of these are fatal: the materializer runs after the worker pool has
/// joined and any failure here aborts the run, leaving the partially
/// completed output tree as-is.
#[derive(Error, Debug)]
pub enum LinkError {
    /// A result record carried an empty source path
    #[error("Result record has an empty source path")]
    MissingSource,

    /// A result record carried an empty date
    #[error("Result record for '{}' has an empty date", .path.display())]
    MissingDate { path: PathBuf },

    /// Destination directory could not be created
    #[error("Failed to create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hardlink creation failed for a reason other than pre-existence
    #[error("Failed to link '{}' => '{}': {source}", .src.display(), .dest.display())]
    LinkFailed {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for ShadowError
pub type Result<T> = std::result::Result<T, ShadowError>;

/// Outcome of extracting metadata for a single file
///
/// Workers log the outcome and only forward `Extracted` records; a `Failed`
/// outcome is the explicit drop-on-failure branch — the path is never
/// retried and never surfaced as an overall failure.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// A date (possibly the `No-Exif` sentinel) was resolved
    Extracted { path: PathBuf, date: String },

    /// Extraction failed; the file is dropped from the results
    Failed { path: PathBuf, error: ExtractError },
}

impl ExtractOutcome {
    /// Returns true if this outcome carries a resolved date
    pub fn is_extracted(&self) -> bool {
        matches!(self, ExtractOutcome::Extracted { .. })
    }

    /// Returns the path associated with this outcome
    pub fn path(&self) -> &std::path::Path {
        match self {
            ExtractOutcome::Extracted { path, .. } => path,
            ExtractOutcome::Failed { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let extract_err = ExtractError::EmptyOutput {
            path: "/photos/a.jpg".into(),
        };
        let shadow_err: ShadowError = extract_err.into();
        assert!(matches!(shadow_err, ShadowError::Extract(_)));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = ExtractOutcome::Extracted {
            path: "/photos/a.jpg".into(),
            date: "2020-01-01".into(),
        };
        assert!(ok.is_extracted());
        assert_eq!(ok.path(), std::path::Path::new("/photos/a.jpg"));

        let failed = ExtractOutcome::Failed {
            path: "/photos/b.jpg".into(),
            error: ExtractError::EmptyOutput {
                path: "/photos/b.jpg".into(),
            },
        };
        assert!(!failed.is_extracted());
    }
}
