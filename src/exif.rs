//! Metadata extraction via an external exiftool subprocess
//!
//! Each call spawns `<tool> -dateFormat %Y-%m-%d -json <path>` and parses the
//! JSON record it emits. The capture date is resolved through a fallback
//! chain of three timestamp fields; when none of them yields a usable value
//! the sentinel [`NO_EXIF`] is returned so the file still lands in a
//! deterministic output directory.
//!
//! There is no caching: extracting the same path twice spawns two processes.

use crate::error::ExtractError;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

/// Sentinel date for files without usable capture-time metadata
pub const NO_EXIF: &str = "No-Exif";

/// Date format requested from exiftool
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A candidate date must start with an ISO date prefix.
/// Calendar correctness is deliberately not validated; exiftool already
/// formatted the value and a bogus month still yields a stable directory.
static DATE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("Invalid date prefix regex")
});

/// One record of exiftool's `-json` output
///
/// Only the three timestamp fields in the fallback chain are deserialized;
/// everything else exiftool emits is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ExifRecord {
    /// Original capture timestamp
    #[serde(rename = "DateTimeOriginal")]
    pub date_time_original: Option<String>,

    /// Creation timestamp
    #[serde(rename = "CreateDate")]
    pub create_date: Option<String>,

    /// Filesystem modification timestamp
    #[serde(rename = "FileModifyDate")]
    pub file_modify_date: Option<String>,
}

/// Pick a date from a record using the priority chain
/// DateTimeOriginal > CreateDate > FileModifyDate.
///
/// Returns the validated 10-character `YYYY-MM-DD` prefix of the first
/// candidate matching the date pattern, or `None` if no field qualifies.
pub fn pick_date(record: &ExifRecord) -> Option<&str> {
    let candidates = [
        record.date_time_original.as_deref(),
        record.create_date.as_deref(),
        record.file_modify_date.as_deref(),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|value| DATE_PREFIX.find(value).map(|m| m.as_str()))
}

/// Reads capture dates from photo files by shelling out to exiftool
///
/// Cheap to construct; each worker owns its own instance.
#[derive(Debug, Clone)]
pub struct ExifReader {
    tool: PathBuf,
}

impl ExifReader {
    /// Create a reader using the given exiftool executable
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    /// Resolve the date string for a single file
    ///
    /// Returns `YYYY-MM-DD` or the [`NO_EXIF`] sentinel. Errors cover the
    /// subprocess failing to launch, exiting non-zero, or emitting output
    /// that cannot be parsed as a single-record JSON array.
    pub fn read_date(&self, path: &Path) -> Result<String, ExtractError> {
        let record = self.read_record(path)?;

        Ok(pick_date(&record)
            .map(str::to_owned)
            .unwrap_or_else(|| NO_EXIF.to_string()))
    }

    /// Invoke exiftool and parse its first output record
    fn read_record(&self, path: &Path) -> Result<ExifRecord, ExtractError> {
        let output = Command::new(&self.tool)
            .arg("-dateFormat")
            .arg(DATE_FORMAT)
            .arg("-json")
            .arg(path)
            .output()
            .map_err(|source| ExtractError::Spawn {
                tool: self.tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::ToolFailed {
                path: path.to_path_buf(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut records: Vec<ExifRecord> =
            serde_json::from_slice(&output.stdout).map_err(|source| ExtractError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if records.is_empty() {
            return Err(ExtractError::EmptyOutput {
                path: path.to_path_buf(),
            });
        }

        Ok(records.swap_remove(0))
    }
}
