//! Configuration types for photo-shadow
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::error::ConfigError;
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Default worker pool size
///
/// Extraction is dominated by exiftool subprocess latency, so the pool is
/// sized well past the typical core count.
const DEFAULT_WORKERS: usize = 12;

/// Date-organized shadow tree of hardlinks to a photo library
#[derive(Parser, Debug, Clone)]
#[command(
    name = "photo-shadow",
    version,
    about = "Creates a date-organized shadow tree of hardlinks to a photo library",
    long_about = "Crawls an input directory (e.g. an Apple Photos Library), extracts photo \
                  capture dates from EXIF data via exiftool, and builds a folder-per-day \
                  output tree where each photo is a hardlink to the original.\n\n\
                  Files already present in the output tree (same basename and size) are \
                  skipped, so repeated runs are idempotent.",
    after_help = "EXAMPLES:\n    \
        photo-shadow --dir ~/Pictures/originals --outdir ~/Pictures/by-date\n    \
        photo-shadow --dir /photos -w 24 -v\n    \
        photo-shadow --dir /photos --exiftool /opt/local/bin/exiftool"
)]
pub struct CliArgs {
    /// Input directory to scan (e.g. Photos Library originals)
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub dir: PathBuf,

    /// Output directory root for the shadow tree
    #[arg(long, default_value = "./out", value_name = "DIR")]
    pub outdir: PathBuf,

    /// Number of worker threads for parallel metadata extraction
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub workers: usize,

    /// Path to the exiftool executable
    #[arg(long, default_value = "exiftool", value_name = "PATH")]
    pub exiftool: PathBuf,

    /// Quiet mode - suppress header and summary output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (per-file skip and extraction detail)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ShadowConfig {
    /// Input directory to crawl
    pub input_dir: PathBuf,

    /// Output root for the shadow tree
    pub output_dir: PathBuf,

    /// Number of worker threads
    pub worker_count: usize,

    /// exiftool executable path
    pub exiftool: PathBuf,

    /// Print header and summary
    pub show_summary: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl ShadowConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        if !args.dir.is_dir() {
            return Err(ConfigError::InputDirNotFound { path: args.dir });
        }

        Ok(Self {
            input_dir: args.dir,
            output_dir: args.outdir,
            worker_count: args.workers,
            exiftool: args.exiftool,
            show_summary: !args.quiet,
            verbose: args.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(dir: &std::path::Path) -> CliArgs {
        CliArgs {
            dir: dir.to_path_buf(),
            outdir: PathBuf::from("./out"),
            workers: DEFAULT_WORKERS,
            exiftool: PathBuf::from("exiftool"),
            quiet: false,
            verbose: false,
        }
    }

    #[test]
    fn test_valid_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ShadowConfig::from_args(args_for(tmp.path())).unwrap();
        assert_eq!(config.worker_count, 12);
        assert_eq!(config.input_dir, tmp.path());
        assert!(config.show_summary);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut args = args_for(tmp.path());
        args.workers = 0;
        let err = ShadowConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidWorkerCount { .. }));
    }

    #[test]
    fn test_excessive_workers_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut args = args_for(tmp.path());
        args.workers = MAX_WORKERS + 1;
        assert!(ShadowConfig::from_args(args).is_err());
    }

    #[test]
    fn test_missing_input_dir_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        let err = ShadowConfig::from_args(args_for(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::InputDirNotFound { .. }));
    }

    #[test]
    fn test_quiet_suppresses_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let mut args = args_for(tmp.path());
        args.quiet = true;
        let config = ShadowConfig::from_args(args).unwrap();
        assert!(!config.show_summary);
    }
}
