//! photo-shadow - date-organized shadow tree of hardlinks
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use photo_shadow::config::{CliArgs, ShadowConfig};
use photo_shadow::pipeline::Pipeline;
use photo_shadow::progress::{print_header, print_summary};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    setup_logging(args.verbose);

    let config = ShadowConfig::from_args(args).context("Invalid configuration")?;

    if config.show_summary {
        print_header(
            &config.input_dir.display().to_string(),
            &config.output_dir.display().to_string(),
            config.worker_count,
        );
    }

    let show_summary = config.show_summary;
    let report = Pipeline::new(config).run().context("Run failed")?;

    if show_summary {
        print_summary(&report);
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("photo_shadow=debug,warn")
    } else {
        EnvFilter::new("photo_shadow=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
