//! Kampus Beken command-line client

use std::{
    io::{self, Write},
    process::ExitCode,
};

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::CliConfig;

mod cli;

/// Kampus Beken entry point
fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(parse_error) => {
            // Help and version output also arrive here
            _ = parse_error.print();

            return u8::try_from(parse_error.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from);
        }
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();

    match cli::run(&config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!("{run_error}");

            _ = writeln!(io::stderr(), "error: {run_error}");

            ExitCode::FAILURE
        }
    }
}
