pub mod cli;
pub mod config;
pub mod grading;
pub mod pipeline;
pub mod time_estimation;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub fn run() -> ExitCode {
    // Logs go to stderr; stdout carries the JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    match cli::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
