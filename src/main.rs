// src/main.rs

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use domain_recon::config::Cli;
use domain_recon::logging::{self, LogTarget};
use domain_recon::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // --- Logging ---
    let log_target = match (&cli.log_dir, cli.log_file) {
        (Some(dir), _) => LogTarget::File(dir.clone()),
        (None, true) => LogTarget::File(logging::get_data_dir()),
        (None, false) => LogTarget::Stderr,
    };
    logging::initialize_logging(log_target)?;

    // --- Scanner state ---
    let state = AppState::new(cli.scan_config()).wrap_err("Failed to build scanner state")?;
    info!(
        bind = %cli.bind,
        ip_concurrency = cli.ip_concurrency,
        link_concurrency = cli.link_concurrency,
        "Starting domain-recon."
    );

    server::serve(cli.bind, state).await
}
