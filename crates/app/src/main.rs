//! `QueryBox` - Main Entry Point
//!
//! Loads the persisted workbench from the data directory, runs one
//! subcommand and exits.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use querybox::{AppConfig, Cli, logging};
use querybox_application::Workbench;
use querybox_infrastructure::{JsonFileStore, ReqwestTransport, SystemClock};
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);
    logging::init(&config.log_filter);
    debug!(?config, "configuration resolved");

    let transport = ReqwestTransport::with_config(config.transport_config())
        .context("failed to create HTTP client")?;
    let clock = Arc::new(SystemClock::new());
    let workbench = Workbench::load(
        JsonFileStore::new(&config.data_dir),
        Arc::new(transport),
        clock.clone(),
    );

    let mut stdout = std::io::stdout();
    querybox::run(&workbench, clock.as_ref(), cli.command, &mut stdout).await
}
