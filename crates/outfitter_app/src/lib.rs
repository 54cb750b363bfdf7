//! Outfitter app shell: CLI wiring for the orchestration engine.
pub mod cli;
mod commands;
mod hosts;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Cli;

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let destination = if cli.verbose {
        logging::LogDestination::Both
    } else {
        logging::LogDestination::File
    };
    logging::initialize(destination);

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(commands::dispatch(cli))
}
