use clap::{Parser, Subcommand};
use outfitter_core::TargetId;

#[derive(Debug, Parser)]
#[command(name = "outfitter")]
#[command(bin_name = "outfitter")]
#[command(version)]
#[command(about = "Attach and detach downloadable content packages for a product")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Base URL of the backend RPC channel.
    #[arg(long, default_value = "http://127.0.0.1:8799/rpc/")]
    pub backend_url: String,
    /// Also log to the terminal, not just ./outfitter.log.
    #[arg(long)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Attach a content package, tracking the remote job to completion")]
    Add { target: TargetId },
    #[command(about = "Detach a previously attached content package")]
    Remove { target: TargetId },
    #[command(about = "Show the current job status for a target")]
    Status { target: TargetId },
    #[command(about = "List attached content packages")]
    List,
    #[command(about = "Show the stored credential's status")]
    Key,
    #[command(about = "Enter and store a replacement credential")]
    SetKey,
    #[command(about = "Re-evaluate the page on debounced change signals read from stdin")]
    Watch { target: TargetId },
}
