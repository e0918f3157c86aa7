//! CLI argument parsing module for bundleup

use clap::Parser;
use std::path::PathBuf;

/// Ruby LSP isolated bundle updater
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bundleup",
    version,
    about = "Updates the Ruby LSP isolated bundle's pinned gems"
)]
pub struct CliArgs {
    /// Project root directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}
