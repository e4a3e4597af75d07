//! Command-line interface for reversi_clash.

use clap::Parser;
use reversi_clash::Backend;
use std::path::PathBuf;

/// Reversi Clash - two-player reversi over shared storage
#[derive(Parser, Debug)]
#[command(name = "reversi_clash")]
#[command(about = "Play reversi against another process through shared storage", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for text-file clashes (overrides config)
    #[arg(long)]
    pub games_dir: Option<PathBuf>,

    /// Durable backend for named clashes (overrides config)
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// SQLite database file (overrides config)
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Disable colour output
    #[arg(long)]
    pub no_color: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
