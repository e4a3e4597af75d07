//! Reversi Clash - interactive shell
//!
//! Reads commands from stdin and plays a clash stored on disk, so a second
//! process pointed at the same storage can play the other side.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use reversi_clash::{Flow, Renderer, ReversiConfig, Shell, USAGE};
use std::io::{BufRead, Write};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = load_config(&cli)?;
    run_shell(config)
}

/// Logs go to stderr so they never interleave with the board on stdout.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Config file (if any) with command-line overrides applied.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<ReversiConfig> {
    let mut config = match &cli.config {
        Some(path) => ReversiConfig::from_file(path)?,
        None => ReversiConfig::default(),
    };
    if let Some(dir) = &cli.games_dir {
        config = config.with_games_dir(dir.clone());
    }
    if let Some(backend) = cli.backend {
        config = config.with_backend(backend);
    }
    if let Some(database) = &cli.database {
        config = config.with_database(database.clone());
    }
    if cli.no_color {
        config = config.with_color(false);
    }
    Ok(config)
}

/// Reads lines until `exit` or end of input.
#[instrument(skip(config))]
fn run_shell(config: ReversiConfig) -> Result<()> {
    let durable = config
        .open_storage()
        .context("Failed to open clash storage")?;
    info!(backend = ?config.backend(), "Storage opened");

    let mut shell = Shell::new(durable, Renderer::new(*config.color()), *config.first_player());
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "Welcome to Reversi (Multiplayer)")?;
    writeln!(stdout, "{}", USAGE)?;

    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            info!("End of input");
            break;
        };
        match shell.handle_line(&line?) {
            Flow::Continue(text) => write!(stdout, "{}", text)?,
            Flow::Exit => break,
        }
    }

    Ok(())
}
