//! # Quoter Command-Line Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           quoter (binary)                               │
//! │                                                                         │
//! │  main.rs ─────► logging, argument parsing, dispatch                     │
//! │  cli.rs ──────► clap definitions, id=pct parsing                        │
//! │  commands.rs ─► quote / catalog / currencies / config                   │
//! │  render.rs ───► plain-text tables                                       │
//! │                                                                         │
//! │         │                                   │                           │
//! │         ▼                                   ▼                           │
//! │  ┌──────────────────────┐       ┌──────────────────────────────┐       │
//! │  │ quoter-core (pure)   │       │ quoter-fx (HTTP, config)     │       │
//! │  └──────────────────────┘       └──────────────────────────────┘       │
//! │                                                                         │
//! │  stdout: table, note, message      stderr: logs                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cli;
mod commands;
mod render;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    debug!(command = ?cli.command, "Starting quoter");

    match cli.command {
        Command::Quote(args) => commands::quote(cli.config, args).await,
        Command::Catalog(args) => commands::catalog(args),
        Command::Currencies => commands::currencies(cli.config).await,
        Command::Config(args) => commands::config(cli.config, args),
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quoter_fx=trace` - Trace the rate providers only
/// - Default: `info,quoter=debug`
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,quoter=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
