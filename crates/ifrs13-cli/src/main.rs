//! IFRS13 CLI - Fair value hierarchy classification from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Classify a single swaption
//! ifrs13 classify --product "IR Swaption" --currency USD --notional 10000000 \
//!     --strike 2.5 --expiry 2 --maturity 10
//!
//! # Classify a trade file and export the levels
//! ifrs13 batch --trades data/sample_trades.csv --output levels.csv
//!
//! # Inspect the observability grids
//! ifrs13 grid --ir-grid data/ir_delta_observability_grid.csv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = AppConfig::load(cli.config.as_deref())?;
    let format = cli.format;

    match cli.command {
        Commands::Classify(args) => commands::classify::execute(args, &config, format)?,
        Commands::Batch(args) => commands::batch::execute(args, &config, format, cli.quiet)?,
        Commands::Grid(args) => commands::grid::execute(args, &config, format)?,
    }

    Ok(())
}

/// Logs go to stderr so table, JSON and CSV output stay clean.
fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
