//! blockprice CLI - per-block Bitcoin OHLCV aggregation and lookup.

use anyhow::{Context, Result};
use blockprice_lib::OutputFormat;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;

use config::Config;

#[derive(Parser)]
#[command(name = "blockprice")]
#[command(about = "Per-block Bitcoin OHLCV aggregation and lookup", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path. Defaults to ./blockprice.toml when present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate tick dumps into the per-block price table
    Aggregate {
        /// Boundary file of height,timestamp lines. Defaults to
        /// <data-dir>/timestamps.txt
        #[arg(short, long)]
        timestamps: Option<PathBuf>,

        /// Explicit tick source as exchange=path (repeatable). When
        /// omitted, dumps are discovered in the data directory.
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Data directory override
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Blocks held back behind the coverage watermark
        #[arg(long)]
        publish_lag: Option<u64>,

        /// Height above which zero-open blocks are dropped
        #[arg(long)]
        priced_height_floor: Option<u64>,

        /// Format of the flat export written alongside the table
        /// (csv, json or ndjson)
        #[arg(long, default_value = "csv")]
        export_format: OutputFormat,
    },

    /// Query the published price table
    Query {
        #[command(subcommand)]
        action: QueryAction,
    },

    /// Download full-history exchange dumps
    Download {
        /// Exchanges to download (default: all supported)
        exchanges: Vec<String>,

        /// Data directory override
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Extend the boundary file from the block API
    SyncTimestamps {
        /// Boundary file to extend. Defaults to <data-dir>/timestamps.txt
        #[arg(short, long)]
        timestamps: Option<PathBuf>,

        /// Data directory override
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Show statistics about the published table
    Info {
        /// Data directory override
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

/// Point queries over the published table.
#[derive(Subcommand)]
enum QueryAction {
    /// OHLCV record for a block
    Block {
        /// Block height
        height: u64,
    },

    /// Satoshis per dollar at a block
    Sats {
        /// Block height
        height: u64,
    },

    /// Dollar value of a BTC amount at a block
    Usd {
        /// Block height
        height: u64,
        /// BTC amount
        btc: f64,
    },

    /// BTC value of a dollar amount at a block
    Btc {
        /// Block height
        height: u64,
        /// USD amount
        usd: f64,
    },

    /// Published height range
    Range,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blockprice={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(?config, "configuration loaded");

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Aggregate {
            timestamps,
            sources,
            data_dir,
            publish_lag,
            priced_height_floor,
            export_format,
        } => commands::aggregate::aggregate(
            &config,
            timestamps,
            &sources,
            data_dir,
            publish_lag,
            priced_height_floor,
            export_format,
            cli.quiet,
        ),
        Commands::Query { action } => commands::query::query(&config, &action),
        Commands::Download {
            exchanges,
            data_dir,
            yes,
        } => commands::download::download(&config, &exchanges, data_dir, yes, cli.quiet).await,
        Commands::SyncTimestamps {
            timestamps,
            data_dir,
        } => commands::sync::sync_timestamps(&config, timestamps, data_dir, cli.quiet).await,
        Commands::Info { data_dir } => commands::info::info(&config, data_dir),
    }
}
