//! settleforge - Command Line Operations for Settlement-Instruction Synthesis
//!
//! This is the operational entry point for the SettleForge pipeline.
//!
//! # Commands
//!
//! - `settleforge calibrate` - Distil regulatory disclosures into the
//!   calibration snapshot
//! - `settleforge generate` - Synthesise an instruction batch from the
//!   snapshot
//! - `settleforge check` - Validate configuration and data paths
//!
//! # Architecture
//!
//! As the **S**ervice layer of the A-F-S architecture, this crate
//! orchestrates the adapter, calibration, market, engine and sink layers
//! behind a unified command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use config::{OutputFormat, RunConfig, DEFAULT_CONFIG_PATH};
pub use error::{CliError, Result};

/// SettleForge settlement-instruction synthesiser CLI
#[derive(Parser)]
#[command(name = "settleforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Distil regulatory disclosures into the calibration snapshot
    Calibrate {
        /// Directory of equity fails-to-deliver files
        #[arg(long)]
        equity_dir: Option<PathBuf>,

        /// Bond trading-volume report
        #[arg(long)]
        bond_file: Option<PathBuf>,

        /// Market regime (optimal, normal, stressed, crisis)
        #[arg(short, long)]
        regime: Option<String>,

        /// Snapshot output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Synthesise an instruction batch from the snapshot
    Generate {
        /// Calibration snapshot path
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Reproducibility seed
        #[arg(long)]
        seed: Option<u64>,

        /// Trades per business day
        #[arg(short, long)]
        trades: Option<usize>,

        /// Business days in the batch
        #[arg(short, long)]
        days: Option<usize>,

        /// Output format (json, csv)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Batch output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the live volatility fetch
        #[arg(long)]
        offline: bool,
    },

    /// Validate configuration and data paths
    Check,
}

fn main() -> Result<()> {
    // Initialise tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mut config = RunConfig::load_or_default(&cli.config)?.with_env_override();

    match cli.command {
        Commands::Calibrate {
            equity_dir,
            bond_file,
            regime,
            output,
        } => {
            if let Some(dir) = equity_dir {
                config.calibration.equity_dir = dir;
            }
            if let Some(file) = bond_file {
                config.calibration.bond_file = file;
            }
            if let Some(regime) = regime {
                config.calibration.regime = regime;
            }
            if let Some(path) = output {
                config.snapshot_path = path;
            }
            config.validate()?;
            commands::calibrate::run(&config)
        }
        Commands::Generate {
            snapshot,
            seed,
            trades,
            days,
            format,
            output,
            offline,
        } => {
            if let Some(path) = snapshot {
                config.snapshot_path = path;
            }
            if seed.is_some() {
                config.synthesis.seed = seed;
            }
            if let Some(trades) = trades {
                config.synthesis.trades_per_day = trades;
            }
            if let Some(days) = days {
                config.synthesis.business_days = days;
            }
            if let Some(format) = format {
                config.output.format = format;
            }
            if let Some(path) = output {
                config.output.path = path;
            }
            if offline {
                config.synthesis.offline = true;
            }
            config.validate()?;
            commands::generate::run(&config)
        }
        Commands::Check => commands::check::run(&config),
    }
}
