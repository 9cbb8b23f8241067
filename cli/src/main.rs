//! DAO Fatigue CLI
//!
//! Delegate fatigue analysis over a cached governance snapshot.
//!
//! # Usage
//!
//! ```bash
//! dao-fatigue --input data/cache/snapshot_data.json analyze --top 20
//! dao-fatigue --input snapshot.json --reference-time 2024-06-01T00:00:00Z delegate 0xabc...
//! dao-fatigue --input snapshot.json targets --min-vp 50000 --format json
//! dao-fatigue config init
//! ```

use anyhow::{anyhow, Context as _};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use fatigue_behavioral::TargetCriteria;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;
mod snapshot;

#[derive(Parser)]
#[command(name = "dao-fatigue")]
#[command(version)]
#[command(about = "Delegate fatigue analysis for DAO governance", long_about = None)]
struct Cli {
    /// Cached snapshot document (JSON)
    #[arg(long, short, env = "DAO_FATIGUE_INPUT", global = true)]
    input: Option<PathBuf>,

    /// Governance space name, overrides the document's
    #[arg(long, global = true)]
    space: Option<String>,

    /// Analyze as of this instant (RFC 3339) instead of now
    #[arg(long, env = "DAO_FATIGUE_REFERENCE_TIME", global = true)]
    reference_time: Option<DateTime<Utc>>,

    /// Primary participation window in days
    #[arg(long, global = true)]
    window_days: Option<i64>,

    /// Composite at or above which a delegate is at risk
    #[arg(long, global = true)]
    at_risk_threshold: Option<f64>,

    /// Output format
    #[arg(long, short, global = true)]
    format: Option<output::OutputFormat>,

    /// Config file, instead of ~/.dao-fatigue/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Profile name from config directory
    #[arg(long, short, global = true)]
    profile: Option<String>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// DAO health summary and fatigue ranking
    Analyze {
        /// Ranking rows to show in table output
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Include every delegate report in JSON/YAML output
        #[arg(long)]
        full: bool,
    },
    /// Report for a single delegate
    Delegate { id: String },
    /// Fatigued delegates with high voting power
    Targets {
        /// Minimum average voting power
        #[arg(long)]
        min_vp: Option<f64>,
        /// Fatigue score the delegate must exceed
        #[arg(long)]
        min_fatigue: Option<f64>,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init,
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = config::Config::load(cli.config.as_deref(), cli.profile.as_deref())?;

    if let Commands::Config { action } = cli.command {
        return commands::config::handle(action, &config, cli.profile.as_deref());
    }

    if let Some(window_days) = cli.window_days {
        config.engine.window_days = window_days;
    }
    if let Some(threshold) = cli.at_risk_threshold {
        config.engine.at_risk_threshold = threshold;
    }

    let format = match (cli.format, config.default_format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => name
            .parse()
            .map_err(|e| anyhow!("default_format in config: {}", e))?,
        (None, None) => output::OutputFormat::Table,
    };

    let input = cli
        .input
        .or(config.input)
        .context("no snapshot given: pass --input or set DAO_FATIGUE_INPUT")?;

    let ctx = commands::Context {
        input,
        space: cli.space.or(config.space),
        reference_time: cli.reference_time.unwrap_or_else(Utc::now),
        engine: config.engine,
    };

    match cli.command {
        Commands::Analyze { top, full } => commands::analyze::handle(&ctx, top, full, format),
        Commands::Delegate { id } => commands::delegate::handle(&ctx, &id, format),
        Commands::Targets { min_vp, min_fatigue } => {
            let criteria = TargetCriteria {
                min_voting_power: min_vp.unwrap_or(config.targets.min_voting_power),
                min_fatigue: min_fatigue.unwrap_or(config.targets.min_fatigue),
            };
            commands::targets::handle(&ctx, criteria, format)
        }
        Commands::Config { .. } => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
