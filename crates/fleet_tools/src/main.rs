//! Fleet Idle - Development Tools

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_core::error::Result;
use fleet_tools::{files, simulate, validate};

#[derive(Parser)]
#[command(name = "fleet-tools")]
#[command(about = "Development tools for Fleet Idle")]
struct Cli {
    /// Content registry (RON)
    #[arg(long, default_value = "assets/data/content.ron")]
    registry: PathBuf,

    /// Simulation config (RON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check saved fleets for unknown content
    Validate {
        /// Fleet files (RON)
        #[arg(required = true)]
        fleets: Vec<PathBuf>,
        /// Write repaired fleets back in place
        #[arg(long)]
        fix: bool,
    },
    /// Run a bounded battle and print the report as JSON
    Simulate {
        /// Left fleet (RON)
        left: PathBuf,
        /// Right fleet (RON)
        right: PathBuf,
        /// Battle step budget
        #[arg(long, default_value_t = 12_000)]
        max_ticks: u32,
    },
    /// Estimate a fleet's strength and print it as JSON
    Score {
        /// Fleet file (RON)
        fleet: PathBuf,
    },
}

fn run(cli: Cli) -> Result<bool> {
    let registry = Arc::new(files::load_registry(&cli.registry)?);
    let config = files::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { fleets, fix } => {
            let mut clean = true;
            for path in &fleets {
                tracing::info!("Validating fleet: {}", path.display());
                let report = validate::validate_fleet_file(path, &registry, fix)?;
                clean &= report.is_clean();
            }
            Ok(clean || fix)
        }
        Commands::Simulate {
            left,
            right,
            max_ticks,
        } => {
            let left = files::load_state(&left)?;
            let right = files::load_state(&right)?;
            let report = simulate::run_battle(&left, &right, registry, config, max_ticks)?;
            print_json(&report);
            Ok(true)
        }
        Commands::Score { fleet } => {
            let state = files::load_state(&fleet)?;
            let score = simulate::score(&state, registry, &config)?;
            print_json(&score);
            Ok(true)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to encode report: {e}"),
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!("Validation failed");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
