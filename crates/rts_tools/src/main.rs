//! RTS AI - Development Tools

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rts_ai::config::AgentConfig;
use rts_tools::scenario::{run_plan, GridScenario};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rts-tools")]
#[command(about = "Development tools for the RTS controllers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a path through a grid scenario
    Plan {
        /// Path to a scenario RON file
        #[arg(long)]
        map: PathBuf,
        /// Print the result as JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
    /// Load and validate a controller config
    CheckConfig {
        /// Path to a config RON file
        path: PathBuf,
    },
}

fn plan(map: &Path, json: bool) -> rts_tools::Result<()> {
    let scenario = GridScenario::load(map)?;
    let report = run_plan(&scenario)?;
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render(&scenario));
        println!("steps: {}  cost: {}", report.steps, report.cost);
    }
    Ok(())
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { map, json } => {
            tracing::info!("Planning: {}", map.display());
            match plan(&map, json) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("Planning failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::CheckConfig { path } => {
            tracing::info!("Checking config: {}", path.display());
            match AgentConfig::load(&path) {
                Ok(config) => {
                    tracing::info!(
                        goals = config.economy.build_order.len(),
                        "Config is valid"
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("Config check failed: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
