//! Command-line interface for model-seed
//!
//! # Usage Examples
//!
//! ```bash
//! # Seed 10 records of every record type with a fixed seed
//! model-seed seed --schema schema.yaml --seed 42
//!
//! # French data, only players and their dependencies
//! model-seed seed --schema schema.yaml --locale fr_FR --types player
//!
//! # Check formatter inference without inserting
//! model-seed seed --schema schema.yaml --dry-run
//!
//! # Print the insertion order
//! model-seed plan --schema schema.yaml
//! ```

use clap::Parser;
use model_seed::{run_plan, run_seed, Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Seed(args) => {
            run_seed(&args, &mut out)?;
        }
        Commands::Plan(args) => {
            run_plan(&args, &mut out)?;
        }
    }
    Ok(())
}
