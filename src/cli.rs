//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "model-seed")]
#[command(about = "Seed schema-described record types with realistic fake data")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate records for every selected record type, dependencies first
    Seed(SeedArgs),

    /// Print the dependency-sorted insertion order
    Plan(PlanArgs),
}

/// Arguments for `model-seed seed`.
#[derive(Args, Clone, Debug)]
pub struct SeedArgs {
    /// Path to schema YAML file
    #[arg(long, short = 's', env = "MODEL_SEED_SCHEMA")]
    pub schema: PathBuf,

    /// Number of records to generate per record type
    #[arg(long, short = 'n', default_value = "10", env = "MODEL_SEED_NUMBER")]
    pub number: usize,

    /// Random seed for deterministic generation (defaults to the schema's seed)
    #[arg(long, env = "MODEL_SEED_SEED")]
    pub seed: Option<u64>,

    /// Locale for generated values, e.g. en_US or fr_FR (defaults to the schema's locale)
    #[arg(long, env = "MODEL_SEED_LOCALE")]
    pub locale: Option<String>,

    /// Record types to seed (comma-separated, empty = all types from schema)
    #[arg(long, value_delimiter = ',', env = "MODEL_SEED_TYPES")]
    pub types: Vec<String>,

    /// Field override in the form type.field=value (repeatable)
    #[arg(long = "set", value_name = "TYPE.FIELD=VALUE")]
    pub overrides: Vec<String>,

    /// Write every stored row to this JSON lines file
    #[arg(long, short = 'o', env = "MODEL_SEED_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Resolve formatters and stop before inserting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Fall back to already stored records for references
    #[arg(long)]
    pub reuse_existing: bool,
}

/// Arguments for `model-seed plan`.
#[derive(Args, Clone, Debug)]
pub struct PlanArgs {
    /// Path to schema YAML file
    #[arg(long, short = 's', env = "MODEL_SEED_SCHEMA")]
    pub schema: PathBuf,

    /// Record types to plan (comma-separated, empty = all types from schema)
    #[arg(long, value_delimiter = ',', env = "MODEL_SEED_TYPES")]
    pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_command() {
        let cli = Cli::try_parse_from([
            "model-seed",
            "seed",
            "--schema",
            "schema.yaml",
            "--number",
            "5",
            "--types",
            "game,player",
            "--set",
            "game.title=Halo",
            "--set",
            "player.score=0",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Seed(args) => {
                assert_eq!(args.schema, PathBuf::from("schema.yaml"));
                assert_eq!(args.number, 5);
                assert_eq!(args.types, vec!["game", "player"]);
                assert_eq!(args.overrides, vec!["game.title=Halo", "player.score=0"]);
                assert!(args.dry_run);
                assert!(args.seed.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_plan_command() {
        let cli = Cli::try_parse_from(["model-seed", "plan", "-s", "schema.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan(args) if args.types.is_empty()));
    }
}
