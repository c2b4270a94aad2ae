//! model-seed library
//!
//! Seeds the record types described by a YAML schema with realistic fake
//! data, inserting them in dependency order so every required reference
//! points at an already inserted record.
//!
//! # Crates
//!
//! - `seed_core` - schema, value and storage types
//! - `seed_generator` - locale-aware fake values
//! - `seed_engine` - formatter inference, ordering and insertion
//! - `seed_store_memory` - constraint-checking in-memory backend
//!
//! # CLI Usage
//!
//! ```bash
//! # Seed 20 records of every type and dump them as JSON lines
//! model-seed seed --schema schema.yaml --number 20 --output rows.jsonl
//!
//! # Fix a field and restrict the types
//! model-seed seed --schema schema.yaml --types game,player --set game.title=Halo
//!
//! # Show the insertion order
//! model-seed plan --schema schema.yaml
//! ```

pub mod cli;
pub mod commands;
pub mod overrides;

pub use cli::{Cli, Commands, PlanArgs, SeedArgs};
pub use commands::{run_plan, run_seed, SeedOutcome};
