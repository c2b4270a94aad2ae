//! Seeding engine for model-seed.
//!
//! Turns a [`Schema`](seed_core::Schema) and a list of orders into inserted
//! records:
//!
//! - [`classifier`] infers a [`Formatter`] per field from its descriptor
//! - [`relation`] resolves references against keys inserted so far
//! - [`RecordTypeSeeder`] builds, truncates and inserts one record
//! - [`Seeder`] queues orders and runs them with a retry budget inside
//!   atomic scopes
//! - [`toposort`] orders record types so dependencies are seeded first
//!
//! # Example
//!
//! ```rust,ignore
//! use seed_engine::{Overrides, Seeder};
//! use seed_generator::{GeneratorRegistry, Locale};
//!
//! let mut registry = GeneratorRegistry::new(Some(42));
//! let mut seeder = Seeder::new(&schema, &mut registry, Locale::En);
//! seeder.add_order("game", 5, Overrides::new())?;
//! seeder.add_order("player", 10, Overrides::new().value("score", Value::Int(0)))?;
//! let inserted = seeder.execute(&mut store)?;
//! ```

pub mod classifier;
pub mod error;
pub mod formatter;
pub mod inserted;
pub mod record;
pub mod relation;
pub mod seeder;
pub mod toposort;

pub use error::{SeedError, SeedResult};
pub use formatter::{FieldTracker, Formatter, FormatterContext, Override, OverrideFn, Overrides};
pub use inserted::InsertedEntities;
pub use record::{AttemptContext, RecordTypeSeeder};
pub use relation::{Arity, Relation};
pub use seeder::{OrderReport, SeedOptions, SeedReport, Seeder, SeederState};
