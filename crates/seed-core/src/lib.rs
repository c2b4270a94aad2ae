//! Core types for the model-seed framework.
//!
//! This crate provides the foundational types shared by the seeding engine,
//! the value generator and the storage backends:
//!
//! - [`Schema`] - Record type definitions loaded from YAML
//! - [`FieldKind`] - Closed set of field kinds the engine understands
//! - [`Value`] - Values produced by formatters and handed to storage
//! - [`Storage`] - The persistence collaborator the engine writes through
//!
//! # Architecture
//!
//! ```text
//! seed-core (this crate)
//!    │
//!    ├─── seed-generator     (produces Values per semantic category)
//!    ├─── seed-engine        (classifies fields, orders and executes inserts)
//!    └─── seed-store-memory  (implements Storage)
//! ```
//!
//! # Example
//!
//! ```rust
//! use seed_core::{FieldKind, Schema};
//!
//! let schema = Schema::from_yaml(r#"
//! types:
//!   - name: game
//!     fields:
//!       - name: title
//!         type: string
//!         max_length: 200
//! "#).unwrap();
//!
//! let game = schema.get_type("game").unwrap();
//! assert_eq!(game.get_field("title").unwrap().kind, FieldKind::String);
//! ```

pub mod schema;
pub mod storage;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use schema::{FieldDescriptor, RecordType, Schema, SchemaError};
pub use storage::{run_in_atomic_scope, PrimaryKey, Record, Storage, StorageError};
pub use types::{FieldKind, IntegerWidth, IpProtocol};
pub use values::Value;
