//! In-memory storage backend for model-seed.
//!
//! [`MemoryStore`] implements [`seed_core::Storage`] over a schema and
//! enforces the constraints a relational backend would: NOT NULL, UNIQUE and
//! FOREIGN KEY. Rejected inserts surface as constraint violations so the
//! seeding engine can retry them. Stored rows can be dumped as JSON lines.

pub mod error;
pub mod store;

pub use error::DumpError;
pub use store::MemoryStore;
