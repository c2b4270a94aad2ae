//! The storage collaborator the seeding engine writes through.
//!
//! A backend provides atomic record creation that reports constraint
//! violations distinctly, many-to-many linking, scoped transactions, and a
//! query for primary keys that already exist.

use crate::values::Value;
use std::collections::BTreeMap;

/// Primary key assigned by storage on insert.
pub type PrimaryKey = i64;

/// Field values for one record, keyed by field name.
pub type Record = BTreeMap<String, Value>;

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// Uniqueness, NOT NULL or foreign key violation. Retrying with other
    /// values may succeed.
    #[error("Constraint violation on '{record_type}': {message}")]
    ConstraintViolation {
        record_type: String,
        message: String,
    },

    /// Record type unknown to the backend
    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    /// Field unknown to the record type
    #[error("Unknown field '{field}' on record type '{record_type}'")]
    UnknownField { record_type: String, field: String },

    /// Transaction misuse or backend failure
    #[error("Transaction error: {0}")]
    Transaction(String),
}

impl StorageError {
    /// Create a constraint violation for a record type.
    pub fn constraint(record_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            record_type: record_type.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

/// Persistence backend used by the seeding engine.
pub trait Storage {
    /// Insert one record and return its primary key.
    fn create(&mut self, record_type: &str, values: Record) -> Result<PrimaryKey, StorageError>;

    /// Associate a record with a target through a many-to-many field.
    fn link(
        &mut self,
        record_type: &str,
        primary_key: PrimaryKey,
        field: &str,
        target: PrimaryKey,
    ) -> Result<(), StorageError>;

    /// Open an atomic scope. Scopes may nest.
    fn begin(&mut self) -> Result<(), StorageError>;

    /// Commit the innermost atomic scope.
    fn commit(&mut self) -> Result<(), StorageError>;

    /// Discard everything written since the innermost scope was opened.
    fn rollback(&mut self) -> Result<(), StorageError>;

    /// Enable or disable automatic create/update timestamps for a record type.
    fn set_auto_timestamps(&mut self, _record_type: &str, _enabled: bool) {}

    /// Primary keys of every stored record of a type.
    fn primary_keys(&self, record_type: &str) -> Vec<PrimaryKey>;
}

/// Run `f` inside an atomic scope: commit on `Ok`, roll back on `Err`.
pub fn run_in_atomic_scope<S, T, E, F>(storage: &mut S, f: F) -> Result<T, E>
where
    S: Storage + ?Sized,
    E: From<StorageError>,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    storage.begin()?;
    match f(storage) {
        Ok(value) => {
            storage.commit()?;
            Ok(value)
        }
        Err(e) => {
            storage.rollback()?;
            Err(e)
        }
    }
}
