//! Error types for the seeding engine.

use seed_core::{FieldDescriptor, SchemaError, StorageError};
use thiserror::Error;

/// Errors that can occur while building formatters or executing orders.
///
/// Variants split into retryable ones, which an order absorbs up to its
/// attempt budget, and fatal ones, which abort the run. See
/// [`SeedError::is_retryable`].
#[derive(Debug, Error)]
pub enum SeedError {
    /// No classification rule matched the field.
    #[error("Unsupported field kind '{}' for field '{record_type}.{}'", .field.kind, .field.name)]
    UnsupportedFieldKind {
        /// Record type owning the field
        record_type: String,
        /// The field that could not be classified
        field: Box<FieldDescriptor>,
    },

    /// A required relationship has no eligible target record.
    #[error("Field '{record_type}.{field}' cannot reference '{target}': {reason}")]
    UnsatisfiableRelation {
        /// Record type owning the relation
        record_type: String,
        /// Relation field name
        field: String,
        /// Referenced record type
        target: String,
        /// Why no target could be chosen
        reason: String,
    },

    /// Every generated value for a unique field was already taken.
    #[error("No unused value found for unique field '{record_type}.{field}' after {attempts} attempts")]
    UniqueValuesExhausted {
        /// Record type owning the field
        record_type: String,
        /// Unique field name
        field: String,
        /// Generation attempts made
        attempts: usize,
    },

    /// Storage rejected the record.
    #[error("{0}")]
    ConstraintViolation(StorageError),

    /// `execute()` was called with no queued orders.
    #[error("No orders queued. Did you add record types to the seeder?")]
    NoEntities,

    /// The dependency graph between record types has a cycle.
    #[error("Cyclic dependency between record types: {}", .types.join(", "))]
    CyclicDependency {
        /// Record types that could not be ordered
        types: Vec<String>,
    },

    /// An order exhausted its attempt budget without inserting anything.
    #[error(
        "Seeding '{record_type}' failed: none of {requested} records inserted after {attempts} attempts (last error: {last_error})"
    )]
    SeedingFailed {
        /// Record type of the order
        record_type: String,
        /// Records requested by the order
        requested: usize,
        /// Attempts made
        attempts: usize,
        /// Last error observed
        last_error: Box<SeedError>,
    },

    /// Schema lookup failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Storage failed for a reason other than a constraint violation.
    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for SeedError {
    fn from(error: StorageError) -> Self {
        if error.is_constraint_violation() {
            Self::ConstraintViolation(error)
        } else {
            Self::Storage(error)
        }
    }
}

impl SeedError {
    /// Whether a failed attempt with this error may succeed when retried with
    /// freshly sampled values.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConstraintViolation(_)
                | Self::UnsatisfiableRelation { .. }
                | Self::UniqueValuesExhausted { .. }
        )
    }
}

/// Result type alias for seeding operations.
pub type SeedResult<T> = Result<T, SeedError>;
