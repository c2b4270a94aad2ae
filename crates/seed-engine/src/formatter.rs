//! Per-field value producers and caller overrides.
//!
//! Every non primary-key field of a queued record type gets exactly one
//! [`Formatter`]. Formatters are resolved once when the order is queued and
//! evaluated once per insert attempt against the primary keys inserted so
//! far in the run.
//!
//! ```text
//! Override ──┐
//! Default ───┼──► Formatter ──evaluate(ctx)──► Value ──► Record ──► Storage
//! Classifier ┘        │
//!                     └── FieldTracker (unique values, staged per attempt)
//! ```

use crate::error::{SeedError, SeedResult};
use crate::inserted::InsertedEntities;
use crate::relation::Relation;
use rand::seq::IndexedRandom;
use rand::Rng;
use seed_core::{FieldDescriptor, Value};
use seed_generator::{Category, Faker};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Caller supplied function computing a field value from the keys inserted
/// so far.
pub type OverrideFn = Box<dyn Fn(&InsertedEntities) -> Value>;

/// A caller override for one field.
pub enum Override {
    /// Use this value for every record
    Value(Value),
    /// Compute the value per record
    Function(OverrideFn),
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl From<Override> for Formatter {
    fn from(value: Override) -> Self {
        match value {
            Override::Value(value) => Formatter::Constant(value),
            Override::Function(f) => Formatter::Custom(f),
        }
    }
}

/// Field overrides for one order, applied in place of inferred formatters.
#[derive(Debug, Default)]
pub struct Overrides {
    entries: Vec<(String, Override)>,
}

impl Overrides {
    /// Create an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a constant value for a field.
    pub fn value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, Override::Value(value.into()));
        self
    }

    /// Compute a field from the keys inserted so far.
    pub fn function<F>(mut self, field: impl Into<String>, f: F) -> Self
    where
        F: Fn(&InsertedEntities) -> Value + 'static,
    {
        self.insert(field, Override::Function(Box::new(f)));
        self
    }

    /// Add or replace the override for a field.
    pub fn insert(&mut self, field: impl Into<String>, value: Override) {
        let field = field.into();
        self.entries.retain(|(name, _)| *name != field);
        self.entries.push((field, value));
    }

    /// Remove and return the override for a field.
    pub fn take(&mut self, field: &str) -> Option<Override> {
        let position = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(position).1)
    }

    /// Overridden field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of overridden fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values already used by unique fields and one-to-one relations.
///
/// Values chosen during an insert attempt are staged and only become
/// permanent when the attempt commits, so a rolled back record does not
/// consume its values.
#[derive(Debug, Default)]
pub struct FieldTracker {
    committed: HashMap<String, HashSet<String>>,
    staged: Vec<(String, String)>,
}

impl FieldTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value is taken for a field, committed or staged.
    pub fn is_used(&self, field: &str, key: &str) -> bool {
        self.committed
            .get(field)
            .is_some_and(|used| used.contains(key))
            || self.staged.iter().any(|(f, k)| f == field && k == key)
    }

    /// Reserve a value for the current attempt.
    pub fn stage(&mut self, field: &str, key: String) {
        self.staged.push((field.to_string(), key));
    }

    /// Mark a value as used outside of any attempt.
    pub fn reserve(&mut self, field: &str, key: String) {
        self.committed
            .entry(field.to_string())
            .or_default()
            .insert(key);
    }

    /// Make the current attempt's values permanent.
    pub fn commit(&mut self) {
        for (field, key) in self.staged.drain(..) {
            self.committed.entry(field).or_default().insert(key);
        }
    }

    /// Release the current attempt's values.
    pub fn discard(&mut self) {
        self.staged.clear();
    }
}

/// State a formatter reads and updates while producing one value.
pub struct FormatterContext<'a> {
    /// Record type being seeded
    pub record_type: &'a str,
    /// Primary keys inserted so far in this run
    pub inserted: &'a InsertedEntities,
    /// Pre-existing primary keys used when nothing was inserted yet
    pub existing: Option<&'a InsertedEntities>,
    /// Value source
    pub faker: &'a mut Faker,
    /// Unique value bookkeeping for the record type
    pub tracker: &'a mut FieldTracker,
    /// Generation attempts per unique value
    pub unique_attempts: usize,
}

/// How one field's value is produced.
pub enum Formatter {
    /// The same value for every record
    Constant(Value),
    /// Caller function over the inserted keys
    Custom(OverrideFn),
    /// Uniform pick from enumerated values
    Choice(Vec<Value>),
    /// Value from a semantic category
    Generate {
        /// Category to draw from
        category: Category,
        /// Retry until the value is unused for this field
        unique: bool,
    },
    /// Array of generated elements with a random length
    Array {
        /// Element category
        element: Category,
        /// Minimum length (inclusive)
        min_length: usize,
        /// Maximum length (inclusive)
        max_length: usize,
    },
    /// Reference to records of another type
    Relation(Relation),
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Choice(values) => f.debug_tuple("Choice").field(values).finish(),
            Self::Generate { category, unique } => f
                .debug_struct("Generate")
                .field("category", category)
                .field("unique", unique)
                .finish(),
            Self::Array {
                element,
                min_length,
                max_length,
            } => f
                .debug_struct("Array")
                .field("element", element)
                .field("min_length", min_length)
                .field("max_length", max_length)
                .finish(),
            Self::Relation(relation) => f.debug_tuple("Relation").field(relation).finish(),
        }
    }
}

impl Formatter {
    /// Produce a value for `field`.
    pub fn evaluate(
        &self,
        field: &FieldDescriptor,
        ctx: &mut FormatterContext<'_>,
    ) -> SeedResult<Value> {
        match self {
            Self::Constant(value) => Ok(value.clone()),
            Self::Custom(f) => Ok(f(ctx.inserted)),
            Self::Choice(values) => Ok(values
                .choose(ctx.faker.rng())
                .cloned()
                .unwrap_or(Value::Null)),
            Self::Generate { category, unique } => {
                if *unique {
                    generate_unique(category, field, ctx)
                } else {
                    Ok(ctx.faker.generate(category))
                }
            }
            Self::Array {
                element,
                min_length,
                max_length,
            } => {
                let len = ctx.faker.rng().random_range(*min_length..=*max_length);
                let values = (0..len).map(|_| ctx.faker.generate(element)).collect();
                Ok(Value::Array(values))
            }
            Self::Relation(relation) => relation.resolve(field, ctx),
        }
    }
}

/// Draw until the value, cut to the field's max length, is unused.
fn generate_unique(
    category: &Category,
    field: &FieldDescriptor,
    ctx: &mut FormatterContext<'_>,
) -> SeedResult<Value> {
    for _ in 0..ctx.unique_attempts {
        let mut value = ctx.faker.generate(category);
        if let Some(max_length) = field.max_length {
            value = value.truncated(max_length);
        }
        if value.is_null() {
            return Ok(value);
        }
        let key = value.to_string();
        if !ctx.tracker.is_used(&field.name, &key) {
            ctx.tracker.stage(&field.name, key);
            return Ok(value);
        }
    }
    Err(SeedError::UniqueValuesExhausted {
        record_type: ctx.record_type.to_string(),
        field: field.name.clone(),
        attempts: ctx.unique_attempts,
    })
}
