//! Primary keys produced by one seeding run.

use seed_core::PrimaryKey;
use std::collections::HashMap;

/// Ordered map from record type name to the primary keys inserted for it.
///
/// Record types appear in the order they were first seeded. Keys within a
/// type keep their insertion order, so two orders for the same type append
/// to one list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertedEntities {
    entries: Vec<(String, Vec<PrimaryKey>)>,
    index: HashMap<String, usize>,
}

impl InsertedEntities {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type without adding keys.
    pub fn ensure(&mut self, record_type: &str) {
        self.slot(record_type);
    }

    /// Append a primary key to a record type's list.
    pub fn push(&mut self, record_type: &str, primary_key: PrimaryKey) {
        self.slot(record_type).push(primary_key);
    }

    /// Append several primary keys to a record type's list.
    pub fn extend(&mut self, record_type: &str, primary_keys: impl IntoIterator<Item = PrimaryKey>) {
        self.slot(record_type).extend(primary_keys);
    }

    fn slot(&mut self, record_type: &str) -> &mut Vec<PrimaryKey> {
        let position = match self.index.get(record_type) {
            Some(&position) => position,
            None => {
                self.entries.push((record_type.to_string(), Vec::new()));
                self.index
                    .insert(record_type.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[position].1
    }

    /// Primary keys inserted for a record type. Empty if none.
    pub fn get(&self, record_type: &str) -> &[PrimaryKey] {
        self.index
            .get(record_type)
            .map(|&position| self.entries[position].1.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the record type was seeded at all in this run.
    pub fn contains(&self, record_type: &str) -> bool {
        self.index.contains_key(record_type)
    }

    /// Record type names in first-seeded order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate `(record type, primary keys)` pairs in first-seeded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PrimaryKey])> {
        self.entries
            .iter()
            .map(|(name, keys)| (name.as_str(), keys.as_slice()))
    }

    /// Total number of primary keys across all record types.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, keys)| keys.len()).sum()
    }

    /// Whether no record type has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
