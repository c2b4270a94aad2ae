//! Schema-aware in-memory storage.
//!
//! Rows are addressed by a per-type auto-increment row id, which is the
//! primary key handed back to the engine and stored under the record type's
//! primary key field. Atomic scopes are snapshots of every table:
//!
//! ```text
//! begin()    push clone of tables
//! commit()   pop snapshot, keep current tables
//! rollback() pop snapshot, restore it
//! ```

use crate::error::DumpError;
use chrono::Utc;
use seed_core::{
    FieldDescriptor, FieldKind, PrimaryKey, Record, RecordType, Schema, Storage, StorageError,
    Value,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Buffer size for JSON lines output.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

#[derive(Debug, Clone, Default)]
struct Table {
    next_id: PrimaryKey,
    rows: BTreeMap<PrimaryKey, Record>,
    links: BTreeMap<(PrimaryKey, String), BTreeSet<PrimaryKey>>,
}

/// In-memory [`Storage`] enforcing the schema's constraints.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    schema: Schema,
    tables: BTreeMap<String, Table>,
    snapshots: Vec<BTreeMap<String, Table>>,
    timestamps_disabled: HashSet<String>,
}

impl MemoryStore {
    /// Create an empty store with one table per record type.
    pub fn new(schema: &Schema) -> Self {
        let tables = schema
            .types
            .iter()
            .map(|t| (t.name.clone(), Table::default()))
            .collect();
        Self {
            schema: schema.clone(),
            tables,
            snapshots: Vec::new(),
            timestamps_disabled: HashSet::new(),
        }
    }

    /// Stored row by primary key.
    pub fn get(&self, record_type: &str, primary_key: PrimaryKey) -> Option<&Record> {
        self.tables.get(record_type)?.rows.get(&primary_key)
    }

    /// Stored rows of a type in primary key order.
    pub fn records(&self, record_type: &str) -> impl Iterator<Item = (PrimaryKey, &Record)> {
        self.tables
            .get(record_type)
            .into_iter()
            .flat_map(|table| table.rows.iter().map(|(pk, record)| (*pk, record)))
    }

    /// Number of stored rows of a type.
    pub fn count(&self, record_type: &str) -> usize {
        self.tables.get(record_type).map_or(0, |t| t.rows.len())
    }

    /// Link targets of a row through a many-to-many field.
    pub fn links(&self, record_type: &str, primary_key: PrimaryKey, field: &str) -> Vec<PrimaryKey> {
        self.tables
            .get(record_type)
            .and_then(|t| t.links.get(&(primary_key, field.to_string())))
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of open atomic scopes.
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    /// Write every stored row as one JSON object per line.
    ///
    /// Each line carries `type`, `id`, `fields` and, for types with
    /// many-to-many fields, `links`. Returns the number of rows written.
    pub fn write_jsonl<W: Write>(&self, writer: &mut W) -> Result<usize, DumpError> {
        let mut written = 0;
        for record_type in &self.schema.types {
            let Some(table) = self.tables.get(&record_type.name) else {
                continue;
            };
            let link_fields: Vec<&str> = record_type
                .fields
                .iter()
                .filter(|f| matches!(f.kind, FieldKind::ManyToMany { .. }))
                .map(|f| f.name.as_str())
                .collect();

            for (pk, record) in &table.rows {
                let mut line = serde_json::json!({
                    "type": record_type.name,
                    "id": pk,
                    "fields": record,
                });
                if !link_fields.is_empty() {
                    let links: BTreeMap<&str, Vec<PrimaryKey>> = link_fields
                        .iter()
                        .map(|field| (*field, self.links(&record_type.name, *pk, field)))
                        .collect();
                    line["links"] = serde_json::to_value(links)?;
                }
                serde_json::to_writer(&mut *writer, &line)?;
                writeln!(writer)?;
                written += 1;
            }
        }
        Ok(written)
    }

    /// Write every stored row to a JSON lines file.
    pub fn write_jsonl_file<P: AsRef<Path>>(&self, path: P) -> Result<usize, DumpError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let written = self.write_jsonl(&mut writer)?;
        writer.flush()?;
        info!("Wrote {} rows to '{}'", written, path.display());
        Ok(written)
    }

    fn record_type(&self, name: &str) -> Result<&RecordType, StorageError> {
        self.schema
            .get_type(name)
            .ok_or_else(|| StorageError::UnknownRecordType(name.to_string()))
    }

    fn table(&self, name: &str) -> Result<&Table, StorageError> {
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::UnknownRecordType(name.to_string()))
    }

    /// Fill defaults and timestamps, then check every column constraint.
    fn prepare(
        &self,
        record_type: &RecordType,
        primary_key: PrimaryKey,
        mut values: Record,
    ) -> Result<Record, StorageError> {
        if let Some(unknown) = values.keys().find(|k| record_type.get_field(k).is_none()) {
            return Err(StorageError::UnknownField {
                record_type: record_type.name.clone(),
                field: unknown.clone(),
            });
        }

        let stamp = !self.timestamps_disabled.contains(&record_type.name);
        let mut record = Record::new();
        for field in &record_type.fields {
            if matches!(field.kind, FieldKind::ManyToMany { .. }) {
                continue;
            }
            if field.is_primary_key() {
                let value = match values.remove(&field.name) {
                    Some(value) if !value.is_null() => {
                        self.check_unique(record_type, field, &value)?;
                        value
                    }
                    _ => Value::Int(primary_key),
                };
                record.insert(field.name.clone(), value);
                continue;
            }

            let mut value = values.remove(&field.name).unwrap_or(Value::Null);
            if stamp && field.is_auto_timestamp() {
                value = Value::DateTime(Utc::now());
            }
            if value.is_null() && !field.nullable {
                value = field
                    .default
                    .clone()
                    .ok_or_else(|| violation(record_type, field, "NOT NULL"))?;
            }
            if !value.is_null() {
                self.check_reference(record_type, field, &value)?;
                self.check_unique(record_type, field, &value)?;
            }
            record.insert(field.name.clone(), value);
        }
        Ok(record)
    }

    fn check_reference(
        &self,
        record_type: &RecordType,
        field: &FieldDescriptor,
        value: &Value,
    ) -> Result<(), StorageError> {
        let target = match &field.kind {
            FieldKind::ForeignKey { to } | FieldKind::OneToOne { to } => to,
            _ => return Ok(()),
        };
        let exists = value
            .as_i64()
            .is_some_and(|pk| self.tables.get(target).is_some_and(|t| t.rows.contains_key(&pk)));
        if exists {
            Ok(())
        } else {
            Err(violation(record_type, field, "FOREIGN KEY"))
        }
    }

    fn check_unique(
        &self,
        record_type: &RecordType,
        field: &FieldDescriptor,
        value: &Value,
    ) -> Result<(), StorageError> {
        if !field.enforces_uniqueness() {
            return Ok(());
        }
        let taken = self
            .table(&record_type.name)?
            .rows
            .values()
            .any(|row| row.get(&field.name) == Some(value));
        if taken {
            Err(violation(record_type, field, "UNIQUE"))
        } else {
            Ok(())
        }
    }
}

fn violation(record_type: &RecordType, field: &FieldDescriptor, constraint: &str) -> StorageError {
    StorageError::constraint(
        record_type.name.clone(),
        format!("{constraint} constraint failed: {}.{}", record_type.name, field.name),
    )
}

impl Storage for MemoryStore {
    fn create(&mut self, record_type: &str, values: Record) -> Result<PrimaryKey, StorageError> {
        let definition = self.record_type(record_type)?;
        let primary_key = self.table(record_type)?.next_id + 1;
        let record = self.prepare(definition, primary_key, values)?;

        let table = self
            .tables
            .get_mut(record_type)
            .ok_or_else(|| StorageError::UnknownRecordType(record_type.to_string()))?;
        table.next_id = primary_key;
        table.rows.insert(primary_key, record);
        debug!(record_type, primary_key, "Stored row");
        Ok(primary_key)
    }

    fn link(
        &mut self,
        record_type: &str,
        primary_key: PrimaryKey,
        field: &str,
        target: PrimaryKey,
    ) -> Result<(), StorageError> {
        let definition = self.record_type(record_type)?;
        let descriptor = definition
            .get_field(field)
            .ok_or_else(|| StorageError::UnknownField {
                record_type: record_type.to_string(),
                field: field.to_string(),
            })?;
        let FieldKind::ManyToMany { to } = &descriptor.kind else {
            return Err(StorageError::UnknownField {
                record_type: record_type.to_string(),
                field: field.to_string(),
            });
        };
        let target_exists = self.table(to)?.rows.contains_key(&target);
        let owner_exists = self.table(record_type)?.rows.contains_key(&primary_key);
        if !target_exists || !owner_exists {
            return Err(violation(definition, descriptor, "FOREIGN KEY"));
        }

        if let Some(table) = self.tables.get_mut(record_type) {
            table
                .links
                .entry((primary_key, field.to_string()))
                .or_default()
                .insert(target);
        }
        Ok(())
    }

    fn begin(&mut self) -> Result<(), StorageError> {
        self.snapshots.push(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.snapshots
            .pop()
            .map(|_| ())
            .ok_or_else(|| StorageError::Transaction("commit without an open scope".to_string()))
    }

    fn rollback(&mut self) -> Result<(), StorageError> {
        let snapshot = self.snapshots.pop().ok_or_else(|| {
            StorageError::Transaction("rollback without an open scope".to_string())
        })?;
        self.tables = snapshot;
        Ok(())
    }

    fn set_auto_timestamps(&mut self, record_type: &str, enabled: bool) {
        if enabled {
            self.timestamps_disabled.remove(record_type);
        } else {
            self.timestamps_disabled.insert(record_type.to_string());
        }
    }

    fn primary_keys(&self, record_type: &str) -> Vec<PrimaryKey> {
        self.tables
            .get(record_type)
            .map(|t| t.rows.keys().copied().collect())
            .unwrap_or_default()
    }
}
