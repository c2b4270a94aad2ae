//! Schema definitions for the model-seed framework.
//!
//! A schema is a list of record types, each with named and typed fields. It is
//! loaded from YAML and is immutable once read; the seeding engine only ever
//! reads [`FieldDescriptor`]s from it.
//!
//! ```yaml
//! version: 1
//! seed: 42
//! locale: en
//! types:
//!   - name: game
//!     fields:
//!       - name: title
//!         type: string
//!         max_length: 200
//!   - name: player
//!     fields:
//!       - name: game
//!         type: { type: foreign_key, to: game }
//! ```

use crate::types::FieldKind;
use crate::values::Value;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Name of the implicit primary key field.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Record type not found in schema
    #[error("Record type not found: {0}")]
    RecordTypeNotFound(String),

    /// Field not found in record type
    #[error("Field '{field}' not found in record type '{record_type}'")]
    FieldNotFound { record_type: String, field: String },

    /// Reference field pointing at an undeclared record type
    #[error("Field '{record_type}.{field}' references unknown record type '{target}'")]
    UnknownReference {
        record_type: String,
        field: String,
        target: String,
    },

    /// Record type declared twice
    #[error("Record type declared more than once: {0}")]
    DuplicateRecordType(String),
}

// ============================================================================
// Field Descriptors
// ============================================================================

/// A view onto one field of a record type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDescriptor {
    /// Field name
    pub name: String,

    /// Declared kind
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Whether null is accepted
    #[serde(default)]
    pub nullable: bool,

    /// Whether an empty value is accepted (relations: no link required)
    #[serde(default)]
    pub blank: bool,

    /// Whether values must be unique across records
    #[serde(default)]
    pub unique: bool,

    /// Whether this field is the record's primary key
    #[serde(default)]
    pub primary_key: bool,

    /// Maximum length for string-like kinds
    #[serde(default)]
    pub max_length: Option<usize>,

    /// Declared default value
    #[serde(default, deserialize_with = "deserialize_optional_value")]
    pub default: Option<Value>,

    /// Allowed choice codes
    #[serde(default, deserialize_with = "deserialize_values")]
    pub choices: Vec<Value>,

    /// Set to the current time on every save
    #[serde(default)]
    pub auto_now: bool,

    /// Set to the current time when the record is created
    #[serde(default)]
    pub auto_now_add: bool,
}

fn deserialize_optional_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let yaml = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(yaml.map(|v| Value::from_yaml(&v)))
}

fn deserialize_values<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let yaml = Vec::<serde_yaml::Value>::deserialize(deserializer)?;
    Ok(yaml.iter().map(Value::from_yaml).collect())
}

impl FieldDescriptor {
    /// Create a non-nullable field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            blank: false,
            unique: false,
            primary_key: false,
            max_length: None,
            default: None,
            choices: Vec::new(),
            auto_now: false,
            auto_now_add: false,
        }
    }

    /// Mark the field nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the field blank-allowed.
    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Mark the field unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the field as the declared primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Set the maximum length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set the allowed choices.
    pub fn with_choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = choices;
        self
    }

    /// Whether this field is the record type's primary key.
    pub fn is_primary_key(&self) -> bool {
        self.primary_key || self.is_auto_primary_key()
    }

    /// Whether storage assigns this field's value on insert.
    pub fn is_auto_primary_key(&self) -> bool {
        self.kind == FieldKind::Auto
    }

    /// Whether a relationship through this field must resolve to a target.
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.blank
    }

    /// Whether storage must reject duplicate values of this field.
    pub fn enforces_uniqueness(&self) -> bool {
        self.unique || self.is_primary_key() || matches!(self.kind, FieldKind::OneToOne { .. })
    }

    /// Whether storage stamps this field with the current time.
    pub fn is_auto_timestamp(&self) -> bool {
        self.auto_now || self.auto_now_add
    }

    /// Enumerated values allowed for this field, from `choices` or an enum kind.
    pub fn allowed_values(&self) -> &[Value] {
        match &self.kind {
            FieldKind::Enum { values } if self.choices.is_empty() => values,
            _ => &self.choices,
        }
    }
}

// ============================================================================
// Record Types
// ============================================================================

/// A schema-defined entity with named, typed fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordType {
    /// Record type name
    pub name: String,

    /// Field definitions
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl RecordType {
    /// Create a record type. An `id` primary key is added if none is declared.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        let mut record_type = Self {
            name: name.into(),
            fields,
        };
        record_type.ensure_primary_key();
        record_type
    }

    fn ensure_primary_key(&mut self) {
        if !self.fields.iter().any(FieldDescriptor::is_primary_key) {
            let mut id = FieldDescriptor::new(DEFAULT_PRIMARY_KEY, FieldKind::Auto);
            id.primary_key = true;
            self.fields.insert(0, id);
        }
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Get the primary key field.
    pub fn primary_key(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.is_primary_key())
    }

    /// Get the primary key field name.
    pub fn primary_key_name(&self) -> &str {
        self.primary_key()
            .map(|f| f.name.as_str())
            .unwrap_or(DEFAULT_PRIMARY_KEY)
    }

    /// Get all field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Record types this type must be seeded after: targets of its required
    /// reference fields. A many-to-many field is required unless blank.
    pub fn required_dependencies(&self) -> BTreeSet<String> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .filter_map(|f| f.kind.target().map(str::to_string))
            .collect()
    }
}

// ============================================================================
// Schema
// ============================================================================

fn default_version() -> u32 {
    1
}

/// Full schema: the record types to seed plus generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Random seed for reproducible generation
    #[serde(default)]
    pub seed: Option<u64>,

    /// Locale for generated values
    #[serde(default)]
    pub locale: Option<String>,

    /// Record type definitions
    #[serde(default)]
    pub types: Vec<RecordType>,

    /// Cached type lookup (not serialized)
    #[serde(skip)]
    type_map: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema from record types.
    pub fn new(types: Vec<RecordType>) -> Result<Self, SchemaError> {
        let mut schema = Self {
            version: default_version(),
            seed: None,
            locale: None,
            types,
            type_map: HashMap::new(),
        };
        schema.finish()?;
        Ok(schema)
    }

    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: Schema = serde_yaml::from_str(yaml)?;
        schema.finish()?;
        Ok(schema)
    }

    fn finish(&mut self) -> Result<(), SchemaError> {
        for record_type in &mut self.types {
            record_type.ensure_primary_key();
        }
        self.build_type_map()?;
        self.validate_references()
    }

    /// Build the internal type lookup map.
    fn build_type_map(&mut self) -> Result<(), SchemaError> {
        self.type_map.clear();
        for (idx, record_type) in self.types.iter().enumerate() {
            if self.type_map.insert(record_type.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateRecordType(record_type.name.clone()));
            }
        }
        Ok(())
    }

    fn validate_references(&self) -> Result<(), SchemaError> {
        for record_type in &self.types {
            for field in &record_type.fields {
                if let Some(target) = field.kind.target() {
                    if !self.type_map.contains_key(target) {
                        return Err(SchemaError::UnknownReference {
                            record_type: record_type.name.clone(),
                            field: field.name.clone(),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Get a record type by name.
    pub fn get_type(&self, name: &str) -> Option<&RecordType> {
        self.type_map
            .get(name)
            .and_then(|&idx| self.types.get(idx))
    }

    /// Get a record type by name, failing if it is not declared.
    pub fn require_type(&self, name: &str) -> Result<&RecordType, SchemaError> {
        self.get_type(name)
            .ok_or_else(|| SchemaError::RecordTypeNotFound(name.to_string()))
    }

    /// Get a field of a specific record type.
    pub fn get_field(&self, record_type: &str, field: &str) -> Result<&FieldDescriptor, SchemaError> {
        self.require_type(record_type)?
            .get_field(field)
            .ok_or_else(|| SchemaError::FieldNotFound {
                record_type: record_type.to_string(),
                field: field.to_string(),
            })
    }

    /// Get all record type names in declaration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name.as_str()).collect()
    }

    /// Required dependencies of every record type, keyed by type name.
    pub fn dependency_graph(&self) -> HashMap<String, BTreeSet<String>> {
        self.types
            .iter()
            .map(|t| (t.name.clone(), t.required_dependencies()))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
