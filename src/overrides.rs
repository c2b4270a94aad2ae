//! Parsing of `--set type.field=value` assignments.

use anyhow::{anyhow, bail};
use seed_core::{Schema, Value};
use seed_engine::Overrides;
use std::collections::HashMap;

/// One parsed `type.field=value` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub record_type: String,
    pub field: String,
    pub value: Value,
}

/// Parse `type.field=value`.
///
/// The value is read as a YAML scalar, so `42` is an integer, `true` a
/// boolean and `null` a null. Anything YAML rejects is kept as a string.
pub fn parse_assignment(raw: &str) -> anyhow::Result<Assignment> {
    let (target, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid override '{raw}': expected type.field=value"))?;
    let (record_type, field) = target
        .split_once('.')
        .ok_or_else(|| anyhow!("Invalid override '{raw}': expected type.field=value"))?;
    if record_type.is_empty() || field.is_empty() {
        bail!("Invalid override '{raw}': type and field must not be empty");
    }

    let value = match serde_yaml::from_str::<serde_yaml::Value>(value) {
        Ok(yaml) => Value::from_yaml(&yaml),
        Err(_) => Value::String(value.to_string()),
    };
    Ok(Assignment {
        record_type: record_type.to_string(),
        field: field.to_string(),
        value,
    })
}

/// Group assignments into per-type overrides, checking them against the schema.
pub fn collect_overrides(
    schema: &Schema,
    raw: &[String],
) -> anyhow::Result<HashMap<String, Overrides>> {
    let mut grouped: HashMap<String, Overrides> = HashMap::new();
    for assignment in raw.iter().map(|r| parse_assignment(r)) {
        let assignment = assignment?;
        schema.get_field(&assignment.record_type, &assignment.field)?;
        let overrides = grouped.remove(&assignment.record_type).unwrap_or_default();
        grouped.insert(
            assignment.record_type,
            overrides.value(assignment.field, assignment.value),
        );
    }
    Ok(grouped)
}
