//! Insertion of single records of one type.

use crate::classifier::classify;
use crate::error::{SeedError, SeedResult};
use crate::formatter::{FieldTracker, Formatter, FormatterContext, Overrides};
use crate::inserted::InsertedEntities;
use crate::relation::{Arity, Relation};
use seed_core::{FieldDescriptor, PrimaryKey, Record, RecordType, SchemaError, Storage, Value};
use seed_generator::Faker;
use tracing::debug;

/// Inputs shared by every attempt of an order.
pub struct AttemptContext<'a> {
    /// Primary keys inserted so far in this run
    pub inserted: &'a InsertedEntities,
    /// Pre-existing primary keys used when nothing was inserted yet
    pub existing: Option<&'a InsertedEntities>,
    /// Value source
    pub faker: &'a mut Faker,
    /// Generation attempts per unique value
    pub unique_attempts: usize,
}

/// Builds and inserts records of one type from resolved formatters.
#[derive(Debug)]
pub struct RecordTypeSeeder {
    record_type: RecordType,
    /// Column formatters in declaration order
    formatters: Vec<(FieldDescriptor, Formatter)>,
    /// Many-to-many formatters, applied after the record exists
    links: Vec<(FieldDescriptor, Formatter)>,
    tracker: FieldTracker,
}

impl RecordTypeSeeder {
    /// Resolve a formatter for every field of `record_type`.
    ///
    /// Overrides take precedence over inference. Overriding a field the
    /// record type does not declare is an error.
    pub fn new(
        record_type: &RecordType,
        mut overrides: Overrides,
        faker: &mut Faker,
    ) -> SeedResult<Self> {
        if let Some(unknown) = overrides
            .fields()
            .find(|field| record_type.get_field(field).is_none())
        {
            return Err(SchemaError::FieldNotFound {
                record_type: record_type.name.clone(),
                field: unknown.to_string(),
            }
            .into());
        }

        let mut formatters = Vec::new();
        let mut links = Vec::new();
        let mut tracker = FieldTracker::new();

        for field in &record_type.fields {
            let formatter = match overrides.take(&field.name) {
                Some(value) => Formatter::from(value),
                None => match classify(&record_type.name, field, faker)? {
                    Some(formatter) => formatter,
                    None => continue,
                },
            };

            if field.unique {
                if let Some(default) = &field.default {
                    tracker.reserve(&field.name, default.to_string());
                }
            }

            if matches!(field.kind, seed_core::FieldKind::ManyToMany { .. }) {
                links.push((field.clone(), formatter));
            } else {
                formatters.push((field.clone(), formatter));
            }
        }

        debug!(
            record_type = %record_type.name,
            fields = formatters.len(),
            links = links.len(),
            "Resolved formatters"
        );

        Ok(Self {
            record_type: record_type.clone(),
            formatters,
            links,
            tracker,
        })
    }

    /// Record type name.
    pub fn record_type(&self) -> &str {
        &self.record_type.name
    }

    /// Formatter resolved for a field, if any.
    pub fn formatter(&self, field: &str) -> Option<&Formatter> {
        self.formatters
            .iter()
            .chain(self.links.iter())
            .find(|(descriptor, _)| descriptor.name == field)
            .map(|(_, formatter)| formatter)
    }

    /// Build one record, insert it and apply its many-to-many links.
    ///
    /// Automatic timestamps are disabled around the insert so generated and
    /// overridden timestamp values are stored as given. Values chosen for
    /// unique fields stay staged until [`commit_attempt`](Self::commit_attempt).
    pub fn execute<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
        attempt: AttemptContext<'_>,
    ) -> SeedResult<PrimaryKey> {
        let mut ctx = FormatterContext {
            record_type: &self.record_type.name,
            inserted: attempt.inserted,
            existing: attempt.existing,
            faker: attempt.faker,
            tracker: &mut self.tracker,
            unique_attempts: attempt.unique_attempts,
        };

        let mut record = Record::new();
        for (field, formatter) in &self.formatters {
            let mut value = formatter.evaluate(field, &mut ctx)?;
            if let Some(max_length) = field.max_length {
                value = value.truncated(max_length);
            }
            record.insert(field.name.clone(), value);
        }

        let mut links = Vec::new();
        for (field, formatter) in &self.links {
            let targets = match formatter {
                Formatter::Relation(relation) => relation.resolve_links(field, &mut ctx)?,
                other => link_targets(&self.record_type.name, field, other.evaluate(field, &mut ctx)?)?,
            };
            links.push((field.name.as_str(), targets));
        }

        let name = self.record_type.name.as_str();
        storage.set_auto_timestamps(name, false);
        let created = storage.create(name, record);
        storage.set_auto_timestamps(name, true);
        let primary_key = created?;

        for (field, targets) in links {
            for target in targets {
                storage.link(name, primary_key, field, target)?;
            }
        }

        Ok(primary_key)
    }

    /// Keep the unique values chosen by the last attempt.
    pub fn commit_attempt(&mut self) {
        self.tracker.commit();
    }

    /// Release the unique values chosen by the last attempt.
    pub fn discard_attempt(&mut self) {
        self.tracker.discard();
    }

    /// Referenced record types of foreign key and one-to-one formatters.
    pub fn relation_targets(&self) -> impl Iterator<Item = &str> {
        self.formatters
            .iter()
            .filter_map(|(_, formatter)| match formatter {
                Formatter::Relation(Relation { target, arity, .. })
                    if *arity != Arity::ManyToMany =>
                {
                    Some(target.as_str())
                }
                _ => None,
            })
    }
}

/// Primary keys from an overridden many-to-many value.
fn link_targets(record_type: &str, field: &FieldDescriptor, value: Value) -> SeedResult<Vec<PrimaryKey>> {
    let invalid = || SeedError::UnsatisfiableRelation {
        record_type: record_type.to_string(),
        field: field.name.clone(),
        target: field.kind.target().unwrap_or_default().to_string(),
        reason: format!("override value '{value}' is not a list of primary keys"),
    };
    match &value {
        Value::Null => Ok(Vec::new()),
        Value::Array(values) => values
            .iter()
            .map(|v| v.as_i64().ok_or_else(invalid))
            .collect(),
        other => other.as_i64().map(|pk| vec![pk]).ok_or_else(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_core::{FieldKind, Schema};
    use seed_generator::Locale;
    use seed_store_memory::MemoryStore;

    const SCHEMA: &str = r#"
types:
  - name: tag
    fields:
      - { name: label, type: string, max_length: 8, unique: true }
  - name: game
    fields:
      - { name: title, type: string, max_length: 12 }
      - { name: status, type: string, default: draft }
      - { name: tags, type: { type: many_to_many, to: tag }, blank: true }
"#;

    fn attempt<'a>(inserted: &'a InsertedEntities, faker: &'a mut Faker) -> AttemptContext<'a> {
        AttemptContext {
            inserted,
            existing: None,
            faker,
            unique_attempts: 100,
        }
    }

    #[test]
    fn test_unknown_override_field() {
        let schema = Schema::from_yaml(SCHEMA).unwrap();
        let mut faker = Faker::new(Locale::En, 1);
        let err = RecordTypeSeeder::new(
            schema.get_type("game").unwrap(),
            Overrides::new().value("missing", Value::Int(1)),
            &mut faker,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SeedError::Schema(SchemaError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_formatters_resolved_per_field() {
        let schema = Schema::from_yaml(SCHEMA).unwrap();
        let mut faker = Faker::new(Locale::En, 1);
        let seeder = RecordTypeSeeder::new(
            schema.get_type("game").unwrap(),
            Overrides::new().value("title", "Halo"),
            &mut faker,
        )
        .unwrap();

        assert!(seeder.formatter("id").is_none());
        assert!(matches!(
            seeder.formatter("title"),
            Some(Formatter::Constant(Value::String(s))) if s == "Halo"
        ));
        assert!(matches!(
            seeder.formatter("status"),
            Some(Formatter::Constant(Value::String(s))) if s == "draft"
        ));
        assert!(matches!(seeder.formatter("tags"), Some(Formatter::Relation(_))));
        assert_eq!(seeder.relation_targets().count(), 0);
    }

    #[test]
    fn test_execute_truncates_and_links() {
        let schema = Schema::from_yaml(SCHEMA).unwrap();
        let mut store = MemoryStore::new(&schema);
        let mut faker = Faker::new(Locale::En, 3);
        let mut inserted = InsertedEntities::new();

        let mut tags =
            RecordTypeSeeder::new(schema.get_type("tag").unwrap(), Overrides::new(), &mut faker)
                .unwrap();
        for _ in 0..3 {
            let pk = tags
                .execute(&mut store, attempt(&inserted, &mut faker))
                .unwrap();
            tags.commit_attempt();
            inserted.push("tag", pk);
        }

        let mut games = RecordTypeSeeder::new(
            schema.get_type("game").unwrap(),
            Overrides::new().value("title", "A very long game title"),
            &mut faker,
        )
        .unwrap();
        let pk = games
            .execute(&mut store, attempt(&inserted, &mut faker))
            .unwrap();

        let record = store.get("game", pk).unwrap();
        assert_eq!(record["title"], Value::from("A very long "));
        assert_eq!(record["status"], Value::from("draft"));
        let linked = store.links("game", pk, "tags");
        assert!(!linked.is_empty());
        assert!(linked.iter().all(|target| inserted.get("tag").contains(target)));
    }

    #[test]
    fn test_override_links() {
        let schema = Schema::from_yaml(SCHEMA).unwrap();
        let mut store = MemoryStore::new(&schema);
        let mut faker = Faker::new(Locale::En, 3);
        let mut inserted = InsertedEntities::new();

        let mut tags =
            RecordTypeSeeder::new(schema.get_type("tag").unwrap(), Overrides::new(), &mut faker)
                .unwrap();
        let first = tags
            .execute(&mut store, attempt(&inserted, &mut faker))
            .unwrap();
        tags.commit_attempt();
        inserted.push("tag", first);

        let mut games = RecordTypeSeeder::new(
            schema.get_type("game").unwrap(),
            Overrides::new().function("tags", |inserted| {
                Value::Array(inserted.get("tag").iter().map(|pk| Value::Int(*pk)).collect())
            }),
            &mut faker,
        )
        .unwrap();
        let pk = games
            .execute(&mut store, attempt(&inserted, &mut faker))
            .unwrap();
        assert_eq!(store.links("game", pk, "tags"), vec![first]);
    }

    #[test]
    fn test_link_targets_rejects_non_keys() {
        let field = FieldDescriptor::new(
            "tags",
            FieldKind::ManyToMany {
                to: "tag".to_string(),
            },
        );
        assert_eq!(link_targets("game", &field, Value::Int(3)).unwrap(), vec![3]);
        assert!(link_targets("game", &field, Value::Null).unwrap().is_empty());
        assert!(matches!(
            link_targets("game", &field, Value::from("three")),
            Err(SeedError::UnsatisfiableRelation { .. })
        ));
    }
}
