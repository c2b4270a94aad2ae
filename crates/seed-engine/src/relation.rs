//! Resolution of references between record types.

use crate::error::{SeedError, SeedResult};
use crate::formatter::FormatterContext;
use crate::inserted::InsertedEntities;
use rand::seq::IndexedRandom;
use rand::Rng;
use seed_core::{FieldDescriptor, FieldKind, PrimaryKey, Value};
use tracing::warn;

/// Upper bound on associations created per many-to-many field.
pub const MAX_LINKS_PER_FIELD: usize = 10;

/// Cardinality of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Many records may reference the same target
    ManyToOne,
    /// Each target is referenced at most once
    OneToOne,
    /// A set of targets, stored as links after insert
    ManyToMany,
}

/// A reference from one record type to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Referenced record type
    pub target: String,
    /// Cardinality
    pub arity: Arity,
    /// The field may be left empty when no target is available
    pub optional: bool,
    /// Each target may be referenced at most once through this field
    pub unique: bool,
}

impl Relation {
    /// Build the relation described by a reference field.
    pub fn from_field(field: &FieldDescriptor) -> Option<Self> {
        let (target, arity) = match &field.kind {
            FieldKind::ForeignKey { to } => (to, Arity::ManyToOne),
            FieldKind::OneToOne { to } => (to, Arity::OneToOne),
            FieldKind::ManyToMany { to } => (to, Arity::ManyToMany),
            _ => return None,
        };
        Some(Self {
            target: target.clone(),
            arity,
            optional: !field.is_required(),
            unique: field.unique || arity == Arity::OneToOne,
        })
    }

    /// Choose the referenced primary key for a foreign key or one-to-one
    /// field. Yields `Null` for an optional relation with no eligible target.
    pub fn resolve(&self, field: &FieldDescriptor, ctx: &mut FormatterContext<'_>) -> SeedResult<Value> {
        let candidates = self.candidates(ctx);
        if candidates.is_empty() {
            return self.unresolved(field, ctx, "no records have been inserted");
        }

        if !self.unique {
            return Ok(candidates
                .choose(ctx.faker.rng())
                .map_or(Value::Null, |pk| Value::Int(*pk)));
        }

        let available: Vec<PrimaryKey> = candidates
            .iter()
            .copied()
            .filter(|pk| !ctx.tracker.is_used(&field.name, &pk.to_string()))
            .collect();
        match available.choose(ctx.faker.rng()).copied() {
            Some(pk) => {
                ctx.tracker.stage(&field.name, pk.to_string());
                Ok(Value::Int(pk))
            }
            None => self.unresolved(field, ctx, "every record is already referenced"),
        }
    }

    /// Choose link targets for a many-to-many field.
    ///
    /// Draws between one and `min(10, n / 5 + 1)` targets with repetition
    /// from the `n` keys inserted so far.
    pub fn resolve_links(
        &self,
        field: &FieldDescriptor,
        ctx: &mut FormatterContext<'_>,
    ) -> SeedResult<Vec<PrimaryKey>> {
        let inserted = ctx.inserted;
        let candidates = inserted.get(&self.target);
        if candidates.is_empty() {
            if self.optional {
                warn!(
                    record_type = ctx.record_type,
                    field = %field.name,
                    target = %self.target,
                    "No '{}' records inserted yet, leaving '{}.{}' without links",
                    self.target,
                    ctx.record_type,
                    field.name
                );
                return Ok(Vec::new());
            }
            return Err(self.unsatisfiable(field, ctx, "no records have been inserted"));
        }

        let bound = MAX_LINKS_PER_FIELD.min(candidates.len() / 5 + 1);
        let rng = ctx.faker.rng();
        let count = rng.random_range(1..=bound);
        let mut links = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(pk) = candidates.choose(&mut *rng) {
                links.push(*pk);
            }
        }
        Ok(links)
    }

    /// Keys inserted in this run, falling back to pre-existing ones.
    fn candidates<'c>(&self, ctx: &FormatterContext<'c>) -> &'c [PrimaryKey] {
        let inserted: &'c InsertedEntities = ctx.inserted;
        let keys = inserted.get(&self.target);
        if !keys.is_empty() {
            return keys;
        }
        match ctx.existing {
            Some(existing) => existing.get(&self.target),
            None => &[],
        }
    }

    fn unresolved(
        &self,
        field: &FieldDescriptor,
        ctx: &FormatterContext<'_>,
        reason: &str,
    ) -> SeedResult<Value> {
        if self.optional {
            Ok(Value::Null)
        } else {
            Err(self.unsatisfiable(field, ctx, reason))
        }
    }

    fn unsatisfiable(
        &self,
        field: &FieldDescriptor,
        ctx: &FormatterContext<'_>,
        reason: &str,
    ) -> SeedError {
        SeedError::UnsatisfiableRelation {
            record_type: ctx.record_type.to_string(),
            field: field.name.clone(),
            target: self.target.clone(),
            reason: reason.to_string(),
        }
    }
}
