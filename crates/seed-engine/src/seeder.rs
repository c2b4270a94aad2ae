//! Order queue and execution.
//!
//! ```text
//! add_order(type, n) ──► VecDeque<Order> ──execute(storage)──► InsertedEntities
//!                                               │
//!                     for each order, FIFO:     │
//!                       attempts < n * retry_factor && inserted < n
//!                         └── atomic scope ── RecordTypeSeeder::execute
//! ```
//!
//! Retryable failures (constraint violations, unsatisfiable relations,
//! exhausted unique values) roll back the attempt and count against the
//! order's budget. An order that inserts nothing fails the run. An order that
//! inserts fewer records than requested is reported and the run continues.

use crate::error::{SeedError, SeedResult};
use crate::formatter::Overrides;
use crate::inserted::InsertedEntities;
use crate::record::{AttemptContext, RecordTypeSeeder};
use seed_core::{run_in_atomic_scope, Schema, Storage};
use seed_generator::{Faker, GeneratorRegistry, Locale};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Tuning for order execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    /// Attempts allowed per requested record
    pub retry_factor: usize,
    /// Generation attempts per unique value
    pub unique_attempts: usize,
    /// Fall back to primary keys already in storage when a referenced type
    /// has not been seeded in this run
    pub reuse_existing: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            retry_factor: 2,
            unique_attempts: 1000,
            reuse_existing: false,
        }
    }
}

/// Lifecycle of a [`Seeder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeederState {
    /// No orders queued
    Idle,
    /// Orders waiting for `execute()`
    Queued,
    /// Inside `execute()`
    Executing,
}

/// Outcome of one executed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReport {
    /// Record type of the order
    pub record_type: String,
    /// Records requested
    pub requested: usize,
    /// Records inserted
    pub inserted: usize,
    /// Attempts made
    pub attempts: usize,
    /// Last retryable error, if any attempt failed
    pub last_error: Option<String>,
}

impl OrderReport {
    /// Whether fewer records were inserted than requested.
    pub fn is_partial(&self) -> bool {
        self.inserted < self.requested
    }
}

/// Result of [`Seeder::execute_with_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeedReport {
    /// Primary keys inserted per record type
    pub inserted: InsertedEntities,
    /// Per-order outcomes in execution order
    pub orders: Vec<OrderReport>,
}

struct Order {
    seeder: RecordTypeSeeder,
    count: usize,
}

/// Queues orders against a schema and executes them against storage.
pub struct Seeder<'a> {
    schema: &'a Schema,
    faker: &'a mut Faker,
    orders: VecDeque<Order>,
    options: SeedOptions,
    state: SeederState,
}

impl<'a> Seeder<'a> {
    /// Create a seeder drawing values from the registry's generator for
    /// `locale`.
    pub fn new(schema: &'a Schema, registry: &'a mut GeneratorRegistry, locale: Locale) -> Self {
        Self::with_faker(schema, registry.faker(locale))
    }

    /// Create a seeder drawing values from `faker`.
    pub fn with_faker(schema: &'a Schema, faker: &'a mut Faker) -> Self {
        Self {
            schema,
            faker,
            orders: VecDeque::new(),
            options: SeedOptions::default(),
            state: SeederState::Idle,
        }
    }

    /// Replace the execution options.
    pub fn with_options(mut self, options: SeedOptions) -> Self {
        self.options = options;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SeederState {
        self.state
    }

    /// Number of queued orders.
    pub fn pending_orders(&self) -> usize {
        self.orders.len()
    }

    /// Queue `count` records of `record_type`.
    ///
    /// Formatters are resolved now, so unsupported fields and unknown
    /// override names fail here rather than during execution.
    pub fn add_order(
        &mut self,
        record_type: &str,
        count: usize,
        overrides: Overrides,
    ) -> SeedResult<()> {
        let definition = self.schema.require_type(record_type)?;
        let seeder = RecordTypeSeeder::new(definition, overrides, self.faker)?;
        debug!(record_type, count, "Queued order");
        self.orders.push_back(Order { seeder, count });
        self.state = SeederState::Queued;
        Ok(())
    }

    /// Execute every queued order in FIFO order.
    ///
    /// The queue is empty afterwards, whether execution succeeded or not.
    pub fn execute<S: Storage + ?Sized>(&mut self, storage: &mut S) -> SeedResult<InsertedEntities> {
        self.execute_with_report(storage).map(|report| report.inserted)
    }

    /// Execute every queued order and report per-order outcomes.
    pub fn execute_with_report<S: Storage + ?Sized>(
        &mut self,
        storage: &mut S,
    ) -> SeedResult<SeedReport> {
        if self.orders.is_empty() {
            return Err(SeedError::NoEntities);
        }
        self.state = SeederState::Executing;

        let existing = self
            .options
            .reuse_existing
            .then(|| self.existing_keys(&*storage));
        let mut inserted = InsertedEntities::new();
        let mut reports = Vec::with_capacity(self.orders.len());

        while let Some(mut order) = self.orders.pop_front() {
            match run_order(
                &mut order,
                storage,
                &mut inserted,
                existing.as_ref(),
                self.faker,
                &self.options,
            ) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    self.orders.clear();
                    self.state = SeederState::Idle;
                    return Err(e);
                }
            }
        }

        self.state = SeederState::Idle;
        info!(
            records = inserted.total(),
            types = reports.len(),
            "Seeding complete"
        );
        Ok(SeedReport {
            inserted,
            orders: reports,
        })
    }

    /// Primary keys already stored for every type a queued order references.
    fn existing_keys<S: Storage + ?Sized>(&self, storage: &S) -> InsertedEntities {
        let mut existing = InsertedEntities::new();
        for order in &self.orders {
            for target in order.seeder.relation_targets() {
                if !existing.contains(target) {
                    existing.extend(target, storage.primary_keys(target));
                }
            }
        }
        existing
    }
}

/// Attempts allowed for an order of `count` records.
fn attempt_budget(count: usize, retry_factor: usize) -> usize {
    count.saturating_mul(retry_factor.max(1))
}

fn run_order<S: Storage + ?Sized>(
    order: &mut Order,
    storage: &mut S,
    inserted: &mut InsertedEntities,
    existing: Option<&InsertedEntities>,
    faker: &mut Faker,
    options: &SeedOptions,
) -> SeedResult<OrderReport> {
    let record_type = order.seeder.record_type().to_string();
    let requested = order.count;
    let budget = attempt_budget(requested, options.retry_factor);
    info!(record_type = %record_type, count = requested, "Seeding {requested} {record_type}s");

    inserted.ensure(&record_type);
    let mut completed = 0;
    let mut attempts = 0;
    let mut last_error: Option<SeedError> = None;

    while completed < requested && attempts < budget {
        attempts += 1;
        let attempt = AttemptContext {
            inserted: &*inserted,
            existing,
            faker: &mut *faker,
            unique_attempts: options.unique_attempts,
        };
        let seeder = &mut order.seeder;
        let result = run_in_atomic_scope(storage, |storage| seeder.execute(storage, attempt));

        match result {
            Ok(primary_key) => {
                order.seeder.commit_attempt();
                inserted.push(&record_type, primary_key);
                completed += 1;
                debug!(
                    record_type = %record_type,
                    primary_key,
                    "Model {record_type} generated record with primary key {primary_key}"
                );
            }
            Err(e) if e.is_retryable() => {
                order.seeder.discard_attempt();
                debug!(record_type = %record_type, attempt = attempts, error = %e, "Attempt rolled back");
                last_error = Some(e);
            }
            Err(e) => {
                order.seeder.discard_attempt();
                return Err(e);
            }
        }
    }

    if completed == 0 {
        if let Some(last_error) = last_error {
            return Err(SeedError::SeedingFailed {
                record_type,
                requested,
                attempts,
                last_error: Box::new(last_error),
            });
        }
    }

    let last_error = last_error.map(|e| e.to_string());
    if completed < requested {
        warn!(
            record_type = %record_type,
            requested,
            inserted = completed,
            attempts,
            last_error = last_error.as_deref().unwrap_or_default(),
            "Inserted {completed} of {requested} {record_type} records"
        );
    }

    Ok(OrderReport {
        record_type,
        requested,
        inserted: completed,
        attempts,
        last_error,
    })
}
