//! Implementations of the `seed` and `plan` commands.

use crate::cli::{PlanArgs, SeedArgs};
use crate::overrides::collect_overrides;
use anyhow::Context;
use seed_core::Schema;
use seed_engine::{toposort, SeedOptions, SeedReport, Seeder};
use seed_generator::{GeneratorRegistry, Locale};
use seed_store_memory::MemoryStore;
use std::io::Write;
use tracing::{info, warn};

/// What a `seed` run produced.
#[derive(Debug)]
pub struct SeedOutcome {
    /// Record types in insertion order
    pub order: Vec<String>,
    /// Execution report, absent for dry runs
    pub report: Option<SeedReport>,
    /// The store the records were written to
    pub store: MemoryStore,
}

fn load_schema(path: &std::path::Path) -> anyhow::Result<Schema> {
    Schema::from_file(path).with_context(|| format!("Failed to load schema from {path:?}"))
}

/// Seed every selected record type into a fresh [`MemoryStore`].
///
/// Progress lines are written to `out`.
pub fn run_seed<W: Write>(args: &SeedArgs, out: &mut W) -> anyhow::Result<SeedOutcome> {
    let schema = load_schema(&args.schema)?;

    let seed = args.seed.or(schema.seed);
    let locale = args
        .locale
        .as_deref()
        .or(schema.locale.as_deref())
        .map(Locale::parse_or_default)
        .unwrap_or_default();
    let order = toposort::schema_order(&schema, &args.types)
        .context("Failed to order record types")?;
    let mut overrides = collect_overrides(&schema, &args.overrides)?;
    if let Some(unused) = overrides.keys().find(|t| !order.contains(*t)) {
        anyhow::bail!("Override for record type '{unused}' which is not being seeded");
    }

    info!(
        "Seeding {} record types with {} records each (seed={:?}, locale={})",
        order.len(),
        args.number,
        seed,
        locale
    );

    let mut registry = GeneratorRegistry::new(seed);
    let mut seeder = Seeder::new(&schema, &mut registry, locale).with_options(SeedOptions {
        reuse_existing: args.reuse_existing,
        ..SeedOptions::default()
    });
    for record_type in &order {
        seeder
            .add_order(
                record_type,
                args.number,
                overrides.remove(record_type).unwrap_or_default(),
            )
            .with_context(|| format!("Failed to prepare record type '{record_type}'"))?;
    }

    let mut store = MemoryStore::new(&schema);
    if args.dry_run {
        writeln!(
            out,
            "Dry run: resolved formatters for {} record types: {}",
            order.len(),
            order.join(", ")
        )?;
        return Ok(SeedOutcome {
            order,
            report: None,
            store,
        });
    }

    let report = seeder
        .execute_with_report(&mut store)
        .context("Seeding failed")?;

    for (record_type, primary_keys) in report.inserted.iter() {
        for primary_key in primary_keys {
            writeln!(
                out,
                "Model {record_type} generated record with primary key {primary_key}"
            )?;
        }
    }
    for order_report in &report.orders {
        writeln!(
            out,
            "{}: {}/{} inserted",
            order_report.record_type, order_report.inserted, order_report.requested
        )?;
        if order_report.is_partial() {
            warn!(
                "Only {} of {} '{}' records inserted (last error: {})",
                order_report.inserted,
                order_report.requested,
                order_report.record_type,
                order_report.last_error.as_deref().unwrap_or("none")
            );
        }
    }

    if let Some(output) = &args.output {
        let written = store
            .write_jsonl_file(output)
            .with_context(|| format!("Failed to write rows to {output:?}"))?;
        writeln!(out, "Wrote {written} rows to {}", output.display())?;
    }

    Ok(SeedOutcome {
        order,
        report: Some(report),
        store,
    })
}

/// Print the dependency-sorted insertion order, one type per line.
pub fn run_plan<W: Write>(args: &PlanArgs, out: &mut W) -> anyhow::Result<Vec<String>> {
    let schema = load_schema(&args.schema)?;
    let order = toposort::schema_order(&schema, &args.types)
        .context("Failed to order record types")?;
    for (position, record_type) in order.iter().enumerate() {
        writeln!(out, "{}. {record_type}", position + 1)?;
    }
    Ok(order)
}
