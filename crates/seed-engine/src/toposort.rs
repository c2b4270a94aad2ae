//! Dependency ordering of record types.
//!
//! A type must be seeded after every type its required references point
//! to. Types are released level by level: each level holds every type whose
//! dependencies were all released by earlier levels, in name order.

use crate::error::{SeedError, SeedResult};
use seed_core::Schema;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Order record types so that every type follows its dependencies.
///
/// Self-dependencies are ignored. Dependencies that are not keys of the
/// input are included in the output. Fails with
/// [`SeedError::CyclicDependency`] naming the types left unordered.
pub fn sort(dependencies: &HashMap<String, BTreeSet<String>>) -> SeedResult<Vec<String>> {
    let mut pending: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (record_type, deps) in dependencies {
        let deps: BTreeSet<String> = deps.iter().filter(|d| *d != record_type).cloned().collect();
        for dep in &deps {
            pending.entry(dep.clone()).or_default();
        }
        pending.entry(record_type.clone()).or_default().extend(deps);
    }

    let mut ordered = Vec::with_capacity(pending.len());
    loop {
        let ready: BTreeSet<String> = pending
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        if ready.is_empty() {
            break;
        }

        pending.retain(|name, _| !ready.contains(name));
        for deps in pending.values_mut() {
            deps.retain(|dep| !ready.contains(dep));
        }
        ordered.extend(ready);
    }

    if !pending.is_empty() {
        return Err(SeedError::CyclicDependency {
            types: pending.into_keys().collect(),
        });
    }
    Ok(ordered)
}

/// Seeding order for a selection of a schema's record types.
///
/// Required dependencies of selected types are pulled in even when not
/// selected. An empty selection means every type.
pub fn schema_order(schema: &Schema, selected: &[String]) -> SeedResult<Vec<String>> {
    let graph = schema.dependency_graph();
    if selected.is_empty() {
        return sort(&graph);
    }

    let mut subset = HashMap::new();
    let mut stack: Vec<String> = Vec::new();
    for name in selected {
        schema.require_type(name)?;
        stack.push(name.clone());
    }
    while let Some(name) = stack.pop() {
        if subset.contains_key(&name) {
            continue;
        }
        let deps = graph.get(&name).cloned().unwrap_or_default();
        stack.extend(deps.iter().cloned());
        subset.insert(name, deps);
    }
    sort(&subset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> HashMap<String, BTreeSet<String>> {
        edges
            .iter()
            .map(|(name, deps)| {
                (
                    name.to_string(),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect()
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn test_dependencies_first() {
        let order = sort(&graph(&[
            ("action", &["player"]),
            ("player", &["game"]),
            ("game", &[]),
        ]))
        .unwrap();
        assert_eq!(order, vec!["game", "player", "action"]);
    }

    #[test]
    fn test_levels_sorted_by_name() {
        let order = sort(&graph(&[
            ("zebra", &[]),
            ("apple", &[]),
            ("mango", &["zebra"]),
        ]))
        .unwrap();
        assert_eq!(order, vec!["apple", "zebra", "mango"]);
    }

    #[test]
    fn test_self_dependency_ignored() {
        let order = sort(&graph(&[("player", &["player"])])).unwrap();
        assert_eq!(order, vec!["player"]);
    }

    #[test]
    fn test_missing_dependency_included() {
        let order = sort(&graph(&[("player", &["game"])])).unwrap();
        assert_eq!(order, vec!["game", "player"]);
    }

    #[test]
    fn test_cycle_detected() {
        let err = sort(&graph(&[("a", &["b"]), ("b", &["a"]), ("c", &[])])).unwrap_err();
        match err {
            SeedError::CyclicDependency { types } => assert_eq!(types, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_edge_respected() {
        let edges = graph(&[
            ("order", &["customer", "product"]),
            ("product", &["vendor"]),
            ("customer", &[]),
            ("vendor", &[]),
            ("review", &["order", "customer"]),
        ]);
        let order = sort(&edges).unwrap();
        for (name, deps) in &edges {
            for dep in deps {
                assert!(position(&order, dep) < position(&order, name));
            }
        }
    }

    #[test]
    fn test_schema_order_selection() {
        let schema = Schema::from_yaml(
            r#"
types:
  - name: game
  - name: player
    fields:
      - { name: game, type: { type: foreign_key, to: game } }
  - name: score
    fields:
      - { name: player, type: { type: foreign_key, to: player }, nullable: true }
"#,
        )
        .unwrap();

        let all = schema_order(&schema, &[]).unwrap();
        assert_eq!(all.len(), 3);
        assert!(position(&all, "game") < position(&all, "player"));

        let selected = schema_order(&schema, &["player".to_string()]).unwrap();
        assert_eq!(selected, vec!["game", "player"]);

        assert!(schema_order(&schema, &["missing".to_string()]).is_err());
    }
}
