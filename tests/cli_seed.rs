//! Integration tests for the `seed` and `plan` commands.

use model_seed::{run_plan, run_seed, PlanArgs, SeedArgs};
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

const SCHEMA: &str = r#"
version: 1
seed: 7
locale: en_US

types:
  - name: player
    fields:
      - { name: nickname, type: string, max_length: 12, unique: true }
      - { name: email, type: email }
      - { name: game, type: { type: foreign_key, to: game } }
  - name: game
    fields:
      - { name: title, type: string, max_length: 40 }
      - { name: description, type: text, default: "default long description" }
"#;

/// Helper to write a schema to a temporary file
fn schema_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{yaml}").unwrap();
    file.flush().unwrap();
    file
}

fn seed_args(schema: PathBuf) -> SeedArgs {
    SeedArgs {
        schema,
        number: 4,
        seed: None,
        locale: None,
        types: vec![],
        overrides: vec![],
        output: None,
        dry_run: false,
        reuse_existing: false,
    }
}

#[test]
fn test_seed_all_types() {
    let schema = schema_file(SCHEMA);
    let mut out = Vec::new();

    let outcome = run_seed(&seed_args(schema.path().to_path_buf()), &mut out).unwrap();

    assert_eq!(outcome.order, vec!["game", "player"]);
    let report = outcome.report.unwrap();
    assert_eq!(report.inserted.get("game").len(), 4);
    assert_eq!(report.inserted.get("player").len(), 4);
    assert_eq!(outcome.store.count("player"), 4);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Model game generated record with primary key 1"));
    assert!(text.contains("Model player generated record with primary key 4"));
    assert!(text.contains("player: 4/4 inserted"));
}

#[test]
fn test_seed_with_overrides_and_output() {
    let schema = schema_file(SCHEMA);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("rows.jsonl");
    let mut args = seed_args(schema.path().to_path_buf());
    args.number = 2;
    args.overrides = vec!["game.title=Halo".to_string()];
    args.output = Some(output.clone());

    run_seed(&args, &mut Vec::new()).unwrap();

    let contents = std::fs::read_to_string(&output).unwrap();
    let rows: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 4);

    let games: Vec<_> = rows.iter().filter(|row| row["type"] == "game").collect();
    assert_eq!(games.len(), 2);
    for game in games {
        assert_eq!(game["fields"]["title"], "Halo");
        assert_eq!(game["fields"]["description"], "default long description");
    }
}

#[test]
fn test_seed_selected_types_pulls_dependencies() {
    let schema = schema_file(SCHEMA);
    let mut args = seed_args(schema.path().to_path_buf());
    args.types = vec!["player".to_string()];

    let outcome = run_seed(&args, &mut Vec::new()).unwrap();
    assert_eq!(outcome.order, vec!["game", "player"]);
}

#[test]
fn test_seed_is_reproducible() {
    let schema = schema_file(SCHEMA);
    let args = seed_args(schema.path().to_path_buf());

    let dump = |args: &SeedArgs| {
        let outcome = run_seed(args, &mut Vec::new()).unwrap();
        let mut rows = Vec::new();
        outcome.store.write_jsonl(&mut rows).unwrap();
        String::from_utf8(rows).unwrap()
    };
    assert_eq!(dump(&args), dump(&args));
}

#[test]
fn test_dry_run_inserts_nothing() {
    let schema = schema_file(SCHEMA);
    let mut args = seed_args(schema.path().to_path_buf());
    args.dry_run = true;
    let mut out = Vec::new();

    let outcome = run_seed(&args, &mut out).unwrap();

    assert!(outcome.report.is_none());
    assert_eq!(outcome.store.count("game"), 0);
    assert!(String::from_utf8(out).unwrap().starts_with("Dry run"));
}

#[test]
fn test_unknown_override_field_fails() {
    let schema = schema_file(SCHEMA);
    let mut args = seed_args(schema.path().to_path_buf());
    args.overrides = vec!["game.rating=5".to_string()];

    let err = run_seed(&args, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("rating"));
}

#[test]
fn test_cycle_reported() {
    let schema = schema_file(
        r#"
types:
  - name: egg
    fields:
      - { name: chicken, type: { type: foreign_key, to: chicken } }
  - name: chicken
    fields:
      - { name: egg, type: { type: foreign_key, to: egg } }
"#,
    );

    let err = run_seed(&seed_args(schema.path().to_path_buf()), &mut Vec::new()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Cyclic dependency"));
    assert!(message.contains("chicken, egg"));
}

#[test]
fn test_missing_schema_file() {
    let err = run_seed(&seed_args(PathBuf::from("/nonexistent/schema.yaml")), &mut Vec::new())
        .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load schema"));
}

#[test]
fn test_plan_prints_order() {
    let schema = schema_file(SCHEMA);
    let mut out = Vec::new();

    let order = run_plan(
        &PlanArgs {
            schema: schema.path().to_path_buf(),
            types: vec![],
        },
        &mut out,
    )
    .unwrap();

    assert_eq!(order, vec!["game", "player"]);
    assert_eq!(String::from_utf8(out).unwrap(), "1. game\n2. player\n");
}
