//! Unit tests for template parsing.

use liftclock::workouts::parser::{parse_template, parse_template_file};
use liftclock::workouts::types::{TemplateCategory, TemplateFormat, TemplateParseError};

const PUSH_TEMPLATE: &str = r#"
name = "Push Day"
description = "Chest and shoulders"
category = "push"
tags = ["strength"]

[[exercises]]
id = "bench-press"
name = "Bench Press"
muscle_group = "Chest"
equipment_type = "Barbell"
target_sets = 4
tips = ["Retract shoulder blades"]
personal_record = { weight = 100.0, reps = 5 }

[[exercises.last_workout_sets]]
weight = 80.0
reps = 8
rest_time_seconds = 120

[[exercises]]
id = "ohp"
name = "Overhead Press"
"#;

#[test]
fn test_parse_full_template() {
    let template = parse_template(PUSH_TEMPLATE, TemplateFormat::Toml).unwrap();

    assert_eq!(template.name, "Push Day");
    assert_eq!(template.description.as_deref(), Some("Chest and shoulders"));
    assert_eq!(template.category, TemplateCategory::Push);
    assert_eq!(template.tags, vec!["strength".to_string()]);

    let bench = &template.exercises[0];
    assert_eq!(bench.target_sets, 4);
    assert_eq!(bench.personal_record.map(|p| p.reps), Some(5));

    // Seeded sets copy the last recorded set
    let sets = bench.seed_sets(10);
    assert_eq!(sets.len(), 4);
    assert!(sets.iter().all(|s| s.weight == 80.0 && s.reps == 8));
}

#[test]
fn test_missing_name_rejected() {
    let toml = "[[exercises]]\nid = \"a\"\nname = \"A\"\n";
    assert!(matches!(
        parse_template(toml, TemplateFormat::Toml),
        Err(TemplateParseError::MissingField(field)) if field == "name"
    ));
}

#[test]
fn test_blank_exercise_id_rejected() {
    let json = r#"{"name": "X", "exercises": [{"id": " ", "name": "Nameless"}]}"#;
    assert!(matches!(
        parse_template(json, TemplateFormat::Json),
        Err(TemplateParseError::MissingField(_))
    ));
}

#[test]
fn test_negative_weight_rejected() {
    let json = r#"{
        "name": "X",
        "exercises": [
            {"id": "a", "name": "A", "last_workout_sets": [{"weight": -10.0, "reps": 5}]}
        ]
    }"#;

    match parse_template(json, TemplateFormat::Json) {
        Err(TemplateParseError::InvalidValue { field, .. }) => {
            assert_eq!(field, "a.last_workout_sets.weight")
        }
        other => panic!("Expected InvalidValue, got {:?}", other),
    }
}

#[test]
fn test_malformed_documents() {
    assert!(matches!(
        parse_template("name = ", TemplateFormat::Toml),
        Err(TemplateParseError::InvalidToml(_))
    ));
    assert!(matches!(
        parse_template("{", TemplateFormat::Json),
        Err(TemplateParseError::InvalidJson(_))
    ));
}

#[test]
fn test_parse_template_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("push.toml");
    std::fs::write(&path, PUSH_TEMPLATE).unwrap();

    let template = parse_template_file(&path).unwrap();
    assert_eq!(template.source_file, Some(path.display().to_string()));

    let unsupported = dir.path().join("push.yaml");
    std::fs::write(&unsupported, "name: Push").unwrap();
    assert!(matches!(
        parse_template_file(&unsupported),
        Err(TemplateParseError::UnsupportedFormat(_))
    ));

    assert!(matches!(
        parse_template_file(&dir.path().join("missing.json")),
        Err(TemplateParseError::IoError(_))
    ));
}
