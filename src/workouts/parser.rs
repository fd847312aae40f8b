//! Workout template parser.
//!
//! Templates are TOML or JSON documents with a name, optional description,
//! category and tags, and an `exercises` array. Example:
//!
//! ```toml
//! name = "Push Day"
//! category = "push"
//!
//! [[exercises]]
//! id = "bench-press"
//! name = "Bench Press"
//! target_sets = 4
//! personal_record = { weight = 100.0, reps = 5 }
//!
//! [[exercises.last_workout_sets]]
//! weight = 80.0
//! reps = 8
//! rest_time_seconds = 120
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::workouts::types::{
    Exercise, TemplateCategory, TemplateFormat, TemplateParseError, WorkoutTemplate,
};

#[derive(Debug, Deserialize)]
struct TemplateDocument {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    category: TemplateCategory,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    exercises: Vec<Exercise>,
}

/// Parse a template from `content` in the given format.
pub fn parse_template(
    content: &str,
    format: TemplateFormat,
) -> Result<WorkoutTemplate, TemplateParseError> {
    let document: TemplateDocument = match format {
        TemplateFormat::Toml => {
            toml::from_str(content).map_err(|e| TemplateParseError::InvalidToml(e.to_string()))?
        }
        TemplateFormat::Json => serde_json::from_str(content)
            .map_err(|e| TemplateParseError::InvalidJson(e.to_string()))?,
    };

    let name = document
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| TemplateParseError::MissingField("name".to_string()))?;

    validate_exercises(&document.exercises)?;

    let mut template = WorkoutTemplate::new(name, document.category, document.exercises);
    template.description = document.description;
    template.tags = document.tags;

    Ok(template)
}

fn validate_exercises(exercises: &[Exercise]) -> Result<(), TemplateParseError> {
    if exercises.is_empty() {
        return Err(TemplateParseError::EmptyTemplate);
    }

    let mut seen = HashSet::new();
    for exercise in exercises {
        if exercise.id.trim().is_empty() {
            return Err(TemplateParseError::MissingField("exercises.id".to_string()));
        }
        if !seen.insert(exercise.id.as_str()) {
            return Err(TemplateParseError::DuplicateExerciseId(exercise.id.clone()));
        }
        if exercise.target_sets == 0 {
            return Err(invalid(&exercise.id, "target_sets", "0"));
        }
        if let Some(record) = &exercise.personal_record {
            check_weight(&exercise.id, "personal_record.weight", record.weight)?;
        }
        for set in &exercise.last_workout_sets {
            check_weight(&exercise.id, "last_workout_sets.weight", set.weight)?;
            if set.reps == 0 {
                return Err(invalid(&exercise.id, "last_workout_sets.reps", "0"));
            }
        }
    }

    Ok(())
}

fn check_weight(exercise_id: &str, field: &str, weight: f64) -> Result<(), TemplateParseError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(invalid(exercise_id, field, &weight.to_string()))
    }
}

fn invalid(exercise_id: &str, field: &str, value: &str) -> TemplateParseError {
    TemplateParseError::InvalidValue {
        field: format!("{}.{}", exercise_id, field),
        value: value.to_string(),
    }
}

/// Parse a template file, choosing the format from its extension.
pub fn parse_template_file(path: &Path) -> Result<WorkoutTemplate, TemplateParseError> {
    let format = TemplateFormat::from_extension(path)
        .ok_or_else(|| TemplateParseError::UnsupportedFormat(path.display().to_string()))?;

    let content = std::fs::read_to_string(path)
        .map_err(|e| TemplateParseError::IoError(e.to_string()))?;

    let mut template = parse_template(&content, format)?;
    template.source_file = Some(path.display().to_string());

    Ok(template)
}
