//! Workout template library.
//!
//! Holds the built-in templates plus any loaded from a template directory,
//! and answers search/filter queries over them.

use std::path::Path;
use uuid::Uuid;

use super::parser::parse_template_file;
use super::types::{
    Exercise, PreviousSet, TemplateCategory, TemplateFormat, TemplateParseError, WorkoutError,
    WorkoutTemplate,
};

/// Search criteria for templates.
#[derive(Debug, Default)]
pub struct SearchCriteria {
    pub category: Option<TemplateCategory>,
    pub muscle_group: Option<String>,
    pub equipment_type: Option<String>,
    pub max_exercises: Option<usize>,
    pub tag: Option<String>,
}

/// In-memory template library.
#[derive(Debug, Default)]
pub struct TemplateLibrary {
    templates: Vec<WorkoutTemplate>,
}

impl TemplateLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library holding the built-in templates.
    pub fn with_builtins() -> Self {
        Self {
            templates: generate_builtin_templates(),
        }
    }

    /// Add a template.
    pub fn insert(&mut self, template: WorkoutTemplate) {
        self.templates.push(template);
    }

    /// Load every `.toml` and `.json` template in `dir`.
    ///
    /// Files that fail to parse are logged and skipped. Returns the number
    /// of templates added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, TemplateParseError> {
        let entries =
            std::fs::read_dir(dir).map_err(|e| TemplateParseError::IoError(e.to_string()))?;

        let mut loaded = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if TemplateFormat::from_extension(&path).is_none() {
                continue;
            }

            match parse_template_file(&path) {
                Ok(template) => {
                    tracing::debug!("Loaded template '{}' from {}", template.name, path.display());
                    self.insert(template);
                    loaded += 1;
                }
                Err(e) => tracing::warn!("Skipping template {}: {}", path.display(), e),
            }
        }

        tracing::info!("Loaded {} templates from {}", loaded, dir.display());
        Ok(loaded)
    }

    /// Get a template by id.
    pub fn get(&self, id: Uuid) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Get a template by name, ignoring case.
    pub fn get_by_name(&self, name: &str) -> Option<&WorkoutTemplate> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Resolve a template from a file path or a name, defaulting to the
    /// first template in the library.
    pub fn resolve(&self, arg: Option<&str>) -> Result<WorkoutTemplate, WorkoutError> {
        match arg {
            Some(arg) if Path::new(arg).is_file() => Ok(parse_template_file(Path::new(arg))?),
            Some(name) => self
                .get_by_name(name)
                .cloned()
                .ok_or_else(|| WorkoutError::TemplateNotFound(name.to_string())),
            None => self
                .templates
                .first()
                .cloned()
                .ok_or_else(|| WorkoutError::TemplateNotFound("default".to_string())),
        }
    }

    /// All templates, in insertion order.
    pub fn all(&self) -> &[WorkoutTemplate] {
        &self.templates
    }

    /// Search templates by criteria.
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<&WorkoutTemplate> {
        let mut templates: Vec<&WorkoutTemplate> = self.templates.iter().collect();

        // Filter by category
        if let Some(category) = &criteria.category {
            templates.retain(|t| &t.category == category);
        }

        // Filter by muscle group of any exercise
        if let Some(muscle_group) = &criteria.muscle_group {
            templates.retain(|t| {
                t.exercises
                    .iter()
                    .any(|e| e.muscle_group.eq_ignore_ascii_case(muscle_group))
            });
        }

        // Filter by equipment of any exercise
        if let Some(equipment) = &criteria.equipment_type {
            templates.retain(|t| {
                t.exercises
                    .iter()
                    .any(|e| e.equipment_type.eq_ignore_ascii_case(equipment))
            });
        }

        if let Some(max) = criteria.max_exercises {
            templates.retain(|t| t.exercises.len() <= max);
        }

        if let Some(tag) = &criteria.tag {
            templates.retain(|t| t.tags.iter().any(|g| g.eq_ignore_ascii_case(tag)));
        }

        templates
    }

    /// Get template count.
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

fn previous(weight: f64, reps: u32, rest_time_seconds: u32) -> PreviousSet {
    PreviousSet {
        weight,
        reps,
        rest_time_seconds,
    }
}

/// Generate the built-in templates.
fn generate_builtin_templates() -> Vec<WorkoutTemplate> {
    vec![
        WorkoutTemplate::new(
            "Push Day".to_string(),
            TemplateCategory::Push,
            vec![
                Exercise::new("bench-press", "Bench Press")
                    .with_muscle_group("Chest")
                    .with_equipment("Barbell")
                    .with_target_muscles(&["Chest", "Triceps", "Front Delts"])
                    .with_target_sets(4)
                    .with_personal_record(100.0, 5)
                    .with_last_workout_sets(vec![
                        previous(80.0, 8, 120),
                        previous(85.0, 6, 120),
                        previous(85.0, 6, 120),
                    ])
                    .with_tips(&["Retract shoulder blades", "Touch mid-chest"]),
                Exercise::new("overhead-press", "Overhead Press")
                    .with_muscle_group("Shoulders")
                    .with_equipment("Barbell")
                    .with_target_muscles(&["Front Delts", "Triceps"])
                    .with_target_sets(3)
                    .with_last_workout_sets(vec![previous(50.0, 8, 90)])
                    .with_tips(&["Squeeze glutes", "Press in a straight line"]),
                Exercise::new("incline-db-press", "Incline Dumbbell Press")
                    .with_muscle_group("Chest")
                    .with_equipment("Dumbbell")
                    .with_target_muscles(&["Upper Chest", "Front Delts"])
                    .with_target_sets(3),
                Exercise::new("tricep-dips", "Tricep Dips")
                    .with_muscle_group("Arms")
                    .with_equipment("Bodyweight")
                    .with_target_muscles(&["Triceps"])
                    .with_target_sets(3),
            ],
        )
        .with_description("Chest, shoulders and triceps")
        .with_tags(&["strength", "hypertrophy"]),
        WorkoutTemplate::new(
            "Pull Day".to_string(),
            TemplateCategory::Pull,
            vec![
                Exercise::new("deadlift", "Deadlift")
                    .with_muscle_group("Back")
                    .with_equipment("Barbell")
                    .with_target_muscles(&["Hamstrings", "Glutes", "Lower Back"])
                    .with_target_sets(3)
                    .with_personal_record(160.0, 3)
                    .with_last_workout_sets(vec![previous(140.0, 5, 180)])
                    .with_tips(&["Bar over mid-foot", "Push the floor away"]),
                Exercise::new("pull-up", "Pull-Up")
                    .with_muscle_group("Back")
                    .with_equipment("Bodyweight")
                    .with_target_muscles(&["Lats", "Biceps"])
                    .with_target_sets(3),
                Exercise::new("barbell-row", "Barbell Row")
                    .with_muscle_group("Back")
                    .with_equipment("Barbell")
                    .with_target_muscles(&["Lats", "Rhomboids"])
                    .with_target_sets(3)
                    .with_last_workout_sets(vec![previous(60.0, 10, 90)]),
                Exercise::new("hammer-curl", "Hammer Curl")
                    .with_muscle_group("Arms")
                    .with_equipment("Dumbbell")
                    .with_target_muscles(&["Biceps", "Forearms"])
                    .with_target_sets(2),
            ],
        )
        .with_description("Back and biceps")
        .with_tags(&["strength"]),
        WorkoutTemplate::new(
            "Leg Day".to_string(),
            TemplateCategory::Legs,
            vec![
                Exercise::new("back-squat", "Back Squat")
                    .with_muscle_group("Legs")
                    .with_equipment("Barbell")
                    .with_target_muscles(&["Quads", "Glutes"])
                    .with_target_sets(5)
                    .with_personal_record(130.0, 5)
                    .with_last_workout_sets(vec![previous(110.0, 5, 180)])
                    .with_tips(&["Knees track over toes", "Hit depth"]),
                Exercise::new("romanian-deadlift", "Romanian Deadlift")
                    .with_muscle_group("Legs")
                    .with_equipment("Barbell")
                    .with_target_muscles(&["Hamstrings", "Glutes"])
                    .with_target_sets(3),
                Exercise::new("walking-lunge", "Walking Lunge")
                    .with_muscle_group("Legs")
                    .with_equipment("Dumbbell")
                    .with_target_muscles(&["Quads", "Glutes"])
                    .with_target_sets(3),
                Exercise::new("calf-raise", "Standing Calf Raise")
                    .with_muscle_group("Legs")
                    .with_equipment("Machine")
                    .with_target_muscles(&["Calves"])
                    .with_target_sets(4),
            ],
        )
        .with_description("Quads, hamstrings and calves")
        .with_tags(&["strength", "hypertrophy"]),
        WorkoutTemplate::new(
            "Full Body Basics".to_string(),
            TemplateCategory::FullBody,
            vec![
                Exercise::new("goblet-squat", "Goblet Squat")
                    .with_muscle_group("Legs")
                    .with_equipment("Dumbbell")
                    .with_target_muscles(&["Quads", "Glutes"]),
                Exercise::new("push-up", "Push-Up")
                    .with_muscle_group("Chest")
                    .with_equipment("Bodyweight")
                    .with_target_muscles(&["Chest", "Triceps"]),
                Exercise::new("db-row", "One-Arm Dumbbell Row")
                    .with_muscle_group("Back")
                    .with_equipment("Dumbbell")
                    .with_target_muscles(&["Lats"]),
                Exercise::new("plank", "Plank")
                    .with_muscle_group("Core")
                    .with_equipment("Bodyweight")
                    .with_target_muscles(&["Abs", "Obliques"])
                    .with_target_sets(2),
            ],
        )
        .with_description("Beginner friendly full body session")
        .with_tags(&["beginner"]),
    ]
}
