//! Workout timer types.
//!
//! Exercises and templates are reference data handed to the timer; sets and
//! the `TimerState` aggregate are owned and mutated by the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use uuid::Uuid;

/// Default rest between sets in seconds.
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// Nominal rep count used when nothing else seeds a set.
pub const DEFAULT_REPS: u32 = 10;

/// Number of sets seeded for an exercise that does not say otherwise.
pub const DEFAULT_TARGET_SETS: u32 = 3;

fn default_target_sets() -> u32 {
    DEFAULT_TARGET_SETS
}

/// Best known lift for an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Weight in kilograms
    pub weight: f64,
    /// Repetitions performed at that weight
    pub reps: u32,
}

impl PersonalRecord {
    /// Whether this lift beats `other`: heavier, or equal weight for more reps.
    pub fn beats(&self, other: &PersonalRecord) -> bool {
        self.weight > other.weight || (self.weight == other.weight && self.reps > other.reps)
    }
}

/// A set recorded in the previous session of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviousSet {
    /// Weight in kilograms
    pub weight: f64,
    /// Repetitions
    pub reps: u32,
    /// Rest taken after the set
    #[serde(default)]
    pub rest_time_seconds: u32,
}

/// An exercise as supplied by a template or catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Primary muscle group
    #[serde(default)]
    pub muscle_group: String,
    /// Equipment used (barbell, dumbbell, bodyweight, ...)
    #[serde(default)]
    pub equipment_type: String,
    /// Muscles worked
    #[serde(default)]
    pub target_muscles: BTreeSet<String>,
    /// Number of sets to seed when the exercise enters a session
    #[serde(default = "default_target_sets")]
    pub target_sets: u32,
    /// Best known lift
    #[serde(default)]
    pub personal_record: Option<PersonalRecord>,
    /// Sets from the last session, used to seed weight and reps
    #[serde(default)]
    pub last_workout_sets: Vec<PreviousSet>,
    /// Coaching cues
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Exercise {
    /// Create an exercise with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            muscle_group: String::new(),
            equipment_type: String::new(),
            target_muscles: BTreeSet::new(),
            target_sets: DEFAULT_TARGET_SETS,
            personal_record: None,
            last_workout_sets: Vec::new(),
            tips: Vec::new(),
        }
    }

    /// Set the primary muscle group.
    pub fn with_muscle_group(mut self, muscle_group: impl Into<String>) -> Self {
        self.muscle_group = muscle_group.into();
        self
    }

    /// Set the equipment type.
    pub fn with_equipment(mut self, equipment_type: impl Into<String>) -> Self {
        self.equipment_type = equipment_type.into();
        self
    }

    /// Set the muscles worked.
    pub fn with_target_muscles(mut self, muscles: &[&str]) -> Self {
        self.target_muscles = muscles.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Set the number of seeded sets.
    pub fn with_target_sets(mut self, target_sets: u32) -> Self {
        self.target_sets = target_sets;
        self
    }

    /// Set the best known lift.
    pub fn with_personal_record(mut self, weight: f64, reps: u32) -> Self {
        self.personal_record = Some(PersonalRecord { weight, reps });
        self
    }

    /// Set the previous session's sets.
    pub fn with_last_workout_sets(mut self, sets: Vec<PreviousSet>) -> Self {
        self.last_workout_sets = sets;
        self
    }

    /// Set the coaching cues.
    pub fn with_tips(mut self, tips: &[&str]) -> Self {
        self.tips = tips.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Build the initial sets for this exercise.
    ///
    /// Set `i` copies weight and reps from `last_workout_sets[i]`, falling
    /// back to the last recorded set and then to bodyweight at `default_reps`.
    /// At least one set is always produced.
    pub fn seed_sets(&self, default_reps: u32) -> Vec<ExerciseSet> {
        let count = self.target_sets.max(1) as usize;

        (0..count)
            .map(|i| {
                let previous = self
                    .last_workout_sets
                    .get(i)
                    .or_else(|| self.last_workout_sets.last());
                let (weight, reps) = match previous {
                    Some(p) => (p.weight, p.reps.max(1)),
                    None => (0.0, default_reps.max(1)),
                };
                ExerciseSet::new(&self.id, i + 1, weight, reps)
            })
            .collect()
    }
}

/// One set of an exercise within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// Identifier, `<exercise id>-set-<number>`
    pub id: String,
    /// Creation ordinal within the exercise (1-based, unique among its sets)
    pub number: usize,
    /// Weight in kilograms (0 for bodyweight)
    pub weight: f64,
    /// Repetitions
    pub reps: u32,
    /// Whether the set has been completed
    pub completed: bool,
    /// When the set was completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether the set was skipped without being completed
    pub skipped: bool,
}

impl ExerciseSet {
    /// Create a pending set.
    pub fn new(exercise_id: &str, number: usize, weight: f64, reps: u32) -> Self {
        Self {
            id: format!("{}-set-{}", exercise_id, number),
            number,
            weight,
            reps,
            completed: false,
            completed_at: None,
            skipped: false,
        }
    }

    /// Neither completed nor skipped.
    pub fn is_pending(&self) -> bool {
        !self.completed && !self.skipped
    }

    /// Weight moved in this set.
    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

/// Partial update applied by `TimerAction::UpdateSet`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetUpdate {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
}

impl SetUpdate {
    /// Update only the weight.
    pub fn weight(weight: f64) -> Self {
        Self {
            weight: Some(weight),
            reps: None,
        }
    }

    /// Update only the reps.
    pub fn reps(reps: u32) -> Self {
        Self {
            weight: None,
            reps: Some(reps),
        }
    }
}

/// Session-wide defaults that survive a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDefaults {
    /// Rest duration a fresh session starts with
    pub rest_seconds: u32,
    /// Reps for sets with nothing to copy from
    pub reps: u32,
}

impl Default for TimerDefaults {
    fn default() -> Self {
        Self {
            rest_seconds: DEFAULT_REST_SECONDS,
            reps: DEFAULT_REPS,
        }
    }
}

/// State of one workout session.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    /// Exercises in session order
    pub exercises: Vec<Exercise>,
    /// Index of the active exercise
    pub current_exercise_index: usize,
    /// Sets keyed by exercise id
    pub sets_by_exercise: HashMap<String, Vec<ExerciseSet>>,
    /// Whether a rest interval is in progress
    pub is_resting: bool,
    /// Seconds left in the rest interval
    pub rest_seconds_remaining: u32,
    /// Whether the rest countdown is ticking
    pub is_timer_running: bool,
    /// Rest duration used when none is given
    pub default_rest_seconds: u32,
    /// Reps used for sets with nothing to copy from
    pub default_reps: u32,
    /// When the session began
    pub session_start_time: DateTime<Utc>,
    /// Stats panel visibility
    pub show_stats: bool,
    /// Exercise details panel visibility
    pub show_exercise_details: bool,
    /// Set currently open for editing
    pub editing_set_id: Option<String>,
    /// Defaults restored on reset
    pub defaults: TimerDefaults,
}

impl TimerState {
    /// Create an empty session starting at `session_start_time`.
    pub fn new(session_start_time: DateTime<Utc>, defaults: TimerDefaults) -> Self {
        let rest_seconds = defaults.rest_seconds.max(1);

        Self {
            exercises: Vec::new(),
            current_exercise_index: 0,
            sets_by_exercise: HashMap::new(),
            is_resting: false,
            rest_seconds_remaining: rest_seconds,
            is_timer_running: false,
            default_rest_seconds: rest_seconds,
            default_reps: defaults.reps.max(1),
            session_start_time,
            show_stats: false,
            show_exercise_details: false,
            editing_set_id: None,
            defaults,
        }
    }

    /// Sets recorded for an exercise, empty if it has none.
    pub fn sets_for(&self, exercise_id: &str) -> &[ExerciseSet] {
        self.sets_by_exercise
            .get(exercise_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Position of an exercise in the session.
    pub fn exercise_position(&self, exercise_id: &str) -> Option<usize> {
        self.exercises.iter().position(|e| e.id == exercise_id)
    }
}

/// Template category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Push,
    Pull,
    Legs,
    UpperBody,
    LowerBody,
    #[default]
    FullBody,
    Core,
}

impl TemplateCategory {
    /// Get display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateCategory::Push => "Push",
            TemplateCategory::Pull => "Pull",
            TemplateCategory::Legs => "Legs",
            TemplateCategory::UpperBody => "Upper Body",
            TemplateCategory::LowerBody => "Lower Body",
            TemplateCategory::FullBody => "Full Body",
            TemplateCategory::Core => "Core",
        }
    }

    /// Get all categories.
    pub fn all() -> Vec<TemplateCategory> {
        vec![
            TemplateCategory::Push,
            TemplateCategory::Pull,
            TemplateCategory::Legs,
            TemplateCategory::UpperBody,
            TemplateCategory::LowerBody,
            TemplateCategory::FullBody,
            TemplateCategory::Core,
        ]
    }
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Source format of a template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateFormat {
    Toml,
    Json,
}

impl TemplateFormat {
    /// Guess the format from a file extension.
    pub fn from_extension(path: &std::path::Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(TemplateFormat::Toml),
            "json" => Some(TemplateFormat::Json),
            _ => None,
        }
    }
}

/// A named, ordered list of exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// Unique identifier
    pub id: Uuid,
    /// Template name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Category
    pub category: TemplateCategory,
    /// Exercises in order
    pub exercises: Vec<Exercise>,
    /// User-defined tags
    pub tags: Vec<String>,
    /// Original file path, if imported
    pub source_file: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl WorkoutTemplate {
    /// Create a template with the given name and exercises.
    pub fn new(name: String, category: TemplateCategory, exercises: Vec<Exercise>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            category,
            exercises,
            tags: Vec::new(),
            source_file: None,
            created_at: Utc::now(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Total number of sets the template seeds.
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.target_sets.max(1)).sum()
    }
}

/// Errors related to workout operations.
#[derive(Debug, Error)]
pub enum WorkoutError {
    /// Action could not be applied to the current state
    #[error("Action {action} not applied: {reason}")]
    PreconditionNotMet {
        action: &'static str,
        reason: &'static str,
    },

    /// Template not found
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Template parsing failed
    #[error("Failed to parse template: {0}")]
    ParseError(#[from] TemplateParseError),

    /// Session task is no longer running
    #[error("Workout session closed")]
    SessionClosed,
}

/// Errors during template parsing.
#[derive(Debug, Error)]
pub enum TemplateParseError {
    /// Invalid TOML document
    #[error("Invalid TOML: {0}")]
    InvalidToml(String),

    /// Invalid JSON document
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Two exercises share an id
    #[error("Duplicate exercise id: {0}")]
    DuplicateExerciseId(String),

    /// Invalid field value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Unsupported template format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Template with no exercises
    #[error("Template has no exercises")]
    EmptyTemplate,

    /// IO error reading file
    #[error("IO error: {0}")]
    IoError(String),
}
