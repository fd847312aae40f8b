//! Read-only values derived from `TimerState`.
//!
//! Nothing here is stored on the state; every consumer recomputes from the
//! same definitions.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workouts::types::{Exercise, ExerciseSet, PersonalRecord, TimerState};

/// Position of the next set to perform in the current exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPointer {
    /// Index of the first pending set
    At(usize),
    /// Every set is completed or skipped
    AllComplete,
}

impl SetPointer {
    /// The index, if a set is pending.
    pub fn index(&self) -> Option<usize> {
        match self {
            SetPointer::At(i) => Some(*i),
            SetPointer::AllComplete => None,
        }
    }
}

/// Per-exercise statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseSummary {
    pub exercise_id: String,
    pub name: String,
    pub completed_sets: usize,
    pub total_sets: usize,
    pub volume: f64,
    /// Heaviest completed set (most reps on ties)
    pub best_set: Option<PersonalRecord>,
    /// Whether the best set beats the known record, or no record existed
    pub is_personal_record: bool,
}

/// Whole-session statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub duration_seconds: u64,
    pub completed_sets: usize,
    pub total_sets: usize,
    pub total_volume: f64,
    pub total_reps: u64,
    pub average_intensity: f64,
    pub progress_percent: f64,
    pub is_complete: bool,
    pub exercises: Vec<ExerciseSummary>,
}

/// The active exercise, absent when the session has none.
pub fn current_exercise(state: &TimerState) -> Option<&Exercise> {
    state.exercises.get(state.current_exercise_index)
}

/// Sets of the active exercise.
pub fn current_exercise_sets(state: &TimerState) -> &[ExerciseSet] {
    current_exercise(state)
        .map(|e| state.sets_for(&e.id))
        .unwrap_or(&[])
}

/// First set of the active exercise that is neither completed nor skipped.
pub fn current_set_index(state: &TimerState) -> SetPointer {
    current_exercise_sets(state)
        .iter()
        .position(ExerciseSet::is_pending)
        .map(SetPointer::At)
        .unwrap_or(SetPointer::AllComplete)
}

/// Completed sets across every exercise in the session, in session order.
pub fn completed_sets(state: &TimerState) -> Vec<&ExerciseSet> {
    state
        .exercises
        .iter()
        .flat_map(|e| state.sets_for(&e.id))
        .filter(|s| s.completed)
        .collect()
}

/// Sum of `weight * reps` over completed sets.
pub fn total_volume(state: &TimerState) -> f64 {
    completed_sets(state).iter().map(|s| s.volume()).sum()
}

/// Reps performed across completed sets.
pub fn total_completed_reps(state: &TimerState) -> u64 {
    completed_sets(state).iter().map(|s| s.reps as u64).sum()
}

/// Average load per completed rep, 0 when nothing is completed.
pub fn average_intensity(state: &TimerState) -> f64 {
    let reps = total_completed_reps(state);
    if reps == 0 {
        return 0.0;
    }
    total_volume(state) / reps as f64
}

/// Whole seconds since the session started.
pub fn workout_duration_seconds(state: &TimerState, now: DateTime<Utc>) -> u64 {
    (now - state.session_start_time).num_seconds().max(0) as u64
}

/// Position of the active exercise as a percentage of the session.
pub fn workout_progress_percent(state: &TimerState) -> f64 {
    if state.exercises.is_empty() {
        return 0.0;
    }
    (state.current_exercise_index + 1) as f64 / state.exercises.len() as f64 * 100.0
}

/// Whether the rest countdown should be ticking.
pub fn is_countdown_active(state: &TimerState) -> bool {
    state.is_timer_running && state.rest_seconds_remaining > 0
}

/// Every set of every exercise is completed or skipped.
pub fn is_workout_complete(state: &TimerState) -> bool {
    !state.exercises.is_empty()
        && state
            .exercises
            .iter()
            .all(|e| state.sets_for(&e.id).iter().all(|s| !s.is_pending()))
}

/// Statistics for each exercise in session order.
pub fn exercise_summaries(state: &TimerState) -> Vec<ExerciseSummary> {
    state
        .exercises
        .iter()
        .map(|exercise| {
            let sets = state.sets_for(&exercise.id);
            let completed: Vec<&ExerciseSet> = sets.iter().filter(|s| s.completed).collect();

            let best_set = completed
                .iter()
                .map(|s| PersonalRecord {
                    weight: s.weight,
                    reps: s.reps,
                })
                .fold(None, |best: Option<PersonalRecord>, candidate| match best {
                    Some(b) if !candidate.beats(&b) => Some(b),
                    _ => Some(candidate),
                });

            let is_personal_record = match (&best_set, &exercise.personal_record) {
                (Some(best), Some(record)) => best.beats(record),
                (Some(_), None) => true,
                (None, _) => false,
            };

            ExerciseSummary {
                exercise_id: exercise.id.clone(),
                name: exercise.name.clone(),
                completed_sets: completed.len(),
                total_sets: sets.len(),
                volume: completed.iter().map(|s| s.volume()).sum(),
                best_set,
                is_personal_record,
            }
        })
        .collect()
}

/// Statistics for the whole session.
pub fn workout_summary(state: &TimerState, now: DateTime<Utc>) -> WorkoutSummary {
    let exercises = exercise_summaries(state);

    WorkoutSummary {
        duration_seconds: workout_duration_seconds(state, now),
        completed_sets: exercises.iter().map(|e| e.completed_sets).sum(),
        total_sets: exercises.iter().map(|e| e.total_sets).sum(),
        total_volume: total_volume(state),
        total_reps: total_completed_reps(state),
        average_intensity: average_intensity(state),
        progress_percent: workout_progress_percent(state),
        is_complete: is_workout_complete(state),
        exercises,
    }
}
