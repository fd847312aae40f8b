//! Workout timer engine.
//!
//! `transition` is the single state-transition function: it takes the
//! previous `TimerState` by value and returns the next one. Actions that do
//! not apply to the current state leave it untouched and report why through
//! `Outcome::Ignored`. `WorkoutTimer` owns a state and a clock and is what
//! hosts drive.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

use crate::workouts::clock::{Clock, SystemClock};
use crate::workouts::selectors::{self, SetPointer, WorkoutSummary};
use crate::workouts::types::{
    Exercise, ExerciseSet, SetUpdate, TimerDefaults, TimerState, WorkoutError,
};

/// Every operation the timer accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerAction {
    /// Replace the exercise list and go back to the first exercise
    LoadTemplate(Vec<Exercise>),
    /// Append an exercise
    AddExercise(Exercise),
    /// Remove an exercise and its sets
    RemoveExercise(String),
    NextExercise,
    PreviousExercise,
    /// Jump to an exercise by position
    SelectExercise(usize),
    /// Change weight and/or reps of a set
    UpdateSet {
        exercise_id: String,
        set_index: usize,
        update: SetUpdate,
    },
    /// Mark a set done and start resting
    CompleteSet {
        exercise_id: String,
        set_index: usize,
    },
    /// Move past a set without completing it
    SkipSet {
        exercise_id: String,
        set_index: usize,
    },
    /// Append a set copying the previous one
    AddSet(String),
    /// Remove a set, keeping at least one
    RemoveSet {
        exercise_id: String,
        set_index: usize,
    },
    /// Start resting, for the default duration unless one is given
    StartRest(Option<u32>),
    PauseTimer,
    ResumeTimer,
    /// Skip the rest of the current rest interval
    StopRest,
    /// One second of rest elapsed
    Tick,
    SetDefaultRestSeconds(u32),
    /// Discard the session and start a fresh one
    ResetSession,
    ToggleStats,
    ToggleExerciseDetails,
    /// Open a set for editing, or close the editor with `None`
    EditSet(Option<String>),
}

impl TimerAction {
    /// Action name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            TimerAction::LoadTemplate(_) => "load_template",
            TimerAction::AddExercise(_) => "add_exercise",
            TimerAction::RemoveExercise(_) => "remove_exercise",
            TimerAction::NextExercise => "next_exercise",
            TimerAction::PreviousExercise => "previous_exercise",
            TimerAction::SelectExercise(_) => "select_exercise",
            TimerAction::UpdateSet { .. } => "update_set",
            TimerAction::CompleteSet { .. } => "complete_set",
            TimerAction::SkipSet { .. } => "skip_set",
            TimerAction::AddSet(_) => "add_set",
            TimerAction::RemoveSet { .. } => "remove_set",
            TimerAction::StartRest(_) => "start_rest",
            TimerAction::PauseTimer => "pause_timer",
            TimerAction::ResumeTimer => "resume_timer",
            TimerAction::StopRest => "stop_rest",
            TimerAction::Tick => "tick",
            TimerAction::SetDefaultRestSeconds(_) => "set_default_rest_seconds",
            TimerAction::ResetSession => "reset_session",
            TimerAction::ToggleStats => "toggle_stats",
            TimerAction::ToggleExerciseDetails => "toggle_exercise_details",
            TimerAction::EditSet(_) => "edit_set",
        }
    }
}

/// Result of applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// State left unchanged, with the reason
    Ignored(&'static str),
}

/// Apply `action` to `state` at time `now`.
pub fn transition(
    mut state: TimerState,
    action: TimerAction,
    now: DateTime<Utc>,
) -> (TimerState, Outcome) {
    let outcome = apply(&mut state, action, now);
    (state, outcome)
}

/// Apply `action` and return only the next state.
pub fn reduce(state: TimerState, action: TimerAction, now: DateTime<Utc>) -> TimerState {
    transition(state, action, now).0
}

fn apply(state: &mut TimerState, action: TimerAction, now: DateTime<Utc>) -> Outcome {
    match action {
        TimerAction::LoadTemplate(exercises) => {
            let mut seen = HashSet::new();
            let exercises: Vec<Exercise> = exercises
                .into_iter()
                .filter(|e| !e.id.is_empty() && seen.insert(e.id.clone()))
                .collect();

            let default_reps = state.default_reps;
            state
                .sets_by_exercise
                .retain(|id, _| exercises.iter().any(|e| &e.id == id));
            for exercise in &exercises {
                state
                    .sets_by_exercise
                    .entry(exercise.id.clone())
                    .or_insert_with(|| exercise.seed_sets(default_reps));
            }

            state.exercises = exercises;
            state.current_exercise_index = 0;
            clear_dangling_edit(state);
            Outcome::Applied
        }

        TimerAction::AddExercise(exercise) => {
            if exercise.id.is_empty() {
                return Outcome::Ignored("exercise has no id");
            }
            if state.exercise_position(&exercise.id).is_some() {
                return Outcome::Ignored("exercise already in session");
            }

            let sets = exercise.seed_sets(state.default_reps);
            state
                .sets_by_exercise
                .entry(exercise.id.clone())
                .or_insert(sets);
            state.exercises.push(exercise);
            Outcome::Applied
        }

        TimerAction::RemoveExercise(exercise_id) => {
            let Some(position) = state.exercise_position(&exercise_id) else {
                return Outcome::Ignored("unknown exercise");
            };

            state.exercises.remove(position);
            state.sets_by_exercise.remove(&exercise_id);
            if state.current_exercise_index >= state.exercises.len() {
                state.current_exercise_index = state.exercises.len().saturating_sub(1);
            }
            clear_dangling_edit(state);
            Outcome::Applied
        }

        TimerAction::NextExercise => {
            if state.current_exercise_index + 1 >= state.exercises.len() {
                return Outcome::Ignored("already at last exercise");
            }
            state.current_exercise_index += 1;
            end_rest(state);
            Outcome::Applied
        }

        TimerAction::PreviousExercise => {
            if state.current_exercise_index == 0 {
                return Outcome::Ignored("already at first exercise");
            }
            state.current_exercise_index -= 1;
            end_rest(state);
            Outcome::Applied
        }

        TimerAction::SelectExercise(index) => {
            if index >= state.exercises.len() {
                return Outcome::Ignored("exercise index out of range");
            }
            state.current_exercise_index = index;
            end_rest(state);
            Outcome::Applied
        }

        TimerAction::UpdateSet {
            exercise_id,
            set_index,
            update,
        } => {
            let Some(set) = set_mut(state, &exercise_id, set_index) else {
                return Outcome::Ignored("unknown set");
            };

            let mut changed = false;
            if let Some(weight) = update.weight.filter(|w| w.is_finite() && *w >= 0.0) {
                set.weight = weight;
                changed = true;
            }
            if let Some(reps) = update.reps.filter(|r| *r > 0) {
                set.reps = reps;
                changed = true;
            }

            if changed {
                Outcome::Applied
            } else {
                Outcome::Ignored("no valid fields in update")
            }
        }

        TimerAction::CompleteSet {
            exercise_id,
            set_index,
        } => {
            let Some(set) = set_mut(state, &exercise_id, set_index) else {
                return Outcome::Ignored("unknown set");
            };
            if set.completed {
                return Outcome::Ignored("set already completed");
            }

            set.completed = true;
            set.completed_at = Some(now);
            set.skipped = false;
            let rest = state.default_rest_seconds;
            begin_rest(state, rest);
            Outcome::Applied
        }

        TimerAction::SkipSet {
            exercise_id,
            set_index,
        } => {
            let Some(set) = set_mut(state, &exercise_id, set_index) else {
                return Outcome::Ignored("unknown set");
            };
            if !set.is_pending() {
                return Outcome::Ignored("set already completed or skipped");
            }

            set.skipped = true;
            Outcome::Applied
        }

        TimerAction::AddSet(exercise_id) => {
            if state.exercise_position(&exercise_id).is_none() {
                return Outcome::Ignored("unknown exercise");
            }

            let default_reps = state.default_reps;
            let sets = state.sets_by_exercise.entry(exercise_id.clone()).or_default();
            let number = sets.iter().map(|s| s.number).max().unwrap_or(0) + 1;
            let (weight, reps) = sets
                .last()
                .map(|s| (s.weight, s.reps))
                .unwrap_or((0.0, default_reps));

            sets.push(ExerciseSet::new(&exercise_id, number, weight, reps));
            Outcome::Applied
        }

        TimerAction::RemoveSet {
            exercise_id,
            set_index,
        } => {
            let Some(sets) = state.sets_by_exercise.get_mut(&exercise_id) else {
                return Outcome::Ignored("unknown exercise");
            };
            if set_index >= sets.len() {
                return Outcome::Ignored("unknown set");
            }
            if sets.len() <= 1 {
                return Outcome::Ignored("exercise must keep one set");
            }

            let removed = sets.remove(set_index);
            if state.editing_set_id.as_deref() == Some(removed.id.as_str()) {
                state.editing_set_id = None;
            }
            Outcome::Applied
        }

        TimerAction::StartRest(duration) => {
            let seconds = duration.unwrap_or(state.default_rest_seconds);
            begin_rest(state, seconds);
            Outcome::Applied
        }

        TimerAction::PauseTimer => {
            if !state.is_timer_running {
                return Outcome::Ignored("timer not running");
            }
            state.is_timer_running = false;
            Outcome::Applied
        }

        TimerAction::ResumeTimer => {
            if !state.is_resting {
                return Outcome::Ignored("no rest in progress");
            }
            if state.is_timer_running {
                return Outcome::Ignored("timer already running");
            }
            state.is_timer_running = true;
            Outcome::Applied
        }

        TimerAction::StopRest => {
            if !state.is_resting && !state.is_timer_running {
                return Outcome::Ignored("no rest in progress");
            }
            end_rest(state);
            Outcome::Applied
        }

        TimerAction::Tick => {
            if !state.is_timer_running {
                return Outcome::Ignored("timer not running");
            }
            if state.rest_seconds_remaining == 0 {
                return Outcome::Ignored("no rest time remaining");
            }

            state.rest_seconds_remaining -= 1;
            if state.rest_seconds_remaining == 0 {
                end_rest(state);
            }
            Outcome::Applied
        }

        TimerAction::SetDefaultRestSeconds(seconds) => {
            if seconds == 0 {
                return Outcome::Ignored("rest must be at least one second");
            }
            state.default_rest_seconds = seconds;
            if !state.is_resting {
                state.rest_seconds_remaining = seconds;
            }
            Outcome::Applied
        }

        TimerAction::ResetSession => {
            *state = TimerState::new(now, state.defaults);
            Outcome::Applied
        }

        TimerAction::ToggleStats => {
            state.show_stats = !state.show_stats;
            Outcome::Applied
        }

        TimerAction::ToggleExerciseDetails => {
            state.show_exercise_details = !state.show_exercise_details;
            Outcome::Applied
        }

        TimerAction::EditSet(set_id) => {
            if let Some(id) = &set_id {
                if !set_exists(state, id) {
                    return Outcome::Ignored("unknown set");
                }
            }
            state.editing_set_id = set_id;
            Outcome::Applied
        }
    }
}

fn set_mut<'a>(
    state: &'a mut TimerState,
    exercise_id: &str,
    set_index: usize,
) -> Option<&'a mut ExerciseSet> {
    state.exercise_position(exercise_id)?;
    state
        .sets_by_exercise
        .get_mut(exercise_id)?
        .get_mut(set_index)
}

fn set_exists(state: &TimerState, set_id: &str) -> bool {
    state
        .exercises
        .iter()
        .flat_map(|e| state.sets_for(&e.id))
        .any(|s| s.id == set_id)
}

fn clear_dangling_edit(state: &mut TimerState) {
    if let Some(id) = state.editing_set_id.as_deref() {
        if !set_exists(state, id) {
            state.editing_set_id = None;
        }
    }
}

// A zero-length rest stays resting with nothing to count down until stopped.
fn begin_rest(state: &mut TimerState, seconds: u32) {
    state.is_resting = true;
    state.rest_seconds_remaining = seconds;
    state.is_timer_running = true;
}

fn end_rest(state: &mut TimerState) {
    state.is_resting = false;
    state.is_timer_running = false;
    state.rest_seconds_remaining = state.default_rest_seconds;
}

/// Owns one session's state and the clock used to stamp it.
pub struct WorkoutTimer {
    state: TimerState,
    clock: Arc<dyn Clock>,
}

impl WorkoutTimer {
    /// Create a timer on the system clock.
    pub fn new(defaults: TimerDefaults) -> Self {
        Self::with_clock(defaults, Arc::new(SystemClock))
    }

    /// Create a timer on the given clock.
    pub fn with_clock(defaults: TimerDefaults, clock: Arc<dyn Clock>) -> Self {
        let state = TimerState::new(clock.now(), defaults);
        Self { state, clock }
    }

    /// Apply an action. Actions that do not fit the current state are
    /// dropped without notice.
    pub fn dispatch(&mut self, action: TimerAction) {
        let _ = self.apply_action(action);
    }

    /// Apply an action, reporting actions that left the state unchanged.
    pub fn try_dispatch(&mut self, action: TimerAction) -> Result<(), WorkoutError> {
        let name = action.name();
        match self.apply_action(action) {
            Outcome::Applied => Ok(()),
            Outcome::Ignored(reason) => Err(WorkoutError::PreconditionNotMet {
                action: name,
                reason,
            }),
        }
    }

    fn apply_action(&mut self, action: TimerAction) -> Outcome {
        let name = action.name();
        let now = self.clock.now();
        let was_resting = self.state.is_resting;
        let defaults = self.state.defaults;

        let previous = std::mem::replace(&mut self.state, TimerState::new(now, defaults));
        let (next, outcome) = transition(previous, action, now);
        self.state = next;

        if outcome == Outcome::Applied {
            tracing::debug!(action = name, "Timer action applied");
            match (was_resting, self.state.is_resting) {
                (false, true) => {
                    tracing::info!("Rest started: {}s", self.state.rest_seconds_remaining)
                }
                (true, false) => tracing::info!("Rest finished"),
                _ => {}
            }
        }

        outcome
    }

    /// Get the current state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Get the clock's current time.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Get the active exercise.
    pub fn current_exercise(&self) -> Option<&Exercise> {
        selectors::current_exercise(&self.state)
    }

    /// Get the sets of the active exercise.
    pub fn current_exercise_sets(&self) -> &[ExerciseSet] {
        selectors::current_exercise_sets(&self.state)
    }

    /// Get the next set to perform.
    pub fn current_set_index(&self) -> SetPointer {
        selectors::current_set_index(&self.state)
    }

    /// Total volume of completed sets.
    pub fn total_volume(&self) -> f64 {
        selectors::total_volume(&self.state)
    }

    /// Seconds since the session started.
    pub fn workout_duration_seconds(&self) -> u64 {
        selectors::workout_duration_seconds(&self.state, self.clock.now())
    }

    /// Check if the rest countdown should be ticking.
    pub fn is_countdown_active(&self) -> bool {
        selectors::is_countdown_active(&self.state)
    }

    /// Session statistics as of now.
    pub fn summary(&self) -> WorkoutSummary {
        selectors::workout_summary(&self.state, self.clock.now())
    }
}

impl Default for WorkoutTimer {
    fn default() -> Self {
        Self::new(TimerDefaults::default())
    }
}
