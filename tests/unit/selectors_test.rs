//! Unit tests for derived workout statistics.

use chrono::{Duration, Utc};

use liftclock::workouts::engine::{reduce, TimerAction};
use liftclock::workouts::selectors::{self, SetPointer};
use liftclock::workouts::types::{Exercise, SetUpdate, TimerDefaults, TimerState};

fn session(exercises: Vec<Exercise>) -> TimerState {
    let now = Utc::now();
    reduce(
        TimerState::new(now, TimerDefaults::default()),
        TimerAction::LoadTemplate(exercises),
        now,
    )
}

fn lift(state: TimerState, exercise_id: &str, set_index: usize, weight: f64, reps: u32) -> TimerState {
    let now = Utc::now();
    let state = reduce(
        state,
        TimerAction::UpdateSet {
            exercise_id: exercise_id.to_string(),
            set_index,
            update: SetUpdate {
                weight: Some(weight),
                reps: Some(reps),
            },
        },
        now,
    );
    reduce(
        state,
        TimerAction::CompleteSet {
            exercise_id: exercise_id.to_string(),
            set_index,
        },
        now,
    )
}

#[test]
fn test_summary_after_partial_workout() {
    let state = session(vec![
        Exercise::new("squat", "Squat")
            .with_target_sets(3)
            .with_personal_record(140.0, 5),
        Exercise::new("lunge", "Lunge").with_target_sets(2),
    ]);
    let state = lift(state, "squat", 0, 100.0, 5);
    let state = lift(state, "squat", 1, 110.0, 3);

    let now = state.session_start_time + Duration::seconds(600);
    let summary = selectors::workout_summary(&state, now);

    assert_eq!(summary.duration_seconds, 600);
    assert_eq!(summary.completed_sets, 2);
    assert_eq!(summary.total_sets, 5);
    assert_eq!(summary.total_volume, 830.0);
    assert_eq!(summary.total_reps, 8);
    assert_eq!(summary.average_intensity, 830.0 / 8.0);
    assert_eq!(summary.progress_percent, 50.0);
    assert!(!summary.is_complete);

    let squat = &summary.exercises[0];
    assert_eq!(squat.completed_sets, 2);
    assert_eq!(squat.best_set.map(|b| b.weight), Some(110.0));
    assert!(!squat.is_personal_record);

    let lunge = &summary.exercises[1];
    assert_eq!(lunge.best_set, None);
    assert!(!lunge.is_personal_record);
}

#[test]
fn test_first_logged_lift_counts_as_record() {
    let state = session(vec![Exercise::new("press", "Press").with_target_sets(1)]);
    let state = lift(state, "press", 0, 40.0, 8);

    let summary = selectors::exercise_summaries(&state);
    assert!(summary[0].is_personal_record);
}

#[test]
fn test_bodyweight_sets_have_zero_volume() {
    let state = session(vec![Exercise::new("pull-up", "Pull-Up").with_target_sets(2)]);
    let state = lift(state, "pull-up", 0, 0.0, 12);

    assert_eq!(selectors::total_volume(&state), 0.0);
    assert_eq!(selectors::total_completed_reps(&state), 12);
    assert_eq!(selectors::average_intensity(&state), 0.0);
}

#[test]
fn test_current_set_index_tracks_current_exercise() {
    let state = session(vec![
        Exercise::new("a", "A").with_target_sets(1),
        Exercise::new("b", "B").with_target_sets(2),
    ]);
    let state = lift(state, "a", 0, 10.0, 10);
    assert_eq!(selectors::current_set_index(&state), SetPointer::AllComplete);

    let state = reduce(state, TimerAction::NextExercise, Utc::now());
    assert_eq!(selectors::current_set_index(&state), SetPointer::At(0));
    assert_eq!(selectors::current_exercise(&state).map(|e| e.id.as_str()), Some("b"));
}

#[test]
fn test_completed_sets_ignore_removed_exercises() {
    let state = session(vec![
        Exercise::new("a", "A").with_target_sets(1),
        Exercise::new("b", "B").with_target_sets(1),
    ]);
    let state = lift(state, "a", 0, 50.0, 5);
    let state = lift(state, "b", 0, 20.0, 10);
    let state = reduce(state, TimerAction::RemoveExercise("a".to_string()), Utc::now());

    assert_eq!(selectors::completed_sets(&state).len(), 1);
    assert_eq!(selectors::total_volume(&state), 200.0);
    assert!(selectors::is_workout_complete(&state));
}
