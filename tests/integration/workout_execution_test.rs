//! Integration tests for a full workout.
//!
//! Loads a built-in template, works through every set with rests in between,
//! and checks the statistics at the end.

use chrono::{Duration, Utc};
use std::sync::Arc;

use liftclock::workouts::engine::{TimerAction, WorkoutTimer};
use liftclock::workouts::library::TemplateLibrary;
use liftclock::workouts::selectors::{self, SetPointer};
use liftclock::workouts::types::{SetUpdate, TimerDefaults};
use liftclock::workouts::ManualClock;

#[test]
fn test_complete_push_day() {
    let library = TemplateLibrary::with_builtins();
    let template = library.get_by_name("Push Day").expect("built-in template");
    let expected_sets = template.total_sets() as usize;

    let clock = ManualClock::new(Utc::now());
    let mut timer = WorkoutTimer::with_clock(TimerDefaults::default(), Arc::new(clock.clone()));
    timer.dispatch(TimerAction::LoadTemplate(template.exercises.clone()));
    timer.dispatch(TimerAction::SetDefaultRestSeconds(60));

    let mut expected_volume = 0.0;
    loop {
        let exercise_id = timer.current_exercise().expect("exercise").id.clone();

        while let SetPointer::At(set_index) = timer.current_set_index() {
            let set = &timer.current_exercise_sets()[set_index];
            let weight = if set.weight > 0.0 { set.weight + 2.5 } else { 20.0 };
            timer.dispatch(TimerAction::UpdateSet {
                exercise_id: exercise_id.clone(),
                set_index,
                update: SetUpdate::weight(weight),
            });
            let reps = timer.current_exercise_sets()[set_index].reps;
            expected_volume += weight * reps as f64;

            clock.advance(Duration::seconds(40));
            timer.dispatch(TimerAction::CompleteSet {
                exercise_id: exercise_id.clone(),
                set_index,
            });
            assert_eq!(timer.state().rest_seconds_remaining, 60);

            while timer.is_countdown_active() {
                clock.advance(Duration::seconds(1));
                timer.dispatch(TimerAction::Tick);
            }
        }

        if timer.state().current_exercise_index + 1 == timer.state().exercises.len() {
            break;
        }
        timer.dispatch(TimerAction::NextExercise);
    }

    let summary = timer.summary();
    assert!(summary.is_complete);
    assert_eq!(summary.completed_sets, expected_sets);
    assert_eq!(summary.total_volume, expected_volume);
    assert_eq!(summary.progress_percent, 100.0);
    assert_eq!(summary.duration_seconds, expected_sets as u64 * 100);

    // 87.5 kg does not beat the 100 kg record
    let bench = &summary.exercises[0];
    assert_eq!(bench.best_set.map(|b| b.weight), Some(87.5));
    assert!(!bench.is_personal_record);
}

#[test]
fn test_skip_remaining_sets_and_move_on() {
    let library = TemplateLibrary::with_builtins();
    let template = library.get_by_name("Leg Day").expect("built-in template");

    let mut timer = WorkoutTimer::default();
    timer.dispatch(TimerAction::LoadTemplate(template.exercises.clone()));
    timer.dispatch(TimerAction::CompleteSet {
        exercise_id: "back-squat".to_string(),
        set_index: 0,
    });

    for set_index in 1..5 {
        timer.dispatch(TimerAction::SkipSet {
            exercise_id: "back-squat".to_string(),
            set_index,
        });
    }

    assert_eq!(timer.current_set_index(), SetPointer::AllComplete);
    assert_eq!(selectors::completed_sets(timer.state()).len(), 1);
    // Skipping never interrupts the rest started by the completed set
    assert!(timer.state().is_resting);

    timer.dispatch(TimerAction::NextExercise);
    assert_eq!(
        timer.current_exercise().map(|e| e.id.as_str()),
        Some("romanian-deadlift")
    );
    assert!(!timer.state().is_resting);
}
