//! liftclock - Strength Training Workout Timer
//!
//! Tracks a workout session exercise by exercise: which set is next, the
//! rest countdown between sets, the weight and reps recorded for each set,
//! and the statistics derived from them.

pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use storage::config::AppConfig;
pub use workouts::engine::{TimerAction, WorkoutTimer};
pub use workouts::session::{SessionHandle, WorkoutSession};
