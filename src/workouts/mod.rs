//! Workout module for timed strength-training sessions.

pub mod clock;
pub mod engine;
pub mod library;
pub mod parser;
pub mod selectors;
pub mod session;
pub mod ticker;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{reduce, transition, Outcome, TimerAction, WorkoutTimer};
pub use library::{SearchCriteria, TemplateLibrary};
pub use parser::{parse_template, parse_template_file};
pub use selectors::{ExerciseSummary, SetPointer, WorkoutSummary};
pub use session::{SessionCommand, SessionHandle, SessionSnapshot, WorkoutSession};
pub use ticker::{RestTick, RestTicker};
pub use types::{
    Exercise, ExerciseSet, PersonalRecord, PreviousSet, SetUpdate, TemplateCategory,
    TemplateFormat, TemplateParseError, TimerDefaults, TimerState, WorkoutError, WorkoutTemplate,
};
