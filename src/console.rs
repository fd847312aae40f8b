//! Line-oriented terminal front end for a workout session.

use liftclock::workouts::selectors;
use liftclock::workouts::{SessionSnapshot, SetPointer, SetUpdate, TimerAction};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Complete a set of the current exercise (next pending set if omitted)
    Done(Option<usize>),
    Skip(Option<usize>),
    Weight { set: usize, weight: f64 },
    Reps { set: usize, reps: u32 },
    AddSet,
    RemoveSet(usize),
    Next,
    Previous,
    Select(usize),
    Rest(Option<u32>),
    Pause,
    Resume,
    Stop,
    DefaultRest(u32),
    Stats,
    Details,
    Summary,
    Reset,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  done [set]          complete a set (next pending set by default)
  skip [set]          skip a set without resting
  weight <set> <kg>   change a set's weight
  reps <set> <n>      change a set's reps
  add                 add a set to the current exercise
  remove <set>        remove a set
  next | prev | go <n>  move between exercises
  rest [secs]         start resting
  pause | resume | stop  control the rest countdown
  default <secs>      change the default rest
  stats | details     toggle panels
  summary             print session statistics as JSON
  reset               start over
  quit";

/// Parse one input line. Set and exercise numbers are 1-based.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or_else(|| "empty command".to_string())?;
    let args: Vec<&str> = words.collect();

    let parsed = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("done" | "d", []) => ConsoleCommand::Done(None),
        ("done" | "d", [set]) => ConsoleCommand::Done(Some(position(set)?)),
        ("skip", []) => ConsoleCommand::Skip(None),
        ("skip", [set]) => ConsoleCommand::Skip(Some(position(set)?)),
        ("weight" | "w", [set, weight]) => ConsoleCommand::Weight {
            set: position(set)?,
            weight: weight
                .parse()
                .map_err(|_| format!("invalid weight: {}", weight))?,
        },
        ("reps" | "r", [set, reps]) => ConsoleCommand::Reps {
            set: position(set)?,
            reps: reps.parse().map_err(|_| format!("invalid reps: {}", reps))?,
        },
        ("add", []) => ConsoleCommand::AddSet,
        ("remove", [set]) => ConsoleCommand::RemoveSet(position(set)?),
        ("next" | "n", []) => ConsoleCommand::Next,
        ("prev" | "p", []) => ConsoleCommand::Previous,
        ("go", [exercise]) => ConsoleCommand::Select(position(exercise)?),
        ("rest", []) => ConsoleCommand::Rest(None),
        ("rest", [secs]) => ConsoleCommand::Rest(Some(seconds(secs)?)),
        ("pause", []) => ConsoleCommand::Pause,
        ("resume", []) => ConsoleCommand::Resume,
        ("stop", []) => ConsoleCommand::Stop,
        ("default", [secs]) => ConsoleCommand::DefaultRest(seconds(secs)?),
        ("stats", []) => ConsoleCommand::Stats,
        ("details", []) => ConsoleCommand::Details,
        ("summary", []) => ConsoleCommand::Summary,
        ("reset", []) => ConsoleCommand::Reset,
        ("help" | "?", []) => ConsoleCommand::Help,
        ("quit" | "q" | "exit", []) => ConsoleCommand::Quit,
        _ => return Err(format!("unknown command: {}", line.trim())),
    };

    Ok(parsed)
}

fn position(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a number from 1: {}", word)),
    }
}

fn seconds(word: &str) -> Result<u32, String> {
    word.parse()
        .map_err(|_| format!("invalid seconds: {}", word))
}

/// Turn a command into a timer action against the current snapshot.
///
/// Returns `None` for commands handled by the console itself, or when there
/// is no exercise to act on.
pub fn to_action(command: &ConsoleCommand, snapshot: &SessionSnapshot) -> Option<TimerAction> {
    let exercise_id = || selectors::current_exercise(&snapshot.state).map(|e| e.id.clone());
    let pending = || snapshot.current_set.index();

    let action = match command {
        ConsoleCommand::Done(set) => TimerAction::CompleteSet {
            exercise_id: exercise_id()?,
            set_index: (*set).or_else(pending)?,
        },
        ConsoleCommand::Skip(set) => TimerAction::SkipSet {
            exercise_id: exercise_id()?,
            set_index: (*set).or_else(pending)?,
        },
        ConsoleCommand::Weight { set, weight } => TimerAction::UpdateSet {
            exercise_id: exercise_id()?,
            set_index: *set,
            update: SetUpdate::weight(*weight),
        },
        ConsoleCommand::Reps { set, reps } => TimerAction::UpdateSet {
            exercise_id: exercise_id()?,
            set_index: *set,
            update: SetUpdate::reps(*reps),
        },
        ConsoleCommand::AddSet => TimerAction::AddSet(exercise_id()?),
        ConsoleCommand::RemoveSet(set) => TimerAction::RemoveSet {
            exercise_id: exercise_id()?,
            set_index: *set,
        },
        ConsoleCommand::Next => TimerAction::NextExercise,
        ConsoleCommand::Previous => TimerAction::PreviousExercise,
        ConsoleCommand::Select(index) => TimerAction::SelectExercise(*index),
        ConsoleCommand::Rest(secs) => TimerAction::StartRest(*secs),
        ConsoleCommand::Pause => TimerAction::PauseTimer,
        ConsoleCommand::Resume => TimerAction::ResumeTimer,
        ConsoleCommand::Stop => TimerAction::StopRest,
        ConsoleCommand::DefaultRest(secs) => TimerAction::SetDefaultRestSeconds(*secs),
        ConsoleCommand::Stats => TimerAction::ToggleStats,
        ConsoleCommand::Details => TimerAction::ToggleExerciseDetails,
        ConsoleCommand::Reset => TimerAction::ResetSession,
        ConsoleCommand::Summary | ConsoleCommand::Help | ConsoleCommand::Quit => return None,
    };

    Some(action)
}

/// Format seconds as `mm:ss`.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Render the current exercise and its sets.
pub fn render(snapshot: &SessionSnapshot) -> String {
    let state = &snapshot.state;
    let Some(exercise) = selectors::current_exercise(state) else {
        return "No exercises loaded.".to_string();
    };

    let mut out = format!(
        "[{}/{}] {}  ({:.0}%)  elapsed {}\n",
        state.current_exercise_index + 1,
        state.exercises.len(),
        exercise.name,
        snapshot.summary.progress_percent,
        format_clock(snapshot.summary.duration_seconds),
    );

    if state.show_exercise_details {
        if !exercise.target_muscles.is_empty() {
            let muscles: Vec<&str> = exercise.target_muscles.iter().map(String::as_str).collect();
            out.push_str(&format!("  targets: {}\n", muscles.join(", ")));
        }
        if let Some(record) = &exercise.personal_record {
            out.push_str(&format!("  record: {} kg x {}\n", record.weight, record.reps));
        }
        for tip in &exercise.tips {
            out.push_str(&format!("  tip: {}\n", tip));
        }
    }

    for (i, set) in selectors::current_exercise_sets(state).iter().enumerate() {
        let marker = if set.completed {
            "x"
        } else if set.skipped {
            "-"
        } else if snapshot.current_set == SetPointer::At(i) {
            ">"
        } else {
            " "
        };
        out.push_str(&format!(
            "  {} set {}: {} kg x {}\n",
            marker,
            i + 1,
            set.weight,
            set.reps
        ));
    }

    if state.is_resting {
        let status = if state.is_timer_running { "" } else { " (paused)" };
        out.push_str(&format!(
            "  rest {}{}\n",
            format_clock(state.rest_seconds_remaining as u64),
            status
        ));
    }

    if state.show_stats {
        out.push_str(&format!(
            "  sets {}/{}  volume {:.1} kg  avg {:.1} kg/rep\n",
            snapshot.summary.completed_sets,
            snapshot.summary.total_sets,
            snapshot.summary.total_volume,
            snapshot.summary.average_intensity,
        ));
    }

    out
}
