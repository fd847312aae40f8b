//! liftclock - Strength Training Workout Timer
//!
//! Main entry point. Runs one workout session in the terminal.
//!
//! Usage: `liftclock [template name | template file]`

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use liftclock::storage::config::{load_config, AppConfig};
use liftclock::workouts::{TemplateLibrary, TimerAction, WorkoutError, WorkoutSession, WorkoutTimer};

mod console;

use console::ConsoleCommand;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting liftclock v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().unwrap_or_else(|e| {
        tracing::warn!("Using default configuration: {}", e);
        AppConfig::default()
    });

    let mut library = TemplateLibrary::with_builtins();
    if let Some(dir) = &config.templates.template_dir {
        if let Err(e) = library.load_dir(dir) {
            tracing::warn!("Could not read template directory {}: {}", dir.display(), e);
        }
    }

    let template = library
        .resolve(std::env::args().nth(1).as_deref())
        .context("failed to load workout template")?;
    tracing::info!(
        "Loaded template '{}' with {} exercises",
        template.name,
        template.exercises.len()
    );

    let timer = WorkoutTimer::new(config.timer.defaults());
    let (session, handle) = WorkoutSession::new(timer, config.timer.tick_period());
    let session_task = tokio::spawn(session.run());

    handle
        .dispatch(TimerAction::LoadTemplate(template.exercises))
        .await?;

    // Redraw the countdown line whenever the remaining rest changes
    let mut updates = handle.subscribe();
    let countdown_task = tokio::spawn(async move {
        let mut last_remaining = None;
        while updates.changed().await.is_ok() {
            let (resting, remaining) = {
                let snapshot = updates.borrow();
                (snapshot.state.is_resting, snapshot.state.rest_seconds_remaining)
            };
            if resting && last_remaining != Some(remaining) {
                println!("rest {}", console::format_clock(remaining as u64));
            }
            last_remaining = resting.then_some(remaining);
        }
    });

    println!("{}", console::HELP);
    println!("{}", console::render(&handle.snapshot()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match console::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{}", console::HELP),
            ConsoleCommand::Summary => {
                let summary = handle.snapshot().summary;
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            command => {
                let Some(action) = console::to_action(&command, &handle.snapshot()) else {
                    println!("Nothing to act on.");
                    continue;
                };
                let snapshot = match handle.apply(action).await {
                    Ok(snapshot) => snapshot,
                    Err(WorkoutError::SessionClosed) => break,
                    Err(e) => return Err(e.into()),
                };
                println!("{}", console::render(&snapshot));
            }
        }
    }

    let summary = handle.snapshot().summary;
    println!(
        "Finished: {} sets, {:.1} kg volume in {}",
        summary.completed_sets,
        summary.total_volume,
        console::format_clock(summary.duration_seconds)
    );

    match handle.shutdown().await {
        Ok(()) | Err(WorkoutError::SessionClosed) => {}
        Err(e) => return Err(e.into()),
    }
    session_task.await.context("session task panicked")?;
    countdown_task.abort();

    Ok(())
}
