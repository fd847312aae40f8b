//! Workout session service.
//!
//! A session is a single task that owns the `WorkoutTimer`. Hosts talk to it
//! through a cloneable `SessionHandle`; actions are applied one at a time in
//! arrival order. The session runs a `RestTicker` exactly while the rest
//! countdown is active and publishes a snapshot after every change.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};

use crate::workouts::engine::{TimerAction, WorkoutTimer};
use crate::workouts::selectors::{self, SetPointer, WorkoutSummary};
use crate::workouts::ticker::{RestTick, RestTicker};
use crate::workouts::types::{TimerState, WorkoutError};

/// Commands accepted by the session task.
#[derive(Debug)]
pub enum SessionCommand {
    Dispatch(TimerAction),
    /// Dispatch and reply with the snapshot taken right after the action
    Apply(TimerAction, oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// What a presentation layer renders.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: TimerState,
    pub current_set: SetPointer,
    pub summary: WorkoutSummary,
}

impl SessionSnapshot {
    fn capture(timer: &WorkoutTimer) -> Self {
        Self {
            state: timer.state().clone(),
            current_set: timer.current_set_index(),
            summary: timer.summary(),
        }
    }
}

/// Handle for driving a running session.
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Queue an action.
    pub async fn dispatch(&self, action: TimerAction) -> Result<(), WorkoutError> {
        self.cmd_tx
            .send(SessionCommand::Dispatch(action))
            .await
            .map_err(|_| WorkoutError::SessionClosed)
    }

    /// Apply an action and wait for the snapshot it produced.
    pub async fn apply(&self, action: TimerAction) -> Result<SessionSnapshot, WorkoutError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(SessionCommand::Apply(action, reply_tx))
            .await
            .map_err(|_| WorkoutError::SessionClosed)?;
        reply_rx.await.map_err(|_| WorkoutError::SessionClosed)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Ask the session task to stop.
    pub async fn shutdown(&self) -> Result<(), WorkoutError> {
        self.cmd_tx
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| WorkoutError::SessionClosed)
    }
}

/// The session task.
pub struct WorkoutSession {
    timer: WorkoutTimer,
    tick_period: Duration,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    tick_tx: mpsc::Sender<RestTick>,
    tick_rx: mpsc::Receiver<RestTick>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    ticker: Option<RestTicker>,
    next_generation: u64,
}

impl WorkoutSession {
    /// Create a session around `timer` and return a handle to communicate
    /// with it. `tick_period` is the wall time of one rest second.
    pub fn new(timer: WorkoutTimer, tick_period: Duration) -> (Self, SessionHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (tick_tx, tick_rx) = mpsc::channel(8);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::capture(&timer));

        let session = Self {
            timer,
            tick_period,
            cmd_rx,
            tick_tx,
            tick_rx,
            snapshot_tx,
            ticker: None,
            next_generation: 0,
        };

        let handle = SessionHandle {
            cmd_tx,
            snapshot_rx,
        };

        (session, handle)
    }

    /// Run the session event loop until shut down or every handle is dropped.
    pub async fn run(mut self) {
        tracing::info!("Workout session started");

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(SessionCommand::Dispatch(action)) => {
                        self.apply(action);
                    }
                    Some(SessionCommand::Apply(action, reply)) => {
                        let snapshot = self.apply(action);
                        let _ = reply.send(snapshot);
                    }
                    Some(SessionCommand::Shutdown) | None => break,
                },
                Some(tick) = self.tick_rx.recv() => self.on_tick(tick),
            }
        }

        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        tracing::info!("Workout session ended");
    }

    fn apply(&mut self, action: TimerAction) -> SessionSnapshot {
        self.timer.dispatch(action);
        self.sync_ticker();
        self.publish()
    }

    fn on_tick(&mut self, tick: RestTick) {
        let current = self.ticker.as_ref().map(RestTicker::generation);
        if current != Some(tick.generation) {
            tracing::debug!("Ignoring stale tick from ticker {}", tick.generation);
            return;
        }
        self.apply(TimerAction::Tick);
    }

    /// Start the ticker when the countdown becomes active and stop it when
    /// it no longer is.
    fn sync_ticker(&mut self) {
        let active = selectors::is_countdown_active(self.timer.state());

        match (active, self.ticker.is_some()) {
            (true, false) => {
                self.next_generation += 1;
                self.ticker = Some(RestTicker::start(
                    self.tick_period,
                    self.next_generation,
                    self.tick_tx.clone(),
                ));
            }
            (false, true) => {
                if let Some(ticker) = self.ticker.take() {
                    ticker.stop();
                }
            }
            _ => {}
        }
    }

    fn publish(&self) -> SessionSnapshot {
        let snapshot = SessionSnapshot::capture(&self.timer);
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}
