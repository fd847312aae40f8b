//! Periodic tick source for rest countdowns.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// One period elapsed on the ticker identified by `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestTick {
    pub generation: u64,
}

/// A running tick task. The task is aborted when the ticker is stopped or
/// dropped.
pub struct RestTicker {
    handle: JoinHandle<()>,
    generation: u64,
}

impl RestTicker {
    /// Spawn a task sending one `RestTick` per `period`, the first one a full
    /// period from now. Must be called from within a tokio runtime.
    pub fn start(period: Duration, generation: u64, tick_tx: mpsc::Sender<RestTick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tick_tx.send(RestTick { generation }).await.is_err() {
                    break;
                }
            }
        });

        tracing::debug!("Rest ticker {} started", generation);
        Self { handle, generation }
    }

    /// Generation this ticker stamps on its ticks.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the tick task.
    pub fn stop(self) {
        tracing::debug!("Rest ticker {} stopped", self.generation);
    }
}

impl Drop for RestTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
