//! # Automatic Backup Task
//!
//! A tokio task that calls [`BackupService::create_backup`] on a fixed
//! period until told to stop.
//!
//! ```text
//! start_automatic_backup()
//!        │
//!        ▼
//!   tokio::spawn(run) ─────────────────────────────┐
//!                                                   │
//!   loop {                                          │
//!     select! {                                     │
//!       interval.tick()  ──► create_backup(None)    │  errors are logged,
//!       shutdown_rx.recv() ──► break                │  the loop keeps going
//!     }                                             │
//!   }  ◄────────────────────────────────────────────┘
//! ```
//!
//! The first backup is taken one full period after start, not immediately.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info};

use crate::service::BackupService;

/// Handle to a running backup task.
#[derive(Debug)]
pub(crate) struct SchedulerHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Spawns the periodic task on the current runtime.
    pub(crate) fn spawn(service: BackupService, period: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(run(service, period, shutdown_rx));

        SchedulerHandle { shutdown_tx, task }
    }

    /// Signals the task and waits for it to finish.
    ///
    /// A backup already in progress completes first.
    pub(crate) async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;

        if let Err(e) = self.task.await {
            error!(?e, "Automatic backup task ended abnormally");
        }
    }
}

async fn run(service: BackupService, period: Duration, mut shutdown_rx: mpsc::Receiver<()>) {
    info!(period_secs = period.as_secs(), "Automatic backup started");

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match service.create_backup(None).await {
                    Ok(path) => info!(path = %path.display(), "Automatic backup created"),
                    Err(e) => error!(?e, "Automatic backup failed"),
                }
            }

            _ = shutdown_rx.recv() => {
                break;
            }
        }
    }

    info!("Automatic backup stopped");
}
