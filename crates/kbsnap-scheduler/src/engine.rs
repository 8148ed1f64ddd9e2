use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use crate::{
    error::Result,
    schedule::compute_next_run,
    types::{Schedule, Trigger},
};

/// Drives a single schedule at ±1 s precision.
///
/// Fired occurrences are forwarded over the trigger channel; the consumer
/// runs the job. `try_send` keeps the tick loop from ever stalling — if the
/// consumer is still busy with the previous run when the next one fires, the
/// trigger is dropped with a warning rather than queued up behind it.
pub struct SchedulerEngine {
    schedule: Schedule,
    trigger_tx: mpsc::Sender<Trigger>,
}

impl SchedulerEngine {
    pub fn new(schedule: Schedule, trigger_tx: mpsc::Sender<Trigger>) -> Result<Self> {
        schedule.validate()?;
        Ok(Self {
            schedule,
            trigger_tx,
        })
    }

    /// Main loop. Polls every second until `shutdown` broadcasts `true`.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut next = match compute_next_run(&self.schedule, Utc::now()) {
            Some(next) => next,
            None => {
                // validate() in new() makes this unreachable in practice.
                error!("schedule yields no next run; engine exiting");
                return;
            }
        };
        info!(next_run = %next.to_rfc3339(), "scheduler engine started");

        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Utc::now();
                    if now < next {
                        continue;
                    }
                    let trigger = Trigger {
                        scheduled_for: next,
                        fired_at: now,
                    };
                    // try_send never blocks the tick loop.
                    if self.trigger_tx.try_send(trigger).is_err() {
                        warn!(
                            scheduled_for = %next.to_rfc3339(),
                            "trigger channel full or closed — occurrence dropped"
                        );
                    }
                    match compute_next_run(&self.schedule, now) {
                        Some(n) => {
                            info!(next_run = %n.to_rfc3339(), "next occurrence scheduled");
                            next = n;
                        }
                        None => {
                            error!("schedule exhausted; engine exiting");
                            return;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    // A closed channel means the runner is gone — stop too.
                    if changed.is_err() || *shutdown.borrow() {
                        info!("scheduler engine shutting down");
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::{mpsc, watch};

    use super::*;

    fn engine(tx: mpsc::Sender<Trigger>) -> SchedulerEngine {
        SchedulerEngine::new(Schedule::Daily { hour: 0, minute: 0 }, tx).unwrap()
    }

    #[tokio::test]
    async fn shutdown_signal_stops_engine() {
        let (trigger_tx, _trigger_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(engine(trigger_tx).run(shutdown_rx));

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("engine should stop on shutdown signal")
            .unwrap();
    }

    #[tokio::test]
    async fn dropped_shutdown_sender_stops_engine() {
        let (trigger_tx, _trigger_rx) = mpsc::channel(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        drop(shutdown_tx);

        tokio::time::timeout(Duration::from_secs(5), engine(trigger_tx).run(shutdown_rx))
            .await
            .expect("engine should exit when the shutdown channel closes");
    }
}
