//! Clock polling loop.
//!
//! A scoped background task that calls `refresh(false)` on a fixed
//! interval. The first tick fires immediately, so the first universe is
//! published as soon as the loop starts, and a boundary crossing is
//! detected within one interval.
//!
//! The loop stops on [`PollLoop::shutdown`], and dropping the handle aborts
//! the task, so it never outlives its owner on any exit path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::sync::SynchronizationController;

/// Handle to a running poll loop.
#[derive(Debug)]
pub struct PollLoop {
    stop: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PollLoop {
    /// Start polling `controller` every `interval`.
    ///
    /// A zero interval is raised to one millisecond.
    pub fn spawn(controller: Arc<SynchronizationController>, interval: Duration) -> Self {
        let period = interval.max(Duration::from_millis(1));
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(interval_ms = period.as_millis(), "poll loop started");

            loop {
                tokio::select! {
                    changed = stopped.changed() => {
                        // A dropped sender also means stop.
                        if changed.is_err() || *stopped.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let outcome = controller.refresh(false).await;
                        if outcome.generated() {
                            debug!(seed = outcome.seed().value(), "epoch change detected");
                        }
                    }
                }
            }

            info!("poll loop stopped");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Whether the task is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop to stop and wait for it to exit.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
