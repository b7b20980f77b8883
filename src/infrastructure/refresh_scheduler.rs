//! Refresh Scheduler
//!
//! Runs a round of work on a fixed interval until a stop signal fires.

use crate::infrastructure::shutdown::StopSignal;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Periodic driver for refresh rounds.
pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Spawn the refresh loop.
    ///
    /// The first round runs one `period` after spawning. A round always
    /// completes before the next tick is awaited, so rounds never overlap;
    /// ticks missed during a long round are delayed rather than bursted.
    /// Stopping lets an in-flight round finish and then ends the task.
    pub fn spawn<F, Fut>(period: Duration, stop: StopSignal, mut round: F) -> JoinHandle<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            let mut stopped = stop.subscribe();
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stopped.wait_for(|s| *s) => break,
                    _ = interval.tick() => {}
                }

                if stop.is_stopped() {
                    break;
                }
                round().await;
            }

            tracing::debug!("refresh loop stopped");
        })
    }
}
