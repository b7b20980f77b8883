//! Stop Signal
//!
//! Idempotent stop flag shared between a selector and its refresh task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Stop coordinator for background refresh.
///
/// Cloning shares the same flag. Once stopped it never resets.
#[derive(Clone)]
pub struct StopSignal {
    /// Whether stop has been requested
    stopped: Arc<AtomicBool>,
    /// Wakes tasks parked on a timer
    stop_tx: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    /// Create a new, unfired stop signal.
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            stop_tx: Arc::new(stop_tx),
        }
    }

    /// Subscribe to stop notifications.
    ///
    /// The receiver observes the stop even if it subscribed afterwards.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }

    /// Request stop. Returns `true` only for the call that fired the signal.
    pub fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.stop_tx.send_replace(true);
        true
    }

    /// Check if stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Install signal handlers and fire `signal` on Ctrl+C or SIGTERM.
///
/// Returns once a shutdown signal has been received.
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn shutdown_signal(signal: StopSignal) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, stopping");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, stopping");
        }
    }

    signal.stop();
}
