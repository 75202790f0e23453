//! Cooperative shutdown
//!
//! An interrupt or terminate signal cancels the root token. Transports stop
//! accepting work, in-flight tool calls observe the cancellation, and the
//! process waits a bounded grace period for them before exiting.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{info, warn};

/// Default time in-flight tool calls get to finish after a shutdown signal
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Cancel `token` when a shutdown signal arrives
pub fn spawn_signal_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_signal() => {
                info!("Shutdown signal received");
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    })
}

/// Wait up to `grace` for tracked tool calls to finish
///
/// Returns `false` when calls were still running at the deadline.
pub async fn drain(tracker: &TaskTracker, grace: Duration) -> bool {
    tracker.close();
    if tracker.is_empty() {
        return true;
    }

    info!(pending = tracker.len(), "Waiting for in-flight tool calls");
    match tokio::time::timeout(grace, tracker.wait()).await {
        Ok(()) => true,
        Err(_) => {
            warn!(
                pending = tracker.len(),
                "Grace period of {:?} elapsed with tool calls still running", grace
            );
            false
        }
    }
}
