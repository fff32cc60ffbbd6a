//! Graceful shutdown and signal handling.
//!
//! SIGTERM (sent by the cluster scheduler when a task is stopped) and SIGINT
//! both trigger graceful shutdown with connection draining.

use axum_server::Handle;

/// How long to wait for in-flight connections before forcing shutdown.
const DRAIN_TIMEOUT_SECS: u64 = 30;

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// When either signal is received, the server will:
/// 1. Stop accepting new connections
/// 2. Wait for existing connections to complete
/// 3. Shutdown gracefully
pub fn setup_shutdown_handler(handle: Handle) {
    tokio::spawn(async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        handle.graceful_shutdown(Some(std::time::Duration::from_secs(DRAIN_TIMEOUT_SECS)));
        tracing::info!(
            timeout_secs = DRAIN_TIMEOUT_SECS,
            "Graceful shutdown initiated, waiting for connections to close"
        );
    });
}
