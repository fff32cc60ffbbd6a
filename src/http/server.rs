//! HTTP server startup logic.
//!
//! The service speaks plain HTTP inside its container; TLS termination is
//! the load balancer's job.

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {addr}: {source}")]
    Addr {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Start the HTTP server and block until it shuts down.
///
/// A failed bind (port already in use) surfaces as `ServerError::Serve`,
/// which the caller treats as fatal - no retry.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr: SocketAddr = config.bind_addr().parse().map_err(|source| ServerError::Addr {
        addr: config.bind_addr(),
        source,
    })?;

    let handle = Handle::new();

    // Setup graceful shutdown
    shutdown::setup_shutdown_handler(handle.clone());

    tracing::info!(%addr, "Starting HTTP server");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
