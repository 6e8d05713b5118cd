//! HTTP server startup with bounded graceful shutdown.

use std::future::IntoFuture;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::lifecycle::serve_with_lifecycle;
use super::shutdown::shutdown_signal;
use super::{ServerError, ServerResult};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// After the signal, in-flight requests get the configured shutdown timeout
/// to finish before the server stops waiting for them.
pub async fn serve(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );
        ServerError::bind(server_addr, err)
    })?;

    let shutdown_started = Arc::new(Notify::new());
    let signal = {
        let shutdown_started = Arc::clone(&shutdown_started);
        async move {
            shutdown_signal().await;
            shutdown_started.notify_one();
        }
    };

    let shutdown_timeout = server_config.shutdown_timeout();
    let drain_deadline = async move {
        shutdown_started.notified().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    serve_with_lifecycle(&server_config, || async move {
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();

        tokio::select! {
            result = server => result.map_err(ServerError::Runtime),
            () = drain_deadline => {
                tracing::warn!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Shutdown timeout elapsed, dropping remaining connections"
                );
                Ok(())
            }
        }
    })
    .await
}
