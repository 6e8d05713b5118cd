//! Server lifecycle logging.

use std::future::Future;
use std::time::Instant;

use super::{ServerError, ServerResult};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Runs the server future and logs how it ended.
pub async fn serve_with_lifecycle<F>(
    server_config: &ServerConfig,
    serve_fn: impl FnOnce() -> F,
) -> ServerResult<()>
where
    F: Future<Output = ServerResult<()>>,
{
    let start_time = Instant::now();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_config.server_addr(),
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server bound to all interfaces, ensure firewall is configured"
        );
    }

    let result = serve_fn().await;
    handle_result(result, start_time)
}

fn handle_result(result: ServerResult<()>, start_time: Instant) -> ServerResult<()> {
    let uptime = start_time.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs = uptime.as_secs(),
                "Shutdown completed"
            );
            Ok(())
        }
        Err(err) => {
            log_failure(&err, uptime.as_secs());
            Err(err)
        }
    }
}

fn log_failure(err: &ServerError, uptime_secs: u64) {
    tracing::error!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        error = %err,
        kind = ?err.io_error().kind(),
        uptime_secs = uptime_secs,
        "Fatal error"
    );

    if let Some(suggestion) = err.suggestion() {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            suggestion = suggestion,
            "Recovery suggestion"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[tokio::test]
    async fn serve_with_lifecycle_success() {
        let config = ServerConfig::default();
        let result = serve_with_lifecycle(&config, || async { Ok(()) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn serve_with_lifecycle_handles_error() {
        let config = ServerConfig::default();
        let result = serve_with_lifecycle(&config, || async {
            Err(ServerError::Runtime(io::Error::other("test error")))
        })
        .await;

        assert!(matches!(result, Err(ServerError::Runtime(_))));
    }
}
