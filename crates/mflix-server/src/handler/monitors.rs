//! Health check handler.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::response::{MonitorStatus, ServiceStatus};
use crate::service::{DocumentService, ServiceState};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "mflix_server::handler::monitors";

/// Reports whether the document store responds.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(documents): State<DocumentService>,
) -> (StatusCode, Json<MonitorStatus>) {
    let (status, status_code) = if documents.is_healthy().await {
        (ServiceStatus::Healthy, StatusCode::OK)
    } else {
        (ServiceStatus::Degraded, StatusCode::SERVICE_UNAVAILABLE)
    };

    tracing::debug!(
        target: TRACING_TARGET,
        status = %status,
        status_code = status_code.as_u16(),
        "health status prepared"
    );

    (status_code, Json(MonitorStatus::new(status)))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn healthy_without_session() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<MonitorStatus>();
        assert_eq!(status.status, ServiceStatus::Healthy);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        Ok(())
    }

    #[tokio::test]
    async fn degraded_when_store_is_down() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        context.documents.set_unavailable(true);

        let response = server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json::<MonitorStatus>().status,
            ServiceStatus::Degraded
        );
        Ok(())
    }
}
