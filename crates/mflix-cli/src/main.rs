#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use mflix_server::handler::routes;
use mflix_server::middleware::{RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt};
use mflix_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "mflix_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "mflix_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "mflix_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = ServiceState::new(cli.service.clone())
        .await
        .context("failed to create service state")?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server)
        .await
        .context("server terminated abnormally")?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Last added is outermost:
/// 1. Recovery catches panics and enforces timeouts.
/// 2. Observability adds request ids and spans.
/// 3. Security adds CORS, body limits and headers.
/// 4. Routes, behind the access guard.
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(&middleware.guard, &state)
        .with_state(state)
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
