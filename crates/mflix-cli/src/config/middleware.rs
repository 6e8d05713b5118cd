//! Middleware configuration for the HTTP server.
//!
//! Groups the CORS, recovery and access guard settings exported by
//! `mflix-server` so that they can be set from arguments or environment.
//!
//! ```bash
//! mflix --allowed-origins "https://example.com" --protected-prefixes /api/movies
//! ```

use clap::Args;
use mflix_server::middleware::{CorsConfig, GuardConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS, recovery and access guard settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Path prefixes that require a session token.
    #[clap(flatten)]
    pub guard: GuardConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            protected_prefixes = ?self.guard.protected_prefixes,
            "Access guard configuration"
        );
    }
}
