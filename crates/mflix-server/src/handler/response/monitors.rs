use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Overall service health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceStatus {
    /// Every dependency responds.
    Healthy,
    /// The document store does not respond.
    Degraded,
}

/// System monitoring status response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Overall system health status.
    pub status: ServiceStatus,
    /// Timestamp when this status was generated.
    pub timestamp: Timestamp,
    /// Application version.
    pub version: String,
}

impl MonitorStatus {
    pub fn new(status: ServiceStatus) -> Self {
        Self {
            status,
            timestamp: Timestamp::now(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}
