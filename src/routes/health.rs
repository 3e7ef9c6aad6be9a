//! Health check endpoints
//!
//! - `/health` - Relay status with upstream configuration summary
//! - `/health/live` - Liveness probe

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Full health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub provider: String,
    pub model: String,
    pub credential_configured: bool,
}

/// Simple health response for liveness
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

/// Full health check endpoint
///
/// Reports `degraded` (still `200`) when the upstream credential is missing,
/// since every relay request would then fail with a configuration error.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let credential_configured = state.provider.is_configured();

    let status = if credential_configured {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        provider: state.provider.name().to_string(),
        model: state.provider.model().to_string(),
        credential_configured,
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe endpoint
///
/// Returns 200 OK if the process is serving requests.
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
