//! Upstream provider abstraction
//!
//! Each provider takes a validated prompt, performs exactly one upstream call
//! and returns either a canonical response or a body to forward unchanged.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::{error::AppResult, proxy::logging::RequestContext, relay::CandidatesResponse};

/// Result of a successful relay
#[derive(Debug, Clone, PartialEq)]
pub enum RelayReply {
    /// Translated into the canonical shape
    Canonical(CandidatesResponse),
    /// Upstream JSON body forwarded byte-for-byte, always answered with `200`
    Passthrough(Bytes),
}

impl IntoResponse for RelayReply {
    fn into_response(self) -> Response {
        match self {
            RelayReply::Canonical(candidates) => (StatusCode::OK, Json(candidates)).into_response(),
            RelayReply::Passthrough(body) => {
                let mut response = Response::new(Body::from(body));
                *response.status_mut() = StatusCode::OK;
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                response
            }
        }
    }
}

/// Trait implemented by every upstream completion API
///
/// # Security
///
/// Implementations MUST:
/// - Return `AppError::MissingApiKey` before any I/O when no credential is configured
/// - Never include the credential in logs or in the returned reply
/// - Never forward client headers upstream
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Model the prompt is sent to
    fn model(&self) -> &str;

    /// Whether a credential is configured
    fn is_configured(&self) -> bool;

    /// Send one prompt upstream and shape the result
    async fn relay(&self, prompt: &str, ctx: &RequestContext) -> AppResult<RelayReply>;
}
