//! CORS middleware
//!
//! Adds the extension's CORS headers to every response, errors included, and
//! answers `OPTIONS` preflights with an empty `200` before routing or
//! validation runs.
//!
//! `tower_http::cors::CorsLayer` refuses `Allow-Credentials: true` together
//! with a wildcard origin and only sends the method/header lists on
//! preflights, so the headers are applied here directly.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::AppState;

/// Methods advertised to browsers
pub const ALLOWED_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";

/// Request headers advertised to browsers
pub const ALLOWED_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Precomputed CORS header values
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
}

impl CorsPolicy {
    /// Build a policy for the given `Access-Control-Allow-Origin` value
    pub fn new(allowed_origin: &str) -> anyhow::Result<Self> {
        let allow_origin = HeaderValue::from_str(allowed_origin)
            .with_context(|| format!("Invalid RELAY_ALLOWED_ORIGIN: {allowed_origin}"))?;
        Ok(Self { allow_origin })
    }

    /// Write the CORS headers into a header map, replacing existing values
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }

    /// Empty `200` answer to a preflight
    pub fn preflight_response(&self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;
        self.apply(response.headers_mut());
        response
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
        }
    }
}

/// CORS middleware
///
/// 1. `OPTIONS` requests are answered immediately
/// 2. Everything else runs through the inner service
/// 3. CORS headers are added to whatever response comes back
pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        debug!(path = %request.uri().path(), "Answering CORS preflight");
        return state.cors.preflight_response();
    }

    let mut response = next.run(request).await;
    state.cors.apply(response.headers_mut());
    response
}
