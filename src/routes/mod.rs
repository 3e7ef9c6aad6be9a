//! HTTP routes for Prompt Relay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod health;
pub mod metrics;
pub mod optimize;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{middleware::cors_middleware, AppState};

/// Path the browser extension posts prompts to
pub const OPTIMIZE_PATH: &str = "/api/optimize";

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // The relay accepts any method; OPTIONS never reaches it
    let relay_routes = Router::new()
        .route(OPTIMIZE_PATH, any(optimize::optimize))
        .route("/", any(optimize::optimize));

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(relay_routes)
        .merge(public_routes)
        // Middleware is applied in reverse order (last applied runs first)
        .layer(middleware::from_fn_with_state(state.clone(), cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
