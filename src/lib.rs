//! Prompt Relay - CORS-friendly LLM relay for a browser extension
//!
//! This library provides the core functionality for the relay server: it
//! validates `{ "prompt": ... }` requests, forwards them to one configured
//! upstream (native `generateContent` or an OpenAI-compatible gateway) and
//! answers in the canonical `candidates` shape.

pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod relay;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::middleware::CorsPolicy;
pub use crate::proxy::{build_provider, GatewayProvider, NativeProvider, UpstreamProvider};

/// Application state shared across all request handlers
///
/// Immutable after startup; handlers only read from it.
pub struct AppState {
    /// Upstream provider selected by configuration
    pub provider: Arc<dyn UpstreamProvider>,
    /// CORS headers applied to every response
    pub cors: CorsPolicy,
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state, consuming the configuration
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .build()?;

        let cors = CorsPolicy::new(&config.allowed_origin)?;
        let provider = build_provider(http_client, config.upstream);

        Ok(Self::from_parts(provider, cors))
    }

    /// Assemble state from an already-built provider
    pub fn from_parts(provider: Arc<dyn UpstreamProvider>, cors: CorsPolicy) -> Self {
        Self {
            provider,
            cors,
            start_time: Instant::now(),
        }
    }
}
