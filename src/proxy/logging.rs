//! Request logging utilities for upstream relaying
//!
//! Provides structured logging with a short correlation ID per request.
//! Nothing logged here may contain the prompt text or an upstream credential.

use std::time::Instant;
use tracing::{debug, error, info, warn, Span};
use uuid::Uuid;

/// Context for tracking a request through the relay
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Upstream provider handling this request
    pub provider: String,
    /// Endpoint being served
    pub endpoint: String,
    /// Upstream model, if known
    pub model: Option<String>,
    /// Prompt length in characters
    pub prompt_chars: Option<usize>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(provider: &str, endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            provider: provider.to_string(),
            endpoint: endpoint.to_string(),
            model: None,
            prompt_chars: None,
        }
    }

    /// Set the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Record the prompt length
    pub fn with_prompt_chars(mut self, prompt_chars: usize) -> Self {
        self.prompt_chars = Some(prompt_chars);
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = ?self.model,
            prompt_chars = ?self.prompt_chars,
            "Request started"
        );
    }

    /// Log request being sent to upstream
    ///
    /// `url` must not carry credentials.
    pub fn log_upstream_request(&self, url: &str, body_size: Option<usize>) {
        debug!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            url = %url,
            body_size = ?body_size,
            elapsed_ms = %self.elapsed_ms(),
            "Sending request to upstream"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16, content_length: Option<u64>) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            status = %status,
            content_length = ?content_length,
            elapsed_ms = %self.elapsed_ms(),
            "Response received from upstream"
        );
    }

    /// Log successful request completion
    pub fn log_request_complete(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = ?self.model,
            elapsed_ms = %self.elapsed_ms(),
            "Request completed successfully"
        );
    }

    /// Log a warning condition
    pub fn log_warning(&self, message: &str) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            elapsed_ms = %self.elapsed_ms(),
            message = %message,
            "Warning during request"
        );
    }

    /// Log upstream failure with the detail that is withheld from the caller
    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = ?self.model,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Request failed"
        );
    }

    /// Log connection error (specific for debugging connectivity issues)
    pub fn log_connection_error(&self, error: &str, url: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            url = %url,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Connection to upstream failed"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "relay_request",
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = ?self.model,
        )
    }
}

/// Replace every occurrence of `secret` in upstream text before it is logged
pub fn redact_secret(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "[REDACTED]")
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("unknown", "unknown")
    }
}
