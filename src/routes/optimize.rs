//! Prompt relay endpoint
//!
//! Accepts `{ "prompt": "..." }` from the browser extension, forwards it to the
//! configured upstream and returns the canonical `candidates` shape (or the
//! native body unchanged). Preflights are answered by the CORS middleware and
//! never reach this handler.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{warn, Instrument};

use crate::{
    error::AppError,
    proxy::RequestContext,
    relay::PromptRequest,
    routes::{metrics::record_request, OPTIMIZE_PATH},
    AppState,
};

/// Handle a prompt relay request
///
/// Validation order: prompt, then credential, then the upstream call.
pub async fn optimize(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response, AppError> {
    let start_time = Instant::now();
    let provider = state.provider.name();

    let request = PromptRequest::from_body(&body);
    let Some(prompt) = request.prompt() else {
        warn!(body_len = body.len(), "Rejecting request without a prompt");
        record_request(AppError::MissingPrompt.outcome(), provider, start_time.elapsed().as_secs_f64());
        return Err(AppError::MissingPrompt);
    };

    let ctx = RequestContext::new(provider, OPTIMIZE_PATH)
        .with_model(state.provider.model())
        .with_prompt_chars(prompt.chars().count());
    ctx.log_request_start();

    let result = state
        .provider
        .relay(prompt, &ctx)
        .instrument(ctx.create_span())
        .await;

    let duration = start_time.elapsed().as_secs_f64();
    match result {
        Ok(reply) => {
            ctx.log_request_complete();
            record_request("success", provider, duration);
            Ok(reply.into_response())
        }
        Err(e) => {
            if matches!(e, AppError::MissingApiKey) {
                ctx.log_error("Upstream credential is not configured");
            }
            record_request(e.outcome(), provider, duration);
            Err(e)
        }
    }
}
