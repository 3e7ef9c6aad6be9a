//! OpenAI-compatible gateway provider
//!
//! Sends the prompt as a single user message to `{base}/chat/completions` and
//! translates `choices[0].message.content` into the canonical shape. Any
//! failure, including an empty completion, is reported to the caller with one
//! fixed message.

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    config::GatewayConfig,
    error::{AppError, AppResult},
    proxy::{
        headers::bearer_json_headers,
        logging::{redact_secret, RequestContext},
        provider::{RelayReply, UpstreamProvider},
    },
    relay::{CandidatesResponse, GatewayCompletion, GatewayRequest},
};

/// OpenAI-compatible gateway client
pub struct GatewayProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    temperature: f64,
    failure_message: String,
}

impl GatewayProvider {
    /// Create a new gateway client
    pub fn new(client: reqwest::Client, config: GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.api_url,
            model: config.model,
            api_key: config.api_key,
            temperature: config.temperature,
            failure_message: config.failure_message,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Log the real cause and return the fixed caller-facing error
    fn fail(&self, ctx: &RequestContext, detail: &str) -> AppError {
        ctx.log_error(detail);
        AppError::upstream(self.failure_message.clone())
    }
}

#[async_trait]
impl UpstreamProvider for GatewayProvider {
    fn name(&self) -> &'static str {
        "gateway"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn relay(&self, prompt: &str, ctx: &RequestContext) -> AppResult<RelayReply> {
        let api_key = self.api_key.as_ref().ok_or(AppError::MissingApiKey)?;
        let headers = bearer_json_headers(api_key)?;

        let url = self.endpoint();
        let request = GatewayRequest::from_prompt(&self.model, prompt, self.temperature);
        ctx.log_upstream_request(&url, None);

        let response = match self
            .client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                ctx.log_connection_error(&e.without_url().to_string(), &url);
                return Err(AppError::upstream(self.failure_message.clone()));
            }
        };

        let status = response.status();
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        ctx.log_upstream_response(status.as_u16(), content_length);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = redact_secret(&text, api_key.expose_secret());
            return Err(self.fail(ctx, &format!("Gateway error {}: {}", status, text)));
        }

        let completion: GatewayCompletion = match response.json().await {
            Ok(completion) => completion,
            Err(e) => {
                return Err(self.fail(
                    ctx,
                    &format!("Invalid gateway response: {}", e.without_url()),
                ))
            }
        };

        let text = completion.completion_text();
        if text.is_empty() {
            return Err(self.fail(ctx, "Gateway returned an empty completion"));
        }

        Ok(RelayReply::Canonical(CandidatesResponse::from_text(text)))
    }
}
