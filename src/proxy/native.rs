//! Native provider (`generateContent`)
//!
//! The credential travels as the `key` query parameter, so request URLs built
//! here are never logged and reqwest errors are stripped of their URL before
//! logging. The upstream body is forwarded unchanged once it is known to be
//! JSON.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;

use crate::{
    config::NativeConfig,
    error::{AppError, AppResult},
    proxy::{
        headers::json_headers,
        logging::RequestContext,
        provider::{RelayReply, UpstreamProvider},
    },
    relay::{HarmBlockThreshold, NativeRequest},
};

/// Native `generateContent` client
pub struct NativeProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    provider_label: String,
    safety_threshold: Option<HarmBlockThreshold>,
}

impl NativeProvider {
    /// Create a new native client
    pub fn new(client: reqwest::Client, config: NativeConfig) -> Self {
        Self {
            client,
            base_url: config.api_url,
            model: config.model,
            api_key: config.api_key,
            provider_label: config.provider_label,
            safety_threshold: config.safety_threshold,
        }
    }

    /// Endpoint without the credential
    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, prompt: &str) -> NativeRequest {
        let request = NativeRequest::from_prompt(prompt);
        match self.safety_threshold {
            Some(threshold) => request.with_safety_threshold(threshold),
            None => request,
        }
    }

    fn failure(&self) -> AppError {
        AppError::upstream(format!("Failed to fetch from {}", self.provider_label))
    }
}

#[async_trait]
impl UpstreamProvider for NativeProvider {
    fn name(&self) -> &'static str {
        "native"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn relay(&self, prompt: &str, ctx: &RequestContext) -> AppResult<RelayReply> {
        let api_key = self.api_key.as_ref().ok_or(AppError::MissingApiKey)?;

        let endpoint = self.endpoint();
        let request = self.build_request(prompt);
        ctx.log_upstream_request(&endpoint, None);

        let response = match self
            .client
            .post(&endpoint)
            .query(&[("key", api_key.expose_secret())])
            .headers(json_headers())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                ctx.log_connection_error(&e.without_url().to_string(), &endpoint);
                return Err(self.failure());
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                ctx.log_error(&format!("Failed to read upstream body: {}", e.without_url()));
                return Err(self.failure());
            }
        };
        ctx.log_upstream_response(status.as_u16(), Some(body.len() as u64));

        if let Err(e) = serde_json::from_slice::<IgnoredAny>(&body) {
            ctx.log_error(&format!("Upstream returned non-JSON body: {}", e));
            return Err(self.failure());
        }

        if contains_secret(&body, api_key.expose_secret()) {
            ctx.log_error("Upstream body echoed the credential; refusing to forward it");
            return Err(self.failure());
        }

        if !status.is_success() {
            ctx.log_warning(&format!(
                "Upstream returned status {}; forwarding its body with 200",
                status
            ));
        }

        Ok(RelayReply::Passthrough(body))
    }
}

fn contains_secret(body: &[u8], secret: &str) -> bool {
    let secret = secret.as_bytes();
    !secret.is_empty() && body.windows(secret.len()).any(|window| window == secret)
}
