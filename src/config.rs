//! Configuration management for Prompt Relay
//!
//! Configuration is loaded from environment variables once at startup and is
//! immutable afterwards. Upstream credentials are optional here: a missing key
//! is reported per request rather than failing startup.

use std::env;

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

use crate::relay::HarmBlockThreshold;

/// Caller-facing message returned when the gateway cannot produce a completion
pub const DEFAULT_UPSTREAM_ERROR_MESSAGE: &str =
    "Rate limit reached: the AI service is temporarily unavailable. Please try again in a minute.";

/// Application configuration
#[derive(Debug)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Value sent as `Access-Control-Allow-Origin`
    pub allowed_origin: String,

    /// Selected upstream provider and its settings
    pub upstream: UpstreamConfig,
}

/// Which upstream API the relay forwards prompts to
#[derive(Debug)]
pub enum UpstreamConfig {
    /// The provider's own `generateContent` API
    Native(NativeConfig),
    /// An OpenAI-compatible chat completions gateway
    Gateway(GatewayConfig),
}

impl UpstreamConfig {
    /// Short provider name used in logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            UpstreamConfig::Native(_) => "native",
            UpstreamConfig::Gateway(_) => "gateway",
        }
    }
}

/// Settings for the native provider API
#[derive(Debug)]
pub struct NativeConfig {
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub api_url: String,
    /// Model used in the `models/{model}:generateContent` path
    pub model: String,
    /// API key, passed as the `key` query parameter
    pub api_key: Option<SecretString>,
    /// Provider name shown in the failure message
    pub provider_label: String,
    /// When set, `safetySettings` are sent with this threshold for every category
    pub safety_threshold: Option<HarmBlockThreshold>,
}

/// Settings for the OpenAI-compatible gateway
#[derive(Debug)]
pub struct GatewayConfig {
    /// Base URL; `/chat/completions` is appended
    pub api_url: String,
    /// Model identifier sent in the request body
    pub model: String,
    /// Bearer token
    pub api_key: Option<SecretString>,
    /// Sampling temperature sent with every request
    pub temperature: f64,
    /// Fixed caller-facing message for any upstream failure
    pub failure_message: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        // Empty secrets count as missing
        let secret = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from)
        };

        let upstream = match var("RELAY_PROVIDER", "native").to_ascii_lowercase().as_str() {
            "native" | "gemini" => UpstreamConfig::Native(NativeConfig {
                api_url: trim_base_url(var(
                    "GEMINI_API_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                )),
                model: var("GEMINI_MODEL", "gemini-2.5-flash"),
                api_key: secret("GEMINI_API_KEY"),
                provider_label: var("GEMINI_PROVIDER_LABEL", "Gemini"),
                safety_threshold: lookup("GEMINI_SAFETY_THRESHOLD")
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| v.parse::<HarmBlockThreshold>())
                    .transpose()
                    .context("Invalid GEMINI_SAFETY_THRESHOLD")?,
            }),
            "gateway" | "openai" => UpstreamConfig::Gateway(GatewayConfig {
                api_url: trim_base_url(var("GATEWAY_API_URL", "https://ai-gateway.vercel.sh/v1")),
                model: var("GATEWAY_MODEL", "google/gemini-2.5-flash"),
                api_key: secret("GATEWAY_API_KEY"),
                temperature: var("GATEWAY_TEMPERATURE", "0.7")
                    .parse()
                    .context("Invalid GATEWAY_TEMPERATURE")?,
                failure_message: var(
                    "RELAY_UPSTREAM_ERROR_MESSAGE",
                    DEFAULT_UPSTREAM_ERROR_MESSAGE,
                ),
            }),
            other => return Err(anyhow!("Invalid RELAY_PROVIDER: {other} (expected native or gateway)")),
        };

        Ok(Self {
            host: var("RELAY_HOST", "0.0.0.0"),
            port: var("RELAY_PORT", "8080")
                .parse()
                .context("Invalid RELAY_PORT")?,
            allowed_origin: var("RELAY_ALLOWED_ORIGIN", "*"),
            upstream,
        })
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
