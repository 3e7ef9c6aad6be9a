//! Request types
//!
//! The extension sends `{ "prompt": "..." }`; the relay turns it into either the
//! native `generateContent` body or an OpenAI-compatible chat request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::response::{Content, Part};

/// Incoming request from the browser extension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptRequest {
    /// Prompt text; `None` when absent, empty or not a string
    pub prompt: Option<String>,
}

impl PromptRequest {
    /// Parse a raw request body.
    ///
    /// Never fails: an empty body, invalid JSON or a body without a usable
    /// `prompt` string all yield a request with no prompt.
    pub fn from_body(body: &[u8]) -> Self {
        let prompt = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| value.get("prompt").and_then(Value::as_str).map(str::to_owned))
            .filter(|prompt| !prompt.is_empty());

        Self { prompt }
    }

    /// The validated prompt, if any
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
}

/// Harm categories covered by `safetySettings`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

impl HarmCategory {
    /// The fixed set of categories configured on every safety-enabled request
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategoryHateSpeech,
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryDangerousContent,
    ];
}

/// Blocking threshold applied to a harm category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl HarmBlockThreshold {
    pub fn as_str(&self) -> &'static str {
        match self {
            HarmBlockThreshold::BlockNone => "BLOCK_NONE",
            HarmBlockThreshold::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            HarmBlockThreshold::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            HarmBlockThreshold::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
        }
    }
}

impl fmt::Display for HarmBlockThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a threshold name is not recognised
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown harm block threshold: {0}")]
pub struct UnknownThreshold(pub String);

impl FromStr for HarmBlockThreshold {
    type Err = UnknownThreshold;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BLOCK_NONE" => Ok(HarmBlockThreshold::BlockNone),
            "BLOCK_ONLY_HIGH" => Ok(HarmBlockThreshold::BlockOnlyHigh),
            "BLOCK_MEDIUM_AND_ABOVE" => Ok(HarmBlockThreshold::BlockMediumAndAbove),
            "BLOCK_LOW_AND_ABOVE" => Ok(HarmBlockThreshold::BlockLowAndAbove),
            other => Err(UnknownThreshold(other.to_string())),
        }
    }
}

/// One `{ category, threshold }` pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Native `generateContent` request body
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NativeRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

impl NativeRequest {
    /// Single-turn request carrying only the prompt
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            safety_settings: None,
        }
    }

    /// Apply one threshold to every harm category
    pub fn with_safety_threshold(mut self, threshold: HarmBlockThreshold) -> Self {
        self.safety_settings = Some(
            HarmCategory::ALL
                .iter()
                .map(|&category| SafetySetting { category, threshold })
                .collect(),
        );
        self
    }
}

/// Chat message sent to the gateway
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayMessage {
    pub role: String,
    pub content: String,
}

/// OpenAI-compatible chat completion request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GatewayRequest {
    pub model: String,
    pub messages: Vec<GatewayMessage>,
    pub temperature: f64,
}

impl GatewayRequest {
    pub fn from_prompt(model: &str, prompt: &str, temperature: f64) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![GatewayMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature,
        }
    }
}
