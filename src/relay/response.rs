//! Response types
//!
//! `CandidatesResponse` is the canonical shape returned to the extension no
//! matter which upstream served the request. `GatewayCompletion` is the lenient
//! view of an OpenAI-compatible completion used to extract the text.

use serde::{Deserialize, Serialize};

/// A text part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub text: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A list of parts, used both in native requests and in candidates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// One generated candidate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub content: Content,
}

/// Canonical response: `{ candidates: [ { content: { parts: [ { text } ] } } ] }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidatesResponse {
    pub candidates: Vec<Candidate>,
}

impl CandidatesResponse {
    /// Wrap completion text as a single candidate with a single part
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Content {
                    parts: vec![Part::text(text)],
                },
            }],
        }
    }

    /// Text of the first part of the first candidate
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.as_str())
    }
}

/// OpenAI-compatible completion, with every segment optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GatewayCompletion {
    #[serde(default)]
    pub choices: Vec<GatewayChoice>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GatewayChoice {
    #[serde(default)]
    pub message: Option<GatewayReplyMessage>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GatewayReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl GatewayCompletion {
    /// `choices[0].message.content`, or `""` when any segment is missing
    pub fn completion_text(&self) -> &str {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .unwrap_or_default()
    }
}
