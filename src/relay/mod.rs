//! Wire types for Prompt Relay
//!
//! Covers the incoming extension request, both upstream request shapes and the
//! canonical `candidates` response the extension expects.

pub mod request;
pub mod response;

pub use request::{
    GatewayMessage, GatewayRequest, HarmBlockThreshold, HarmCategory, NativeRequest,
    PromptRequest, SafetySetting,
};
pub use response::{CandidatesResponse, Candidate, Content, GatewayCompletion, Part};
