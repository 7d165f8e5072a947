//! Provider-agnostic domain types for the request lifecycle: the shared
//! request/response shapes every `ProviderAdapter` (C1) speaks, narrowed
//! from the teacher's broader `LLMRequest`/`LLMResponse` shape down to what
//! the gateway actually needs.

pub mod fallback;
pub mod pricing;
pub mod providers;
pub mod router;
pub mod traits;

use serde::{Deserialize, Serialize};

/// Closed set of provider identities the gateway knows how to invoke.
pub const KNOWN_PROVIDERS: [&str; 3] = ["openai", "deepseek", "huggingface"];

/// Canonical fallback order (spec §4.4).
pub const CANONICAL_CHAIN: [&str; 3] = ["openai", "deepseek", "huggingface"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Normalised invocation request passed to a `ProviderAdapter`.
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    pub messages: Vec<ChatMessage>,
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Produced by C1 on success. Provider-agnostic — every other component
/// only ever sees this shape, never an upstream's own wire format.
#[derive(Debug, Clone)]
pub struct NormalisedResponse {
    pub request_id: String,
    pub model: String,
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: Option<String>,
}
