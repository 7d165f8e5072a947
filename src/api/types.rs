//! Wire DTOs for the client-facing HTTP surface (spec §6).

use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, MessageRole};

fn default_temperature() -> f32 {
    0.7
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<WireChatMessage>,
    pub task: Option<String>,
    pub budget: Option<String>,
    #[serde(default)]
    pub latency_sensitive: bool,
    pub model: Option<String>,
    pub provider: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireChatMessage {
    pub role: String,
    pub content: String,
}

impl From<WireChatMessage> for ChatMessage {
    fn from(m: WireChatMessage) -> Self {
        let role = match m.role.as_str() {
            "system" => MessageRole::System,
            "assistant" => MessageRole::Assistant,
            _ => MessageRole::User,
        };
        ChatMessage {
            role,
            content: m.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoiceDto>,
    pub usage: UsageDto,
    pub provider: &'static str,
    /// Converted from the internal `Decimal` only here, at the response
    /// boundary (spec §9) — every other component keeps exact decimal cost.
    pub cost_usd: f64,
}

#[derive(Debug, Serialize)]
pub struct ChatChoiceDto {
    pub index: u32,
    pub message: ChatChoiceMessageDto,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatChoiceMessageDto {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct UsageDto {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub docs: &'static str,
    pub health: &'static str,
    pub metrics: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct RoutingPreviewQuery {
    pub task: Option<String>,
    pub budget: Option<String>,
    #[serde(default)]
    pub latency_sensitive: bool,
}

#[derive(Debug, Serialize)]
pub struct RoutingPreviewResponse {
    pub primary: &'static str,
    pub fallback_chain: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ProviderCatalogueEntry {
    pub name: &'static str,
    pub default_model: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProviderCatalogueResponse {
    pub providers: Vec<ProviderCatalogueEntry>,
}
