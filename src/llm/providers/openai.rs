//! C1 — OpenAI-style adapter, shared between the `openai` and `deepseek`
//! identities since DeepSeek speaks the same wire format (spec §4.1).
//! Grounded on the teacher's `llm/providers/openai/client.rs`
//! (`build_headers`/`convert_request`/`handle_error_response` shape) and
//! the original Python's `app/providers/openai.py` (exact field reads).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::llm::traits::ProviderAdapter;
use crate::llm::{InvokeRequest, NormalisedResponse};

pub struct OpenAiAdapter {
    name: &'static str,
    default_model: &'static str,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http: reqwest::Client,
}

impl OpenAiAdapter {
    pub fn openai(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            name: "openai",
            default_model: "gpt-3.5-turbo",
            base_url: "https://api.openai.com/v1".to_string(),
            api_key,
            timeout,
            http: reqwest::Client::new(),
        }
    }

    pub fn deepseek(api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            name: "deepseek",
            default_model: "deepseek-chat",
            base_url: "https://api.deepseek.com/v1".to_string(),
            api_key,
            timeout,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    id: String,
    model: String,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn default_model(&self) -> &'static str {
        self.default_model
    }

    async fn invoke(&self, req: &InvokeRequest) -> Result<NormalisedResponse, GatewayError> {
        let Some(api_key) = &self.api_key else {
            return Err(GatewayError::MisconfiguredUpstream(format!(
                "{} API key not configured",
                self.name
            )));
        };

        let model = req.model.clone().unwrap_or_else(|| self.default_model.to_string());
        let body = ChatRequest {
            model,
            messages: req
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::TransientUpstream(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status.as_u16(), &text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::FatalUpstream(format!("malformed response body: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::FatalUpstream("empty choices array".to_string()))?;
        let usage = parsed.usage.unwrap_or_default();

        Ok(NormalisedResponse {
            request_id: parsed.id,
            model: parsed.model,
            content: choice.message.content,
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
            finish_reason: choice.finish_reason,
        })
    }
}

/// HTTP status → `ErrorKind` mapping from spec §4.1.
fn map_http_error(status: u16, body: &str) -> GatewayError {
    match status {
        429 => GatewayError::RateLimitUpstream(body.to_string()),
        503 => GatewayError::TransientUpstream(body.to_string()),
        s if (500..600).contains(&s) => GatewayError::TransientUpstream(body.to_string()),
        s if (400..500).contains(&s) => GatewayError::FatalUpstream(format!("{s}: {body}")),
        s => GatewayError::Internal(format!("unexpected status {s}: {body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_429_to_rate_limit() {
        assert!(matches!(map_http_error(429, "x"), GatewayError::RateLimitUpstream(_)));
    }

    #[test]
    fn maps_503_to_transient() {
        assert!(matches!(map_http_error(503, "x"), GatewayError::TransientUpstream(_)));
    }

    #[test]
    fn maps_other_5xx_to_transient() {
        assert!(matches!(map_http_error(502, "x"), GatewayError::TransientUpstream(_)));
    }

    #[test]
    fn maps_other_4xx_to_fatal() {
        assert!(matches!(map_http_error(400, "x"), GatewayError::FatalUpstream(_)));
    }

    #[tokio::test]
    async fn missing_api_key_is_misconfigured() {
        let adapter = OpenAiAdapter::openai(None, Duration::from_secs(30));
        let req = InvokeRequest {
            messages: vec![],
            model: None,
            temperature: 0.7,
            max_tokens: None,
        };
        let result = adapter.invoke(&req).await;
        assert!(matches!(result, Err(GatewayError::MisconfiguredUpstream(_))));
    }
}
