//! C1 — HuggingFace Inference API adapter. Flattens messages into a single
//! role-prefixed prompt, estimates token counts from byte length since the
//! upstream doesn't return them. Grounded on the original Python's
//! `app/providers/huggingface.py`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;
use crate::llm::traits::ProviderAdapter;
use crate::llm::{ChatMessage, InvokeRequest, MessageRole, NormalisedResponse};

pub struct HuggingFaceAdapter {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http: reqwest::Client,
    models: HashMap<&'static str, &'static str>,
}

impl HuggingFaceAdapter {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        let mut models = HashMap::new();
        models.insert("llama-3", "meta-llama/Meta-Llama-3-8B-Instruct");
        models.insert("mixtral", "mistralai/Mixtral-8x7B-Instruct-v0.1");
        models.insert("qwen", "Qwen/Qwen2-7B-Instruct");

        Self {
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            api_key,
            timeout,
            http: reqwest::Client::new(),
            models,
        }
    }

    fn model_endpoint(&self, model: &str) -> String {
        let path = self.models.get(model).copied().unwrap_or(model);
        format!("{}/{}", self.base_url, path)
    }

    /// Flattens messages into a single prompt: role-prefixed lines
    /// terminated by `\nAssistant:` (spec §4.1).
    fn format_prompt(messages: &[ChatMessage]) -> String {
        let mut lines: Vec<String> = messages
            .iter()
            .map(|m| {
                let prefix = match m.role {
                    MessageRole::System => "System",
                    MessageRole::User => "User",
                    MessageRole::Assistant => "Assistant",
                };
                format!("{prefix}: {}", m.content)
            })
            .collect();
        lines.push("Assistant:".to_string());
        lines.join("\n")
    }
}

#[derive(Serialize)]
struct HfParameters {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_new_tokens: Option<u32>,
}

#[derive(Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
}

#[async_trait]
impl ProviderAdapter for HuggingFaceAdapter {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn default_model(&self) -> &'static str {
        "llama-3"
    }

    async fn invoke(&self, req: &InvokeRequest) -> Result<NormalisedResponse, GatewayError> {
        let Some(api_key) = &self.api_key else {
            return Err(GatewayError::MisconfiguredUpstream(
                "huggingface API key not configured".to_string(),
            ));
        };

        let model = req.model.clone().unwrap_or_else(|| self.default_model().to_string());
        let prompt = Self::format_prompt(&req.messages);

        let body = HfRequest {
            inputs: prompt.clone(),
            parameters: HfParameters {
                temperature: req.temperature,
                max_new_tokens: req.max_tokens,
            },
        };

        let response = self
            .http
            .post(self.model_endpoint(&model))
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
        if status.as_u16() == 503 {
            return Err(GatewayError::TransientUpstream(
                "huggingface model is loading".to_string(),
            ));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status.as_u16(), &text));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::FatalUpstream(format!("malformed response body: {e}")))?;

        let mut content = match &data {
            Value::Array(arr) => arr
                .first()
                .and_then(|v| v.get("generated_text"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            Value::Object(_) => data
                .get("generated_text")
                .and_then(|v| v.as_str())
                .unwrap_or(&data.to_string())
                .to_string(),
            other => other.to_string(),
        };

        if let Some(stripped) = content.strip_prefix(prompt.as_str()) {
            content = stripped.trim().to_string();
        }

        // Upstream returns no token counts; estimate by byte length (spec §4.1).
        let input_tokens = (prompt.len() / 4) as u32;
        let output_tokens = (content.len() / 4) as u32;

        Ok(NormalisedResponse {
            request_id: format!("hf-{}", uuid::Uuid::new_v4().simple()),
            model,
            content,
            input_tokens,
            output_tokens,
            finish_reason: Some("stop".to_string()),
        })
    }
}

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
    use crate::llm::ChatMessage;

    #[test]
    fn format_prompt_prefixes_roles_and_terminates_with_assistant() {
        let messages = vec![
            ChatMessage {
                role: MessageRole::System,
                content: "be terse".to_string(),
            },
            ChatMessage {
                role: MessageRole::User,
                content: "hello".to_string(),
            },
        ];
        let prompt = HuggingFaceAdapter::format_prompt(&messages);
        assert_eq!(prompt, "System: be terse\nUser: hello\nAssistant:");
    }

    #[test]
    fn token_estimate_is_pure_function_of_byte_length() {
        let prompt = "a".repeat(40);
        assert_eq!(prompt.len() / 4, 10);
    }

    #[tokio::test]
    async fn missing_api_key_is_misconfigured() {
        let adapter = HuggingFaceAdapter::new(None, Duration::from_secs(30));
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
