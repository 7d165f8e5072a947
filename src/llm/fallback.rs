//! C4 — fallback executor. Walks an ordered provider list, at most one
//! invocation per provider, fixed 500ms cool-down between attempts.
//! Grounded structurally on the teacher's retry loop in
//! `llm/router.rs::chat_completion` (sleep-then-continue shape), but
//! rewritten per spec §4.4: the teacher retries the *same* provider; this
//! walks *distinct* providers and never retries one twice. Near-literal
//! translation target: original Python's `app/utils/retry.py::call_with_fallback`.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::GatewayError;
use crate::llm::traits::ProviderAdapter;
use crate::llm::{InvokeRequest, NormalisedResponse, CANONICAL_CHAIN};

const FALLBACK_COOLDOWN: Duration = Duration::from_millis(500);

/// Composes the ordered list of at most 3 providers to try: `primary`
/// first, then the canonical chain with `primary` removed.
pub fn provider_chain(primary: &str) -> Vec<&'static str> {
    let mut chain: Vec<&'static str> = vec![CANONICAL_CHAIN
        .iter()
        .find(|p| **p == primary)
        .copied()
        .unwrap_or("openai")];
    for p in CANONICAL_CHAIN {
        if p != chain[0] {
            chain.push(p);
        }
    }
    chain.truncate(3);
    chain
}

pub struct FallbackOutcome {
    pub response: NormalisedResponse,
    pub provider_used: &'static str,
    pub fallback_used: bool,
}

/// Runs the executor described in spec §4.4. `adapters` must contain an
/// entry for every name that can appear in `providers`.
pub async fn execute(
    providers: &[&'static str],
    adapters: &HashMap<&'static str, Box<dyn ProviderAdapter>>,
    req: &InvokeRequest,
) -> Result<FallbackOutcome, GatewayError> {
    let mut last_err: Option<GatewayError> = None;

    for (i, provider) in providers.iter().enumerate() {
        let adapter = adapters
            .get(provider)
            .ok_or_else(|| GatewayError::Internal(format!("no adapter registered for {provider}")))?;

        match adapter.invoke(req).await {
            Ok(response) => {
                return Ok(FallbackOutcome {
                    response,
                    provider_used: provider,
                    fallback_used: i > 0,
                });
            }
            Err(e) if e.is_retriable_by_fallback() => {
                last_err = Some(e);
                if i < providers.len() - 1 {
                    tokio::time::sleep(FALLBACK_COOLDOWN).await;
                    continue;
                } else {
                    return Err(last_err.unwrap());
                }
            }
            Err(e) => {
                // Non-retriable kind: wrap and surface immediately.
                return Err(GatewayError::FatalUpstream(e.to_string()));
            }
        }
    }

    Err(last_err.unwrap_or_else(|| GatewayError::Internal("no providers available".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedAdapter {
        name: &'static str,
        result: Result<NormalisedResponse, GatewayError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderAdapter for ScriptedAdapter {
        fn name(&self) -> &'static str {
            self.name
        }
        fn default_model(&self) -> &'static str {
            "test-model"
        }
        async fn invoke(&self, _req: &InvokeRequest) -> Result<NormalisedResponse, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn req() -> InvokeRequest {
        InvokeRequest {
            messages: vec![],
            model: None,
            temperature: 0.7,
            max_tokens: None,
        }
    }

    #[test]
    fn provider_chain_length_3_primary_first() {
        assert_eq!(provider_chain("deepseek"), vec!["deepseek", "openai", "huggingface"]);
        assert_eq!(provider_chain("openai"), vec!["openai", "deepseek", "huggingface"]);
    }

    #[tokio::test]
    async fn s4_fallback_on_429() {
        let mut adapters: HashMap<&'static str, Box<dyn ProviderAdapter>> = HashMap::new();
        adapters.insert(
            "openai",
            Box::new(ScriptedAdapter {
                name: "openai",
                result: Err(GatewayError::RateLimitUpstream("429".into())),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );
        adapters.insert(
            "deepseek",
            Box::new(ScriptedAdapter {
                name: "deepseek",
                result: Ok(NormalisedResponse {
                    request_id: "r1".into(),
                    model: "deepseek-chat".into(),
                    content: "hi".into(),
                    input_tokens: 1,
                    output_tokens: 1,
                    finish_reason: Some("stop".into()),
                }),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );
        adapters.insert(
            "huggingface",
            Box::new(ScriptedAdapter {
                name: "huggingface",
                result: Err(GatewayError::Timeout),
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        let chain = provider_chain("openai");
        let outcome = execute(&chain, &adapters, &req()).await.unwrap();
        assert_eq!(outcome.provider_used, "deepseek");
        assert!(outcome.fallback_used);
    }

    #[tokio::test]
    async fn s5_all_providers_fail() {
        let mut adapters: HashMap<&'static str, Box<dyn ProviderAdapter>> = HashMap::new();
        for name in ["openai", "deepseek", "huggingface"] {
            adapters.insert(
                name,
                Box::new(ScriptedAdapter {
                    name,
                    result: Err(GatewayError::Timeout),
                    calls: Arc::new(AtomicUsize::new(0)),
                }),
            );
        }
        let chain = provider_chain("openai");
        let result = execute(&chain, &adapters, &req()).await;
        assert!(result.is_err());
    }
}
