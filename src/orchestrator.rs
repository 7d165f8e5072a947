//! C7 — Request Lifecycle Orchestrator. Sequences C5→C6→C3→C4→C2→C8 and
//! emits metrics; the only component allowed to produce a terminal client
//! response (spec §4.7). Grounded structurally on the teacher's
//! `api/handlers.rs` request-handling flow, generalised to the gateway's
//! own pipeline.

use std::time::Instant;

use rand::Rng;

use crate::accounting::AccountingSink;
use crate::admission::{Admission, AdmissionController};
use crate::auth::TenantStore;
use crate::error::GatewayError;
use crate::llm::fallback::{self, FallbackOutcome};
use crate::llm::pricing::{self, PricingEntry};
use crate::llm::router;
use crate::llm::traits::ProviderAdapter;
use crate::llm::{ChatMessage, InvokeRequest, NormalisedResponse};
use crate::metrics::{Metrics, RequestStatus};
use crate::models::{RequestLogStatus, Tenant};

use std::collections::HashMap;

pub struct ChatCompletionParams {
    pub bearer: String,
    pub messages: Vec<ChatMessage>,
    pub task: Option<String>,
    pub budget: Option<String>,
    pub latency_sensitive: bool,
    pub model_override: Option<String>,
    pub provider_override: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

pub struct ChatCompletionOutcome {
    pub request_id: String,
    pub response: NormalisedResponse,
    pub provider_used: &'static str,
    pub cost_usd: rust_decimal::Decimal,
    pub created_unix: i64,
}

fn new_request_id() -> String {
    let mut rng = rand::thread_rng();
    let hex: String = (0..12)
        .map(|_| std::char::from_digit(rng.gen_range(0..16), 16).unwrap())
        .collect();
    format!("req-{hex}")
}

pub struct Orchestrator {
    tenant_store: Box<dyn TenantStore>,
    admission: AdmissionController,
    adapters: HashMap<&'static str, Box<dyn ProviderAdapter>>,
    pricing_table: HashMap<(&'static str, &'static str), PricingEntry>,
    accounting: AccountingSink,
    metrics: Metrics,
}

impl Orchestrator {
    pub fn new(
        tenant_store: Box<dyn TenantStore>,
        admission: AdmissionController,
        adapters: HashMap<&'static str, Box<dyn ProviderAdapter>>,
        accounting: AccountingSink,
        metrics: Metrics,
    ) -> Self {
        Self {
            tenant_store,
            admission,
            adapters,
            pricing_table: pricing::pricing_table(),
            accounting,
            metrics,
        }
    }

    /// Step 1 of §4.7: generates the request id and timestamps the call
    /// before any component runs.
    pub async fn handle_chat_completion(
        &self,
        params: ChatCompletionParams,
    ) -> Result<ChatCompletionOutcome, GatewayError> {
        let request_id = new_request_id();
        let start = Instant::now();

        // Step 2 — C5.
        let tenant = self.authenticate(&params.bearer).await?;

        // Step 3 — C6.
        self.admit(&tenant).await?;

        // Step 4 — C3, compose the provider list.
        let primary = router::select_provider(
            params.task.as_deref(),
            params.budget.as_deref(),
            params.latency_sensitive,
            params.provider_override.as_deref(),
        );
        let chain = fallback::provider_chain(primary);

        // Step 5 — C4.
        let invoke_req = InvokeRequest {
            messages: params.messages,
            model: params.model_override.clone(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let outcome = match fallback::execute(&chain, &self.adapters, &invoke_req).await {
            Ok(o) => o,
            Err(e) => {
                let error_type = e.error_type();
                self.metrics
                    .record_request(&tenant_label(&tenant), primary, RequestStatus::Failure);
                self.metrics
                    .record_error(&tenant_label(&tenant), primary, error_type);
                self.accounting
                    .record_request_log(
                        tenant.id,
                        &request_id,
                        params.task.as_deref(),
                        params.budget.as_deref(),
                        Some(params.latency_sensitive),
                        primary,
                        RequestLogStatus::Failure,
                    )
                    .await;
                return Err(map_terminal(e));
            }
        };

        let FallbackOutcome {
            response,
            provider_used,
            fallback_used,
        } = outcome;

        // Step 6.
        let latency_ms = start.elapsed().as_millis() as i32;

        // Step 7 — C2 + C8 cost record (non-fatal on DB error).
        let cost_usd = pricing::cost(
            &self.pricing_table,
            provider_used,
            &response.model,
            response.input_tokens,
            response.output_tokens,
        );
        self.accounting
            .record_cost(
                tenant.id,
                &request_id,
                provider_used,
                &response.model,
                response.input_tokens as i32,
                response.output_tokens as i32,
                cost_usd,
                latency_ms,
            )
            .await;

        // Step 8 — C8 request log (non-fatal on DB error).
        self.accounting
            .record_request_log(
                tenant.id,
                &request_id,
                params.task.as_deref(),
                params.budget.as_deref(),
                Some(params.latency_sensitive),
                provider_used,
                RequestLogStatus::Success,
            )
            .await;

        // Step 9 — metrics.
        let tenant_label = tenant_label(&tenant);
        self.metrics
            .record_request(&tenant_label, provider_used, RequestStatus::Success);
        self.metrics.record_cost(&tenant_label, provider_used, &response.model, cost_usd);
        self.metrics
            .record_latency(&tenant_label, provider_used, latency_ms as f64 / 1000.0);
        if fallback_used {
            self.metrics.record_fallback(&tenant_label, primary, provider_used);
        }

        Ok(ChatCompletionOutcome {
            request_id,
            response,
            provider_used,
            cost_usd,
            created_unix: chrono::Utc::now().timestamp(),
        })
    }

    async fn authenticate(&self, bearer: &str) -> Result<Tenant, GatewayError> {
        crate::auth::authenticate(self.tenant_store.as_ref(), bearer).await
    }

    async fn admit(&self, tenant: &Tenant) -> Result<(), GatewayError> {
        match self.admission.admit(tenant.id, tenant.rate_limit_per_minute).await {
            Admission::Admitted => Ok(()),
            Admission::Throttled { retry_after_seconds } => Err(GatewayError::Throttled {
                retry_after_seconds,
            }),
        }
    }

    pub fn pricing_table(&self) -> &HashMap<(&'static str, &'static str), PricingEntry> {
        &self.pricing_table
    }
}

fn tenant_label(tenant: &Tenant) -> String {
    tenant.name.clone().unwrap_or_else(|| tenant.id.to_string())
}

/// All providers failed (spec §4.7 step 5): surface as 503 regardless of
/// the specific terminal `ErrorKind` the last attempt produced.
fn map_terminal(e: GatewayError) -> GatewayError {
    GatewayError::TransientUpstream(format!("all providers failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_shape() {
        let id = new_request_id();
        assert!(id.starts_with("req-"));
        assert_eq!(id.len(), "req-".len() + 12);
        assert!(id["req-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
