//! Route handlers: thin translation between axum's extractors and the
//! orchestrator / read-only lookups. Grounded structurally on the teacher's
//! `api/handlers.rs` handler-per-route shape.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::prelude::ToPrimitive;

use crate::error::GatewayError;
use crate::llm::fallback;
use crate::llm::router;
use crate::orchestrator::ChatCompletionParams;

use super::types::{
    ChatChoiceDto, ChatChoiceMessageDto, ChatCompletionRequest, ChatCompletionResponse,
    HealthResponse, ProviderCatalogueEntry, ProviderCatalogueResponse, RootResponse,
    RoutingPreviewQuery, RoutingPreviewResponse, UsageDto,
};
use super::AppState;

fn bearer_from_headers(headers: &HeaderMap) -> Result<String, GatewayError> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(GatewayError::Unauthenticated)?;
    value
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
        .ok_or(GatewayError::Unauthenticated)
}

pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ChatCompletionRequest>,
) -> impl IntoResponse {
    let bearer = match bearer_from_headers(&headers) {
        Ok(b) => b,
        Err(e) => return e.into_response(),
    };

    let params = ChatCompletionParams {
        bearer,
        messages: body.messages.into_iter().map(Into::into).collect(),
        task: body.task,
        budget: body.budget,
        latency_sensitive: body.latency_sensitive,
        model_override: body.model,
        provider_override: body.provider,
        temperature: body.temperature,
        max_tokens: body.max_tokens,
    };

    match state.orchestrator.handle_chat_completion(params).await {
        Ok(outcome) => {
            let response = ChatCompletionResponse {
                id: outcome.request_id,
                object: "chat.completion",
                created: outcome.created_unix,
                model: outcome.response.model,
                choices: vec![ChatChoiceDto {
                    index: 0,
                    message: ChatChoiceMessageDto {
                        role: "assistant",
                        content: outcome.response.content,
                    },
                    finish_reason: outcome.response.finish_reason,
                }],
                usage: UsageDto {
                    prompt_tokens: outcome.response.input_tokens,
                    completion_tokens: outcome.response.output_tokens,
                    total_tokens: outcome.response.input_tokens + outcome.response.output_tokens,
                },
                provider: outcome.provider_used,
                cost_usd: outcome.cost_usd.to_f64().unwrap_or(0.0),
            };
            Json(response).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}

pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        service: "llm-gateway",
        version: env!("CARGO_PKG_VERSION"),
        docs: "/v1/providers",
        health: "/health",
        metrics: "/metrics",
    })
}

pub async fn routing_preview(
    Query(query): Query<RoutingPreviewQuery>,
) -> impl IntoResponse {
    let primary = router::select_provider(
        query.task.as_deref(),
        query.budget.as_deref(),
        query.latency_sensitive,
        None,
    );
    let fallback_chain = fallback::provider_chain(primary);
    Json(RoutingPreviewResponse {
        primary,
        fallback_chain,
    })
}

pub async fn providers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let entries = state
        .adapter_catalogue
        .iter()
        .map(|(name, default_model)| ProviderCatalogueEntry {
            name: *name,
            default_model: *default_model,
        })
        .collect();
    Json(ProviderCatalogueResponse { providers: entries })
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut buffer = String::new();
    if let Err(e) = prometheus_client::encoding::text::encode(&mut buffer, &state.registry) {
        tracing::error!(error = %e, "failed to encode metrics");
        return (axum::http::StatusCode::INTERNAL_SERVER_ERROR, String::new()).into_response();
    }
    (
        [(axum::http::header::CONTENT_TYPE, "application/openmetrics-text; version=1.0.0; charset=utf-8")],
        buffer,
    )
        .into_response()
}
