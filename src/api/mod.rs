//! axum `Router` assembly and shared `AppState`. Grounded on the teacher's
//! `server/` wiring idiom, generalised to the gateway's own state shape.

pub mod handlers;
pub mod types;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use prometheus_client::registry::Registry;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use crate::accounting::AccountingSink;
use crate::admission::AdmissionController;
use crate::auth::PgTenantStore;
use crate::config::Settings;
use crate::llm::providers::{HuggingFaceAdapter, OpenAiAdapter};
use crate::llm::traits::ProviderAdapter;
use crate::metrics::Metrics;
use crate::orchestrator::Orchestrator;

pub struct AppState {
    pub orchestrator: Orchestrator,
    pub registry: Registry,
    pub adapter_catalogue: Vec<(&'static str, &'static str)>,
}

impl AppState {
    pub fn new(settings: &Settings, db_pool: PgPool) -> Self {
        let timeout = Duration::from_secs(settings.provider_timeout_secs);

        let mut adapters: HashMap<&'static str, Box<dyn ProviderAdapter>> = HashMap::new();
        let openai = OpenAiAdapter::openai(settings.openai_api_key.clone(), timeout);
        let deepseek = OpenAiAdapter::deepseek(settings.deepseek_api_key.clone(), timeout);
        let huggingface = HuggingFaceAdapter::new(settings.huggingface_api_key.clone(), timeout);

        let adapter_catalogue = vec![
            (openai.name(), openai.default_model()),
            (deepseek.name(), deepseek.default_model()),
            (huggingface.name(), huggingface.default_model()),
        ];

        adapters.insert("openai", Box::new(openai));
        adapters.insert("deepseek", Box::new(deepseek));
        adapters.insert("huggingface", Box::new(huggingface));

        let tenant_store = Box::new(PgTenantStore::new(db_pool.clone()));
        let admission = AdmissionController::new();
        let accounting = AccountingSink::new(db_pool);

        let mut registry = Registry::default();
        let metrics = Metrics::new(&mut registry);

        let orchestrator = Orchestrator::new(tenant_store, admission, adapters, accounting, metrics);

        Self {
            orchestrator,
            registry,
            adapter_catalogue,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .route("/v1/routing/preview", get(handlers::routing_preview))
        .route("/v1/providers", get(handlers::providers))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
