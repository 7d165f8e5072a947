//! Metrics registry for the gateway, grounded on the
//! `Family<Labels, Counter>` + `Registry` pattern used for MCP relay
//! metrics in the agent-gateway example repo, with labels taken from the
//! original Python's `app/metrics/prometheus.py`.

use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum RequestStatus {
    Success,
    Failure,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub tenant: String,
    pub provider: String,
    pub status: RequestStatus,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct CostLabels {
    pub tenant: String,
    pub provider: String,
    pub model: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct LatencyLabels {
    pub tenant: String,
    pub provider: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct FallbackLabels {
    pub tenant: String,
    pub primary: String,
    pub provider_used: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ErrorLabels {
    pub tenant: String,
    pub provider: String,
    pub error_type: String,
}

pub struct Metrics {
    requests_total: Family<RequestLabels, Counter>,
    cost_total_micros: Family<CostLabels, Counter>,
    latency_seconds: Family<LatencyLabels, Histogram>,
    fallbacks_total: Family<FallbackLabels, Counter>,
    errors_total: Family<ErrorLabels, Counter>,
}

impl Metrics {
    pub fn new(registry: &mut Registry) -> Self {
        let requests_total = Family::default();
        registry.register(
            "llm_gateway_requests",
            "Total number of chat completion requests",
            requests_total.clone(),
        );

        let cost_total_micros = Family::default();
        registry.register(
            "llm_gateway_cost_usd_micros",
            "Total cost in USD, scaled by 1e6 to avoid floating point in the registry",
            cost_total_micros.clone(),
        );

        let latency_seconds = Family::<LatencyLabels, Histogram>::new_with_constructor(|| {
            Histogram::new([0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0].into_iter())
        });
        registry.register(
            "llm_gateway_latency_seconds",
            "Request latency in seconds",
            latency_seconds.clone(),
        );

        let fallbacks_total = Family::default();
        registry.register(
            "llm_gateway_fallbacks",
            "Total number of requests that used a fallback provider",
            fallbacks_total.clone(),
        );

        let errors_total = Family::default();
        registry.register(
            "llm_gateway_errors",
            "Total number of provider errors",
            errors_total.clone(),
        );

        Self {
            requests_total,
            cost_total_micros,
            latency_seconds,
            fallbacks_total,
            errors_total,
        }
    }

    pub fn record_request(&self, tenant: &str, provider: &str, status: RequestStatus) {
        self.requests_total
            .get_or_create(&RequestLabels {
                tenant: tenant.to_string(),
                provider: provider.to_string(),
                status,
            })
            .inc();
    }

    pub fn record_cost(&self, tenant: &str, provider: &str, model: &str, cost_usd: rust_decimal::Decimal) {
        let micros = (cost_usd * rust_decimal::Decimal::from(1_000_000))
            .round()
            .to_string()
            .parse::<u64>()
            .unwrap_or(0);
        self.cost_total_micros
            .get_or_create(&CostLabels {
                tenant: tenant.to_string(),
                provider: provider.to_string(),
                model: model.to_string(),
            })
            .inc_by(micros);
    }

    pub fn record_latency(&self, tenant: &str, provider: &str, latency_seconds: f64) {
        self.latency_seconds
            .get_or_create(&LatencyLabels {
                tenant: tenant.to_string(),
                provider: provider.to_string(),
            })
            .observe(latency_seconds);
    }

    pub fn record_fallback(&self, tenant: &str, primary: &str, provider_used: &str) {
        self.fallbacks_total
            .get_or_create(&FallbackLabels {
                tenant: tenant.to_string(),
                primary: primary.to_string(),
                provider_used: provider_used.to_string(),
            })
            .inc();
    }

    pub fn record_error(&self, tenant: &str, provider: &str, error_type: &str) {
        self.errors_total
            .get_or_create(&ErrorLabels {
                tenant: tenant.to_string(),
                provider: provider.to_string(),
                error_type: error_type.to_string(),
            })
            .inc();
    }
}
