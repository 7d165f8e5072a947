//! Error taxonomy for the gateway's request lifecycle.
//!
//! Every component in the core returns `Result<T, GatewayError>`. The
//! orchestrator is the only place a `GatewayError` is mapped to an HTTP
//! status code (see `api::handlers`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream rate limit exceeded: {0}")]
    RateLimitUpstream(String),

    #[error("transient upstream failure: {0}")]
    TransientUpstream(String),

    #[error("fatal upstream error: {0}")]
    FatalUpstream(String),

    #[error("upstream provider misconfigured: {0}")]
    MisconfiguredUpstream(String),

    #[error("invalid or missing credential")]
    Unauthenticated,

    #[error("rate limited, retry after {retry_after_seconds}s")]
    Throttled { retry_after_seconds: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    /// Whether this kind is eligible for the fallback executor to try the
    /// next provider (spec §4.4 / §7).
    pub fn is_retriable_by_fallback(&self) -> bool {
        matches!(
            self,
            GatewayError::Timeout
                | GatewayError::RateLimitUpstream(_)
                | GatewayError::TransientUpstream(_)
                | GatewayError::FatalUpstream(_)
                | GatewayError::MisconfiguredUpstream(_)
        )
    }

    /// Stable, low-cardinality label for the error counter metric — the
    /// Rust analogue of the original Python's `type(e).__name__`.
    pub fn error_type(&self) -> &'static str {
        match self {
            GatewayError::Timeout => "timeout",
            GatewayError::RateLimitUpstream(_) => "rate_limit_upstream",
            GatewayError::TransientUpstream(_) => "transient_upstream",
            GatewayError::FatalUpstream(_) => "fatal_upstream",
            GatewayError::MisconfiguredUpstream(_) => "misconfigured_upstream",
            GatewayError::Unauthenticated => "unauthenticated",
            GatewayError::Throttled { .. } => "throttled",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                axum::Json(json!({"error": self.to_string()})),
            )
                .into_response(),
            GatewayError::Throttled {
                retry_after_seconds,
            } => {
                let mut resp = (
                    StatusCode::TOO_MANY_REQUESTS,
                    axum::Json(json!({"error": self.to_string()})),
                )
                    .into_response();
                resp.headers_mut().insert(
                    "Retry-After",
                    retry_after_seconds.to_string().parse().unwrap(),
                );
                resp
            }
            GatewayError::Timeout
            | GatewayError::RateLimitUpstream(_)
            | GatewayError::TransientUpstream(_)
            | GatewayError::FatalUpstream(_)
            | GatewayError::MisconfiguredUpstream(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(json!({"error": self.to_string()})),
            )
                .into_response(),
            GatewayError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({"error": self.to_string()})),
            )
                .into_response(),
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(e: sqlx::Error) -> Self {
        GatewayError::Internal(format!("database error: {e}"))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::TransientUpstream(e.to_string())
        }
    }
}
