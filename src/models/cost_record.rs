//! Durable accounting rows. Grounded on the original Python's
//! `app/cost/models.py::CostRecord` / `RequestLog`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CostRecord {
    pub id: Uuid,
    pub api_key_id: Uuid,
    pub request_id: String,
    pub provider: String,
    pub model: String,
    pub tokens_in: i32,
    pub tokens_out: i32,
    pub cost_usd: Decimal,
    pub latency_ms: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestLogStatus {
    Success,
    Failure,
}

impl RequestLogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestLogStatus::Success => "success",
            RequestLogStatus::Failure => "failure",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequestLog {
    pub id: Uuid,
    pub request_id: String,
    pub api_key_id: Uuid,
    pub task: Option<String>,
    pub budget: Option<String>,
    pub latency_sensitive: Option<bool>,
    pub provider_used: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
