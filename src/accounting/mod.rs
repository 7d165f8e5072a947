//! C8 — Accounting Sink. Persists a cost record and a request log row each
//! in its own transaction; a write failure here is logged and swallowed,
//! never surfaced to the caller (spec §4.8). Grounded on the original
//! Python's `app/cost/tracker.py::record_cost`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CostRecord, RequestLog, RequestLogStatus};

pub struct AccountingSink {
    pool: PgPool,
}

impl AccountingSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record_cost(
        &self,
        api_key_id: Uuid,
        request_id: &str,
        provider: &str,
        model: &str,
        tokens_in: i32,
        tokens_out: i32,
        cost_usd: Decimal,
        latency_ms: i32,
    ) {
        let record = CostRecord {
            id: Uuid::new_v4(),
            api_key_id,
            request_id: request_id.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            tokens_in,
            tokens_out,
            cost_usd,
            latency_ms,
            created_at: chrono::Utc::now(),
        };

        let result = sqlx::query(
            "INSERT INTO cost_records \
             (id, api_key_id, request_id, provider, model, tokens_in, tokens_out, cost_usd, latency_ms, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(record.id)
        .bind(record.api_key_id)
        .bind(record.request_id)
        .bind(record.provider)
        .bind(record.model)
        .bind(record.tokens_in)
        .bind(record.tokens_out)
        .bind(record.cost_usd)
        .bind(record.latency_ms)
        .bind(record.created_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::error!(error = %e, request_id, "failed to persist cost record");
        }
    }

    pub async fn record_request_log(
        &self,
        api_key_id: Uuid,
        request_id: &str,
        task: Option<&str>,
        budget: Option<&str>,
        latency_sensitive: Option<bool>,
        provider_used: &str,
        status: RequestLogStatus,
    ) {
        let log = RequestLog {
            id: Uuid::new_v4(),
            request_id: request_id.to_string(),
            api_key_id,
            task: task.map(str::to_string),
            budget: budget.map(str::to_string),
            latency_sensitive,
            provider_used: provider_used.to_string(),
            status: status.as_str().to_string(),
            created_at: chrono::Utc::now(),
        };

        let result = sqlx::query(
            "INSERT INTO request_logs \
             (id, request_id, api_key_id, task, budget, latency_sensitive, provider_used, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(log.id)
        .bind(log.request_id)
        .bind(log.api_key_id)
        .bind(log.task)
        .bind(log.budget)
        .bind(log.latency_sensitive)
        .bind(log.provider_used)
        .bind(log.status)
        .bind(log.created_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::error!(error = %e, request_id, "failed to persist request log");
        }
    }
}
