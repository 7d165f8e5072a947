//! Tenant record — the principal identified by one bearer credential.
//! Grounded on the original Python's `app/cost/models.py::APIKey`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    pub id: Uuid,
    /// bcrypt hash of the bearer secret. Never the secret itself.
    pub key_hash: String,
    pub name: Option<String>,
    /// Admission capacity R, requests per minute.
    pub rate_limit_per_minute: i32,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}
