//! C5 — Credential Validator. Bearer token resolved to a tenant by
//! constant-time bcrypt verification over a linear scan of active tenants.
//! Grounded on the original Python's `app/auth/api_key.py`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::GatewayError;
use crate::models::Tenant;

#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn active_tenants(&self) -> Result<Vec<Tenant>, GatewayError>;
}

pub struct PgTenantStore {
    pool: PgPool,
}

impl PgTenantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantStore for PgTenantStore {
    async fn active_tenants(&self) -> Result<Vec<Tenant>, GatewayError> {
        let tenants = sqlx::query_as::<_, Tenant>(
            "SELECT id, key_hash, name, rate_limit_per_minute, created_at, is_active \
             FROM api_keys WHERE is_active = true",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tenants)
    }
}

/// Resolves a bearer token to a `Tenant`. The verifier itself (`bcrypt`) is
/// constant-time; this outer scan is linear in the number of active
/// tenants — an accepted, explicitly-flagged property (spec §4.5, §9).
pub async fn authenticate(store: &dyn TenantStore, bearer: &str) -> Result<Tenant, GatewayError> {
    let tenants = store.active_tenants().await?;
    for tenant in tenants {
        if bcrypt::verify(bearer, &tenant.key_hash).unwrap_or(false) {
            return Ok(tenant);
        }
    }
    Err(GatewayError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    struct FixedStore(Vec<Tenant>);

    #[async_trait]
    impl TenantStore for FixedStore {
        async fn active_tenants(&self) -> Result<Vec<Tenant>, GatewayError> {
            Ok(self.0.clone())
        }
    }

    fn tenant_with_secret(secret: &str) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            key_hash: bcrypt::hash(secret, bcrypt::DEFAULT_COST).unwrap(),
            name: Some("test".to_string()),
            rate_limit_per_minute: 60,
            created_at: Utc::now(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn matches_correct_bearer() {
        let store = FixedStore(vec![tenant_with_secret("top-secret")]);
        let tenant = authenticate(&store, "top-secret").await.unwrap();
        assert_eq!(tenant.name.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn rejects_unknown_bearer() {
        let store = FixedStore(vec![tenant_with_secret("top-secret")]);
        let result = authenticate(&store, "wrong").await;
        assert!(matches!(result, Err(GatewayError::Unauthenticated)));
    }

    #[tokio::test]
    async fn scans_past_non_matching_tenants() {
        let store = FixedStore(vec![
            tenant_with_secret("other-1"),
            tenant_with_secret("other-2"),
            tenant_with_secret("mine"),
        ]);
        let tenant = authenticate(&store, "mine").await.unwrap();
        assert!(bcrypt::verify("mine", &tenant.key_hash).unwrap());
    }
}
