//! The C1 Provider Adapter contract. Narrowed from the teacher's
//! `LLMProviderClient` trait (`llm/traits.rs`) down to exactly the
//! operation the gateway needs: one invocation, normalised in, normalised
//! response or error-kind out.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::llm::{InvokeRequest, NormalisedResponse};

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Identity used throughout routing, pricing and accounting — one of
    /// `KNOWN_PROVIDERS`.
    fn name(&self) -> &'static str;

    /// Model used when the caller supplies none (spec §4.1).
    fn default_model(&self) -> &'static str;

    async fn invoke(&self, req: &InvokeRequest) -> Result<NormalisedResponse, GatewayError>;
}
