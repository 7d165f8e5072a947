//! Domain models persisted to Postgres: tenants, cost records, request logs.

pub mod cost_record;
pub mod tenant;

pub use cost_record::{CostRecord, RequestLog, RequestLogStatus};
pub use tenant::Tenant;
