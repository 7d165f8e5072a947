//! Library root for the governance gateway: authentication, admission
//! control, deterministic routing, bounded fallback, cost accounting and
//! metrics in front of a small set of LLM chat-completion backends.

pub mod accounting;
pub mod admission;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod orchestrator;

pub use error::{GatewayError, Result};
