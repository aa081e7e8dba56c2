//! Core types shared across the crate.
//!
//! - **IDs**: [`CallId`] linking requests to outcomes
//! - **Errors**: setup errors and the per-invocation failure taxonomy
//! - **Config**: model, currency endpoint, HTTP and logging settings

mod config;
mod errors;
mod ids;

pub use config::{
    ApiKeys, Config, CurrencyConfig, HttpConfig, LlmConfig, ObservabilityConfig, Provider,
};
pub use errors::{Error, FailureKind, Result, ToolError};
pub use ids::CallId;
