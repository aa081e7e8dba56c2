//! Tool infrastructure: schemas, registry, and the built-in tools.

pub mod arithmetic;
pub mod currency;
pub mod registry;
pub mod schema;

pub use currency::{AmdorenClient, RateProvider};
pub use registry::{FnHandler, ToolDefinition, ToolHandler, ToolRegistry, ToolSpec};
pub use schema::{ParamDef, ParamType, ToolArgs, ToolSchema};

use crate::types::Result;
use std::sync::Arc;

/// Registry holding `multiply`, `remainder` and `convert_currency`.
pub fn builtin_registry(rates: Arc<dyn RateProvider>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(arithmetic::multiply_tool())?;
    registry.register(arithmetic::remainder_tool())?;
    registry.register(currency::convert_currency_tool(rates))?;
    Ok(registry)
}

/// Registry holding only the arithmetic tools.
pub fn arithmetic_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(arithmetic::multiply_tool())?;
    registry.register(arithmetic::remainder_tool())?;
    Ok(registry)
}
