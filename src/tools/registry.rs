//! Tool registry: name-keyed definitions with their schemas and callbacks.

use super::schema::{ToolArgs, ToolSchema};
use crate::types::{Error, Result, ToolError};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Callbacks
// =============================================================================

/// Callback behind a tool. Receives arguments that already passed the
/// tool's schema.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: ToolArgs) -> std::result::Result<Value, ToolError>;
}

/// Adapter turning a synchronous closure into a [`ToolHandler`].
pub struct FnHandler<F>(F);

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnHandler")
    }
}

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&ToolArgs) -> std::result::Result<Value, ToolError> + Send + Sync,
{
    async fn call(&self, args: ToolArgs) -> std::result::Result<Value, ToolError> {
        (self.0)(&args)
    }
}

// =============================================================================
// Tool definition
// =============================================================================

/// A registered tool. Immutable once built.
#[derive(Clone)]
pub struct ToolDefinition {
    name: String,
    description: String,
    schema: ToolSchema,
    handler: Arc<dyn ToolHandler>,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: ToolSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            handler,
        }
    }

    /// Definition backed by a synchronous closure.
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, schema: ToolSchema, f: F) -> Self
    where
        F: Fn(&ToolArgs) -> std::result::Result<Value, ToolError> + Send + Sync + 'static,
    {
        Self::new(name, description, schema, Arc::new(FnHandler(f)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }

    /// Model-facing description of this tool.
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.schema.to_json_schema(),
        }
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Tool description bound to a model request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

// =============================================================================
// Tool registry
// =============================================================================

/// In-memory registry keyed by tool name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Names are unique.
    pub fn register(&mut self, definition: ToolDefinition) -> Result<()> {
        if definition.name.is_empty() {
            return Err(Error::validation("Tool name cannot be empty"));
        }
        if self.tools.contains_key(&definition.name) {
            return Err(Error::DuplicateTool(definition.name));
        }
        self.tools.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Exact-name lookup.
    pub fn lookup(&self, name: &str) -> std::result::Result<&ToolDefinition, ToolError> {
        self.tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All definitions, sorted by name.
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        let mut defs: Vec<&ToolDefinition> = self.tools.values().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Model-facing specs for every tool, sorted by name.
    pub fn bind_specs(&self) -> Vec<ToolSpec> {
        self.definitions().into_iter().map(ToolDefinition::spec).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
