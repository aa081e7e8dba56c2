//! Application error types.
//!
//! Two layers, both derived with `thiserror`:
//! - [`Error`] is returned by setup APIs (registry construction, config,
//!   HTTP clients, model calls).
//! - [`ToolError`] is the per-invocation failure taxonomy. It is always
//!   captured into an outcome by the dispatch loop and never escapes it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A tool with this name is already registered.
    #[error("duplicate tool: {0}")]
    DuplicateTool(String),

    /// Invalid input to a setup API.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or malformed configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The language-model endpoint rejected or garbled a request.
    #[error("model error: {0}")]
    Model(String),

    /// HTTP transport errors.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }
}

/// Failure of a single tool invocation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {}", .issues.join("; "))]
    ArgumentValidation { tool: String, issues: Vec<String> },

    #[error("can't divide by zero")]
    DivisionByZero,

    #[error("currency lookup failed: {0}")]
    RemoteLookup(String),
}

impl ToolError {
    pub fn argument(tool: impl Into<String>, issue: impl Into<String>) -> Self {
        Self::ArgumentValidation {
            tool: tool.into(),
            issues: vec![issue.into()],
        }
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        Self::RemoteLookup(msg.into())
    }

    /// Kind label carried by failure outcomes.
    pub fn kind(&self) -> FailureKind {
        match self {
            ToolError::UnknownTool(_) => FailureKind::UnknownTool,
            ToolError::ArgumentValidation { .. } => FailureKind::ArgumentValidation,
            ToolError::DivisionByZero => FailureKind::DivisionByZero,
            ToolError::RemoteLookup(_) => FailureKind::RemoteLookup,
        }
    }
}

/// Kind label for a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnknownTool,
    ArgumentValidation,
    DivisionByZero,
    RemoteLookup,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnknownTool => "unknown_tool",
            FailureKind::ArgumentValidation => "argument_validation",
            FailureKind::DivisionByZero => "division_by_zero",
            FailureKind::RemoteLookup => "remote_lookup",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
