//! # Tool Dispatch - LLM function-calling runtime
//!
//! Binds schema-described tools to a hosted chat model and executes the
//! tool calls it asks for:
//! - Name-keyed tool registry with declared parameter schemas
//! - Dispatch loop with per-invocation typed failures (never fail-fast)
//! - Built-in `multiply`, `remainder` and `convert_currency` tools
//! - OpenAI-compatible chat client that feeds outcomes back to the model
//!
//! ## Architecture
//!
//! ```text
//!   ModelClient ──tool calls──▶ Dispatcher ──lookup──▶ ToolRegistry
//!        ▲                          │                  ├ multiply
//!        └──── tool messages ◀──────┘ outcomes         ├ remainder
//!                                                      └ convert_currency ──▶ RateProvider
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod dispatch;
pub mod llm;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use dispatch::{Dispatcher, InvocationOutcome, InvocationRequest, Outcome};
pub use types::{Config, Error, FailureKind, Result, ToolError};
