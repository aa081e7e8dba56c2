//! Language-model collaborator: wire types, HTTP client, tool session.

mod client;
mod session;
mod types;

pub use client::{ModelClient, OpenAiClient};
pub use session::{ToolSession, TurnReport};
pub use types::{ChatMessage, ModelResponse, WireFunctionCall, WireToolCall};
