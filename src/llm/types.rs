//! Chat-completions wire types (OpenAI-compatible format).

use crate::dispatch::InvocationRequest;
use crate::tools::ToolSpec;
use crate::types::CallId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One conversation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<WireToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Assistant turn that requested the given tool calls.
    pub fn assistant_tool_calls(content: Option<String>, calls: &[InvocationRequest]) -> Self {
        Self::Assistant {
            content,
            tool_calls: calls.iter().map(WireToolCall::from_request).collect(),
        }
    }

    pub fn tool(call_id: &CallId, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: call_id.as_str().to_string(),
            content: content.into(),
        }
    }
}

/// Tool call as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: WireFunctionCall,
}

/// Function name plus JSON-encoded arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

impl WireToolCall {
    fn from_request(request: &InvocationRequest) -> Self {
        let arguments = match &request.arguments {
            // undecodable arguments are kept verbatim
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        };
        Self {
            id: request.call_id.as_str().to_string(),
            kind: function_kind(),
            function: WireFunctionCall {
                name: request.name.clone(),
                arguments,
            },
        }
    }

    /// Decode into an invocation request.
    ///
    /// Arguments that are not valid JSON are carried as a JSON string so
    /// schema validation rejects them instead of this parser.
    pub fn into_request(self) -> InvocationRequest {
        let arguments = if self.function.arguments.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&self.function.arguments)
                .unwrap_or(Value::String(self.function.arguments))
        };

        let request = InvocationRequest::new(self.function.name, arguments);
        match CallId::from_string(self.id) {
            Ok(id) => request.with_call_id(id),
            Err(_) => request,
        }
    }
}

/// Tool spec in OpenAI function format.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireTool<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: &'a ToolSpec,
}

impl<'a> From<&'a ToolSpec> for WireTool<'a> {
    fn from(spec: &'a ToolSpec) -> Self {
        Self {
            kind: "function",
            function: spec,
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// What the model said: optional text and the tool calls it wants made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<InvocationRequest>,
}

impl ModelResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub(crate) fn from_message(message: ResponseMessage) -> Self {
        Self {
            content: message.content.filter(|c| !c.is_empty()),
            tool_calls: message
                .tool_calls
                .unwrap_or_default()
                .into_iter()
                .map(WireToolCall::into_request)
                .collect(),
        }
    }
}
