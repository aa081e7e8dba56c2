//! Invocation requests and outcomes.

use crate::types::{CallId, FailureKind, ToolError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// A missing, null or empty id is replaced by a generated one.
fn call_id_or_generated<'de, D>(deserializer: D) -> Result<CallId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|id| CallId::from_string(id).ok())
        .unwrap_or_default())
}

/// A tool call the model asked for. Read-only input to dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// Model-assigned id; generated when absent.
    #[serde(default, alias = "id", deserialize_with = "call_id_or_generated")]
    pub call_id: CallId,

    #[serde(alias = "tool")]
    pub name: String,

    #[serde(default = "empty_object", alias = "args")]
    pub arguments: Value,
}

impl InvocationRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            call_id: CallId::new(),
            name: name.into(),
            arguments,
        }
    }

    pub fn with_call_id(mut self, call_id: CallId) -> Self {
        self.call_id = call_id;
        self
    }
}

/// Success or typed failure of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { result: Value },
    Failure { kind: FailureKind, message: String },
}

impl Outcome {
    pub fn success(result: Value) -> Self {
        Outcome::Success { result }
    }

    pub fn failure(err: &ToolError) -> Self {
        Outcome::Failure {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<Result<Value, ToolError>> for Outcome {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(result) => Outcome::success(result),
            Err(err) => Outcome::failure(&err),
        }
    }
}

/// Result of executing one [`InvocationRequest`], keyed to it by call id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationOutcome {
    pub call_id: CallId,
    pub name: String,
    pub arguments: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl InvocationOutcome {
    pub fn new(request: &InvocationRequest, outcome: Outcome) -> Self {
        Self {
            call_id: request.call_id.clone(),
            name: request.name.clone(),
            arguments: request.arguments.clone(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Success { result } => Some(result),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            Outcome::Failure { kind, .. } => Some(*kind),
            Outcome::Success { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure { message, .. } => Some(message),
            Outcome::Success { .. } => None,
        }
    }

    /// Text handed back to the model as the tool's reply.
    pub fn reply_content(&self) -> String {
        match &self.outcome {
            Outcome::Success { result: Value::String(s) } => s.clone(),
            Outcome::Success { result } => result.to_string(),
            Outcome::Failure { message, .. } => format!("Error: {}", message),
        }
    }
}

/// Success/failure counts over a dispatch batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn of(outcomes: &[InvocationOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_deserializes_model_shape() {
        let request: InvocationRequest =
            serde_json::from_value(json!({"id": "call_1", "tool": "multiply", "args": {"a": 1}})).unwrap();
        assert_eq!(request.call_id.as_str(), "call_1");
        assert_eq!(request.name, "multiply");
        assert_eq!(request.arguments, json!({"a": 1}));
    }

    #[test]
    fn test_request_defaults() {
        let request: InvocationRequest = serde_json::from_value(json!({"name": "multiply"})).unwrap();
        assert_eq!(request.arguments, json!({}));
        assert!(!request.call_id.as_str().is_empty());
    }

    #[test]
    fn test_empty_or_null_id_is_regenerated() {
        for id in [json!(""), Value::Null] {
            let request: InvocationRequest =
                serde_json::from_value(json!({"id": id, "name": "multiply", "arguments": {"a": 1, "b": 2}}))
                    .unwrap();
            assert!(request.call_id.as_str().starts_with("call_"));
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let request = InvocationRequest::new("remainder", json!({"a": 5, "b": 0}))
            .with_call_id(CallId::from_string("call_9".into()).unwrap());
        let outcome = InvocationOutcome::new(&request, Outcome::failure(&ToolError::DivisionByZero));

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "call_id": "call_9",
                "name": "remainder",
                "arguments": {"a": 5, "b": 0},
                "status": "failure",
                "kind": "division_by_zero",
                "message": "can't divide by zero"
            })
        );
        assert_eq!(outcome.reply_content(), "Error: can't divide by zero");
    }

    #[test]
    fn test_reply_content_for_successes() {
        let request = InvocationRequest::new("multiply", json!({}));
        let number = InvocationOutcome::new(&request, Outcome::success(json!(350)));
        let text = InvocationOutcome::new(&request, Outcome::success(json!("92.00 EUR")));
        assert_eq!(number.reply_content(), "350");
        assert_eq!(text.reply_content(), "92.00 EUR");
    }

    #[test]
    fn test_summary() {
        let request = InvocationRequest::new("multiply", json!({}));
        let outcomes = vec![
            InvocationOutcome::new(&request, Outcome::success(json!(1))),
            InvocationOutcome::new(&request, Outcome::failure(&ToolError::UnknownTool("x".into()))),
            InvocationOutcome::new(&request, Outcome::success(json!(2))),
        ];
        assert_eq!(DispatchSummary::of(&outcomes), DispatchSummary { succeeded: 2, failed: 1 });
    }
}
