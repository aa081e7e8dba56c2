//! One tool-using conversation turn: ask, dispatch, report back, answer.

use super::client::ModelClient;
use super::types::{ChatMessage, ModelResponse};
use crate::dispatch::{Dispatcher, InvocationOutcome};
use crate::tools::ToolSpec;
use crate::types::Result;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Everything that happened during [`ToolSession::run_turn`].
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// The model's reply to the user prompt.
    pub first: ModelResponse,
    /// One outcome per tool call in `first`, in order.
    pub outcomes: Vec<InvocationOutcome>,
    /// Final answer text: the follow-up reply if tools ran, else `first.content`.
    pub answer: Option<String>,
}

/// Binds a dispatcher's tools to a model client.
pub struct ToolSession {
    client: Arc<dyn ModelClient>,
    dispatcher: Dispatcher,
    system_prompt: Option<String>,
    tools: Vec<ToolSpec>,
}

impl ToolSession {
    pub fn new(client: Arc<dyn ModelClient>, dispatcher: Dispatcher) -> Self {
        let tools = dispatcher.registry().bind_specs();
        Self {
            client,
            dispatcher,
            system_prompt: None,
            tools,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Send `prompt`, run any requested tools, and make at most one
    /// follow-up request carrying their results.
    pub async fn run_turn(&self, prompt: &str) -> Result<TurnReport> {
        let mut messages = Vec::with_capacity(4);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(prompt));

        let first = self.client.complete(&messages, &self.tools).await?;
        if !first.has_tool_calls() {
            let answer = first.content.clone();
            return Ok(TurnReport {
                first,
                outcomes: Vec::new(),
                answer,
            });
        }

        info!(tool_calls = first.tool_calls.len(), "model requested tools");
        let outcomes = self.dispatcher.dispatch(&first.tool_calls).await;

        messages.push(ChatMessage::assistant_tool_calls(
            first.content.clone(),
            &first.tool_calls,
        ));
        for outcome in &outcomes {
            messages.push(ChatMessage::tool(&outcome.call_id, outcome.reply_content()));
        }

        let follow_up = self.client.complete(&messages, &self.tools).await?;
        Ok(TurnReport {
            first,
            outcomes,
            answer: follow_up.content,
        })
    }
}

impl fmt::Debug for ToolSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSession")
            .field("dispatcher", &self.dispatcher)
            .field("system_prompt", &self.system_prompt)
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::InvocationRequest;
    use crate::tools::arithmetic_registry;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every conversation it was sent.
    #[derive(Default)]
    struct ScriptedModel {
        replies: Mutex<VecDeque<ModelResponse>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<ModelResponse>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn complete(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Result<ModelResponse> {
            assert_eq!(tools.len(), 2);
            self.seen.lock().unwrap().push(messages.to_vec());
            Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    fn session(model: Arc<ScriptedModel>) -> ToolSession {
        let dispatcher = Dispatcher::new(Arc::new(arithmetic_registry().unwrap()));
        ToolSession::new(model, dispatcher)
    }

    #[tokio::test]
    async fn test_turn_without_tools_returns_first_answer() {
        let model = Arc::new(ScriptedModel::new(vec![ModelResponse {
            content: Some("Hello!".to_string()),
            tool_calls: vec![],
        }]));

        let report = session(model.clone()).run_turn("hi").await.unwrap();
        assert_eq!(report.answer.as_deref(), Some("Hello!"));
        assert!(report.outcomes.is_empty());
        assert_eq!(model.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_turn_feeds_outcomes_back() {
        let call = InvocationRequest::new("multiply", json!({"a": 25, "b": 18}));
        let call_id = call.call_id.clone();
        let model = Arc::new(ScriptedModel::new(vec![
            ModelResponse {
                content: None,
                tool_calls: vec![call, InvocationRequest::new("remainder", json!({"a": 1, "b": 0}))],
            },
            ModelResponse {
                content: Some("The area is 450 square units.".to_string()),
                tool_calls: vec![],
            },
        ]));

        let report = session(model.clone())
            .with_system_prompt("You are a calculator.")
            .run_turn("Area of a 25 by 18 rectangle?")
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].result(), Some(&json!(450)));
        assert!(!report.outcomes[1].is_success());
        assert_eq!(report.answer.as_deref(), Some("The area is 450 square units."));

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let follow_up = &seen[1];
        // system, user, assistant(tool_calls), tool, tool
        assert_eq!(follow_up.len(), 5);
        assert_eq!(follow_up[3], ChatMessage::tool(&call_id, "450"));
        assert!(matches!(
            &follow_up[4],
            ChatMessage::Tool { content, .. } if content == "Error: can't divide by zero"
        ));
    }
}
