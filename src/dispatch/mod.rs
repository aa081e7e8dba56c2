//! Dispatch loop: resolves model-requested tool calls against a registry.
//!
//! Requests run one at a time in the order given. Each produces exactly one
//! outcome; a failing request never stops the ones after it.

mod outcome;

pub use outcome::{DispatchSummary, InvocationOutcome, InvocationRequest, Outcome};

use crate::tools::{ToolArgs, ToolRegistry};
use crate::types::ToolError;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, warn, Instrument};

/// Executes invocation batches against a shared, immutable registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// One outcome per request, in request order.
    pub async fn dispatch(&self, requests: &[InvocationRequest]) -> Vec<InvocationOutcome> {
        let mut outcomes = Vec::with_capacity(requests.len());
        for request in requests {
            outcomes.push(self.dispatch_one(request).await);
        }

        let summary = DispatchSummary::of(&outcomes);
        debug!(
            requests = requests.len(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            "dispatch batch complete"
        );
        outcomes
    }

    pub async fn dispatch_one(&self, request: &InvocationRequest) -> InvocationOutcome {
        let span = info_span!("tool_call", tool = %request.name, call_id = %request.call_id);

        async {
            let started = Instant::now();
            let result = self.invoke(request).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(value) => debug!(elapsed_ms, result = %value, "tool call succeeded"),
                Err(err) => warn!(elapsed_ms, kind = %err.kind(), error = %err, "tool call failed"),
            }

            InvocationOutcome::new(request, result.into())
        }
        .instrument(span)
        .await
    }

    async fn invoke(&self, request: &InvocationRequest) -> Result<Value, ToolError> {
        let tool = self.registry.lookup(&request.name)?;

        let values = tool
            .schema()
            .validate(&request.arguments)
            .map_err(|issues| ToolError::ArgumentValidation {
                tool: tool.name().to_string(),
                issues,
            })?;

        tool.handler().call(ToolArgs::new(tool.name(), values)).await
    }
}
