//! The bounded tool-orchestration loop.
//!
//! One query, one transcript, at most five model round-trips. Each step
//! either ends the conversation (final text, transport failure, or budget
//! exhaustion) or dispatches the requested invocations in order and loops.
//! Invocation failures never abort the conversation — they become
//! structured tool results the model can react to on the next step.

use serde_json::Value;
use shopscope_core::message::{MessageToolCall, Transcript};
use shopscope_core::provider::{Provider, ProviderRequest, ToolDefinition};
use shopscope_core::tool::{CapabilityResult, ErrorKind, ToolCall, ToolRegistry, names};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::prompt::SYSTEM_PROMPT;

/// The result of one query run: the final natural-language response and
/// the capability names used along the way ("None" when no capability was
/// invoked, else sorted and comma-joined).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutcome {
    pub response: String,
    pub tools_used: String,
}

/// Per-query loop state; discarded when `run` returns.
struct LoopState {
    /// Rows of the latest *successful* analytical query. Overwritten, never
    /// merged — a chart after two independent queries sees only the second.
    last_rows: Option<Value>,
    tools_used: BTreeSet<String>,
}

impl LoopState {
    fn new() -> Self {
        Self {
            last_rows: None,
            tools_used: BTreeSet::new(),
        }
    }

    fn tools_used_label(&self) -> String {
        if self.tools_used.is_empty() {
            "None".into()
        } else {
            self.tools_used
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

/// The orchestration loop that drives model calls and capability dispatch.
pub struct AgentLoop {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    max_steps: u32,
}

impl AgentLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            max_steps: 5,
        }
    }

    /// Set the step budget (model round-trips per query).
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max;
        self
    }

    /// Set the default max tokens per model response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Answer one user query.
    ///
    /// Always returns a well-formed outcome: a final model answer, the
    /// surfaced transport failure, or the fixed exhaustion message once the
    /// step budget is spent.
    pub async fn run(&self, user_query: &str) -> AgentOutcome {
        let mut transcript = Transcript::new(SYSTEM_PROMPT, user_query);
        let manifest: Vec<ToolDefinition> = self.tools.definitions();
        let mut state = LoopState::new();
        let mut step = 0;

        info!(transcript_id = %transcript.id, query = user_query, "Processing query");

        while step < self.max_steps {
            step += 1;
            debug!(
                transcript_id = %transcript.id,
                step,
                max_steps = self.max_steps,
                "Agent thinking"
            );

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: transcript.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: manifest.clone(),
            };

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(transcript_id = %transcript.id, error = %e, "Model client failed");
                    return AgentOutcome {
                        response: format!("An error occurred: {e}"),
                        tools_used: state.tools_used_label(),
                    };
                }
            };

            let turn = response.message;
            if turn.is_final() {
                return AgentOutcome {
                    response: turn.content,
                    tools_used: state.tools_used_label(),
                };
            }

            debug!(tool_count = turn.tool_calls.len(), "Dispatching tool calls");
            let calls = turn.tool_calls.clone();
            transcript.push(turn);

            // Strictly sequential: a chart call later in this turn may
            // depend on the row set of a SQL call earlier in it.
            for call in &calls {
                let result = self.resolve(call, &mut state).await;
                append_result(&mut transcript, call, &result);
            }
        }

        AgentOutcome {
            response: "The agent could not fully resolve the query after multiple steps. \
                       Please try rephrasing your query."
                .into(),
            tools_used: state.tools_used_label(),
        }
    }

    /// Resolve a single invocation: parse arguments, repair chart calls,
    /// dispatch, and update the row-set state. Every failure mode comes
    /// back as a structured result.
    async fn resolve(&self, call: &MessageToolCall, state: &mut LoopState) -> CapabilityResult {
        // Recorded regardless of outcome.
        state.tools_used.insert(call.name.clone());

        let mut arguments: Value = match serde_json::from_str(&call.arguments) {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Failed to parse tool arguments");
                return CapabilityResult::error(
                    ErrorKind::ArgumentParse,
                    format!(
                        "Error parsing arguments for tool {}: {e}. Arguments were: {}",
                        call.name, call.arguments
                    ),
                );
            }
        };
        if !arguments.is_object() {
            return CapabilityResult::error(
                ErrorKind::ArgumentParse,
                format!(
                    "Arguments for tool {} must be a JSON object. Arguments were: {}",
                    call.name, call.arguments
                ),
            );
        }

        // Chart argument repair: models routinely forget to re-attach the
        // row set from the prior query result.
        if call.name == names::CHART && arguments.get("data").is_none() {
            match &state.last_rows {
                Some(rows) => {
                    info!("Injecting previous SQL output as missing 'data' for generate_chart");
                    arguments["data"] = rows.clone();
                }
                None => {
                    return CapabilityResult::error(
                        ErrorKind::MissingChartData,
                        "Missing 'data' argument for generate_chart and no previous SQL \
                         query data available.",
                    );
                }
            }
        }

        let invocation = ToolCall {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments,
        };
        let result = self.tools.dispatch(&invocation).await;

        if call.name == names::SQL
            && let CapabilityResult::Ok(payload) = &result
            && payload["success"].as_bool().unwrap_or(false)
        {
            state.last_rows = Some(payload["data"].clone());
        }

        result
    }
}

fn append_result(transcript: &mut Transcript, call: &MessageToolCall, result: &CapabilityResult) {
    let content =
        serde_json::to_string(&result.payload()).unwrap_or_else(|_| "{}".to_string());
    transcript.push(shopscope_core::message::Message::tool_result(
        &call.id, &call.name, content,
    ));
}
