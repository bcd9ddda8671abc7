//! Tool trait — the abstraction over the three agent capabilities.
//!
//! Capabilities are what give the agent the ability to answer questions:
//! faceted search, analytical SQL, and chart rendering. Each is registered
//! in the ToolRegistry and exposed to the model through its declared
//! JSON-schema signature.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The closed set of capability names the agent orchestrates.
///
/// The loop special-cases two of them: `SQL` results feed the most-recent
/// row set, and `CHART` invocations missing their data argument are
/// repaired from it.
pub mod names {
    pub const SEARCH: &str = "meilisearch_query";
    pub const SQL: &str = "execute_sql_query";
    pub const CHART: &str = "generate_chart";
}

/// A request to execute a capability, with already-parsed arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the model's tool_call id)
    pub id: String,

    /// Name of the capability to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

/// The kind of a structured capability failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The model's argument string was not valid JSON
    ArgumentParse,
    /// The requested capability is not in the registry
    CapabilityNotFound,
    /// The capability implementation failed
    Execution,
    /// The capability returned a string that was not valid JSON
    InvalidPayload,
    /// A chart was requested without data and no prior query result exists
    MissingChartData,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ArgumentParse => "argument_parse",
            ErrorKind::CapabilityNotFound => "capability_not_found",
            ErrorKind::Execution => "execution",
            ErrorKind::InvalidPayload => "invalid_payload",
            ErrorKind::MissingChartData => "missing_chart_data",
        }
    }
}

/// The outcome of one capability dispatch.
///
/// Exactly one of two shapes: a JSON payload on success, or a structured
/// error. No exception ever crosses this boundary into the transcript —
/// panics aside, every failure mode is folded into `Err` here or into a
/// `success: false` payload declared by the capability itself.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityResult {
    Ok(serde_json::Value),
    Err { kind: ErrorKind, message: String },
}

impl CapabilityResult {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Err {
            kind,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Normalize a capability's raw return value.
    ///
    /// Capabilities that proxy text-based services may hand back a
    /// JSON-encoded string; parse it so the model sees structure rather than
    /// a quoted blob. A string that fails to parse becomes a structured
    /// error noting the invalid payload. Structured values pass through
    /// unchanged.
    pub fn from_raw(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::String(s) => match serde_json::from_str(&s) {
                Ok(parsed) => Self::Ok(parsed),
                Err(_) => Self::error(
                    ErrorKind::InvalidPayload,
                    format!("Tool returned invalid JSON string: {s}"),
                ),
            },
            other => Self::Ok(other),
        }
    }

    /// The JSON payload appended to the transcript for this result.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::Ok(value) => value.clone(),
            Self::Err { kind, message } => serde_json::json!({
                "success": false,
                "error": kind.as_str(),
                "message": message,
            }),
        }
    }
}

/// The core Tool trait.
///
/// Each capability (search, SQL, chart) implements this trait. The return
/// value is the JSON payload fed back to the model; domain-level failures
/// (bad filter syntax, rejected query, missing chart columns) are reported
/// inside the payload as `success: false`, while programmer-level failures
/// use `ToolError` and are caught at the dispatch boundary.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this capability (e.g., "execute_sql_query").
    fn name(&self) -> &str;

    /// A description of what this capability does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this capability's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the capability with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError>;

    /// Convert this capability into a ToolDefinition for the manifest.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available capabilities.
///
/// The orchestration loop uses this to:
/// 1. Build the immutable capability manifest sent to the model
/// 2. Dispatch invocations by name, converting every failure into a
///    structured `CapabilityResult` rather than letting it propagate
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a capability. Replaces any existing one with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a capability by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all capability definitions (the manifest sent to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// List all registered capability names.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Dispatch an invocation, folding every failure mode into a
    /// structured result. An unknown name yields `capability_not_found`;
    /// an implementation error yields `execution`; a JSON-string return
    /// is parsed (or flagged as `invalid_payload`).
    pub async fn dispatch(&self, call: &ToolCall) -> CapabilityResult {
        let Some(tool) = self.tools.get(&call.name) else {
            return CapabilityResult::error(
                ErrorKind::CapabilityNotFound,
                format!("Error: Tool '{}' not found.", call.name),
            );
        };

        match tool.execute(call.arguments.clone()).await {
            Ok(raw) => CapabilityResult::from_raw(raw),
            Err(e) => CapabilityResult::error(
                ErrorKind::Execution,
                format!("Error executing tool {}: {e}", call.name),
            ),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;

    /// A simple test capability for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<serde_json::Value, ToolError> {
            let text = arguments["text"].as_str().unwrap_or("").to_string();
            Ok(serde_json::json!({ "echoed": text }))
        }
    }

    /// A capability that returns its payload as a JSON-encoded string.
    struct StringPayloadTool {
        payload: &'static str,
    }

    #[async_trait]
    impl Tool for StringPayloadTool {
        fn name(&self) -> &str {
            "stringly"
        }
        fn description(&self) -> &str {
            "Returns a JSON string"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({ "type": "object", "properties": {} })
        }
        async fn execute(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<serde_json::Value, ToolError> {
            Ok(serde_json::Value::String(self.payload.to_string()))
        }
    }

    #[test]
    fn registry_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn registry_definitions() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn dispatch_executes_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall {
            id: "call_1".into(),
            name: "echo".into(),
            arguments: serde_json::json!({"text": "hello world"}),
        };
        let result = registry.dispatch(&call).await;
        assert_eq!(
            result,
            CapabilityResult::Ok(serde_json::json!({"echoed": "hello world"}))
        );
    }

    #[tokio::test]
    async fn dispatch_unknown_capability_is_structured() {
        let registry = ToolRegistry::new();
        let call = ToolCall {
            id: "call_1".into(),
            name: "nonexistent".into(),
            arguments: serde_json::json!({}),
        };
        let result = registry.dispatch(&call).await;
        match result {
            CapabilityResult::Err { kind, message } => {
                assert_eq!(kind, ErrorKind::CapabilityNotFound);
                assert!(message.contains("nonexistent"));
            }
            CapabilityResult::Ok(_) => panic!("expected error"),
        }
    }

    #[tokio::test]
    async fn dispatch_parses_json_string_payloads() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(StringPayloadTool {
            payload: r#"{"hits": [], "estimatedTotalHits": 0}"#,
        }));

        let call = ToolCall {
            id: "call_1".into(),
            name: "stringly".into(),
            arguments: serde_json::json!({}),
        };
        let result = registry.dispatch(&call).await;
        assert_eq!(
            result,
            CapabilityResult::Ok(serde_json::json!({"hits": [], "estimatedTotalHits": 0}))
        );
    }

    #[tokio::test]
    async fn dispatch_flags_invalid_string_payloads() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(StringPayloadTool {
            payload: "not json at all",
        }));

        let call = ToolCall {
            id: "call_1".into(),
            name: "stringly".into(),
            arguments: serde_json::json!({}),
        };
        match registry.dispatch(&call).await {
            CapabilityResult::Err { kind, .. } => assert_eq!(kind, ErrorKind::InvalidPayload),
            CapabilityResult::Ok(_) => panic!("expected invalid payload error"),
        }
    }

    #[test]
    fn error_payload_carries_message_field() {
        let result = CapabilityResult::error(ErrorKind::MissingChartData, "no prior query");
        let payload = result.payload();
        assert_eq!(payload["success"], serde_json::json!(false));
        assert_eq!(payload["error"], serde_json::json!("missing_chart_data"));
        assert_eq!(payload["message"], serde_json::json!("no prior query"));
    }

    #[test]
    fn from_raw_passes_structured_values_through() {
        let value = serde_json::json!({"success": true, "data": [1, 2, 3]});
        assert_eq!(
            CapabilityResult::from_raw(value.clone()),
            CapabilityResult::Ok(value)
        );
    }
}
