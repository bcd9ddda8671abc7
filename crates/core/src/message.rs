//! Message and Transcript domain types.
//!
//! These are the value objects the orchestration loop threads through one
//! query's lifetime: system prompt and user question in, assistant turns and
//! tool results appended, until a final text answer comes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (capability descriptions, selection policy)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool calls requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<MessageToolCall>,

    /// If this is a tool result, which tool call it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// If this is a tool result, the name of the capability that produced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::System,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            tool_name: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a tool result message echoing the invocation id and the
    /// capability name that produced the payload.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
            tool_name: Some(tool_name.into()),
            timestamp: Utc::now(),
        }
    }

    /// Whether this assistant turn is terminal (no requested invocations).
    pub fn is_final(&self) -> bool {
        self.tool_calls.is_empty()
    }
}

/// A tool call embedded in an assistant message.
///
/// `arguments` is the raw JSON string exactly as the model produced it; the
/// orchestration loop parses it and isolates parse failures per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageToolCall {
    /// Unique ID for this tool call (unique within the assistant turn)
    pub id: String,

    /// Name of the capability to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

/// The ordered conversation history for one query's lifetime.
///
/// Append-only: the loop only ever pushes messages, and the whole transcript
/// is discarded when the query returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Unique id for this query run (used in log correlation)
    pub id: String,

    /// Ordered messages
    pub messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript seeded with the system prompt and the user query.
    pub fn new(system_prompt: impl Into<String>, user_query: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: vec![Message::system(system_prompt), Message::user(user_query)],
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Show me total sales by month");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Show me total sales by month");
        assert!(msg.tool_calls.is_empty());
        assert!(msg.is_final());
    }

    #[test]
    fn tool_result_echoes_id_and_name() {
        let msg = Message::tool_result("call_1", "execute_sql_query", r#"{"success":true}"#);
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.tool_name.as_deref(), Some("execute_sql_query"));
    }

    #[test]
    fn transcript_starts_with_system_and_user() {
        let t = Transcript::new("You are an analytics assistant.", "How many users?");
        assert_eq!(t.len(), 2);
        assert_eq!(t.messages[0].role, Role::System);
        assert_eq!(t.messages[1].role, Role::User);
    }

    #[test]
    fn assistant_turn_with_calls_is_not_final() {
        let mut msg = Message::assistant("");
        msg.tool_calls.push(MessageToolCall {
            id: "call_1".into(),
            name: "meilisearch_query".into(),
            arguments: r#"{"index_name":"products"}"#.into(),
        });
        assert!(!msg.is_final());
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::tool_result("call_9", "generate_chart", r#"{"success":false}"#);
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(back.tool_name.as_deref(), Some("generate_chart"));
        assert_eq!(back.role, Role::Tool);
    }
}
