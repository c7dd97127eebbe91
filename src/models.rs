//! Chat wire model shared by the model client and the orchestrator
//!
//! Follows the OpenAI-compatible chat-completion shapes: ordered messages
//! with roles, assistant tool calls, and tool-result messages keyed by
//! tool call id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

//
// ================= Roles =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[default]
    User,
    Assistant,
    Tool,
}

//
// ================= Messages =================
//

/// A single message in the model's working context
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMessage {
    pub role: Role,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,

    /// Set on tool-result messages to match them to the originating call
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tool_call_id: String,

    /// Set on assistant messages that request tool invocations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl ModelMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            ..Default::default()
        }
    }

    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: tool_call_id.into(),
            ..Default::default()
        }
    }
}

//
// ================= Tool Calls =================
//

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,

    #[serde(default = "function_kind", rename = "type")]
    pub call_type: String,

    pub function: FunctionCall,
}

/// The function half of a tool call; arguments arrive as a JSON string
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FunctionCall {
    pub name: String,

    #[serde(default)]
    pub arguments: String,
}

impl FunctionCall {
    /// Parse the JSON-string arguments into a value. An empty argument
    /// string is treated as an empty object, which some models emit for
    /// zero-argument calls.
    pub fn parse_arguments(&self) -> serde_json::Result<Value> {
        if self.arguments.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_json::from_str(&self.arguments)
    }
}

fn function_kind() -> String {
    "function".to_string()
}

//
// ================= Tool Declarations =================
//

/// A declared callable operation, advertised to the model per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDeclaration {
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

//
// ================= Model Reply =================
//

/// One completion from the model: either a plain answer, tool calls, or both
#[derive(Debug, Clone, Default)]
pub struct ModelReply {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelReply {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
