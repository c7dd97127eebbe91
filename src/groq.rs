//! Groq API client
//!
//! OpenAI-compatible chat completions with tool calling. Fixed model
//! identifier and deterministic decoding (temperature 0).
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::error::AgentError;
use crate::models::{ModelMessage, ModelReply, ToolCall, ToolDeclaration};
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_BASE_URL: &str = "https://api.groq.com";

/// Seam between the orchestrator and the hosted chat model. Tests drive the
/// orchestrator through scripted implementations of this trait.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ModelMessage],
        tools: &[ToolDeclaration],
    ) -> Result<ModelReply>;
}

/// Reusable Groq client (connection-pooled)
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: GROQ_MODEL.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(
        &self,
        messages: &[ModelMessage],
        tools: &[ToolDeclaration],
    ) -> Result<ModelReply> {
        if self.api_key.is_empty() {
            return Err(AgentError::Model(
                "GROQ_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}/openai/v1/chat/completions", self.base_url);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
            temperature: 0.0,
        };

        info!(model = %self.model, "Calling Groq API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Groq API request failed: {}", e);
                AgentError::Model(format!("Groq API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Groq API error response: {}", error_text);
            return Err(AgentError::Model(format!(
                "Groq API error: {}",
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Groq response: {}", e);
            AgentError::Model(format!("Groq parse error: {}", e))
        })?;

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            AgentError::Model("No response from Groq API".to_string())
        })?;

        Ok(ModelReply {
            content: choice.message.content.unwrap_or_default(),
            tool_calls: choice.message.tool_calls,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ModelMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDeclaration]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let messages = vec![
            ModelMessage::system("You answer dividend questions."),
            ModelMessage::user("What pays the highest yield?"),
        ];
        let tools = vec![ToolDeclaration::function(
            "get_top_dividend",
            "Highest dividend yield companies",
            json!({"type": "object"}),
        )];

        let request = ChatCompletionRequest {
            model: GROQ_MODEL,
            messages: &messages,
            tools: Some(&tools),
            tool_choice: Some("auto"),
            temperature: 0.0,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], GROQ_MODEL);
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["function"]["name"], "get_top_dividend");
        assert_eq!(body["messages"][1]["content"], "What pays the highest yield?");
    }

    #[test]
    fn test_response_with_tool_calls_parses() {
        let raw = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_company_overview",
                            "arguments": "{\"ticker\": \"BBCA\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let completion: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        let message = &completion.choices[0].message;
        assert!(message.content.is_none());
        assert_eq!(message.tool_calls.len(), 1);
        assert_eq!(message.tool_calls[0].function.name, "get_company_overview");
    }

    #[tokio::test]
    async fn test_complete_against_stub_endpoint() {
        let router = Router::new().route(
            "/openai/v1/chat/completions",
            post(|| async {
                Json(json!({
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "content": "BBCA yielded about 3% last year."
                        },
                        "finish_reason": "stop"
                    }]
                }))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client =
            GroqClient::with_base_url("test-key".into(), format!("http://{}", addr));
        let reply = client
            .complete(&[ModelMessage::user("What about BBCA?")], &[])
            .await
            .unwrap();

        assert_eq!(reply.content, "BBCA yielded about 3% last year.");
        assert!(!reply.has_tool_calls());
    }

    #[tokio::test]
    async fn test_empty_api_key_is_a_model_error() {
        let client = GroqClient::new(String::new());
        let result = client.complete(&[ModelMessage::user("hi")], &[]).await;

        assert!(matches!(result, Err(AgentError::Model(_))));
    }
}
