//! Agent orchestrator - implements the per-turn loop
//!
//! COMPOSE → MODEL CALL → TOOL DISPATCH → (repeat) → FINALIZE

use crate::error::AgentError;
use crate::groq::ChatModel;
use crate::memory::SessionRegistry;
use crate::models::{ModelMessage, ToolCall};
use crate::tools::ToolRegistry;
use crate::Result;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_TOOL_ROUNDS: usize = 15;

/// Canned answer the surfaces fall back to when a turn fails outright.
pub const FALLBACK_ANSWER: &str = "I could not complete this request. Please try again.";

/// Turns a user question plus session history into a final answer,
/// invoking zero or more data-access tools along the way.
pub struct Orchestrator {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    sessions: Arc<SessionRegistry>,
}

impl Orchestrator {
    pub fn new(
        model: Arc<dyn ChatModel>,
        tools: ToolRegistry,
        sessions: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            model,
            tools,
            sessions,
        }
    }

    /// Run one turn against a session key.
    ///
    /// The session's turn gate is held for the whole sequence, so turns on
    /// the same key serialize. History is only appended once the model
    /// produces a plain answer; failed turns leave it untouched.
    pub async fn run_turn(&self, session_key: &str, question: &str) -> Result<String> {
        let session = self.sessions.get_or_create(session_key).await;
        let _turn = session.lock_turn().await;

        info!(
            session = %session.key(),
            question = %question,
            "Turn started"
        );

        // === COMPOSE ===
        let mut working = Vec::new();
        working.push(ModelMessage::system(build_system_prompt(
            Utc::now().date_naive(),
        )));
        working.extend(session.to_model_messages().await);
        working.push(ModelMessage::user(question.to_string()));

        let declarations = self.tools.declarations();

        for round in 0..MAX_TOOL_ROUNDS {
            // === MODEL CALL ===
            let reply = self.model.complete(&working, &declarations).await?;

            if !reply.has_tool_calls() {
                // === FINALIZE ===
                let answer = reply.content;
                session.append_turn(question, &answer).await;

                info!(session = %session.key(), rounds = round, "Turn finalized");
                return Ok(answer);
            }

            // === TOOL DISPATCH ===
            debug!(
                round,
                call_count = reply.tool_calls.len(),
                "Dispatching tool calls"
            );

            working.push(ModelMessage::assistant(
                reply.content.clone(),
                reply.tool_calls.clone(),
            ));

            // Sequential dispatch; results are fed back in request order so
            // the context stays deterministic.
            for call in &reply.tool_calls {
                let result = self.dispatch(call).await;
                working.push(ModelMessage::tool(
                    serde_json::to_string(&result)?,
                    call.id.clone(),
                ));
            }
        }

        warn!(session = %session.key(), "Turn exceeded the tool-round limit");
        Err(AgentError::NonConvergence(MAX_TOOL_ROUNDS))
    }

    /// Execute one tool call. Every failure is normalized into an error
    /// mapping, so each call produces exactly one result for the model.
    async fn dispatch(&self, call: &ToolCall) -> Value {
        let name = call.function.name.as_str();

        let Some(tool) = self.tools.get(name) else {
            warn!(tool = name, "Model requested an unknown tool");
            return json!({ "error": format!("Unknown tool: {}", name) });
        };

        let args = match call.function.parse_arguments() {
            Ok(args) => args,
            Err(e) => {
                warn!(tool = name, error = %e, "Malformed tool arguments");
                return json!({
                    "error": format!("Malformed arguments for {}: {}", name, e)
                });
            }
        };

        match tool.execute(&args).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = name, error = %e, "Tool execution failed");
                json!({ "error": e.to_string() })
            }
        }
    }
}

/// Fixed system instruction, rebuilt each turn so it carries today's date.
fn build_system_prompt(today: NaiveDate) -> String {
    format!(
        "You are a knowledgeable assistant that answers questions about stock \
         dividends factually.\n\
         When someone asks for stock ideas with a high dividend yield, list \
         those stocks with their tickers and dividend yields using the \
         get_top_dividend tool, always passing the most recent year. Dividend \
         yields are fractions: present them as percentages, e.g. 0.5 means \
         50%. Today is {}.\n\
         When someone asks about the overview, financials, or dividend of a \
         company, use the relevant get_company_overview, \
         get_company_financials, or get_company_dividend tool.\n\
         Give complete, concise answers based on the data returned by the \
         tools.",
        today.format("%Y-%m-%d")
    )
}
