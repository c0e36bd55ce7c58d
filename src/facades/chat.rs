use serde::Serialize;
use tracing::info;

use super::FacadeCore;
use crate::error::{AppResult, RequestError};
use crate::gemini::{Content, Source, Tool};
use crate::invoker::InvocationRequest;
use crate::prompts::CHAT_SYSTEM_INSTRUCTION;

/// Answer of the assistant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub sources: Vec<Source>,
    pub is_safe_mode: bool,
}

/// Conversational forensic assistant with search grounding
#[derive(Clone)]
pub struct ChatAssistant {
    core: FacadeCore,
}

impl ChatAssistant {
    /// Create a new chat assistant
    pub fn new(core: FacadeCore) -> Self {
        Self { core }
    }

    /// Send one message after the running `history`.
    pub async fn send(&self, message: &str, history: Vec<Content>) -> AppResult<ChatReply> {
        if message.trim().is_empty() {
            return Err(RequestError::Validation {
                field: "message".to_string(),
                reason: "Message cannot be empty".to_string(),
            }
            .into());
        }

        let turns = history.len();
        let request = InvocationRequest::new(self.core.model(), message)
            .with_system_instruction(CHAT_SYSTEM_INSTRUCTION)
            .with_tool(Tool::google_search())
            .with_history(history);

        let outcome = self.core.invoker().invoke(request).await?;
        let sources = outcome.raw.web_sources("Source");

        info!(
            history_turns = turns,
            sources = sources.len(),
            safe_mode = outcome.safe_mode,
            "Chat turn completed"
        );

        Ok(ChatReply {
            response: outcome.text,
            sources,
            is_safe_mode: outcome.safe_mode,
        })
    }
}
