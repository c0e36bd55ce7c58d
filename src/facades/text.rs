use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

use super::FacadeCore;
use crate::analysis::{normalize_text, TextAnalysisResult};
use crate::error::{AppResult, RequestError};
use crate::extract::extract_json;
use crate::gemini::Tool;
use crate::invoker::InvocationRequest;
use crate::prompts::{AI_DETECT_INSTRUCTION, FACT_CHECK_INSTRUCTION};

/// What to do with a text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextMode {
    /// Estimate whether the text was machine written.
    AiDetect,
    /// Verify the claims in the text with search grounding.
    FactCheck,
}

/// AI-text detection and fact checking
#[derive(Clone)]
pub struct TextAnalyzer {
    core: FacadeCore,
}

impl TextAnalyzer {
    /// Create a new text analyzer
    pub fn new(core: FacadeCore) -> Self {
        Self { core }
    }

    /// Analyse `text` in the given mode.
    pub async fn analyze(&self, text: &str, mode: TextMode) -> AppResult<TextAnalysisResult> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(RequestError::Validation {
                field: "text".to_string(),
                reason: "Text cannot be empty".to_string(),
            }
            .into());
        }

        let request = match mode {
            TextMode::AiDetect => InvocationRequest::new(self.core.model(), text)
                .with_system_instruction(AI_DETECT_INSTRUCTION)
                .with_json_response(),
            // The search tool cannot be combined with a JSON response type;
            // the extractor copes with the free-form reply.
            TextMode::FactCheck => InvocationRequest::new(self.core.model(), text)
                .with_system_instruction(FACT_CHECK_INSTRUCTION)
                .with_tool(Tool::google_search()),
        };

        let outcome = self.core.invoker().invoke(request).await?;
        let raw = extract_json(&outcome.text)?;
        let sources = outcome.raw.web_sources("Source");
        let result = normalize_text(&raw, sources, outcome.safe_mode);

        info!(
            mode = ?mode,
            claims = result.claims.len(),
            sources = result.sources.len(),
            safe_mode = result.is_safe_mode,
            latency_ms = start.elapsed().as_millis(),
            "Text analysis completed"
        );

        Ok(result)
    }
}
