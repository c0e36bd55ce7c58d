use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{FacadeCore, MediaUpload};
use crate::analysis::{percentage, Modality};
use crate::error::{AppResult, RequestError};
use crate::extract::extract_json;
use crate::gemini::{Part, Source, Tool};
use crate::invoker::InvocationRequest;
use crate::prompts::GROUNDING_PROMPT;

/// One observation from a source search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: String,
    pub detail: String,
}

/// Where an image first appeared and whether it was altered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingReport {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_event: Option<String>,
    pub manipulation_detected: bool,
    /// 0-100.
    pub confidence: f64,
    pub findings: Vec<Finding>,
    pub sources: Vec<Source>,
    #[serde(default)]
    pub is_safe_mode: bool,
}

/// Reverse-image source grounding
#[derive(Clone)]
pub struct SourceGrounding {
    core: FacadeCore,
}

impl SourceGrounding {
    /// Create a new grounding façade
    pub fn new(core: FacadeCore) -> Self {
        Self { core }
    }

    /// Search the web for the origin of an image.
    pub async fn locate(&self, upload: &MediaUpload) -> AppResult<GroundingReport> {
        if Modality::from_mime(&upload.mime_type) != Modality::Image {
            return Err(RequestError::Validation {
                field: "mimeType".to_string(),
                reason: format!("expected an image, got '{}'", upload.mime_type),
            }
            .into());
        }
        self.core.check_size(upload)?;

        let request = InvocationRequest::new(
            self.core.model(),
            vec![upload.to_part(), Part::text(GROUNDING_PROMPT)],
        )
        .with_tool(Tool::google_search());

        let outcome = self.core.invoker().invoke(request).await?;
        let raw = extract_json(&outcome.text)?;
        let report = GroundingReport::from_raw(
            &raw,
            outcome.raw.web_sources("Verified Source"),
            outcome.safe_mode,
        );

        info!(
            file = %upload.name,
            sources = report.sources.len(),
            manipulation_detected = report.manipulation_detected,
            "Source grounding completed"
        );

        Ok(report)
    }
}

impl GroundingReport {
    /// Build a report from loosely shaped model JSON.
    pub fn from_raw(raw: &Value, sources: Vec<Source>, safe_mode: bool) -> Self {
        let text = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };

        let findings = raw
            .get("findings")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(Finding {
                            kind: item.get("type")?.as_str()?.to_string(),
                            detail: item
                                .get("detail")
                                .and_then(Value::as_str)
                                .unwrap_or_default()
                                .to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            summary: text("summary").unwrap_or_else(|| "No summary available.".to_string()),
            original_event: text("originalEvent"),
            manipulation_detected: raw
                .get("manipulationDetected")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            confidence: raw.get("confidence").and_then(percentage).unwrap_or(0.0),
            findings,
            sources,
            is_safe_mode: safe_mode,
        }
    }
}
