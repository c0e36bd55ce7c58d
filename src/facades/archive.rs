use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::FacadeCore;
use crate::error::{AppResult, RequestError};
use crate::extract::extract_json;
use crate::invoker::InvocationRequest;
use crate::prompts::{archive_prompt, archive_schema};

/// One entry of an archive listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub name: String,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub size: u64,
}

/// What an archive most likely contains
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchiveSummary {
    pub summary: String,
    pub category: String,
    pub technologies: Vec<String>,
    pub security_notes: Vec<String>,
}

/// Archive-content summarization
#[derive(Clone)]
pub struct ArchiveSummarizer {
    core: FacadeCore,
}

impl ArchiveSummarizer {
    /// Create a new archive summarizer
    pub fn new(core: FacadeCore) -> Self {
        Self { core }
    }

    /// Summarize an archive from its file listing.
    ///
    /// Only the first `archive_listing_limit` entries are sent upstream.
    pub async fn summarize(&self, entries: &[ArchiveEntry]) -> AppResult<ArchiveSummary> {
        if entries.is_empty() {
            return Err(RequestError::Validation {
                field: "files".to_string(),
                reason: "File list cannot be empty".to_string(),
            }
            .into());
        }

        let limit = self.core.limits().archive_listing_limit;
        let listing = format_listing(entries, limit);
        debug!(entries = entries.len(), limit, "Summarizing archive listing");

        let request = InvocationRequest::new(self.core.model(), archive_prompt(&listing))
            .with_json_response()
            .with_response_schema(archive_schema());

        let outcome = self.core.invoker().invoke(request).await?;
        let raw = extract_json(&outcome.text)?;
        let summary: ArchiveSummary =
            serde_json::from_value(raw).map_err(|e| RequestError::MalformedResponse {
                message: e.to_string(),
            })?;

        info!(
            category = %summary.category,
            technologies = summary.technologies.len(),
            safe_mode = outcome.safe_mode,
            "Archive summary completed"
        );

        Ok(summary)
    }
}

/// `name (Dir)` or `name (N bytes)` per line, at most `limit` lines.
pub fn format_listing(entries: &[ArchiveEntry], limit: usize) -> String {
    entries
        .iter()
        .take(limit)
        .map(|e| {
            if e.is_directory {
                format!("{} (Dir)", e.name)
            } else {
                format!("{} ({} bytes)", e.name, e.size)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
