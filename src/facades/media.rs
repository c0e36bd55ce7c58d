use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

use super::{FacadeCore, MediaUpload};
use crate::analysis::{normalize, AnalysisResult};
use crate::error::AppResult;
use crate::extract::extract_json;
use crate::gemini::Part;
use crate::invoker::InvocationRequest;
use crate::prompts::{media_prompt, MEDIA_SYSTEM_INSTRUCTION};

/// Image, video and audio deepfake analysis
#[derive(Clone)]
pub struct MediaAnalyzer {
    core: FacadeCore,
}

/// A file of a batch that could not be analysed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a sequential batch run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub results: Vec<AnalysisResult>,
    pub failures: Vec<BatchFailure>,
}

impl MediaAnalyzer {
    /// Create a new media analyzer
    pub fn new(core: FacadeCore) -> Self {
        Self { core }
    }

    /// Analyse one upload.
    ///
    /// Oversized files are rejected before anything is sent upstream.
    pub async fn analyze(&self, upload: &MediaUpload) -> AppResult<AnalysisResult> {
        let start = Instant::now();
        self.core.check_size(upload)?;

        let metadata = upload.metadata();
        let request = InvocationRequest::new(
            self.core.model(),
            vec![upload.to_part(), Part::text(media_prompt(metadata.modality()))],
        )
        .with_system_instruction(MEDIA_SYSTEM_INSTRUCTION)
        .with_json_response();

        let outcome = self.core.invoker().invoke(request).await?;
        let raw = extract_json(&outcome.text)?;
        let result = normalize(&raw, metadata, outcome.safe_mode);

        info!(
            file = %upload.name,
            mime_type = %upload.mime_type,
            verdict = %result.verdict,
            safe_mode = result.is_safe_mode,
            latency_ms = start.elapsed().as_millis(),
            "Media analysis completed"
        );

        Ok(result)
    }

    /// Analyse uploads one after another. A failed file is recorded and the batch continues.
    pub async fn analyze_batch(&self, uploads: &[MediaUpload]) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, upload) in uploads.iter().enumerate() {
            match self.analyze(upload).await {
                Ok(result) => report.results.push(result),
                Err(e) => {
                    warn!(index, file = %upload.name, error = %e, "Batch item failed");
                    report.failures.push(BatchFailure {
                        name: upload.name.clone(),
                        error: e.user_message(),
                    });
                }
            }
        }

        info!(
            analysed = report.results.len(),
            failed = report.failures.len(),
            "Batch triage completed"
        );

        report
    }
}

impl BatchReport {
    /// CSV export: `ID,Filename,Verdict,Probability,Confidence,Summary,Date`.
    pub fn to_csv(&self) -> String {
        let mut lines = vec!["ID,Filename,Verdict,Probability,Confidence,Summary,Date".to_string()];

        for r in &self.results {
            let date = chrono::DateTime::from_timestamp_millis(r.timestamp)
                .map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
                .unwrap_or_default();
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                r.id,
                csv_field(&r.file_metadata.name),
                r.verdict,
                r.deepfake_probability,
                r.confidence,
                quote(&r.summary),
                date
            ));
        }

        lines.join("\n")
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quote only when the value needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quote(value)
    } else {
        value.to_string()
    }
}
