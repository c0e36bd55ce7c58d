use serde::{Deserialize, Serialize};

use crate::gemini::Source;

/// Binary authenticity verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Probability of manipulation below 50.
    Real,
    /// Probability of manipulation 50 or above.
    LikelyFake,
}

impl Verdict {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Real => "REAL",
            Verdict::LikelyFake => "LIKELY_FAKE",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Three-level confidence tier, also used as a sub-score qualifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Case-insensitive parse of `Low`/`Medium`/`High`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(ConfidenceLevel::Low),
            "medium" => Some(ConfidenceLevel::Medium),
            "high" => Some(ConfidenceLevel::High),
            _ => None,
        }
    }
}

/// One of the four named anomaly indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStep {
    /// 0-100 anomaly score.
    pub score: f64,
    pub explanation: String,
    pub confidence_qualifier: ConfidenceLevel,
}

impl Default for AnalysisStep {
    fn default() -> Self {
        Self {
            score: 0.0,
            explanation: "Pending...".to_string(),
            confidence_qualifier: ConfidenceLevel::Medium,
        }
    }
}

/// The four sub-scores accompanying a verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSteps {
    pub integrity: AnalysisStep,
    pub consistency: AnalysisStep,
    pub ai_patterns: AnalysisStep,
    pub temporal: AnalysisStep,
}

/// What an explanation entry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationCategory {
    Visual,
    Audio,
    Temporal,
    Linguistic,
    Factual,
    Integrity,
}

impl ExplanationCategory {
    /// Case-insensitive parse.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visual" => Some(ExplanationCategory::Visual),
            "audio" => Some(ExplanationCategory::Audio),
            "temporal" => Some(ExplanationCategory::Temporal),
            "linguistic" => Some(ExplanationCategory::Linguistic),
            "factual" => Some(ExplanationCategory::Factual),
            "integrity" => Some(ExplanationCategory::Integrity),
            _ => None,
        }
    }
}

/// A single forensic observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub point: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_detail: Option<String>,
    pub category: ExplanationCategory,
    /// `MM:SS` position in time-based media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Broad kind of uploaded media, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Image,
    Video,
    Audio,
    Other,
}

impl Modality {
    /// Classify a MIME type such as `video/mp4`.
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.to_ascii_lowercase();
        if mime.contains("audio") {
            Modality::Audio
        } else if mime.contains("video") {
            Modality::Video
        } else if mime.contains("image") {
            Modality::Image
        } else {
            Modality::Other
        }
    }

    /// Category given to explanations that do not name a valid one.
    pub fn default_category(self) -> ExplanationCategory {
        match self {
            Modality::Audio => ExplanationCategory::Audio,
            Modality::Video => ExplanationCategory::Temporal,
            Modality::Image | Modality::Other => ExplanationCategory::Visual,
        }
    }
}

/// Request-side description of the analysed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    /// Human-readable size, e.g. `1.25 MB`.
    pub size: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Opaque preview handle owned by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl FileMetadata {
    /// Build metadata for an upload of `size_bytes`.
    pub fn new(
        name: impl Into<String>,
        size_bytes: usize,
        mime_type: impl Into<String>,
        preview: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size: format_megabytes(size_bytes),
            mime_type: mime_type.into(),
            preview,
        }
    }

    /// Modality of the file.
    pub fn modality(&self) -> Modality {
        Modality::from_mime(&self.mime_type)
    }
}

/// Format a byte count as megabytes with two decimals.
pub fn format_megabytes(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Canonical, fully populated result of a media analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Short random token, distinct within a session.
    pub id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub verdict: Verdict,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub deepfake_probability: f64,
    pub summary: String,
    pub user_recommendation: String,
    pub analysis_steps: AnalysisSteps,
    pub explanations: Vec<Explanation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manipulation_type: Option<String>,
    pub guidance: String,
    pub file_metadata: FileMetadata,
    #[serde(default)]
    pub is_safe_mode: bool,
}

/// Support level of a fact-checked claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    StronglySupported,
    PartiallySupported,
    Disputed,
    #[default]
    NoEvidence,
}

impl ClaimStatus {
    /// Parse an upstream status; anything unrecognised is `NoEvidence`.
    pub fn parse(value: &str) -> Self {
        match normalize_label(value).as_str() {
            "STRONGLY_SUPPORTED" | "SUPPORTED" => ClaimStatus::StronglySupported,
            "PARTIALLY_SUPPORTED" => ClaimStatus::PartiallySupported,
            "DISPUTED" | "REFUTED" | "FALSE" => ClaimStatus::Disputed,
            _ => ClaimStatus::NoEvidence,
        }
    }
}

/// Kind of statement a claim is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimCategory {
    Fact,
    Opinion,
    Prediction,
    Ambiguous,
}

impl ClaimCategory {
    /// Case-insensitive parse.
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "FACT" => Some(ClaimCategory::Fact),
            "OPINION" => Some(ClaimCategory::Opinion),
            "PREDICTION" => Some(ClaimCategory::Prediction),
            "AMBIGUOUS" => Some(ClaimCategory::Ambiguous),
            _ => None,
        }
    }
}

/// How much the cited source is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceConfidence {
    High,
    Medium,
    Low,
}

impl SourceConfidence {
    /// Case-insensitive parse.
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "HIGH" => Some(SourceConfidence::High),
            "MEDIUM" => Some(SourceConfidence::Medium),
            "LOW" => Some(SourceConfidence::Low),
            _ => None,
        }
    }
}

fn normalize_label(value: &str) -> String {
    value.trim().to_ascii_uppercase().replace([' ', '-'], "_")
}

/// One fact-check entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ClaimCategory>,
    pub status: ClaimStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_confidence: Option<SourceConfidence>,
}

/// Whether a text was judged factual, or the strict placeholder when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Factuality {
    Known(bool),
    Label(String),
}

impl Default for Factuality {
    fn default() -> Self {
        Factuality::Label("STRICT".to_string())
    }
}

/// Result of a text analysis in either AI-detection or fact-check mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysisResult {
    /// Display form of the AI probability, e.g. `72%`.
    pub likelihood_range: String,
    pub ai_probability: f64,
    /// Free-form upstream label.
    pub verdict_label: String,
    pub ambiguity_note: String,
    pub ai_signals: Vec<String>,
    pub human_signals: Vec<String>,
    pub is_factual: Factuality,
    pub summary: String,
    pub claims: Vec<Claim>,
    pub linguistic_markers: Vec<String>,
    pub sources: Vec<Source>,
    #[serde(default)]
    pub is_safe_mode: bool,
}
