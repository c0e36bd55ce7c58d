//! Conversion of loosely shaped model JSON into complete result records.
//!
//! The upstream schema is requested by prompt only, so every field read here
//! may be missing or of the wrong type. Nothing in this module fails.

use rand::Rng;
use serde_json::{Map, Value};
use tracing::debug;

use super::types::*;
use crate::gemini::Source;

/// Probability assumed when the model does not report one.
pub const DEFAULT_PROBABILITY: f64 = 50.0;

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ID_LENGTH: usize = 9;

/// `Real` iff `probability < 50`.
pub fn derive_verdict(probability: f64) -> Verdict {
    if probability < 50.0 {
        Verdict::Real
    } else {
        Verdict::LikelyFake
    }
}

/// `High` above 85, `Low` below 50, `Medium` otherwise.
pub fn confidence_tier(confidence: f64) -> ConfidenceLevel {
    if confidence > 85.0 {
        ConfidenceLevel::High
    } else if confidence < 50.0 {
        ConfidenceLevel::Low
    } else {
        ConfidenceLevel::Medium
    }
}

/// Fresh short result identifier.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Build an [`AnalysisResult`] from raw model output.
///
/// The verdict is recomputed from `deepfakeProbability`; a verdict the model
/// reports itself is ignored. A missing `confidence` counts as 0 and so tiers as `Low`.
pub fn normalize(raw: &Value, metadata: FileMetadata, safe_mode: bool) -> AnalysisResult {
    let empty = Map::new();
    let data = raw.as_object().unwrap_or(&empty);

    let probability = percent(data, "deepfakeProbability").unwrap_or(DEFAULT_PROBABILITY);
    let confidence = percent(data, "confidence").unwrap_or(0.0);
    let category = metadata.modality().default_category();

    let manipulation_type = text(data, "manipulationType").or_else(|| {
        (probability > 50.0).then(|| "Neural Synthesis".to_string())
    });

    let result = AnalysisResult {
        id: generate_id(),
        timestamp: chrono::Utc::now().timestamp_millis(),
        verdict: derive_verdict(probability),
        confidence,
        confidence_level: confidence_tier(confidence),
        deepfake_probability: probability,
        summary: text(data, "summary").unwrap_or_else(|| "Forensic analysis complete.".to_string()),
        user_recommendation: text(data, "userRecommendation")
            .unwrap_or_else(|| "Verify manually.".to_string()),
        analysis_steps: steps(data.get("analysisSteps")),
        explanations: explanations(data.get("explanations"), category),
        manipulation_type,
        guidance: text(data, "guidance").unwrap_or_else(|| "Caution advised.".to_string()),
        file_metadata: metadata,
        is_safe_mode: safe_mode,
    };

    debug!(
        id = %result.id,
        verdict = %result.verdict,
        probability,
        confidence,
        "Normalized analysis result"
    );

    result
}

/// Build a [`TextAnalysisResult`] from raw model output and grounding citations.
pub fn normalize_text(raw: &Value, sources: Vec<Source>, safe_mode: bool) -> TextAnalysisResult {
    let empty = Map::new();
    let data = raw.as_object().unwrap_or(&empty);

    let ai_probability = percent(data, "aiProbability").unwrap_or(0.0);
    let likelihood_range = if ai_probability > 0.0 {
        format!("{}%", ai_probability)
    } else {
        "0%".to_string()
    };

    TextAnalysisResult {
        likelihood_range,
        ai_probability,
        verdict_label: text(data, "verdictLabel").unwrap_or_else(|| "STRICT".to_string()),
        ambiguity_note: text(data, "ambiguityNote").unwrap_or_default(),
        ai_signals: strings(data.get("aiSignals")),
        human_signals: strings(data.get("humanSignals")),
        is_factual: match data.get("isFactual") {
            Some(Value::Bool(b)) => Factuality::Known(*b),
            _ => Factuality::default(),
        },
        summary: text(data, "summary").unwrap_or_else(|| "Analysis complete.".to_string()),
        claims: claims(data.get("claims")),
        linguistic_markers: strings(data.get("linguisticMarkers")),
        sources,
        is_safe_mode: safe_mode,
    }
}

/// Read a 0-100 value. Numeric strings such as `"72"` or `"72%"` are accepted.
fn percent(data: &Map<String, Value>, key: &str) -> Option<f64> {
    percentage(data.get(key)?)
}

/// Read a 0-100 score from a number or a numeric string such as `"82"` or `"82%"`, clamped.
pub fn percentage(value: &Value) -> Option<f64> {
    number(value).map(|n| n.clamp(0.0, 100.0))
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Non-blank string field.
fn text(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn steps(value: Option<&Value>) -> AnalysisSteps {
    let Some(Value::Object(steps)) = value else {
        return AnalysisSteps::default();
    };

    AnalysisSteps {
        integrity: step(steps.get("integrity")),
        consistency: step(steps.get("consistency")),
        ai_patterns: step(steps.get("aiPatterns")),
        temporal: step(steps.get("temporal")),
    }
}

fn step(value: Option<&Value>) -> AnalysisStep {
    let Some(Value::Object(data)) = value else {
        return AnalysisStep::default();
    };
    let fallback = AnalysisStep::default();

    AnalysisStep {
        score: percent(data, "score").unwrap_or(fallback.score),
        explanation: text(data, "explanation").unwrap_or(fallback.explanation),
        confidence_qualifier: data
            .get("confidenceQualifier")
            .and_then(Value::as_str)
            .and_then(ConfidenceLevel::parse)
            .unwrap_or(fallback.confidence_qualifier),
    }
}

/// Non-array values are discarded; non-object entries are skipped.
fn explanations(value: Option<&Value>, default_category: ExplanationCategory) -> Vec<Explanation> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| Explanation {
            point: text(entry, "point").unwrap_or_else(|| "Observation".to_string()),
            detail: text(entry, "detail").unwrap_or_default(),
            simple_detail: text(entry, "simpleDetail"),
            category: entry
                .get("category")
                .and_then(Value::as_str)
                .and_then(ExplanationCategory::parse)
                .unwrap_or(default_category),
            timestamp: text(entry, "timestamp"),
        })
        .collect()
}

fn claims(value: Option<&Value>) -> Vec<Claim> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            Some(Claim {
                claim: text(entry, "claim")?,
                category: entry
                    .get("category")
                    .and_then(Value::as_str)
                    .and_then(ClaimCategory::parse),
                status: entry
                    .get("status")
                    .and_then(Value::as_str)
                    .map(ClaimStatus::parse)
                    .unwrap_or_default(),
                source_url: text(entry, "sourceUrl"),
                source_confidence: entry
                    .get("sourceConfidence")
                    .and_then(Value::as_str)
                    .and_then(SourceConfidence::parse),
            })
        })
        .collect()
}
