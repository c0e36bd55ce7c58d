//! Centralized prompt definitions for the forensic façades
//!
//! All instructions, prompt text and response schemas sent upstream live
//! here so the façades only deal with request assembly.

use serde_json::{json, Value};

use crate::analysis::{AnalysisResult, Modality};

/// System instruction for every media analysis.
pub const MEDIA_SYSTEM_INSTRUCTION: &str = "You are a precise digital forensics engine. You prioritize minimizing false positives. You understand that real world media has noise, compression, and bad lighting. You ONLY flag content as FAKE if you detect artifacts impossible in physical reality. Ensure individual metric scores align with the overall verdict.";

/// Analysis prompt for images and video.
pub const VISUAL_ANALYSIS_PROMPT: &str = r#"You are a Senior Forensic Video Analyst. Perform a FRAME-BY-FRAME TEMPORAL ANALYSIS of this media.

CRITICAL INSTRUCTION FOR ACCURACY:
You must distinguish between "Low Quality/Compressed Real Media" and "AI Generated Media".

1. **SCORE CONSISTENCY**: If you determine the media is REAL, your anomaly scores in "analysisSteps" MUST be LOW (under 15/100). Do NOT report 100/100 anomaly if the verdict is REAL.
2. **IGNORE STATIC ARTIFACTS**: Compression blocks, blurriness, grain, and pixelation are NORMAL in real media. Low Quality != AI.
3. **HUNT FOR TEMPORAL FAILURES**: Look for flickering, morphing, physics breaks (shadows that do not follow their object) and anatomy that changes between frames.
4. **BIAS TOWARDS REALITY**: If the motion is fluid and there are no morphing glitches, the verdict MUST be REAL.
{video_note}
JSON STRUCTURE REQUIRED:
{
  "verdict": "REAL" | "LIKELY_FAKE",
  "deepfakeProbability": 0-100,
  "confidence": 0-100,
  "summary": "Technical summary focusing on temporal consistency and motion logic.",
  "userRecommendation": "Actionable advice.",
  "analysisSteps": {
    "integrity": {"score": 0-100, "explanation": "Compression vs Generation artifacts", "confidenceQualifier": "High"},
    "consistency": {"score": 0-100, "explanation": "Lighting physics across frames", "confidenceQualifier": "High"},
    "aiPatterns": {"score": 0-100, "explanation": "Temporal glitch scanning", "confidenceQualifier": "High"},
    "temporal": {"score": 0-100, "explanation": "Motion vector logic", "confidenceQualifier": "High"}
  },
  "explanations": [
    {"point": "Feature Name", "detail": "Observation about motion or consistency.", "category": "temporal" | "visual" | "audio", "timestamp": "MM:SS"}
  ],
  "manipulationType": "Optional label such as Face Swap or Lip Sync",
  "guidance": "Short safety guidance for the viewer."
}"#;

/// Extra paragraph inserted into [`VISUAL_ANALYSIS_PROMPT`] for video.
pub const VIDEO_LIP_SYNC_NOTE: &str = "\nVIDEO SPECIFIC: Check the lip movement against facial muscle activation. Real humans have complex micro-movements. Deepfakes often have 'floating' lips.\n";

/// Analysis prompt for audio.
pub const AUDIO_ANALYSIS_PROMPT: &str = r#"You are a Senior Audio Forensic Analyst. Perform a deep acoustic analysis of this audio file to detect deepfakes, voice cloning, or synthetic speech (TTS).

1. **Natural vs. Synthetic Indicators**:
   - **REAL**: Natural breaths, varied pacing, consistent room tone, imperfect articulation.
   - **FAKE (AI)**: Metallic tint, phase issues, perfectly consistent pitch, lack of breaths.

2. **Score Logic - CRITICAL**:
   - **IF VERDICT IS REAL**: Every score in "analysisSteps" MUST be LOW (between 0 and 15).
   - **IF VERDICT IS FAKE**: Scores in "analysisSteps" should be HIGH (80-100).
   - Do NOT return an Authentic verdict with High anomaly scores.

JSON STRUCTURE REQUIRED:
{
  "verdict": "REAL" | "LIKELY_FAKE",
  "deepfakeProbability": 0-100,
  "confidence": 0-100,
  "summary": "Technical summary.",
  "userRecommendation": "Actionable advice.",
  "analysisSteps": {
    "integrity": {"score": 0-100, "explanation": "Noise floor analysis", "confidenceQualifier": "High"},
    "consistency": {"score": 0-100, "explanation": "Tone logic", "confidenceQualifier": "High"},
    "aiPatterns": {"score": 0-100, "explanation": "Synthetic artifacts", "confidenceQualifier": "High"},
    "temporal": {"score": 0-100, "explanation": "Flow analysis", "confidenceQualifier": "High"}
  },
  "explanations": [{"point": "Feature", "detail": "Observation", "category": "audio", "timestamp": "MM:SS"}]
}"#;

/// System instruction for AI-text detection.
pub const AI_DETECT_INSTRUCTION: &str = "Detect AI text. Return JSON: {aiProbability, verdictLabel, aiSignals, humanSignals, summary, linguisticMarkers}";

/// System instruction for fact checking with search grounding.
pub const FACT_CHECK_INSTRUCTION: &str = "Verify claims using Google Search. Return JSON: {claims: [{claim, status, sourceUrl, category, sourceConfidence}], summary, isFactual}. status is one of STRONGLY_SUPPORTED, PARTIALLY_SUPPORTED, DISPUTED, NO_EVIDENCE. category is one of FACT, OPINION, PREDICTION, AMBIGUOUS.";

/// Reverse-image source search prompt.
pub const GROUNDING_PROMPT: &str = "Locate the primary source of this image using Google Search. Return JSON: {summary, originalEvent, manipulationDetected, confidence, findings: [{type, detail}]}";

/// System instruction for the conversational assistant.
pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are a world-class forensic assistant. You help users understand deepfake detection, text analysis, and source verification. Use Google Search for up-to-date facts.";

/// Transcription prompt.
pub const TRANSCRIBE_PROMPT: &str = "Transcribe this audio precisely.";

/// Analysis prompt for a media modality.
pub fn media_prompt(modality: Modality) -> String {
    match modality {
        Modality::Audio => AUDIO_ANALYSIS_PROMPT.to_string(),
        Modality::Video => VISUAL_ANALYSIS_PROMPT.replace("{video_note}", VIDEO_LIP_SYNC_NOTE),
        Modality::Image | Modality::Other => VISUAL_ANALYSIS_PROMPT.replace("{video_note}", ""),
    }
}

/// Prompt asking for a printable certificate of `result`.
pub fn certificate_prompt(result: &AnalysisResult) -> String {
    let findings =
        serde_json::to_string(&result.explanations).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Generate a detailed forensic certificate for Case ID {id}.\n\
         Verdict: {verdict}.\n\
         AI Probability: {probability}%.\n\
         Include detailed findings: {findings}.\n\
         Format with professional headers and ASCII borders.",
        id = result.id,
        verdict = result.verdict,
        probability = result.deepfake_probability,
        findings = findings,
    )
}

/// Prompt summarizing an archive listing, one entry per line.
pub fn archive_prompt(listing: &str) -> String {
    format!(
        "Analyze this list of files from a ZIP archive and provide a technical summary of what this project/package likely is.\n\nFiles:\n{}",
        listing
    )
}

/// Response schema of the archive summary.
pub fn archive_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {"type": "STRING"},
            "category": {"type": "STRING"},
            "technologies": {"type": "ARRAY", "items": {"type": "STRING"}},
            "securityNotes": {"type": "ARRAY", "items": {"type": "STRING"}}
        },
        "required": ["summary", "category", "technologies", "securityNotes"]
    })
}
