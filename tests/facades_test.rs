//! Integration tests for the request façades
//!
//! Each façade runs over the real client and invoker against a wiremock
//! provider, so prompts, extraction and normalization are exercised end to end.

use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::{
    matchers::{body_partial_json, body_string_contains, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

use proofy_forensics::analysis::{ClaimStatus, ConfidenceLevel, Verdict};
use proofy_forensics::config::{GeminiConfig, LimitsConfig, RequestConfig};
use proofy_forensics::error::{AppError, RequestError};
use proofy_forensics::facades::{
    ArchiveEntry, ArchiveSummarizer, CertificateGenerator, FacadeCore, MediaAnalyzer,
    MediaUpload, SourceGrounding, TextAnalyzer, TextMode, Transcriber, CERTIFICATE_FALLBACK,
};
use proofy_forensics::gemini::GeminiClient;
use proofy_forensics::invoker::{KeyPool, ResilientInvoker};

const FLASH_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn core(base_url: &str, limits: LimitsConfig) -> FacadeCore {
    let config = GeminiConfig {
        api_keys: vec!["test-key".to_string()],
        base_url: base_url.to_string(),
    };
    let client = GeminiClient::new(&config, RequestConfig { timeout_ms: 5000 })
        .expect("Failed to create client");
    let keys = Arc::new(KeyPool::new(config.api_keys.clone()));
    let invoker = ResilientInvoker::new(Arc::new(client), keys, "gemini-flash-latest");
    FacadeCore::new(invoker, "gemini-2.5-flash", limits)
}

fn text_body(text: &str) -> Value {
    json!({"candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]})
}

fn png(name: &str, len: usize) -> MediaUpload {
    MediaUpload::new(name, "image/png", vec![7u8; len])
}

#[tokio::test]
async fn test_media_analysis_from_fenced_output() {
    let mock_server = MockServer::start().await;

    let reply = "Here is the report:\n```json\n{\"deepfakeProbability\": 30, \"confidence\": 90, \"summary\": \"Consistent lighting\"}\n```";

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body(reply)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let analyzer = MediaAnalyzer::new(core(&mock_server.uri(), LimitsConfig::default()));
    let result = analyzer.analyze(&png("photo.png", 16)).await.unwrap();

    assert_eq!(result.verdict, Verdict::Real);
    assert_eq!(result.deepfake_probability, 30.0);
    assert_eq!(result.confidence_level, ConfidenceLevel::High);
    assert_eq!(result.summary, "Consistent lighting");
    assert_eq!(result.file_metadata.name, "photo.png");
    assert!(result.manipulation_type.is_none());
    assert!(!result.is_safe_mode);
    assert_eq!(result.id.len(), 9);
}

#[tokio::test]
async fn test_oversized_upload_is_never_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("{}")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let limits = LimitsConfig {
        max_upload_bytes: 10,
        ..Default::default()
    };
    let analyzer = MediaAnalyzer::new(core(&mock_server.uri(), limits));
    let err = analyzer.analyze(&png("big.png", 11)).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Request(RequestError::InputTooLarge { size: 11, limit: 10 })
    ));
    assert_eq!(err.status_code(), 413);
}

#[tokio::test]
async fn test_unparseable_media_output_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("I cannot help with that.")))
        .mount(&mock_server)
        .await;

    let analyzer = MediaAnalyzer::new(core(&mock_server.uri(), LimitsConfig::default()));
    let err = analyzer.analyze(&png("photo.png", 4)).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Request(RequestError::MalformedResponse { .. })
    ));
    assert_eq!(
        err.user_message(),
        "The forensic engine returned an unreadable response format."
    );
}

#[tokio::test]
async fn test_batch_continues_after_a_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_body(r#"{"deepfakeProbability": 80, "confidence": 60}"#)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let limits = LimitsConfig {
        max_upload_bytes: 100,
        ..Default::default()
    };
    let analyzer = MediaAnalyzer::new(core(&mock_server.uri(), limits));
    let report = analyzer
        .analyze_batch(&[png("a.png", 8), png("huge.png", 500), png("c.png", 8)])
        .await;

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].name, "huge.png");
    assert!(report.failures[0].error.starts_with("File too large."));
    assert!(report
        .results
        .iter()
        .all(|r| r.verdict == Verdict::LikelyFake && r.manipulation_type.as_deref() == Some("Neural Synthesis")));

    let csv = report.to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains(",a.png,LIKELY_FAKE,80,60,"));
    assert!(lines[2].contains(",c.png,LIKELY_FAKE,80,60,"));
}

#[tokio::test]
async fn test_fact_check_uses_search_and_collects_sources() {
    let mock_server = MockServer::start().await;

    let reply = json!({
        "candidates": [{
            "content": {"parts": [{"text": "Result: {\"aiProbability\": 12, \"isFactual\": false, \"claims\": [{\"claim\": \"The moon is cheese\", \"status\": \"false\"}]}"}]},
            "groundingMetadata": {
                "groundingChunks": [{"web": {"uri": "https://nasa.example/moon", "title": "NASA"}}]
            }
        }]
    });

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(body_partial_json(json!({"tools": [{"googleSearch": {}}]})))
        .and(|req: &Request| {
            let body: Value = serde_json::from_slice(&req.body).unwrap_or_default();
            body.get("generationConfig")
                .and_then(|g| g.get("responseMimeType"))
                .is_none()
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .expect(1)
        .mount(&mock_server)
        .await;

    let analyzer = TextAnalyzer::new(core(&mock_server.uri(), LimitsConfig::default()));
    let result = analyzer
        .analyze("The moon is made of cheese.", TextMode::FactCheck)
        .await
        .unwrap();

    assert_eq!(result.ai_probability, 12.0);
    assert_eq!(result.claims.len(), 1);
    assert_eq!(result.claims[0].status, ClaimStatus::Disputed);
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].url, "https://nasa.example/moon");
}

#[tokio::test]
async fn test_empty_text_is_rejected_locally() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("{}")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let analyzer = TextAnalyzer::new(core(&mock_server.uri(), LimitsConfig::default()));
    let err = analyzer.analyze("   ", TextMode::AiDetect).await.unwrap_err();

    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_archive_listing_is_truncated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(body_string_contains("file2.rs (30 bytes)"))
        .and(|req: &Request| !String::from_utf8_lossy(&req.body).contains("file3.rs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body(
            r#"{"summary": "A Rust crate", "category": "Library", "technologies": ["Rust"], "securityNotes": []}"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let limits = LimitsConfig {
        archive_listing_limit: 3,
        ..Default::default()
    };
    let entries: Vec<ArchiveEntry> = (0..6)
        .map(|i| ArchiveEntry {
            name: format!("file{i}.rs"),
            is_directory: false,
            size: i * 15,
        })
        .collect();

    let summarizer = ArchiveSummarizer::new(core(&mock_server.uri(), limits));
    let summary = summarizer.summarize(&entries).await.unwrap();

    assert_eq!(summary.category, "Library");
    assert_eq!(summary.technologies, vec!["Rust"]);
    assert!(summary.security_notes.is_empty());
}

#[tokio::test]
async fn test_empty_certificate_uses_fallback_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(body_string_contains("AI Probability: 70%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("  ")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = proofy_forensics::analysis::normalize(
        &json!({"deepfakeProbability": 70, "confidence": 88}),
        png("x.png", 1).metadata(),
        false,
    );

    let generator = CertificateGenerator::new(core(&mock_server.uri(), LimitsConfig::default()));
    let text = generator.generate(&result).await.unwrap();

    assert_eq!(text, CERTIFICATE_FALLBACK);
}

#[tokio::test]
async fn test_grounding_report_carries_verified_sources() {
    let mock_server = MockServer::start().await;

    let reply = json!({
        "candidates": [{
            "content": {"parts": [{"text": "{\"summary\": \"Press photo from 2019\", \"manipulationDetected\": true, \"confidence\": 140, \"findings\": [{\"type\": \"crop\", \"detail\": \"Banner removed\"}]}"}]},
            "groundingMetadata": {
                "groundingChunks": [{"web": {"uri": "https://news.example/story"}}]
            }
        }]
    });

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(body_partial_json(json!({"tools": [{"googleSearch": {}}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .expect(1)
        .mount(&mock_server)
        .await;

    let grounding = SourceGrounding::new(core(&mock_server.uri(), LimitsConfig::default()));
    let report = grounding.locate(&png("scene.png", 32)).await.unwrap();

    assert_eq!(report.summary, "Press photo from 2019");
    assert!(report.manipulation_detected);
    assert_eq!(report.confidence, 100.0);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].kind, "crop");
    assert_eq!(report.sources.len(), 1);
    assert_eq!(report.sources[0].title, "Verified Source");
}

#[tokio::test]
async fn test_grounding_rejects_non_image() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("{}")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let grounding = SourceGrounding::new(core(&mock_server.uri(), LimitsConfig::default()));
    let clip = MediaUpload::new("clip.mp3", "audio/mpeg", vec![1, 2, 3]);
    let err = grounding.locate(&clip).await.unwrap_err();

    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_transcript_is_trimmed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(FLASH_PATH))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"inlineData": {"mimeType": "audio/wav"}}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_body("\n  Hello, this is a test.  \n")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transcriber = Transcriber::new(core(&mock_server.uri(), LimitsConfig::default()));
    let upload = MediaUpload::new("memo.wav", "audio/wav", vec![0u8; 64]);
    let transcript = transcriber.transcribe(&upload).await.unwrap();

    assert_eq!(transcript, "Hello, this is a test.");
}
