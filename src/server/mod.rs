//! HTTP surface.
//!
//! This module provides:
//! - Shared application state holding one instance of every façade
//! - The axum router exposing the `/api/*` endpoints
//! - JSON error responses shaped as `{error, status}`

mod handlers;

pub use handlers::*;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, MethodRouter};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::facades::{
    ArchiveSummarizer, CertificateGenerator, ChatAssistant, FacadeCore, MediaAnalyzer,
    SourceGrounding, TextAnalyzer, Transcriber,
};
use crate::gemini::GenerateContent;
use crate::invoker::{KeyPool, ResilientInvoker};

/// Headroom for JSON framing around a base64 upload.
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Invoker used directly by `/api/analyze` and by every façade.
    pub invoker: ResilientInvoker,
    pub media: MediaAnalyzer,
    pub text: TextAnalyzer,
    pub grounding: SourceGrounding,
    pub certificate: CertificateGenerator,
    pub chat: ChatAssistant,
    pub archive: ArchiveSummarizer,
    pub transcriber: Transcriber,
}

impl AppState {
    /// Create new application state over a provider backend.
    ///
    /// The key pool is built from `config` and shared by every façade.
    pub fn new(config: Config, backend: Arc<dyn GenerateContent>) -> Self {
        let keys = Arc::new(KeyPool::new(config.gemini.api_keys.clone()));
        if keys.is_empty() {
            tracing::warn!("No API key configured; requests will fail with API_KEY_MISSING");
        }

        tracing::info!(
            keys = keys.size(),
            primary_model = %config.models.primary,
            fallback_model = %config.models.fallback,
            "AppState initializing"
        );

        let invoker = ResilientInvoker::new(backend, keys, config.models.fallback.clone());
        let core = FacadeCore::new(
            invoker.clone(),
            config.models.primary.clone(),
            config.limits.clone(),
        );

        Self {
            media: MediaAnalyzer::new(core.clone()),
            text: TextAnalyzer::new(core.clone()),
            grounding: SourceGrounding::new(core.clone()),
            certificate: CertificateGenerator::new(core.clone()),
            chat: ChatAssistant::new(core.clone()),
            archive: ArchiveSummarizer::new(core.clone()),
            transcriber: Transcriber::new(core),
            invoker,
            config,
        }
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Largest request body accepted: the upload ceiling once base64 encoded, plus slack.
pub fn body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.div_ceil(3) * 4 + BODY_LIMIT_SLACK
}

fn post_only<H, T>(handler: H) -> MethodRouter<SharedState>
where
    H: axum::handler::Handler<T, SharedState>,
    T: 'static,
{
    post(handler).fallback(method_not_allowed)
}

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    let limit = body_limit(state.config.limits.max_upload_bytes);

    Router::new()
        .route("/api/analyze", post_only(analyze))
        .route("/api/chat", post_only(chat))
        .route("/api/zip", post_only(zip))
        .route("/api/analyze-media", post_only(analyze_media))
        .route("/api/analyze-text", post_only(analyze_text))
        .route("/api/grounding", post_only(grounding))
        .route("/api/certificate", post_only(certificate))
        .route("/api/transcribe", post_only(transcribe))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
