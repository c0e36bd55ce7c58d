//! # Proofy Forensics
//!
//! Backend for a media-forensics service that delegates deepfake and
//! AI-text analysis to the Gemini `generateContent` API and turns its
//! unreliable output into stable, typed verdicts.
//!
//! ## Features
//!
//! - **Key rotation**: a shared credential pool rotated on quota and network failures
//! - **Safe mode**: one fallback-model call when rotation cannot help
//! - **Tolerant JSON extraction**: recovers an object from fenced or chatty model output
//! - **Deterministic verdicts**: `REAL` iff the manipulation probability is below 50
//! - **Façades**: media, text, reverse-image grounding, certificates, chat,
//!   archive summaries, transcription and sequential batch triage
//!
//! ## Architecture
//!
//! ```text
//! HTTP (axum) → Façade → ResilientInvoker → Gemini API
//!                  ↓
//!        extract_json → normalize
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use proofy_forensics::{Config, AppState};
//! use proofy_forensics::gemini::GeminiClient;
//! use proofy_forensics::server::router;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = GeminiClient::new(&config.gemini, config.request.clone())?;
//!     let app = router(Arc::new(AppState::new(config, Arc::new(client))));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Analysis result records and the normalizer.
pub mod analysis;
/// Configuration loaded from the environment.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Tolerant JSON recovery from model output.
pub mod extract;
/// Request façades over the resilient invoker.
pub mod facades;
/// Gemini API client and wire types.
pub mod gemini;
/// Key pool, error classification and the resilient invoker.
pub mod invoker;
/// Prompt text and response schemas.
pub mod prompts;
/// HTTP server and request handling.
pub mod server;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, SharedState};
