//! Request façades over the resilient invoker.
//!
//! Each façade builds the prompt and response hint for one task, runs it
//! through [`crate::invoker::ResilientInvoker`] and shapes the reply:
//! - [`MediaAnalyzer`] - image, video and audio verdicts, plus batch triage
//! - [`TextAnalyzer`] - AI-text detection and fact checking
//! - [`SourceGrounding`] - reverse-image source search
//! - [`CertificateGenerator`] - printable reports
//! - [`ChatAssistant`] - conversational assistant
//! - [`ArchiveSummarizer`] - archive listing summaries
//! - [`Transcriber`] - audio transcription
//!
//! Size checks run here, before anything is uploaded.

mod archive;
mod certificate;
mod chat;
mod core;
mod grounding;
mod media;
mod text;
mod transcribe;

pub use archive::*;
pub use certificate::*;
pub use chat::*;
pub use core::*;
pub use grounding::*;
pub use media::*;
pub use text::*;
pub use transcribe::*;
