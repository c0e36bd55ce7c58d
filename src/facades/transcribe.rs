use tracing::info;

use super::{FacadeCore, MediaUpload};
use crate::error::AppResult;
use crate::gemini::Part;
use crate::invoker::InvocationRequest;
use crate::prompts::TRANSCRIBE_PROMPT;

/// Plain speech-to-text over the same invoker
#[derive(Clone)]
pub struct Transcriber {
    core: FacadeCore,
}

impl Transcriber {
    /// Create a new transcriber
    pub fn new(core: FacadeCore) -> Self {
        Self { core }
    }

    /// Transcribe an audio upload. An empty reply yields an empty transcript.
    pub async fn transcribe(&self, upload: &MediaUpload) -> AppResult<String> {
        self.core.check_size(upload)?;

        let request = InvocationRequest::new(
            self.core.model(),
            vec![upload.to_part(), Part::text(TRANSCRIBE_PROMPT)],
        );
        let outcome = self.core.invoker().invoke(request).await?;
        let transcript = outcome.text.trim().to_string();

        info!(
            file = %upload.name,
            chars = transcript.len(),
            safe_mode = outcome.safe_mode,
            "Transcription completed"
        );

        Ok(transcript)
    }
}
