use tracing::{info, warn};

use super::FacadeCore;
use crate::analysis::AnalysisResult;
use crate::error::AppResult;
use crate::invoker::InvocationRequest;
use crate::prompts::certificate_prompt;

/// Text returned when the model produced an empty report.
pub const CERTIFICATE_FALLBACK: &str = "Failed to generate text report.";

/// Printable forensic certificates
#[derive(Clone)]
pub struct CertificateGenerator {
    core: FacadeCore,
}

impl CertificateGenerator {
    /// Create a new certificate generator
    pub fn new(core: FacadeCore) -> Self {
        Self { core }
    }

    /// Render a formatted text report of `result`.
    pub async fn generate(&self, result: &AnalysisResult) -> AppResult<String> {
        let request = InvocationRequest::new(self.core.model(), certificate_prompt(result));
        let outcome = self.core.invoker().invoke(request).await?;

        if outcome.text.trim().is_empty() {
            warn!(case_id = %result.id, "Certificate came back empty");
            return Ok(CERTIFICATE_FALLBACK.to_string());
        }

        info!(case_id = %result.id, safe_mode = outcome.safe_mode, "Certificate generated");
        Ok(outcome.text)
    }
}
