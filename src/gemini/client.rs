use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use crate::config::{GeminiConfig, RequestConfig};
use crate::error::{GeminiError, GeminiResult};

/// A backend able to run one `generateContent` call with an explicit credential.
///
/// The resilient invoker only talks to this trait, which keeps key rotation
/// and model fallback testable without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerateContent: Send + Sync {
    /// Run a single call. No retries happen at this level.
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse>;
}

/// Client for the Google Generative Language REST API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    request_config: RequestConfig,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &GeminiConfig, request_config: RequestConfig) -> GeminiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(GeminiError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl GenerateContent for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.endpoint(model);
        let start = Instant::now();

        debug!(
            model = %model,
            contents = request.contents.len(),
            tools = request.tools.len(),
            "Calling generateContent"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeminiError::Timeout {
                        timeout_ms: self.request_config.timeout_ms,
                    }
                } else {
                    GeminiError::Http(e)
                }
            })?;

        let status = response.status();
        let latency = start.elapsed();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(
                model = %model,
                status = status.as_u16(),
                latency_ms = latency.as_millis(),
                "generateContent returned an error status"
            );
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: ApiErrorEnvelope::message_from_body(&error_body),
            });
        }

        let body: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| GeminiError::InvalidResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        info!(
            model = %model,
            latency_ms = latency.as_millis(),
            candidates = body.candidates.len(),
            "generateContent succeeded"
        );

        Ok(body)
    }
}
