//! Resilient invocation of the upstream model.
//!
//! Two recovery strategies are layered in a fixed order:
//! 1. key-scoped failures (quota, network) rotate to the next key and retry,
//!    bounded by the pool size;
//! 2. when rotation is impossible, or the model itself is unavailable, one
//!    call is made against the fallback model ("safe mode").
//!
//! Everything else propagates unchanged.

mod classify;
mod keys;
mod models;

pub use classify::*;
pub use keys::*;
pub use models::*;

use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::{InvokeError, InvokeResult};
use crate::gemini::{
    Content, GenerateContent, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, Tool,
};

/// Content payload of an invocation: plain text, one content, or several turns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Text(String),
    Turns(Vec<Content>),
    Single(Content),
}

/// System instruction as either bare text or a full content object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SystemInstruction {
    Text(String),
    Content(Content),
}

/// Per-call configuration, shaped like the provider SDK's `config` object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationConfig {
    #[serde(default)]
    pub response_mime_type: Option<String>,
    #[serde(default)]
    pub response_schema: Option<serde_json::Value>,
    #[serde(default)]
    pub system_instruction: Option<SystemInstruction>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Prior conversation turns, sent ahead of `contents`.
    #[serde(default)]
    pub history: Vec<Content>,
}

/// One logical "generate content" request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvocationRequest {
    pub model: String,
    pub contents: Contents,
    #[serde(default)]
    pub config: InvocationConfig,
}

/// Result of a successful invocation.
#[derive(Debug, Clone)]
pub struct InvocationOutcome {
    /// Concatenated response text.
    pub text: String,
    /// Full provider response, for grounding metadata.
    pub raw: GenerateContentResponse,
    /// `true` when the fallback model produced this response.
    pub safe_mode: bool,
    /// Model that actually answered.
    pub model: String,
}

impl Contents {
    /// Normalize to a list of turns. Role-less content is sent as a user turn.
    pub fn into_turns(self) -> Vec<Content> {
        let turns = match self {
            Contents::Text(text) => vec![Content::user(text)],
            Contents::Single(content) => vec![content],
            Contents::Turns(turns) => turns,
        };
        turns
            .into_iter()
            .map(|mut c| {
                if c.role.is_none() {
                    c.role = Some("user".to_string());
                }
                c
            })
            .collect()
    }
}

impl From<&str> for Contents {
    fn from(text: &str) -> Self {
        Contents::Text(text.to_string())
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Contents::Text(text)
    }
}

impl From<Vec<Part>> for Contents {
    fn from(parts: Vec<Part>) -> Self {
        Contents::Single(Content::from_parts(parts))
    }
}

impl InvocationRequest {
    /// Create a request for `model` with the given content
    pub fn new(model: impl Into<String>, contents: impl Into<Contents>) -> Self {
        Self {
            model: model.into(),
            contents: contents.into(),
            config: InvocationConfig::default(),
        }
    }

    /// Set the system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.system_instruction = Some(SystemInstruction::Text(instruction.into()));
        self
    }

    /// Ask for an `application/json` response
    pub fn with_json_response(mut self) -> Self {
        self.config.response_mime_type = Some("application/json".to_string());
        self
    }

    /// Constrain the JSON response with a schema
    pub fn with_response_schema(mut self, schema: serde_json::Value) -> Self {
        self.config.response_schema = Some(schema);
        self
    }

    /// Enable a tool
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.config.tools.push(tool);
        self
    }

    /// Prepend conversation history
    pub fn with_history(mut self, history: Vec<Content>) -> Self {
        self.config.history = history;
        self
    }

    /// Build the provider wire body.
    pub fn to_wire(&self) -> GenerateContentRequest {
        let config = &self.config;

        let mut contents: Vec<Content> = config
            .history
            .iter()
            .cloned()
            .map(|mut c| {
                if c.role.is_none() {
                    c.role = Some("user".to_string());
                }
                c
            })
            .collect();
        contents.extend(self.contents.clone().into_turns());

        let generation_config = if config.response_mime_type.is_some()
            || config.response_schema.is_some()
            || config.temperature.is_some()
        {
            Some(GenerationConfig {
                response_mime_type: config.response_mime_type.clone(),
                response_schema: config.response_schema.clone(),
                temperature: config.temperature,
            })
        } else {
            None
        };

        let system_instruction = config.system_instruction.as_ref().map(|si| match si {
            SystemInstruction::Text(text) => Content::instruction(text.clone()),
            SystemInstruction::Content(content) => Content {
                role: None,
                parts: content.parts.clone(),
            },
        });

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
            tools: config.tools.clone(),
        }
    }
}

/// Executes requests with key rotation and model fallback.
#[derive(Clone)]
pub struct ResilientInvoker {
    backend: Arc<dyn GenerateContent>,
    keys: Arc<KeyPool>,
    fallback_model: String,
}

impl ResilientInvoker {
    /// Create an invoker over a backend and a shared key pool
    pub fn new(
        backend: Arc<dyn GenerateContent>,
        keys: Arc<KeyPool>,
        fallback_model: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            keys,
            fallback_model: fallback_model.into(),
        }
    }

    /// The shared key pool
    pub fn keys(&self) -> &Arc<KeyPool> {
        &self.keys
    }

    /// The safe-mode model
    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    /// Run one logical request, recovering from key-scoped and model failures.
    pub async fn invoke(&self, request: InvocationRequest) -> InvokeResult<InvocationOutcome> {
        let model = resolve_model(&request.model).to_string();
        let body = request.to_wire();
        let max_attempts = self.keys.size();

        if max_attempts == 0 {
            error!("No API key configured");
            return Err(InvokeError::MissingApiKey);
        }

        let mut attempts = 0;
        let mut last_error = String::new();

        while attempts < max_attempts {
            let lease = self.keys.lease().ok_or(InvokeError::MissingApiKey)?;
            let start = Instant::now();

            match self.backend.generate(lease.key(), &model, &body).await {
                Ok(raw) => {
                    info!(
                        model = %model,
                        key_index = lease.index(),
                        attempt = attempts,
                        latency_ms = start.elapsed().as_millis(),
                        safe_mode = false,
                        "Invocation succeeded"
                    );
                    return Ok(InvocationOutcome {
                        text: raw.text(),
                        raw,
                        safe_mode: false,
                        model,
                    });
                }
                Err(err) => {
                    let class = classify(&err);
                    warn!(
                        model = %model,
                        key_index = lease.index(),
                        attempt = attempts,
                        class = %class,
                        error = %err,
                        "Invocation failed"
                    );

                    if class.is_key_scoped() && self.keys.rotate_past(&lease) {
                        last_error = err.to_string();
                        attempts += 1;
                        continue;
                    }

                    if class.allows_fallback() {
                        return self.invoke_fallback(&body).await;
                    }

                    return Err(InvokeError::Provider { class, source: err });
                }
            }
        }

        error!(attempts, "All API keys exhausted");
        Err(InvokeError::KeysExhausted {
            attempts,
            last_error,
        })
    }

    /// Single call against the fallback model with the current key. Never retried.
    async fn invoke_fallback(
        &self,
        body: &GenerateContentRequest,
    ) -> InvokeResult<InvocationOutcome> {
        let lease = self.keys.lease().ok_or(InvokeError::MissingApiKey)?;
        let model = self.fallback_model.clone();

        warn!(
            model = %model,
            key_index = lease.index(),
            "Switching to fallback model (safe mode)"
        );

        match self.backend.generate(lease.key(), &model, body).await {
            Ok(raw) => {
                info!(model = %model, safe_mode = true, "Fallback invocation succeeded");
                Ok(InvocationOutcome {
                    text: raw.text(),
                    raw,
                    safe_mode: true,
                    model,
                })
            }
            Err(err) => {
                let class = classify(&err);
                error!(model = %model, class = %class, error = %err, "Fallback invocation failed");
                Err(InvokeError::Provider { class, source: err })
            }
        }
    }
}
