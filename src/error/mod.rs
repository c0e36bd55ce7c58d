use thiserror::Error;

use crate::invoker::{parse_retry_delay, ErrorClass};

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Invoke(#[from] InvokeError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors from a single Gemini API call
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Terminal failures of the resilient invoker, raised once every recovery path is spent
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("API_KEY_MISSING")]
    MissingApiKey,

    #[error("All API keys have exhausted their quota ({attempts} attempts): {last_error}")]
    KeysExhausted { attempts: usize, last_error: String },

    #[error("{source}")]
    Provider {
        class: ErrorClass,
        #[source]
        source: GeminiError,
    },
}

/// Errors raised by the request façades around the invoker
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("FILE_TOO_LARGE: {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },

    /// The request body was cut off by the HTTP layer before it could be decoded.
    #[error("FILE_TOO_LARGE: request body exceeds the {limit} byte upload limit")]
    BodyTooLarge { limit: usize },

    #[error("The forensic engine returned an unreadable response format: {message}")]
    MalformedResponse { message: String },
}

impl InvokeError {
    /// Classification of the failure, when it came from the provider.
    pub fn class(&self) -> Option<ErrorClass> {
        match self {
            InvokeError::MissingApiKey => None,
            InvokeError::KeysExhausted { .. } => Some(ErrorClass::QuotaExceeded),
            InvokeError::Provider { class, .. } => Some(*class),
        }
    }
}

impl AppError {
    /// HTTP status used when the error leaves the server.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Request(RequestError::Validation { .. }) => 400,
            AppError::Request(
                RequestError::InputTooLarge { .. } | RequestError::BodyTooLarge { .. },
            ) => 413,
            _ => 500,
        }
    }

    /// Wording shown to an end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Invoke(InvokeError::MissingApiKey) => {
                "AI Key Required for Analysis. Connect an API key and try again.".to_string()
            }
            AppError::Invoke(err) if err.class() == Some(ErrorClass::QuotaExceeded) => {
                let delay = parse_retry_delay(&err.to_string())
                    .map(|d| format!(" Please wait for {}.", d))
                    .unwrap_or_default();
                format!("System Busy: Limit reached.{} Try again a bit later.", delay)
            }
            AppError::Request(
                RequestError::InputTooLarge { limit, .. } | RequestError::BodyTooLarge { limit },
            ) => format!(
                "File too large. Please upload a file under {:.1} MB.",
                *limit as f64 / (1024.0 * 1024.0)
            ),
            AppError::Request(RequestError::MalformedResponse { .. }) => {
                "The forensic engine returned an unreadable response format.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for Gemini calls
pub type GeminiResult<T> = Result<T, GeminiError>;

/// Result type alias for invoker operations
pub type InvokeResult<T> = Result<T, InvokeError>;
