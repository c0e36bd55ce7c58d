use std::env;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub models: ModelConfig,
    pub request: RequestConfig,
    pub limits: LimitsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Ordered credential pool. May be empty; that is reported at first use.
    pub api_keys: Vec<String>,
    pub base_url: String,
}

/// Model selection
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model requested by the façades.
    pub primary: String,
    /// Always-available model used in safe mode.
    pub fallback: String,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// Input limits enforced before anything is sent upstream
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub max_upload_bytes: usize,
    pub archive_listing_limit: usize,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default primary model.
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash";
/// Default safe-mode model.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-flash-latest";
/// 3.8 MiB, the largest upload that still fits the provider's inline payload limit once base64 encoded.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 3_984_588;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let gemini = GeminiConfig {
            api_keys: keys_from_env(),
            base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };

        let models = ModelConfig {
            primary: env::var("MODEL_PRIMARY").unwrap_or_else(|_| DEFAULT_PRIMARY_MODEL.to_string()),
            fallback: env::var("MODEL_FALLBACK")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_MODEL.to_string()),
        };

        if models.primary.trim().is_empty() || models.fallback.trim().is_empty() {
            return Err(AppError::Config {
                message: "MODEL_PRIMARY and MODEL_FALLBACK cannot be blank".to_string(),
            });
        }

        let request = RequestConfig {
            timeout_ms: parse_env("REQUEST_TIMEOUT_MS", 120_000),
        };

        let limits = LimitsConfig {
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            archive_listing_limit: parse_env("ARCHIVE_LISTING_LIMIT", 100),
        };

        let server = ServerConfig {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        Ok(Config {
            gemini,
            models,
            request,
            limits,
            server,
            logging,
        })
    }
}

/// Read the credential pool. `GEMINI_KEYS` wins over `GEMINI_API_KEY` when both are set.
fn keys_from_env() -> Vec<String> {
    let raw = env::var("GEMINI_KEYS")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| env::var("GEMINI_API_KEY").ok())
        .unwrap_or_default();

    split_keys(&raw)
}

/// Split a comma-separated credential list, dropping blanks.
pub fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 120_000 }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback: DEFAULT_FALLBACK_MODEL.to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            archive_listing_limit: 100,
        }
    }
}
