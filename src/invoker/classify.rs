//! Provider error classification.
//!
//! One function maps a [`GeminiError`] to a closed [`ErrorClass`]. Status
//! codes and transport conditions are checked first, then the message is
//! matched against [`MESSAGE_MATCHERS`] in order. The invoker decides what to
//! do with each class; nothing here knows about rotation or fallback.

use serde::{Deserialize, Serialize};

use crate::error::GeminiError;

/// Recovery-relevant category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Rate limit or quota exhaustion on the current key.
    QuotaExceeded,
    /// Transport failure before a response arrived.
    Network,
    /// The requested model does not exist or is not served.
    ModelUnavailable,
    /// Anything else; never retried.
    Other,
}

impl ErrorClass {
    /// Quota and network failures are key-scoped: another key may succeed.
    pub fn is_key_scoped(self) -> bool {
        matches!(self, ErrorClass::QuotaExceeded | ErrorClass::Network)
    }

    /// Classes recoverable by switching to the fallback model.
    pub fn allows_fallback(self) -> bool {
        self.is_key_scoped() || self == ErrorClass::ModelUnavailable
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::QuotaExceeded => "quota_exceeded",
            ErrorClass::Network => "network",
            ErrorClass::ModelUnavailable => "model_unavailable",
            ErrorClass::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lower-case substrings and the class they imply, checked in order.
pub const MESSAGE_MATCHERS: &[(&str, ErrorClass)] = &[
    ("429", ErrorClass::QuotaExceeded),
    ("quota", ErrorClass::QuotaExceeded),
    ("exhausted", ErrorClass::QuotaExceeded),
    ("limit reached", ErrorClass::QuotaExceeded),
    ("system busy", ErrorClass::QuotaExceeded),
    ("cooling down", ErrorClass::QuotaExceeded),
    ("fetch", ErrorClass::Network),
    ("error sending request", ErrorClass::Network),
    ("connection refused", ErrorClass::Network),
    ("404", ErrorClass::ModelUnavailable),
    ("not_found", ErrorClass::ModelUnavailable),
    ("not found", ErrorClass::ModelUnavailable),
];

/// Classify a provider error.
pub fn classify(err: &GeminiError) -> ErrorClass {
    match err {
        GeminiError::Timeout { .. } => ErrorClass::Network,
        GeminiError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request() => {
            ErrorClass::Network
        }
        GeminiError::Api { status: 429, .. } => ErrorClass::QuotaExceeded,
        GeminiError::Api { status: 404, .. } => ErrorClass::ModelUnavailable,
        other => classify_message(&other.to_string()),
    }
}

/// Classify free text with the matcher table.
pub fn classify_message(message: &str) -> ErrorClass {
    let lowered = message.to_lowercase();
    MESSAGE_MATCHERS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, class)| *class)
        .unwrap_or(ErrorClass::Other)
}

/// Extract a provider-suggested delay such as `41.2s` from `... retry in 41.2s ...`.
pub fn parse_retry_delay(message: &str) -> Option<String> {
    const MARKER: &str = "retry in ";
    let start = message.find(MARKER)? + MARKER.len();
    let rest = &message[start..];

    let number: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if number.is_empty() || !number.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if rest[number.len()..].starts_with('s') {
        Some(format!("{}s", number))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> GeminiError {
        GeminiError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_status_codes_take_precedence() {
        assert_eq!(classify(&api(429, "anything")), ErrorClass::QuotaExceeded);
        assert_eq!(classify(&api(404, "anything")), ErrorClass::ModelUnavailable);
    }

    #[test]
    fn test_timeout_is_network() {
        assert_eq!(
            classify(&GeminiError::Timeout { timeout_ms: 10 }),
            ErrorClass::Network
        );
    }

    #[test]
    fn test_message_table() {
        let cases = [
            ("RESOURCE_EXHAUSTED: Quota exceeded", ErrorClass::QuotaExceeded),
            ("Resource has been exhausted", ErrorClass::QuotaExceeded),
            ("Limit reached for today", ErrorClass::QuotaExceeded),
            ("System Busy", ErrorClass::QuotaExceeded),
            ("Cooling Down, try later", ErrorClass::QuotaExceeded),
            ("TypeError: fetch failed", ErrorClass::Network),
            ("models/gemini-9 is not found for API version v1beta", ErrorClass::ModelUnavailable),
            ("NOT_FOUND", ErrorClass::ModelUnavailable),
            ("API key not valid", ErrorClass::Other),
            ("", ErrorClass::Other),
        ];
        for (message, expected) in cases {
            assert_eq!(classify_message(message), expected, "message: {message:?}");
        }
    }

    #[test]
    fn test_quota_wins_over_not_found_in_same_message() {
        assert_eq!(
            classify_message("quota exceeded; fallback model not found"),
            ErrorClass::QuotaExceeded
        );
    }

    #[test]
    fn test_api_message_is_classified_when_status_is_generic() {
        assert_eq!(
            classify(&api(503, "UNAVAILABLE: System Busy")),
            ErrorClass::QuotaExceeded
        );
        assert_eq!(classify(&api(400, "INVALID_ARGUMENT")), ErrorClass::Other);
    }

    #[test]
    fn test_class_policies() {
        assert!(ErrorClass::QuotaExceeded.is_key_scoped());
        assert!(ErrorClass::Network.is_key_scoped());
        assert!(!ErrorClass::ModelUnavailable.is_key_scoped());
        assert!(ErrorClass::ModelUnavailable.allows_fallback());
        assert!(!ErrorClass::Other.allows_fallback());
    }

    #[test]
    fn test_parse_retry_delay() {
        assert_eq!(
            parse_retry_delay("Quota exceeded. Please retry in 41.2s."),
            Some("41.2s".to_string())
        );
        assert_eq!(parse_retry_delay("retry in 7s"), Some("7s".to_string()));
        assert_eq!(parse_retry_delay("retry in soon"), None);
        assert_eq!(parse_retry_delay("retry in 5 minutes"), None);
        assert_eq!(parse_retry_delay("no hint here"), None);
    }
}
