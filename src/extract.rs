//! Tolerant recovery of a JSON object from model output.
//!
//! Attempts, in order:
//! 1. strict parse of the whole (trimmed) text;
//! 2. strict parse after removing an enclosing markdown code fence;
//! 3. the first outermost brace-balanced, string-aware `{...}` region that parses;
//! 4. the span between the first `{` and the last `}`.
//!
//! Only JSON objects are accepted.

use serde_json::Value;
use tracing::{debug, error};

use crate::error::RequestError;

/// Markers of a raw quota error payload in place of model output.
const QUOTA_MARKERS: &[&str] = &["429", "RESOURCE_EXHAUSTED", "RESOURCE_EXAUSTED"];

/// Recover one JSON object from `text`.
pub fn extract_json(text: &str) -> Result<Value, RequestError> {
    let trimmed = text.trim();

    if let Some(value) = parse_object(trimmed) {
        return Ok(value);
    }

    if let Some(value) = parse_object(strip_outer_fence(trimmed)) {
        debug!("Recovered JSON after stripping code fence");
        return Ok(value);
    }

    if let Some(value) = balanced_objects(trimmed).into_iter().find_map(parse_object) {
        debug!("Recovered JSON from balanced region");
        return Ok(value);
    }

    if let (Some(first), Some(last)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if first < last {
            if let Some(value) = parse_object(&trimmed[first..=last]) {
                return Ok(value);
            }
        }
    }

    let preview: String = trimmed.chars().take(100).collect();
    error!(preview = %preview, "Failed to parse model response as JSON");

    let message = if QUOTA_MARKERS.iter().any(|m| trimmed.contains(m)) {
        format!("upstream returned a quota error instead of a result: '{}'", preview)
    } else {
        format!("no JSON object found. First 100 chars: '{}'", preview)
    };

    Err(RequestError::MalformedResponse { message })
}

fn parse_object(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Remove a ```` ```json ```` / ```` ``` ```` opening line and a closing fence, if present.
fn strip_outer_fence(text: &str) -> &str {
    let mut inner = text;
    if inner.starts_with("```") {
        inner = match inner.find('\n') {
            Some(newline) => &inner[newline + 1..],
            None => inner.trim_start_matches('`').trim_start_matches("json"),
        };
    }
    inner.trim_end().trim_end_matches("```").trim()
}

/// Outermost `{...}` regions whose braces balance, in order of appearance.
///
/// One string-aware pass; quotes only open a string inside a region, so
/// stray quotes in surrounding prose are ignored.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut open: Vec<usize> = Vec::new();
    let mut regions: Vec<(usize, usize)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (index, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push(index),
            '}' => {
                if let Some(start) = open.pop() {
                    while regions.last().is_some_and(|&(inner, _)| inner > start) {
                        regions.pop();
                    }
                    regions.push((start, index));
                }
            }
            _ => {}
        }
    }

    regions
        .into_iter()
        .map(|(start, end)| &text[start..=end])
        .collect()
}
