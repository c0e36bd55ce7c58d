//! Legacy model compatibility table.

/// Deprecated model identifiers and the model that now serves them.
pub const MODEL_ALIASES: &[(&str, &str)] = &[
    ("gemini-1.5-flash", "gemini-2.5-flash"),
    ("gemini-2.0-flash", "gemini-2.5-flash"),
];

/// Map a requested model to the identifier actually called.
pub fn resolve_model(requested: &str) -> &str {
    MODEL_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == requested)
        .map(|(_, current)| *current)
        .unwrap_or(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_models_are_remapped() {
        assert_eq!(resolve_model("gemini-1.5-flash"), "gemini-2.5-flash");
        assert_eq!(resolve_model("gemini-2.0-flash"), "gemini-2.5-flash");
    }

    #[test]
    fn test_other_models_pass_through() {
        assert_eq!(resolve_model("gemini-2.5-pro"), "gemini-2.5-pro");
        assert_eq!(resolve_model("gemini-flash-latest"), "gemini-flash-latest");
        assert_eq!(resolve_model(""), "");
    }
}
