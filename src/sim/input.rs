use crate::graph::{AskQuestionConfig, ValidationKind};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

// Deliberately permissive: one '@', no whitespace, a dot in the domain.
fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

/// Checks a free-text answer against the node's configured validation type.
pub(super) fn answer_is_valid(config: &AskQuestionConfig, value: &str) -> bool {
    let value = value.trim();
    match config.validation_type {
        ValidationKind::Text => !value.is_empty(),
        ValidationKind::Number => value.parse::<f64>().is_ok(),
        ValidationKind::Email => email_re().is_match(value),
        ValidationKind::Regex => match config.validation_pattern.as_deref() {
            Some(pattern) if !pattern.is_empty() => match Regex::new(pattern) {
                Ok(re) => re.is_match(value),
                Err(err) => {
                    // A broken author-supplied pattern must not wedge the
                    // conversation; accept the answer instead.
                    debug!(%pattern, %err, "invalid validation pattern, accepting input");
                    true
                }
            },
            _ => true,
        },
    }
}

/// Fallback re-prompt text when the node has no configured error message.
pub(super) fn default_error_message(kind: ValidationKind) -> &'static str {
    match kind {
        ValidationKind::Text => "Please enter an answer.",
        ValidationKind::Number => "Please enter a valid number.",
        ValidationKind::Email => "Please enter a valid email address.",
        ValidationKind::Regex => "That answer is not in the expected format. Please try again.",
    }
}
