//! Email shape checks

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Loose shape check (`local@domain.tld`); deliverability is not checked.
pub fn is_plausible_email(input: &str) -> bool {
    EMAIL_RE.is_match(input.trim())
}

/// Lowercased, trimmed email used for storage and comparisons.
pub fn normalize_email(input: &str) -> String {
    input.trim().to_lowercase()
}
