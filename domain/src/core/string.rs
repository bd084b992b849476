//! String utilities for the domain layer.

/// Normalize a human label for comparison: trimmed, inner whitespace
/// collapsed, lowercased.
pub fn normalize_label(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trim a string and return `None` when nothing is left.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  Proposta "), "proposta");
        assert_eq!(normalize_label("Em   Negociação"), "em negociação");
        assert_eq!(normalize_label("GANHO"), "ganho");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  board-1 ")), Some("board-1".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
