//! Two-step resolution of loose identifiers.
//!
//! Both matchers are deterministic: callers pass candidates already sorted
//! (stages by `order`, contacts by `created_at`) and the first hit wins.
//!
//! | Matcher | Step 1 | Step 2 |
//! |---------|--------|--------|
//! | [`match_label_then_id`] | case-insensitive label equality | exact id equality |
//! | [`match_name_exact_then_partial`] | case-insensitive name equality | case-insensitive substring |

use crate::core::string::normalize_label;

/// How a candidate was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    Label,
    Id,
    ExactName,
    PartialName,
}

/// Find the first candidate whose label equals `needle` (case-insensitive),
/// falling back to the first whose id equals it.
pub fn match_label_then_id<'a, T>(
    candidates: &'a [T],
    needle: &str,
    label: impl Fn(&T) -> &str,
    id: impl Fn(&T) -> &str,
) -> Option<(&'a T, MatchedBy)> {
    let wanted = normalize_label(needle);
    if wanted.is_empty() {
        return None;
    }
    if let Some(found) = candidates.iter().find(|c| normalize_label(label(c)) == wanted) {
        return Some((found, MatchedBy::Label));
    }
    let raw = needle.trim();
    candidates
        .iter()
        .find(|c| id(c) == raw)
        .map(|found| (found, MatchedBy::Id))
}

/// Find the first candidate whose name equals `needle` (case-insensitive),
/// falling back to the first whose name contains it.
pub fn match_name_exact_then_partial<'a, T>(
    candidates: &'a [T],
    needle: &str,
    name: impl Fn(&T) -> &str,
) -> Option<(&'a T, MatchedBy)> {
    let wanted = normalize_label(needle);
    if wanted.is_empty() {
        return None;
    }
    if let Some(found) = candidates.iter().find(|c| normalize_label(name(c)) == wanted) {
        return Some((found, MatchedBy::ExactName));
    }
    candidates
        .iter()
        .find(|c| normalize_label(name(c)).contains(&wanted))
        .map(|found| (found, MatchedBy::PartialName))
}
