//! Phone number normalization to E.164.
//!
//! Loose input (spaces, parentheses, hyphens, national format) is normalized
//! to `+<country><number>`. National numbers without a prefix get the
//! configured default country code (Brazil, `55`, unless configured).
//! Input that cannot be normalized is returned trimmed so no data is lost.
//!
//! The check is structural only: a national number is accepted when it has
//! 10 or 11 digits after leading zeros are dropped, and the result must fit
//! E.164 (at most 15 digits, no leading zero). There is no per-country
//! numbering-plan validation, so an unassigned number such as
//! `(19) 0000-0000` still normalizes to `+551900000000`. Callers that take
//! tool input reject anything that does not come out as E.164.

/// Returns true for `+` followed by 2..=15 digits with a non-zero lead digit.
pub fn is_e164(input: &str) -> bool {
    let value = input.trim();
    let Some(digits) = value.strip_prefix('+') else {
        return false;
    };
    (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

/// Normalize a phone number to E.164, or return the trimmed input when it
/// does not look like a phone number at all. Empty input yields `""`.
pub fn normalize_phone_e164(input: &str, default_country_code: &str) -> String {
    let raw = input.trim();
    if raw.is_empty() {
        return String::new();
    }

    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();
    if is_e164(&compact) {
        return compact;
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let candidate = if compact.starts_with('+') {
        format!("+{}", digits)
    } else if let Some(international) = digits.strip_prefix("00") {
        format!("+{}", international)
    } else {
        let national = digits.trim_start_matches('0');
        if (10..=11).contains(&national.len()) {
            format!("+{}{}", default_country_code, national)
        } else if national.starts_with(default_country_code) && national.len() >= 12 {
            format!("+{}", national)
        } else {
            String::new()
        }
    };

    if is_e164(&candidate) {
        candidate
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_e164() {
        assert!(is_e164("+5511999990000"));
        assert!(!is_e164("5511999990000"));
        assert!(!is_e164("+0511999990000"));
        assert!(!is_e164("+55 11 99999"));
        assert!(!is_e164("+1234567890123456"));
    }

    #[test]
    fn test_already_e164_with_separators() {
        assert_eq!(
            normalize_phone_e164("+55 (11) 99999-0000", "55"),
            "+5511999990000"
        );
    }

    #[test]
    fn test_national_number_gets_default_country() {
        assert_eq!(normalize_phone_e164("11999990000", "55"), "+5511999990000");
        assert_eq!(normalize_phone_e164("(11) 3333-4444", "55"), "+551133334444");
        assert_eq!(normalize_phone_e164("011 99999 0000", "55"), "+5511999990000");
    }

    #[test]
    fn test_international_prefix() {
        assert_eq!(normalize_phone_e164("0044 20 7946 0958", "55"), "+442079460958");
        assert_eq!(normalize_phone_e164("5511999990000", "55"), "+5511999990000");
    }

    #[test]
    fn test_national_length_outside_plan_is_not_prefixed() {
        assert_eq!(normalize_phone_e164("99999-0000", "55"), "99999-0000");
        assert_eq!(normalize_phone_e164("119999900001", "55"), "119999900001");
        assert_eq!(normalize_phone_e164("(19) 0000-0000", "55"), "+551900000000");
    }

    #[test]
    fn test_unparseable_input_is_kept() {
        assert_eq!(normalize_phone_e164("  ramal 12 ", "55"), "ramal 12");
        assert_eq!(normalize_phone_e164("   ", "55"), "");
    }
}
