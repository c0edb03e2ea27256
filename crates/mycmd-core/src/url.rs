//! URL detection, normalization, and the duplicate policy.
//!
//! These are heuristics, not a strict URL grammar: a trailing dot-extension
//! is enough to classify a string as a link, so `file.txt` counts. The
//! behavior is intentional and relied on by the duplicate policy.

use regex::Regex;
use std::sync::OnceLock;

static PROTOCOL_PATTERN: OnceLock<Regex> = OnceLock::new();
static DOMAIN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn protocol_pattern() -> &'static Regex {
    PROTOCOL_PATTERN.get_or_init(|| Regex::new(r"(?i)^https?://").unwrap())
}

fn domain_pattern() -> &'static Regex {
    DOMAIN_PATTERN.get_or_init(|| Regex::new(r"(?i)\.[a-z]{2,}(\.[a-z]{2,})?$").unwrap())
}

/// Returns true if the string looks like a URL.
///
/// Either it carries an explicit `http://`/`https://` protocol, or it ends
/// in a 2+ letter dot-extension (optionally two chained, as in `.co.uk`).
pub fn is_url(s: &str) -> bool {
    protocol_pattern().is_match(s) || domain_pattern().is_match(s)
}

/// Prefixes `https://` unless the string already starts with a protocol.
pub fn normalize_url(s: &str) -> String {
    if protocol_pattern().is_match(s) {
        s.to_string()
    } else {
        format!("https://{s}")
    }
}

/// The duplicate policy: case-insensitive, URL-normalization-aware equality
/// against every existing entry.
///
/// A URL-classified candidate is normalized and compared against the
/// normalized form of each URL-classified entry (non-URL entries compare
/// verbatim). A plain-text candidate compares case-insensitively against
/// every entry as-is.
pub fn is_duplicate(candidate: &str, existing: &[String]) -> bool {
    if is_url(candidate) {
        let normalized = normalize_url(candidate).to_lowercase();
        existing.iter().any(|entry| {
            let other = if is_url(entry) {
                normalize_url(entry)
            } else {
                entry.clone()
            };
            normalized == other.to_lowercase()
        })
    } else {
        let lowered = candidate.to_lowercase();
        existing.iter().any(|entry| lowered == entry.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url_with_protocol() {
        assert!(is_url("https://github.com"));
        assert!(is_url("http://example.org/path"));
        assert!(is_url("HTTPS://EXAMPLE.COM"));
    }

    #[test]
    fn test_is_url_with_domain_extension() {
        assert!(is_url("github.com"));
        assert!(is_url("news.bbc.co.uk"));
        assert!(is_url("file.txt")); // known false positive, by contract
    }

    #[test]
    fn test_is_url_plain_text() {
        assert!(!is_url("read the borrow checker chapter"));
        assert!(!is_url("groceries"));
        assert!(!is_url("v1.2")); // digits do not match the extension pattern
    }

    #[test]
    fn test_normalize_url_adds_protocol() {
        assert_eq!(normalize_url("github.com"), "https://github.com");
    }

    #[test]
    fn test_normalize_url_keeps_existing_protocol() {
        assert_eq!(normalize_url("http://github.com"), "http://github.com");
        assert_eq!(normalize_url("https://github.com"), "https://github.com");
        assert_eq!(normalize_url("HTTP://github.com"), "HTTP://github.com");
    }

    #[test]
    fn test_duplicate_url_against_normalized_form() {
        let existing = vec!["https://a.com".to_string()];
        assert!(is_duplicate("a.com", &existing));
        assert!(is_duplicate("HTTPS://A.COM", &existing));
        assert!(!is_duplicate("b.com", &existing));
    }

    #[test]
    fn test_duplicate_plain_text_case_insensitive() {
        let existing = vec!["Buy milk".to_string()];
        assert!(is_duplicate("buy milk", &existing));
        assert!(!is_duplicate("buy bread", &existing));
    }

    #[test]
    fn test_plain_candidate_does_not_normalize_entries() {
        // A plain-text candidate compares verbatim, so it never matches the
        // normalized form of a stored URL.
        let existing = vec!["https://notes".to_string()];
        assert!(!is_duplicate("notes", &existing));
    }
}
