//! Domain name validation utilities

use crate::error::Result;
use crate::validation_error;
use regex::Regex;
use std::sync::OnceLock;

/// Longest DNS label allowed
pub const MAX_LABEL_LEN: usize = 63;

/// Longest full domain allowed
pub const MAX_DOMAIN_LEN: usize = 253;

fn label_regex() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").expect("label pattern is valid")
    })
}

/// Check a single DNS label (a dictionary word or a TLD)
pub fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(validation_error!("Label cannot be empty"));
    }

    if label.len() > MAX_LABEL_LEN {
        return Err(validation_error!(
            "Label '{}' too long (max {} characters)",
            label, MAX_LABEL_LEN
        ));
    }

    if !label_regex().is_match(label) {
        return Err(validation_error!(
            "Label '{}' may only contain a-z, 0-9 and inner hyphens",
            label
        ));
    }

    Ok(())
}

/// Turn a dictionary line into a label, or `None` when the line should be skipped
pub fn normalize_word(line: &str) -> Option<String> {
    let word = line.trim().to_lowercase();
    if word.is_empty() || word.starts_with('#') {
        return None;
    }
    match validate_label(&word) {
        Ok(()) => Some(word),
        Err(e) => {
            tracing::debug!(word = %word, error = %e, "Skipping dictionary line");
            None
        }
    }
}

/// Reduce a stored entry to a bare domain.
///
/// Older files kept full URLs (`http://abc.com`, `https://abc.com/`), so the
/// scheme, path and surrounding whitespace are dropped.
pub fn normalize_domain(entry: &str) -> Option<String> {
    let mut domain = entry.trim();
    for prefix in ["http://", "https://"] {
        if let Some(rest) = domain.strip_prefix(prefix) {
            domain = rest;
            break;
        }
    }
    let domain = domain.split('/').next().unwrap_or_default().trim();
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return None;
    }
    Some(domain.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_labels() {
        assert!(validate_label("abc").is_ok());
        assert!(validate_label("a1-b2").is_ok());
        assert!(validate_label("x").is_ok());
    }

    #[test]
    fn test_invalid_labels() {
        assert!(validate_label("").is_err());
        assert!(validate_label("-abc").is_err());
        assert!(validate_label("abc-").is_err());
        assert!(validate_label("ab c").is_err());
        assert!(validate_label("ab.c").is_err());
        assert!(validate_label(&"a".repeat(64)).is_err());
        assert!(validate_label(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  Hello \r"), Some("hello".to_string()));
        assert_eq!(normalize_word(""), None);
        assert_eq!(normalize_word("# comment"), None);
        assert_eq!(normalize_word("don't"), None);
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("abc.com"), Some("abc.com".to_string()));
        assert_eq!(normalize_domain("http://abc.com"), Some("abc.com".to_string()));
        assert_eq!(normalize_domain("https://ABC.com/"), Some("abc.com".to_string()));
        assert_eq!(normalize_domain("   "), None);
        assert_eq!(normalize_domain("http://"), None);
    }
}
