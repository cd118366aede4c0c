//! Domain name helpers: validation and TLD lists

pub mod validator;

pub use validator::{normalize_domain, normalize_word, validate_label};

use crate::config_error;
use crate::error::Result;

/// Common TLD lists
pub const POPULAR_TLDS: &[&str] = &[
    "com", "org", "net", "io", "ai", "co", "me", "app", "dev", "tech", "xyz"
];

pub const STARTUP_TLDS: &[&str] = &[
    "com", "org", "io", "ai", "tech", "app", "dev", "xyz"
];

pub const ENTERPRISE_TLDS: &[&str] = &[
    "com", "org", "net", "biz", "info", "us"
];

pub const COUNTRY_TLDS: &[&str] = &[
    "us", "uk", "de", "fr", "ca", "au", "jp", "br", "in"
];

/// Get TLD list by name
pub fn get_tld_list(name: &str) -> Option<Vec<String>> {
    match name.to_lowercase().as_str() {
        "popular" => Some(POPULAR_TLDS.iter().map(|s| s.to_string()).collect()),
        "startup" => Some(STARTUP_TLDS.iter().map(|s| s.to_string()).collect()),
        "enterprise" => Some(ENTERPRISE_TLDS.iter().map(|s| s.to_string()).collect()),
        "country" => Some(COUNTRY_TLDS.iter().map(|s| s.to_string()).collect()),
        _ => None,
    }
}

/// Get all available TLD list names
pub fn get_tld_list_names() -> Vec<&'static str> {
    vec!["popular", "startup", "enterprise", "country"]
}

/// Parse a comma separated TLD list.
///
/// Entries may be preset names (`popular`), plain TLDs (`com`) or dotted
/// (`.net`). Order is kept and repeats are dropped.
pub fn parse_tlds(input: &str) -> Result<Vec<String>> {
    let mut tlds: Vec<String> = Vec::new();

    for raw in input.split(',') {
        let entry = raw.trim().trim_start_matches('.').to_lowercase();
        if entry.is_empty() {
            continue;
        }

        let expanded = match get_tld_list(&entry) {
            Some(list) => list,
            None => {
                // multi-label suffixes like co.uk are checked label by label
                for label in entry.split('.') {
                    validate_label(label)
                        .map_err(|e| config_error!("Invalid TLD '{}': {}", entry, e))?;
                }
                vec![entry]
            }
        };

        for tld in expanded {
            if !tlds.contains(&tld) {
                tlds.push(tld);
            }
        }
    }

    if tlds.is_empty() {
        return Err(config_error!(
            "No TLDs given. Use a comma separated list or one of: {}",
            get_tld_list_names().join(", ")
        ));
    }

    Ok(tlds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;

    #[test]
    fn test_parse_plain_list() {
        let tlds = parse_tlds(" com, .NET,,org ").unwrap();
        assert_eq!(tlds, vec!["com", "net", "org"]);

        let tlds = parse_tlds("com,co.uk,.Com.AU").unwrap();
        assert_eq!(tlds, vec!["com", "co.uk", "com.au"]);
    }

    #[test]
    fn test_parse_dedupes_and_expands_presets() {
        let tlds = parse_tlds("com,enterprise").unwrap();
        assert_eq!(tlds, vec!["com", "org", "net", "biz", "info", "us"]);
    }

    #[test]
    fn test_parse_rejects_empty_and_invalid() {
        assert!(matches!(parse_tlds(" , "), Err(ProbeError::Config { .. })));
        assert!(matches!(parse_tlds("co m"), Err(ProbeError::Config { .. })));
        assert!(matches!(parse_tlds("co..uk"), Err(ProbeError::Config { .. })));
        assert!(matches!(parse_tlds("co.uk."), Err(ProbeError::Config { .. })));
    }

    #[test]
    fn test_tld_list_lookup() {
        assert!(get_tld_list("POPULAR").is_some());
        assert!(get_tld_list("nope").is_none());
        assert_eq!(get_tld_list_names().len(), 4);
    }
}
