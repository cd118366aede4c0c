//! Core types and structures for domain-prober

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of probing a single candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// The site answered with meaningful content
    Found,
    /// The site failed, timed out or had nothing worth keeping
    Empty,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Found => write!(f, "found"),
            Classification::Empty => write!(f, "empty"),
        }
    }
}

/// URL scheme tried when probing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn url_for(&self, domain: &str) -> String {
        format!("{}://{}/", self, domain)
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scheme::Https => write!(f, "https"),
            Scheme::Http => write!(f, "http"),
        }
    }
}

/// Result of probing one domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub domain: String,
    pub classification: Classification,
    /// URL of the last attempt made
    pub url: Option<String>,
    pub status_code: Option<u16>,
    /// Characters of visible text in the body, when one was read
    pub text_len: Option<usize>,
    /// Why the domain was classified empty
    pub detail: Option<String>,
}

impl ProbeReport {
    pub fn found(domain: impl Into<String>, url: String, status_code: u16, text_len: usize) -> Self {
        Self {
            domain: domain.into(),
            classification: Classification::Found,
            url: Some(url),
            status_code: Some(status_code),
            text_len: Some(text_len),
            detail: None,
        }
    }

    pub fn empty(domain: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            classification: Classification::Empty,
            url: None,
            status_code: None,
            text_len: None,
            detail: Some(detail.into()),
        }
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_text_len(mut self, text_len: usize) -> Self {
        self.text_len = Some(text_len);
        self
    }

    pub fn is_found(&self) -> bool {
        self.classification == Classification::Found
    }
}

/// Phrases that mark a parked or for-sale placeholder page
pub const PARKED_PHRASES: &[&str] = &[
    "this domain is parked",
    "buy this domain",
    "domain parking",
    "domain is for sale",
];

/// Configuration for the HTTP prober
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Minimum characters of visible text for a page to count
    pub min_text_len: usize,
    /// Schemes tried in order; later ones only after a transport failure
    pub schemes: Vec<Scheme>,
    /// Lowercase phrases that turn an otherwise valid page into an empty one
    pub parked_phrases: Vec<String>,
    pub max_redirects: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            min_text_len: 1,
            schemes: vec![Scheme::Https, Scheme::Http],
            parked_phrases: PARKED_PHRASES.iter().map(|s| s.to_string()).collect(),
            max_redirects: 5,
        }
    }
}

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Probes allowed in flight at once
    pub workers: usize,
    /// Seconds between cleanup passes, 0 disables them
    pub cleanup_interval: Duration,
    /// Clear the terminal on each cleanup pass
    pub clear_terminal: bool,
    /// Draw a progress spinner
    pub show_progress: bool,
    /// Recent activity lines kept between cleanups
    pub activity_capacity: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            cleanup_interval: Duration::from_secs(60),
            clear_terminal: true,
            show_progress: true,
            activity_capacity: 1000,
        }
    }
}

/// File locations used by the result store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// HTML viewer page
    pub html_path: PathBuf,
    /// JSON array of found domains read by the viewer
    pub data_path: PathBuf,
    /// Known-empty domains, one per line
    pub empty_path: PathBuf,
}

impl StoreConfig {
    /// Build a config with the data file placed next to the HTML page
    pub fn with_html(html_path: impl Into<PathBuf>) -> Self {
        let html_path = html_path.into();
        let data_path = html_path
            .parent()
            .map(|p| p.join(DEFAULT_DATA_FILE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        Self {
            html_path,
            data_path,
            empty_path: PathBuf::from(DEFAULT_EMPTY_FILE),
        }
    }

    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn empty_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.empty_path = path.into();
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::with_html(DEFAULT_HTML_FILE)
    }
}

pub const DEFAULT_HTML_FILE: &str = "found_websites.html";
pub const DEFAULT_DATA_FILE: &str = "domains.json";
pub const DEFAULT_EMPTY_FILE: &str = "empty_domains.txt";

/// Totals for a finished (or interrupted) run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Candidates sent to the prober
    pub probed: u64,
    pub found: u64,
    pub empty: u64,
    /// Candidates skipped as already known
    pub skipped: u64,
    /// The run stopped early on a shutdown request
    pub interrupted: bool,
}

impl RunSummary {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn probes_per_second(&self) -> f64 {
        let secs = self.elapsed().num_milliseconds() as f64 / 1000.0;
        if secs <= 0.0 {
            0.0
        } else {
            self.probed as f64 / secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_scheme_url() {
        assert_eq!(Scheme::Https.url_for("abc.com"), "https://abc.com/");
        assert_eq!(Scheme::Http.url_for("127.0.0.1:8080"), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_store_config_places_data_next_to_html() {
        let config = StoreConfig::with_html("out/found.html");
        assert_eq!(config.data_path, Path::new("out").join("domains.json"));
        assert_eq!(config.empty_path, Path::new("empty_domains.txt"));

        let config = StoreConfig::with_html("found.html");
        assert_eq!(config.data_path, Path::new("domains.json"));
    }

    #[test]
    fn test_report_builders() {
        let report = ProbeReport::empty("abc.com", "HTTP 404").with_status(404);
        assert!(!report.is_found());
        assert_eq!(report.status_code, Some(404));

        let report = ProbeReport::found("abc.com", "https://abc.com/".into(), 200, 5);
        assert!(report.is_found());
        assert_eq!(report.classification.to_string(), "found");
    }
}
