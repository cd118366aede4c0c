//! Result store: found domains for the viewer, empty domains to skip next time

pub mod viewer;

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::normalize_domain;
use crate::error::{ProbeError, Result};
use crate::types::StoreConfig;

/// What to do with a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Not seen before, go ahead
    Probe,
    /// Recorded empty in this or an earlier run
    SkipEmpty,
    /// Already in the found list
    SkipFound,
    /// The same domain is being probed right now
    SkipDuplicate,
}

impl Admission {
    pub fn should_probe(&self) -> bool {
        *self == Admission::Probe
    }
}

struct StoreInner {
    empty: HashSet<String>,
    found: Vec<String>,
    found_set: HashSet<String>,
    in_flight: HashSet<String>,
    empty_file: File,
}

/// Shared handle over the found list and the empty set.
///
/// Cloning is cheap; every write takes the same lock, so concurrent workers
/// never interleave file writes.
#[derive(Clone)]
pub struct ResultStore {
    inner: Arc<Mutex<StoreInner>>,
    config: Arc<StoreConfig>,
}

impl ResultStore {
    /// Load previous results and prepare the output files.
    ///
    /// Fails if any of the files cannot be read or created.
    pub fn open(config: StoreConfig) -> Result<Self> {
        for path in [&config.html_path, &config.data_path, &config.empty_path] {
            ensure_parent(path)?;
        }

        let mut empty = load_empty(&config.empty_path)?;
        let (found, imported) = load_found(&config)?;
        let found_set: HashSet<String> = found.iter().cloned().collect();

        let overlap = empty.iter().filter(|d| found_set.contains(*d)).count();
        if overlap > 0 {
            tracing::warn!(overlap, "Domains listed as both empty and found, keeping them as found");
            empty.retain(|d| !found_set.contains(d));
        }

        let empty_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.empty_path)
            .map_err(|e| ProbeError::io_at(e, &config.empty_path))?;

        if imported || !config.data_path.exists() {
            write_data(&config.data_path, &found)?;
        }
        viewer::write(&config.html_path, &config.data_path)?;

        tracing::info!(
            empty = empty.len(),
            found = found.len(),
            html = %config.html_path.display(),
            "Result store ready"
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(StoreInner {
                empty,
                found,
                found_set,
                in_flight: HashSet::new(),
                empty_file,
            })),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_known_empty(&self, domain: &str) -> bool {
        self.inner.lock().empty.contains(domain)
    }

    pub fn is_known_found(&self, domain: &str) -> bool {
        self.inner.lock().found_set.contains(domain)
    }

    /// Decide whether a candidate should be probed.
    ///
    /// `Probe` marks the domain in flight until it is recorded or released.
    pub fn admit(&self, domain: &str) -> Admission {
        let mut inner = self.inner.lock();
        if inner.empty.contains(domain) {
            Admission::SkipEmpty
        } else if inner.found_set.contains(domain) {
            Admission::SkipFound
        } else if !inner.in_flight.insert(domain.to_string()) {
            Admission::SkipDuplicate
        } else {
            Admission::Probe
        }
    }

    /// Forget an admitted domain without recording an outcome
    pub fn release(&self, domain: &str) {
        self.inner.lock().in_flight.remove(domain);
    }

    /// Append a domain to the empty file.
    ///
    /// Returns `false` when it was already known either way.
    pub fn record_empty(&self, domain: &str) -> Result<bool> {
        let mut inner = self.inner.lock();
        inner.in_flight.remove(domain);
        if inner.empty.contains(domain) || inner.found_set.contains(domain) {
            return Ok(false);
        }

        let path = &self.config.empty_path;
        writeln!(inner.empty_file, "{}", domain)
            .and_then(|_| inner.empty_file.flush())
            .map_err(|e| ProbeError::io_at(e, path))?;
        inner.empty.insert(domain.to_string());
        Ok(true)
    }

    /// Append a domain to the found list and rewrite the data file.
    ///
    /// Returns `false` when it was already known either way.
    pub fn record_found(&self, domain: &str) -> Result<bool> {
        let mut inner = self.inner.lock();
        inner.in_flight.remove(domain);
        if inner.found_set.contains(domain) {
            return Ok(false);
        }
        if inner.empty.contains(domain) {
            tracing::warn!(domain = %domain, "Ignoring found result for a domain already recorded empty");
            return Ok(false);
        }

        inner.found.push(domain.to_string());
        if let Err(e) = write_data(&self.config.data_path, &inner.found) {
            inner.found.pop();
            return Err(e);
        }
        inner.found_set.insert(domain.to_string());
        Ok(true)
    }

    /// Found domains in insertion order
    pub fn found(&self) -> Vec<String> {
        self.inner.lock().found.clone()
    }

    pub fn found_count(&self) -> usize {
        self.inner.lock().found.len()
    }

    pub fn empty_count(&self) -> usize {
        self.inner.lock().empty.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.inner.lock().in_flight.len()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| ProbeError::io_at(e, parent))
        }
        _ => Ok(()),
    }
}

fn load_empty(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| ProbeError::io_at(e, path))?;
    Ok(content.lines().filter_map(normalize_domain).collect())
}

/// Found domains from the data file, or imported from a legacy page.
///
/// The flag is set when the list came from a legacy import.
fn load_found(config: &StoreConfig) -> Result<(Vec<String>, bool)> {
    let raw: Vec<String> = if config.data_path.exists() {
        let content = std::fs::read_to_string(&config.data_path)
            .map_err(|e| ProbeError::io_at(e, &config.data_path))?;
        if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content).map_err(|e| {
                ProbeError::parse(
                    format!("{} is not a JSON array of domains: {}", config.data_path.display(), e),
                    None,
                )
            })?
        }
    } else if config.html_path.exists() {
        let html = std::fs::read_to_string(&config.html_path)
            .map_err(|e| ProbeError::io_at(e, &config.html_path))?;
        if viewer::is_generated(&html) {
            Vec::new()
        } else {
            let links = viewer::legacy_links(&html)?;
            tracing::info!(count = links.len(), "Imported domains from legacy HTML page");
            return Ok((links, true));
        }
    } else {
        Vec::new()
    };

    let mut seen = HashSet::new();
    let found = raw
        .iter()
        .filter_map(|d| normalize_domain(d))
        .filter(|d| seen.insert(d.clone()))
        .collect();
    Ok((found, false))
}

/// Replace the data file in one step so the viewer never reads half a file
fn write_data(path: &Path, found: &[String]) -> Result<()> {
    let content = serde_json::to_string_pretty(found)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, content).map_err(|e| ProbeError::io_at(e, &tmp))?;
    std::fs::rename(&tmp, path).map_err(|e| ProbeError::io_at(e, path))
}
