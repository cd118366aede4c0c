//! Static HTML viewer for the found-domain data file

use std::path::{Component, Path, PathBuf};

use scraper::{Html, Selector};

use crate::domain::normalize_domain;
use crate::error::{ProbeError, Result};

const TEMPLATE: &str = include_str!("viewer.html");
const DATA_PLACEHOLDER: &str = "__DATA_FILE__";

/// How the page should refer to the data file.
///
/// Browsers resolve the reference against the page's own directory, so the
/// data path is made relative to `html_path`'s parent. Same directory gives
/// just the file name, so the pair can be moved together.
pub fn data_reference(html_path: &Path, data_path: &Path) -> String {
    let dir_of = |html: &Path| lexical(html.parent().unwrap_or(Path::new("")));

    // a page above the working directory can only be related through cwd
    let mixed = html_path.is_absolute() != data_path.is_absolute();
    let climbs = dir_of(html_path).first().is_some_and(|first| first == "..");
    let (page_dir, data) = if mixed || climbs {
        (dir_of(&absolute(html_path)), lexical(&absolute(data_path)))
    } else {
        (dir_of(html_path), lexical(data_path))
    };

    let shared = page_dir
        .iter()
        .zip(data.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in shared..page_dir.len() {
        parts.push("..".to_string());
    }
    parts.extend(data[shared..].iter().cloned());
    parts.join("/")
}

fn absolute(path: &Path) -> PathBuf {
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Path components with `.` dropped and `..` folded where possible
fn lexical(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let foldable = matches!(parts.last(), Some(last) if last != ".." && !last.is_empty());
                if foldable {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::RootDir => parts.push(String::new()),
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().to_string()),
            Component::Normal(name) => parts.push(name.to_string_lossy().to_string()),
        }
    }
    parts
}

/// Render the page for a data file reference
pub fn render(data_ref: &str) -> Result<String> {
    let literal = serde_json::to_string(data_ref)?;
    Ok(TEMPLATE.replace(DATA_PLACEHOLDER, &literal))
}

/// Write the viewer page
pub fn write(html_path: &Path, data_path: &Path) -> Result<()> {
    let page = render(&data_reference(html_path, data_path))?;
    std::fs::write(html_path, page).map_err(|e| ProbeError::io_at(e, html_path))
}

/// Whether an existing page is one we generated
pub fn is_generated(html: &str) -> bool {
    html.contains("const DATA_FILE =")
}

/// Domains linked from a static page written by older versions of the tool,
/// in document order without repeats.
pub fn legacy_links(html: &str) -> Result<Vec<String>> {
    let selector = Selector::parse("a[href]")
        .map_err(|e| ProbeError::internal(format!("Invalid selector: {}", e)))?;
    let document = Html::parse_document(html);

    let mut domains: Vec<String> = Vec::new();
    for link in document.select(&selector) {
        let Some(domain) = link.value().attr("href").and_then(normalize_domain) else {
            continue;
        };
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    Ok(domains)
}
