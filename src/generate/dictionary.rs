//! Dictionary word generator

use std::path::Path;

use crate::domain::normalize_word;
use crate::error::{ProbeError, Result};

/// Pairs each dictionary word with every TLD: `apple.com`, `apple.net`, `berry.com`, ...
#[derive(Debug, Clone)]
pub struct DictionaryGenerator {
    words: Vec<String>,
    tlds: Vec<String>,
    current_index: u64,
}

impl DictionaryGenerator {
    /// Build from already split words. Invalid words are dropped.
    pub fn from_words<I, S>(words: I, tlds: Vec<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .filter_map(|w| normalize_word(w.as_ref()))
            .collect();
        Self {
            words,
            tlds,
            current_index: 0,
        }
    }

    /// Load a word list, one word per line.
    ///
    /// The file must be readable. Lines that are blank, comments, not UTF-8 or
    /// not a valid DNS label are skipped.
    pub fn from_file(path: &Path, tlds: Vec<String>) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ProbeError::io_at(e, path))?;

        let mut skipped = 0usize;
        let lines = bytes.split(|b| *b == b'\n').filter_map(|line| {
            match std::str::from_utf8(line) {
                Ok(text) => Some(text),
                Err(_) => {
                    skipped += 1;
                    None
                }
            }
        });
        let gen = Self::from_words(lines.collect::<Vec<_>>(), tlds);

        if skipped > 0 {
            tracing::debug!(path = %path.display(), skipped, "Skipped non UTF-8 dictionary lines");
        }
        tracing::info!(path = %path.display(), words = gen.words.len(), "Loaded dictionary");

        Ok(gen)
    }

    /// Words that survived validation
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Get total number of candidates (words × TLDs)
    pub fn total(&self) -> u64 {
        (self.words.len() as u64).saturating_mul(self.tlds.len() as u64)
    }

    /// Generate candidate domain at specific index
    pub fn domain_at(&self, index: u64) -> Option<String> {
        let tld_count = self.tlds.len() as u64;
        if tld_count == 0 {
            return None;
        }
        let word = self.words.get(usize::try_from(index / tld_count).ok()?)?;
        let tld = &self.tlds[(index % tld_count) as usize];
        Some(format!("{}.{}", word, tld))
    }

    pub fn remaining(&self) -> u64 {
        self.total().saturating_sub(self.current_index)
    }
}

impl Iterator for DictionaryGenerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let domain = self.domain_at(self.current_index)?;
        self.current_index += 1;
        Some(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tlds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_word_single_tld() {
        let gen = DictionaryGenerator::from_words(["abc"], tlds(&["com"]));
        let all: Vec<String> = gen.collect();
        assert_eq!(all, vec!["abc.com"]);
    }

    #[test]
    fn test_words_times_tlds() {
        let gen = DictionaryGenerator::from_words(["apple", "berry", "cloud"], tlds(&["com", "net"]));
        assert_eq!(gen.total(), 6);
        let all: Vec<String> = gen.collect();
        assert_eq!(
            all,
            vec!["apple.com", "apple.net", "berry.com", "berry.net", "cloud.com", "cloud.net"]
        );
    }

    #[test]
    fn test_from_file_skips_malformed_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Apple\r\n\n# comment\nbad word\n").unwrap();
        file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
        file.write_all(format!("{}\nberry\n", "x".repeat(64)).as_bytes()).unwrap();

        let gen = DictionaryGenerator::from_file(file.path(), tlds(&["com"])).unwrap();
        assert_eq!(gen.words(), &["apple".to_string(), "berry".to_string()]);
        assert_eq!(gen.total(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DictionaryGenerator::from_file(&dir.path().join("missing.txt"), tlds(&["com"]))
            .unwrap_err();
        assert!(matches!(err, ProbeError::Io { path: Some(_), .. }));
    }
}
