//! Fixed-length combination generator

use super::Charset;

/// Enumerates every `length`-character name over a charset, each paired with
/// every TLD: `aaaaa.com`, `aaaaa.net`, `aaaab.com`, ...
#[derive(Debug, Clone)]
pub struct ComboGenerator {
    charset: Charset,
    length: usize,
    tlds: Vec<String>,
    current_index: u64,
    total_names: u64,
}

impl ComboGenerator {
    /// Create a new generator for names of given length.
    ///
    /// A length of zero yields nothing.
    pub fn new(length: usize, charset: Charset, tlds: Vec<String>) -> Self {
        let total_names = if length == 0 {
            0
        } else {
            charset.total_combinations(length)
        };
        Self {
            charset,
            length,
            tlds,
            current_index: 0,
            total_names,
        }
    }

    /// Get total number of candidates (names × TLDs)
    pub fn total(&self) -> u64 {
        self.total_names.saturating_mul(self.tlds.len() as u64)
    }

    /// Get current progress index
    pub fn current_index(&self) -> u64 {
        self.current_index
    }

    /// Generate name at specific index
    pub fn name_at(&self, index: u64) -> Option<String> {
        if index >= self.total_names {
            return None;
        }

        let chars = self.charset.chars();
        let base = chars.len() as u64;
        let mut result = vec![' '; self.length];
        let mut n = index;

        for i in (0..self.length).rev() {
            result[i] = chars[(n % base) as usize];
            n /= base;
        }

        Some(result.into_iter().collect())
    }

    /// Generate candidate domain at specific index
    pub fn domain_at(&self, index: u64) -> Option<String> {
        let tld_count = self.tlds.len() as u64;
        if tld_count == 0 {
            return None;
        }
        let name = self.name_at(index / tld_count)?;
        let tld = &self.tlds[(index % tld_count) as usize];
        Some(format!("{}.{}", name, tld))
    }

    /// Check if generator is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.total()
    }

    /// Remaining count
    pub fn remaining(&self) -> u64 {
        self.total().saturating_sub(self.current_index)
    }
}

impl Iterator for ComboGenerator {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let domain = self.domain_at(self.current_index)?;
        self.current_index += 1;
        Some(domain)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, usize::try_from(self.remaining()).ok())
    }
}
