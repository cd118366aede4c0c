//! Two-phase candidate sequence

use super::{ComboGenerator, DictionaryGenerator};

/// Which generation phase a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Dictionary,
    Combination,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Dictionary => write!(f, "dictionary"),
            Phase::Combination => write!(f, "combination"),
        }
    }
}

/// Dictionary candidates followed by combination candidates.
///
/// Deterministic: the same inputs always give the same sequence.
#[derive(Debug, Clone)]
pub struct Candidates {
    dictionary: Option<DictionaryGenerator>,
    combo: Option<ComboGenerator>,
    total: u64,
    phase: Option<Phase>,
}

impl Candidates {
    pub fn new(dictionary: Option<DictionaryGenerator>, combo: Option<ComboGenerator>) -> Self {
        let total = dictionary
            .as_ref()
            .map_or(0, DictionaryGenerator::total)
            .saturating_add(combo.as_ref().map_or(0, ComboGenerator::total));
        Self {
            dictionary,
            combo,
            total,
            phase: None,
        }
    }

    /// Exact number of candidates across both phases
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Phase of the most recently yielded candidate
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        if self.phase != Some(phase) {
            tracing::info!(phase = %phase, "Starting candidate phase");
            self.phase = Some(phase);
        }
    }
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(domain) = self.dictionary.as_mut().and_then(Iterator::next) {
            self.enter(Phase::Dictionary);
            return Some(domain);
        }
        self.dictionary = None;

        let domain = self.combo.as_mut().and_then(Iterator::next)?;
        self.enter(Phase::Combination);
        Some(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::Charset;

    fn com() -> Vec<String> {
        vec!["com".to_string()]
    }

    #[test]
    fn test_dictionary_only() {
        let dict = DictionaryGenerator::from_words(["abc"], com());
        let candidates = Candidates::new(Some(dict), None);
        assert_eq!(candidates.total(), 1);
        assert_eq!(candidates.collect::<Vec<_>>(), vec!["abc.com"]);
    }

    #[test]
    fn test_dictionary_then_combos() {
        let dict = DictionaryGenerator::from_words(["zebra", "apple"], com());
        let combo = ComboGenerator::new(1, Charset::Letters, com());
        let mut candidates = Candidates::new(Some(dict), Some(combo));
        assert_eq!(candidates.total(), 2 + 26);

        assert_eq!(candidates.next().as_deref(), Some("zebra.com"));
        assert_eq!(candidates.phase(), Some(Phase::Dictionary));
        assert_eq!(candidates.next().as_deref(), Some("apple.com"));
        assert_eq!(candidates.next().as_deref(), Some("a.com"));
        assert_eq!(candidates.phase(), Some(Phase::Combination));
        assert_eq!(candidates.count(), 25);
    }

    #[test]
    fn test_counts_match_total() {
        let tlds = vec!["com".to_string(), "io".to_string()];
        let dict = DictionaryGenerator::from_words(["one", "two", "six"], tlds.clone());
        let combo = ComboGenerator::new(2, Charset::Alphanumeric, tlds);
        let candidates = Candidates::new(Some(dict), Some(combo));
        let expected = 3 * 2 + 36 * 36 * 2;
        assert_eq!(candidates.total(), expected);
        assert_eq!(candidates.count() as u64, expected);
    }

    #[test]
    fn test_deterministic() {
        let build = || {
            Candidates::new(
                Some(DictionaryGenerator::from_words(["abc", "def"], com())),
                Some(ComboGenerator::new(2, Charset::Letters, com())),
            )
        };
        assert!(build().eq(build()));
    }
}
