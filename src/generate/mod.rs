//! Candidate generation
//!
//! Phase 1: dictionary words combined with every TLD
//! Phase 2: fixed-length character combinations combined with every TLD

mod candidates;
mod combo;
mod dictionary;

pub use candidates::{Candidates, Phase};
pub use combo::ComboGenerator;
pub use dictionary::DictionaryGenerator;

/// Character set for combination generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Charset {
    /// Only lowercase letters (a-z)
    Letters,
    /// Letters and digits (a-z, 0-9)
    #[default]
    Alphanumeric,
}

impl Charset {
    pub fn chars(&self) -> &'static [char] {
        match self {
            Charset::Letters => &[
                'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
                'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
            ],
            Charset::Alphanumeric => &[
                'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
                'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
                '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
            ],
        }
    }

    /// Number of names of the given length, saturating at `u64::MAX`
    pub fn total_combinations(&self, length: usize) -> u64 {
        let base = self.chars().len() as u64;
        u32::try_from(length)
            .ok()
            .and_then(|exp| base.checked_pow(exp))
            .unwrap_or(u64::MAX)
    }
}
