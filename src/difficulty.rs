use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::RoundError;

const EASY_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
const MEDIUM_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const HARD_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{};:'\",.<>/?`~";

/// Selects the character alphabet and how strictly input is compared
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Ordered, duplicate-free alphabet for this difficulty
    pub fn alphabet(self) -> &'static str {
        match self {
            Difficulty::Easy => EASY_ALPHABET,
            Difficulty::Medium => MEDIUM_ALPHABET,
            Difficulty::Hard => HARD_ALPHABET,
        }
    }

    /// Menu index found in older config files (0 = Easy, 1 = Medium, 2 = Hard)
    pub fn from_index(index: i64) -> Result<Self, RoundError> {
        match index {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            other => Err(RoundError::Configuration(other.to_string())),
        }
    }

    /// Parse a persisted value, logging and falling back to Easy when unrecognized
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|err: RoundError| {
            log::warn!("{err}; falling back to {}", Difficulty::Easy);
            Difficulty::Easy
        })
    }
}

impl FromStr for Difficulty {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(RoundError::Configuration(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn alphabet_sizes() {
        assert_eq!(Difficulty::Easy.alphabet().chars().count(), 26);
        assert_eq!(Difficulty::Medium.alphabet().chars().count(), 62);
        assert_eq!(Difficulty::Hard.alphabet().chars().count(), 94);
    }

    #[test]
    fn alphabets_have_no_duplicates() {
        for difficulty in Difficulty::ALL {
            let chars = difficulty.alphabet().chars().collect::<Vec<_>>();
            assert_eq!(chars.iter().unique().count(), chars.len(), "{difficulty}");
        }
    }

    #[test]
    fn alphabets_are_strict_supersets() {
        for (smaller, larger) in Difficulty::ALL.iter().tuple_windows() {
            let larger_alphabet = larger.alphabet();
            assert!(smaller.alphabet().chars().all(|c| larger_alphabet.contains(c)));
            assert!(larger_alphabet.len() > smaller.alphabet().len());
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
    }

    #[test]
    fn unknown_values_are_configuration_errors() {
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(RoundError::Configuration("expert".into()))
        );
        assert!(Difficulty::from_index(7).is_err());
        assert_eq!(Difficulty::parse_or_default("expert"), Difficulty::Easy);
    }

    #[test]
    fn from_index_matches_menu_order() {
        assert_eq!(Difficulty::from_index(0), Ok(Difficulty::Easy));
        assert_eq!(Difficulty::from_index(1), Ok(Difficulty::Medium));
        assert_eq!(Difficulty::from_index(2), Ok(Difficulty::Hard));
    }

    #[test]
    fn display_is_variant_name() {
        assert_eq!(Difficulty::Medium.to_string(), "Medium");
    }
}
