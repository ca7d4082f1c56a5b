use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// Visual cue attached to a newly active character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    None,
    Uppercase,
    Digit,
}

/// Whether `input` counts as typing `target` under the given difficulty.
///
/// Easy folds case for letters only; everything else is an exact compare.
pub fn matches(difficulty: Difficulty, target: char, input: char) -> bool {
    match difficulty {
        Difficulty::Easy if target.is_alphabetic() => {
            target.to_lowercase().eq(input.to_lowercase())
        }
        _ => target == input,
    }
}

pub fn hint_kind(difficulty: Difficulty, c: char) -> HintKind {
    match difficulty {
        Difficulty::Easy => HintKind::None,
        Difficulty::Medium | Difficulty::Hard => {
            if c.is_alphabetic() && c.is_uppercase() {
                HintKind::Uppercase
            } else if c.is_ascii_digit() {
                HintKind::Digit
            } else {
                HintKind::None
            }
        }
    }
}
