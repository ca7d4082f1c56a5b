use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{difficulty::Difficulty, error::RoundError};

/// Draws characters uniformly at random from the configured alphabet
#[derive(Debug, Clone)]
pub struct CharacterStream {
    alphabet: Vec<char>,
    rng: StdRng,
}

impl CharacterStream {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic stream, used by tests and `--seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            alphabet: Vec::new(),
            rng,
        }
    }

    pub fn configure(&mut self, difficulty: Difficulty) {
        self.alphabet = difficulty.alphabet().chars().collect();
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn next(&mut self) -> Result<char, RoundError> {
        if self.alphabet.is_empty() {
            return Err(RoundError::InvalidState(
                "character stream used before configure",
            ));
        }
        let idx = self.rng.gen_range(0..self.alphabet.len());
        Ok(self.alphabet[idx])
    }
}

impl Default for CharacterStream {
    fn default() -> Self {
        Self::new()
    }
}
