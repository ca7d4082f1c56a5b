use thiserror::Error;

use crate::round::Phase;

/// Failures raised by the round core.
///
/// None of these are meant for the player: `Configuration` is resolved by
/// falling back to Easy, the other two indicate a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("unrecognized difficulty: {0}")]
    Configuration(String),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: Phase, to: Phase },
}
