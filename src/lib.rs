// Library surface for headless/integration tests and reuse.
// The binary in main.rs only wires the terminal to `session::Session`.
pub mod app_dirs;
pub mod cadence;
pub mod character_stream;
pub mod comparison;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod feedback;
pub mod lead_in;
pub mod round;
pub mod runtime;
pub mod schedule;
pub mod scores;
pub mod session;
pub mod title_gate;
pub mod ui;

pub use difficulty::Difficulty;
pub use error::RoundError;
pub use round::{Phase, RoundEvent, RoundInput, RoundState};
