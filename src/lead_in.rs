use crate::{
    error::RoundError,
    round::{Phase, RoundState},
    schedule::Schedule,
};

pub const LEAD_IN_BEEPS: u8 = 3;
pub const LEAD_IN_INTERVAL_SECS: f64 = 1.0;
/// Time from `start` until `activate`
pub const LEAD_IN_SECS: f64 = LEAD_IN_BEEPS as f64 * LEAD_IN_INTERVAL_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadInCue {
    /// Seconds left before play, counting down from `LEAD_IN_BEEPS`
    Ready(u8),
    Go,
}

/// Pre-game cue sequence. Drives a round from CountingIn to Active.
#[derive(Debug, Clone)]
pub struct LeadIn {
    schedule: Schedule<LeadInCue>,
    current: Option<LeadInCue>,
}

impl LeadIn {
    pub fn new() -> Self {
        let mut entries = (0..LEAD_IN_BEEPS)
            .map(|i| {
                (
                    i as f64 * LEAD_IN_INTERVAL_SECS,
                    LeadInCue::Ready(LEAD_IN_BEEPS - i),
                )
            })
            .collect::<Vec<_>>();
        entries.push((LEAD_IN_SECS, LeadInCue::Go));

        Self {
            schedule: Schedule::new(entries),
            current: None,
        }
    }

    /// Most recent cue, for display
    pub fn current(&self) -> Option<LeadInCue> {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.schedule.is_finished()
    }

    /// Advances the cue table and activates `round` once `Go` fires.
    ///
    /// Does nothing unless the round is counting in.
    pub fn drive(&mut self, round: &mut RoundState, dt: f64) -> Result<Vec<LeadInCue>, RoundError> {
        if round.phase()? != Phase::CountingIn {
            return Ok(Vec::new());
        }

        let due = self.schedule.advance(dt);
        if let Some(last) = due.last() {
            self.current = Some(*last);
        }
        if due.contains(&LeadInCue::Go) {
            round.activate()?;
        }
        Ok(due)
    }
}

impl Default for LeadIn {
    fn default() -> Self {
        Self::new()
    }
}
