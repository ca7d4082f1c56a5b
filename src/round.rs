use std::collections::VecDeque;
use std::ops::RangeInclusive;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    cadence::{CadenceConfig, TypingCadenceTracker},
    character_stream::CharacterStream,
    comparison::{hint_kind, matches, HintKind},
    difficulty::Difficulty,
    error::RoundError,
    schedule::Schedule,
};

/// Steady-state length of the lookahead queue, also the display cap for trails
pub const PREVIEW_COUNT: usize = 50;
pub const ROUND_SECS: f64 = 20.0;

/// The hurry cue can only fire while the remaining time is strictly inside this window
pub const HURRY_WINDOW: (f64, f64) = (10.0, 15.0);
pub const HURRY_REARM_SECS: RangeInclusive<f64> = 10.0..=20.0;

pub const COUNTDOWN_ARM_SECS: f64 = 5.5;
pub const COUNTDOWN_BEEPS: u8 = 5;
pub const COUNTDOWN_INTERVAL_SECS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    CountingIn,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeAlert {
    Hurry,
    /// Index 0..=4 within the final countdown
    CountdownBeep(u8),
}

/// Outbound notifications, drained by the UI and audio adapters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    PhaseChanged(Phase),
    ScoreChanged(i32),
    CharacterAdvanced { character: char, hint: HintKind },
    HistoryAppended(char),
    Skipped(char),
    SkippedCleared,
    TimeAlert(TimeAlert),
    RoundEnded(i32),
}

/// Discrete input already decoded by the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundInput {
    Char(char),
    Skip,
    Abort,
}

/// Authoritative state of one typing round
#[derive(Debug, Clone)]
pub struct RoundState {
    difficulty: Difficulty,
    stream: CharacterStream,
    rng: StdRng,
    phase: Option<Phase>,
    queue: VecDeque<char>,
    active: Option<char>,
    history: Vec<char>,
    skipped: VecDeque<char>,
    score: i32,
    round_secs: f64,
    time_remaining: f64,
    hurry_cooldown: f64,
    countdown: Option<Schedule<u8>>,
    cadence: TypingCadenceTracker,
    events: Vec<RoundEvent>,
}

impl RoundState {
    pub fn new() -> Self {
        Self::from_parts(CharacterStream::new(), StdRng::from_entropy())
    }

    /// Fully deterministic round: the character sequence is that of
    /// `CharacterStream::with_seed(seed)`
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(
            CharacterStream::with_seed(seed),
            StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x9e37_79b9_7f4a_7c15),
        )
    }

    fn from_parts(stream: CharacterStream, rng: StdRng) -> Self {
        Self {
            difficulty: Difficulty::default(),
            stream,
            rng,
            phase: None,
            queue: VecDeque::with_capacity(PREVIEW_COUNT + 1),
            active: None,
            history: Vec::new(),
            skipped: VecDeque::with_capacity(PREVIEW_COUNT),
            score: 0,
            round_secs: ROUND_SECS,
            time_remaining: ROUND_SECS,
            hurry_cooldown: 0.0,
            countdown: None,
            cadence: TypingCadenceTracker::default(),
            events: Vec::new(),
        }
    }

    pub fn with_cadence(mut self, config: CadenceConfig) -> Self {
        self.cadence = TypingCadenceTracker::new(config);
        self
    }

    /// Takes effect at the next `start`
    pub fn with_round_length(mut self, secs: f64) -> Self {
        self.round_secs = secs.max(0.0);
        self.time_remaining = self.round_secs;
        self
    }

    pub fn start(&mut self, difficulty: Difficulty) -> Result<(), RoundError> {
        if let Some(from @ (Phase::CountingIn | Phase::Active)) = self.phase {
            return Err(RoundError::InvalidTransition {
                from,
                to: Phase::CountingIn,
            });
        }

        self.difficulty = difficulty;
        self.stream.configure(difficulty);
        self.time_remaining = self.round_secs;
        self.hurry_cooldown = 0.0;
        self.countdown = None;
        self.active = None;
        self.history.clear();
        self.skipped.clear();
        self.cadence.reset();

        self.queue.clear();
        for _ in 0..PREVIEW_COUNT {
            let c = self.stream.next()?;
            self.queue.push_back(c);
        }

        self.score = 0;
        self.events.push(RoundEvent::ScoreChanged(0));
        self.set_phase(Phase::CountingIn);
        log::info!("round started on {difficulty} ({:.1}s)", self.round_secs);
        Ok(())
    }

    /// Ends the lead-in and draws the first active character
    pub fn activate(&mut self) -> Result<(), RoundError> {
        match self.phase()? {
            Phase::CountingIn => {}
            from => {
                return Err(RoundError::InvalidTransition {
                    from,
                    to: Phase::Active,
                })
            }
        }
        self.advance()?;
        self.set_phase(Phase::Active);
        Ok(())
    }

    pub fn tick(&mut self, dt: f64) -> Result<(), RoundError> {
        if self.phase()? != Phase::Active {
            return Ok(());
        }
        let dt = dt.max(0.0);

        self.time_remaining = (self.time_remaining - dt).max(0.0);
        self.cadence.decay(dt);
        self.update_hurry(dt);
        self.update_countdown(dt);

        if self.time_remaining <= 0.0 {
            self.finish();
        }
        Ok(())
    }

    /// Returns whether the character was accepted. Wrong keys are ignored
    /// without penalty.
    pub fn submit_char(&mut self, c: char) -> Result<bool, RoundError> {
        if self.phase()? != Phase::Active {
            return Ok(false);
        }
        let target = self
            .active
            .ok_or(RoundError::InvalidState("active round without a character"))?;
        if !matches(self.difficulty, target, c) {
            return Ok(false);
        }

        self.add_score(1);
        self.history.push(target);
        self.events.push(RoundEvent::HistoryAppended(target));
        if !self.skipped.is_empty() {
            self.skipped.clear();
            self.events.push(RoundEvent::SkippedCleared);
        }
        self.cadence.on_correct_keystroke(self.elapsed());
        self.advance()?;
        Ok(true)
    }

    pub fn skip(&mut self) -> Result<(), RoundError> {
        if self.phase()? != Phase::Active {
            return Ok(());
        }
        let skipped = self
            .active
            .ok_or(RoundError::InvalidState("active round without a character"))?;

        self.add_score(-1);
        if self.skipped.len() == PREVIEW_COUNT {
            self.skipped.pop_front();
        }
        self.skipped.push_back(skipped);
        self.events.push(RoundEvent::Skipped(skipped));
        self.advance()
    }

    /// Forced end from the lead-in or mid-round. Ending an ended round is a no-op.
    pub fn abort(&mut self) -> Result<(), RoundError> {
        if self.phase()? != Phase::Ended {
            log::debug!("round aborted with {:.2}s left", self.time_remaining);
            self.finish();
        }
        Ok(())
    }

    /// Applies a frame: every queued input first, then the timer.
    ///
    /// A keystroke that arrives in the same frame the clock runs out still counts.
    pub fn step<I>(&mut self, inputs: I, dt: f64) -> Result<(), RoundError>
    where
        I: IntoIterator<Item = RoundInput>,
    {
        for input in inputs {
            match input {
                RoundInput::Char(c) => {
                    self.submit_char(c)?;
                }
                RoundInput::Skip => self.skip()?,
                RoundInput::Abort => self.abort()?,
            }
        }
        self.tick(dt)
    }

    pub fn add_score(&mut self, delta: i32) {
        self.score = self.score.saturating_add(delta);
        self.events.push(RoundEvent::ScoreChanged(self.score));
    }

    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// `InvalidState` until the first `start`
    pub fn phase(&self) -> Result<Phase, RoundError> {
        self.phase
            .ok_or(RoundError::InvalidState("round has not been started"))
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    /// Seconds of active play so far
    pub fn elapsed(&self) -> f64 {
        self.round_secs - self.time_remaining
    }

    pub fn active(&self) -> Option<char> {
        self.active
    }

    pub fn active_hint(&self) -> HintKind {
        self.active
            .map_or(HintKind::None, |c| hint_kind(self.difficulty, c))
    }

    pub fn queue(&self) -> &VecDeque<char> {
        &self.queue
    }

    /// Last `PREVIEW_COUNT` correctly typed characters, oldest first
    pub fn recent_history(&self) -> &[char] {
        let start = self.history.len().saturating_sub(PREVIEW_COUNT);
        &self.history[start..]
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn skipped(&self) -> &VecDeque<char> {
        &self.skipped
    }

    pub fn cadence(&self) -> &TypingCadenceTracker {
        &self.cadence
    }

    /// Push one fresh character, then pop the front as the new active one
    fn advance(&mut self) -> Result<(), RoundError> {
        let fresh = self.stream.next()?;
        self.queue.push_back(fresh);
        let next = self
            .queue
            .pop_front()
            .ok_or(RoundError::InvalidState("character queue is empty"))?;
        self.active = Some(next);
        self.events.push(RoundEvent::CharacterAdvanced {
            character: next,
            hint: hint_kind(self.difficulty, next),
        });
        Ok(())
    }

    fn update_hurry(&mut self, dt: f64) {
        if self.hurry_cooldown > 0.0 {
            self.hurry_cooldown -= dt;
            return;
        }
        let (low, high) = HURRY_WINDOW;
        if self.time_remaining > low && self.time_remaining < high {
            self.hurry_cooldown = self.rng.gen_range(HURRY_REARM_SECS);
            log::debug!(
                "hurry at {:.2}s, re-armed in {:.2}s",
                self.time_remaining,
                self.hurry_cooldown
            );
            self.events.push(RoundEvent::TimeAlert(TimeAlert::Hurry));
        }
    }

    fn update_countdown(&mut self, dt: f64) {
        // Beeps still pending on the final tick go with the round
        if self.time_remaining <= 0.0 {
            return;
        }
        let due = if let Some(schedule) = self.countdown.as_mut() {
            schedule.advance(dt)
        } else if self.time_remaining < COUNTDOWN_ARM_SECS {
            log::debug!("countdown armed at {:.2}s", self.time_remaining);
            let mut schedule =
                Schedule::evenly_spaced(COUNTDOWN_BEEPS as usize, COUNTDOWN_INTERVAL_SECS, |i| {
                    i as u8
                });
            let due = schedule.poll();
            self.countdown = Some(schedule);
            due
        } else {
            Vec::new()
        };

        self.events.extend(
            due.into_iter()
                .map(|i| RoundEvent::TimeAlert(TimeAlert::CountdownBeep(i))),
        );
    }

    fn finish(&mut self) {
        self.set_phase(Phase::Ended);
        self.events.push(RoundEvent::RoundEnded(self.score));
        log::info!("round ended with score {}", self.score);
    }

    fn set_phase(&mut self, phase: Phase) {
        log::debug!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = Some(phase);
        self.events.push(RoundEvent::PhaseChanged(phase));
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}
