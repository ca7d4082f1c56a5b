use crate::{
    cadence::CadenceConfig,
    difficulty::Difficulty,
    error::RoundError,
    feedback::FeedbackAdapter,
    lead_in::LeadIn,
    round::{Phase, RoundEvent, RoundInput, RoundState},
    scores::{ScoreLog, ScoreRecord},
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub cadence: CadenceConfig,
    pub pitch_damping: f64,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            cadence: CadenceConfig::default(),
            pitch_damping: 8.0,
            seed: None,
        }
    }
}

/// Owns one round and its adapters for the lifetime of the program.
///
/// Input is buffered and applied at the start of the next frame, before the
/// round clock advances.
#[derive(Debug)]
pub struct Session {
    pub config: SessionConfig,
    round: RoundState,
    lead_in: LeadIn,
    feedback: FeedbackAdapter,
    pending: Vec<RoundInput>,
    score_log: Option<ScoreLog>,
    best_score: Option<i32>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let round = match config.seed {
            Some(seed) => RoundState::with_seed(seed),
            None => RoundState::new(),
        }
        .with_cadence(config.cadence);
        let feedback = FeedbackAdapter::new(config.cadence.min_pitch, config.pitch_damping);

        Self {
            config,
            round,
            lead_in: LeadIn::new(),
            feedback,
            pending: Vec::new(),
            score_log: None,
            best_score: None,
        }
    }

    pub fn with_score_log(mut self, log: ScoreLog) -> Self {
        self.score_log = Some(log);
        self
    }

    /// Begins a round with a fresh lead-in. Fails if one is already running.
    pub fn start(&mut self) -> Result<(), RoundError> {
        self.round.start(self.config.difficulty)?;
        self.lead_in = LeadIn::new();
        self.pending.clear();
        self.best_score = self.lookup_best();
        Ok(())
    }

    /// Starts again with the same difficulty; ignored while a round is running
    pub fn restart(&mut self) -> Result<(), RoundError> {
        if self.is_over() {
            self.start()?;
        }
        Ok(())
    }

    pub fn queue_input(&mut self, input: RoundInput) {
        if let (RoundInput::Char(_), Ok(phase)) = (input, self.round.phase()) {
            self.feedback.on_keystroke(phase);
        }
        self.pending.push(input);
    }

    /// Applies buffered input, advances the round clock, then the lead-in.
    /// Returns the round events produced during the frame.
    pub fn frame(&mut self, dt: f64) -> Result<Vec<RoundEvent>, RoundError> {
        let inputs = std::mem::take(&mut self.pending);
        self.round.step(inputs, dt)?;

        let cues = self.lead_in.drive(&mut self.round, dt)?;
        self.feedback.observe_lead_in(&cues);

        let events = self.round.drain_events();
        self.feedback.observe(&events);
        self.feedback.update_pitch(self.round.cadence(), dt);

        for event in &events {
            if let RoundEvent::RoundEnded(score) = event {
                self.record_score(*score);
            }
        }
        Ok(events)
    }

    pub fn is_over(&self) -> bool {
        self.round.phase() == Ok(Phase::Ended)
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn lead_in(&self) -> &LeadIn {
        &self.lead_in
    }

    pub fn feedback(&self) -> &FeedbackAdapter {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut FeedbackAdapter {
        &mut self.feedback
    }

    /// Best logged score for this difficulty, including the round just finished
    pub fn best_score(&self) -> Option<i32> {
        self.best_score
    }

    fn lookup_best(&self) -> Option<i32> {
        let score_log = self.score_log.as_ref()?;
        score_log
            .best_score(self.config.difficulty)
            .unwrap_or_else(|err| {
                log::warn!("could not read score log: {err}");
                None
            })
    }

    fn record_score(&mut self, score: i32) {
        self.best_score = Some(self.best_score.map_or(score, |best| best.max(score)));
        if let Some(score_log) = &self.score_log {
            if let Err(err) = score_log.append(&ScoreRecord::now(self.config.difficulty, score)) {
                log::warn!("could not record score: {err}");
            }
        }
    }
}
