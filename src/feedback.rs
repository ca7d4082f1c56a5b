use crate::{
    cadence::TypingCadenceTracker,
    lead_in::LeadInCue,
    round::{Phase, RoundEvent, TimeAlert},
};

/// Audio intents. Playback is up to whoever drains them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Keystroke,
    LeadInBeep(u8),
    Go,
    Hurry,
    CountdownBeep(u8),
    RoundOver,
    /// Title gate word completed
    Unlocked,
}

impl Cue {
    /// Cues worth an audible bell on a plain terminal
    pub fn is_alert(self) -> bool {
        matches!(
            self,
            Cue::LeadInBeep(_)
                | Cue::Go
                | Cue::Hurry
                | Cue::CountdownBeep(_)
                | Cue::RoundOver
                | Cue::Unlocked
        )
    }
}

pub fn cue_for_event(event: &RoundEvent) -> Option<Cue> {
    match event {
        RoundEvent::TimeAlert(TimeAlert::Hurry) => Some(Cue::Hurry),
        RoundEvent::TimeAlert(TimeAlert::CountdownBeep(i)) => Some(Cue::CountdownBeep(*i)),
        RoundEvent::RoundEnded(_) => Some(Cue::RoundOver),
        _ => None,
    }
}

pub fn cue_for_lead_in(cue: LeadInCue) -> Cue {
    match cue {
        LeadInCue::Ready(n) => Cue::LeadInBeep(n),
        LeadInCue::Go => Cue::Go,
    }
}

/// Exponentially follows a target pitch at `damping` per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchSmoother {
    value: f64,
    damping: f64,
}

impl PitchSmoother {
    pub fn new(initial: f64, damping: f64) -> Self {
        Self {
            value: initial,
            damping: damping.max(0.0),
        }
    }

    pub fn update(&mut self, target: f64, dt: f64) -> f64 {
        let alpha = 1.0 - (-self.damping * dt.max(0.0)).exp();
        self.value += (target - self.value) * alpha;
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Collects cues from round events and keeps the smoothed typing pitch
#[derive(Debug, Clone)]
pub struct FeedbackAdapter {
    cues: Vec<Cue>,
    pitch: PitchSmoother,
}

impl FeedbackAdapter {
    pub fn new(initial_pitch: f64, pitch_damping: f64) -> Self {
        Self {
            cues: Vec::new(),
            pitch: PitchSmoother::new(initial_pitch, pitch_damping),
        }
    }

    pub fn observe(&mut self, events: &[RoundEvent]) {
        self.cues.extend(events.iter().filter_map(cue_for_event));
    }

    pub fn observe_lead_in(&mut self, cues: &[LeadInCue]) {
        self.cues.extend(cues.iter().copied().map(cue_for_lead_in));
    }

    /// Any printable key while active clicks, right or wrong
    pub fn on_keystroke(&mut self, phase: Phase) {
        if phase == Phase::Active {
            self.cues.push(Cue::Keystroke);
        }
    }

    pub fn update_pitch(&mut self, cadence: &TypingCadenceTracker, dt: f64) -> f64 {
        self.pitch.update(cadence.pitch_signal(), dt)
    }

    pub fn pitch(&self) -> f64 {
        self.pitch.value()
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::HintKind;

    #[test]
    fn maps_time_alerts_and_end() {
        let mut adapter = FeedbackAdapter::new(1.0, 5.0);
        adapter.observe(&[
            RoundEvent::ScoreChanged(3),
            RoundEvent::CharacterAdvanced {
                character: 'x',
                hint: HintKind::None,
            },
            RoundEvent::TimeAlert(TimeAlert::Hurry),
            RoundEvent::TimeAlert(TimeAlert::CountdownBeep(2)),
            RoundEvent::RoundEnded(3),
        ]);
        assert_eq!(
            adapter.drain_cues(),
            vec![Cue::Hurry, Cue::CountdownBeep(2), Cue::RoundOver]
        );
        assert!(adapter.drain_cues().is_empty());
    }

    #[test]
    fn keystrokes_only_click_while_active() {
        let mut adapter = FeedbackAdapter::new(1.0, 5.0);
        adapter.on_keystroke(Phase::CountingIn);
        adapter.on_keystroke(Phase::Active);
        adapter.on_keystroke(Phase::Ended);
        assert_eq!(adapter.drain_cues(), vec![Cue::Keystroke]);
        assert!(!Cue::Keystroke.is_alert());
    }

    #[test]
    fn lead_in_cues_translate() {
        let mut adapter = FeedbackAdapter::new(1.0, 5.0);
        adapter.observe_lead_in(&[LeadInCue::Ready(1), LeadInCue::Go]);
        assert_eq!(adapter.drain_cues(), vec![Cue::LeadInBeep(1), Cue::Go]);
    }

    #[test]
    fn smoother_converges_without_overshoot() {
        let mut smoother = PitchSmoother::new(1.0, 5.0);
        let mut last = smoother.value();
        for _ in 0..200 {
            let v = smoother.update(2.0, 0.05);
            assert!(v >= last && v <= 2.0);
            last = v;
        }
        assert!((smoother.value() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn smoother_holds_with_zero_dt() {
        let mut smoother = PitchSmoother::new(1.2, 5.0);
        assert_eq!(smoother.update(3.0, 0.0), 1.2);
    }

    #[test]
    fn pitch_follows_cadence() {
        let mut tracker = TypingCadenceTracker::default();
        let mut adapter = FeedbackAdapter::new(tracker.pitch_signal(), 8.0);
        tracker.on_correct_keystroke(0.1);
        let before = adapter.pitch();
        let after = adapter.update_pitch(&tracker, 0.1);
        assert!(after > before);
    }
}
