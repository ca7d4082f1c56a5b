use serde::{Deserialize, Serialize};

/// Speed lost per idle second
pub const SPEED_DECAY_PER_SEC: f64 = 5.0;
/// Keystroke intervals shorter than this are clamped to it
pub const MIN_KEYSTROKE_INTERVAL: f64 = 0.1;
/// Speed at which the pitch signal reaches `max_pitch`
pub const FULL_PITCH_SPEED: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CadenceConfig {
    pub min_pitch: f64,
    pub max_pitch: f64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            min_pitch: 0.8,
            max_pitch: 1.6,
        }
    }
}

/// Instantaneous typing speed derived from the gap between correct keystrokes
#[derive(Debug, Clone)]
pub struct TypingCadenceTracker {
    config: CadenceConfig,
    last_time: f64,
    speed: f64,
}

impl TypingCadenceTracker {
    pub fn new(config: CadenceConfig) -> Self {
        Self {
            config,
            last_time: 0.0,
            speed: 0.0,
        }
    }

    /// `now` is seconds on the round clock; the first keystroke measures from 0
    pub fn on_correct_keystroke(&mut self, now: f64) {
        let interval = (now - self.last_time).max(MIN_KEYSTROKE_INTERVAL);
        self.speed = 1.0 / interval;
        self.last_time = now;
    }

    pub fn decay(&mut self, dt: f64) {
        self.speed = (self.speed - dt * SPEED_DECAY_PER_SEC).max(0.0);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn last_time(&self) -> f64 {
        self.last_time
    }

    /// Target pitch in `[min_pitch, max_pitch]`; smoothing belongs to the audio side
    pub fn pitch_signal(&self) -> f64 {
        let CadenceConfig {
            min_pitch,
            max_pitch,
        } = self.config;
        let raw = min_pitch + (self.speed / FULL_PITCH_SPEED) * (max_pitch - min_pitch);
        raw.clamp(min_pitch, max_pitch)
    }

    pub fn reset(&mut self) {
        self.last_time = 0.0;
        self.speed = 0.0;
    }
}

impl Default for TypingCadenceTracker {
    fn default() -> Self {
        Self::new(CadenceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn speed_is_inverse_interval() {
        let mut tracker = TypingCadenceTracker::default();
        tracker.on_correct_keystroke(1.0);
        assert!(approx(tracker.speed(), 1.0));
        tracker.on_correct_keystroke(1.5);
        assert!(approx(tracker.speed(), 2.0));
        assert_eq!(tracker.last_time(), 1.5);
    }

    #[test]
    fn tiny_intervals_are_clamped() {
        let mut tracker = TypingCadenceTracker::default();
        tracker.on_correct_keystroke(2.0);
        tracker.on_correct_keystroke(2.01);
        assert!(approx(tracker.speed(), 10.0));
        tracker.on_correct_keystroke(2.01);
        assert!(approx(tracker.speed(), 10.0));
    }

    #[test]
    fn decay_floors_at_zero() {
        let mut tracker = TypingCadenceTracker::default();
        tracker.on_correct_keystroke(0.5);
        tracker.decay(0.1);
        assert!(approx(tracker.speed(), 1.5));
        tracker.decay(10.0);
        assert_eq!(tracker.speed(), 0.0);
    }

    #[test]
    fn pitch_spans_configured_range() {
        let config = CadenceConfig {
            min_pitch: 1.0,
            max_pitch: 2.0,
        };
        let mut tracker = TypingCadenceTracker::new(config);
        assert!(approx(tracker.pitch_signal(), 1.0));

        tracker.on_correct_keystroke(0.2);
        assert!(approx(tracker.pitch_signal(), 1.5));

        tracker.on_correct_keystroke(0.2);
        assert!(approx(tracker.pitch_signal(), 2.0));
    }

    #[test]
    fn reset_clears_state() {
        let mut tracker = TypingCadenceTracker::default();
        tracker.on_correct_keystroke(3.0);
        tracker.reset();
        assert_eq!(tracker.speed(), 0.0);
        assert_eq!(tracker.last_time(), 0.0);
    }
}
