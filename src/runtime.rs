use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::round::RoundInput;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum FrameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait FrameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<FrameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<FrameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if tx.send(FrameEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(FrameEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    log::error!("terminal event read failed: {err}");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<FrameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<FrameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<FrameEvent>) -> Self {
        Self { rx }
    }
}

impl FrameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<FrameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: FrameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: FrameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> FrameEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => FrameEvent::Tick,
        }
    }
}

/// Wall-clock delta between frames
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn since_last(&self) -> Duration {
        self.last.elapsed()
    }

    /// Seconds since the previous call (or construction)
    pub fn delta(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// What a key press means to the game loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Round(RoundInput),
    Restart,
    Quit,
}

/// Decodes a raw key press. Backspace without Shift skips; Esc aborts a
/// running round. `r` restarts only once the round is over, since during play
/// it is a character like any other.
pub fn decode_key(key: KeyEvent, round_over: bool) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }

    match key.code {
        KeyCode::Esc if round_over => Some(KeyAction::Quit),
        KeyCode::Esc => Some(KeyAction::Round(RoundInput::Abort)),
        KeyCode::Char('r') | KeyCode::Char('R') if round_over => Some(KeyAction::Restart),
        KeyCode::Char(_) if round_over => None,
        KeyCode::Char(c) => Some(KeyAction::Round(RoundInput::Char(c))),
        KeyCode::Backspace if !key.modifiers.contains(KeyModifiers::SHIFT) && !round_over => {
            Some(KeyAction::Round(RoundInput::Skip))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            FrameEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(FrameEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            FrameEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn characters_become_round_input() {
        assert_eq!(
            decode_key(key(KeyCode::Char('Q'), KeyModifiers::SHIFT), false),
            Some(KeyAction::Round(RoundInput::Char('Q')))
        );
        assert_eq!(
            decode_key(key(KeyCode::Char('r'), KeyModifiers::NONE), false),
            Some(KeyAction::Round(RoundInput::Char('r')))
        );
    }

    #[test]
    fn backspace_skips_unless_shifted() {
        assert_eq!(
            decode_key(key(KeyCode::Backspace, KeyModifiers::NONE), false),
            Some(KeyAction::Round(RoundInput::Skip))
        );
        assert_eq!(
            decode_key(key(KeyCode::Backspace, KeyModifiers::SHIFT), false),
            None
        );
    }

    #[test]
    fn escape_aborts_then_quits() {
        assert_eq!(
            decode_key(key(KeyCode::Esc, KeyModifiers::NONE), false),
            Some(KeyAction::Round(RoundInput::Abort))
        );
        assert_eq!(
            decode_key(key(KeyCode::Esc, KeyModifiers::NONE), true),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn restart_only_after_round() {
        assert_eq!(
            decode_key(key(KeyCode::Char('r'), KeyModifiers::NONE), true),
            Some(KeyAction::Restart)
        );
        assert_eq!(decode_key(key(KeyCode::Char('x'), KeyModifiers::NONE), true), None);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            decode_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL), false),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn frame_clock_is_non_negative() {
        let mut clock = FrameClock::new();
        assert!(clock.delta() >= 0.0);
    }
}
