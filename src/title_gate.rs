use crate::{feedback::Cue, schedule::Schedule};

/// Word the player types on the title screen to begin
pub const GATE_WORD: &str = "ENTER";
pub const BLINK_INTERVAL_SECS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateLetter {
    Typed(char),
    /// Next letter to type, hidden on every other blink
    Current { letter: char, visible: bool },
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateProgress {
    Advanced,
    Ignored,
    Complete,
}

/// Title screen that opens once `GATE_WORD` has been typed letter by letter.
///
/// Input is folded to upper case; wrong keys still click but leave the
/// progress alone.
#[derive(Debug, Clone)]
pub struct TitleGate {
    word: Vec<char>,
    progress: usize,
    visible: bool,
    blink: Schedule<()>,
    cues: Vec<Cue>,
}

impl TitleGate {
    pub fn new() -> Self {
        Self {
            word: GATE_WORD.chars().collect(),
            progress: 0,
            visible: true,
            blink: blink_schedule(),
            cues: Vec::new(),
        }
    }

    pub fn submit(&mut self, c: char) -> GateProgress {
        let Some(&target) = self.word.get(self.progress) else {
            return GateProgress::Ignored;
        };
        self.cues.push(Cue::Keystroke);
        if !c.to_uppercase().eq([target]) {
            return GateProgress::Ignored;
        }

        self.progress += 1;
        self.visible = true;
        self.blink = blink_schedule();
        if self.is_complete() {
            log::info!("title gate opened");
            self.cues.push(Cue::Unlocked);
            GateProgress::Complete
        } else {
            GateProgress::Advanced
        }
    }

    /// Advances the blink of the current letter
    pub fn advance(&mut self, dt: f64) {
        if self.is_complete() {
            return;
        }
        let mut due = self.blink.advance(dt);
        while !due.is_empty() {
            self.visible = !self.visible;
            let overshoot = self.blink.elapsed() - BLINK_INTERVAL_SECS;
            self.blink = blink_schedule();
            due = self.blink.advance(overshoot);
        }
    }

    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.word.len()
    }

    pub fn letters(&self) -> Vec<GateLetter> {
        self.word
            .iter()
            .enumerate()
            .map(|(i, &letter)| {
                if i < self.progress {
                    GateLetter::Typed(letter)
                } else if i == self.progress {
                    GateLetter::Current {
                        letter,
                        visible: self.visible,
                    }
                } else {
                    GateLetter::Pending
                }
            })
            .collect()
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl Default for TitleGate {
    fn default() -> Self {
        Self::new()
    }
}

fn blink_schedule() -> Schedule<()> {
    Schedule::new(vec![(BLINK_INTERVAL_SECS, ())])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_all(gate: &mut TitleGate, keys: &str) -> Vec<GateProgress> {
        keys.chars().map(|c| gate.submit(c)).collect()
    }

    #[test]
    fn starts_on_first_letter() {
        let gate = TitleGate::new();
        assert_eq!(gate.progress(), 0);
        assert!(!gate.is_complete());
        assert_eq!(
            gate.letters(),
            vec![
                GateLetter::Current {
                    letter: 'E',
                    visible: true
                },
                GateLetter::Pending,
                GateLetter::Pending,
                GateLetter::Pending,
                GateLetter::Pending,
            ]
        );
    }

    #[test]
    fn correct_letters_advance() {
        let mut gate = TitleGate::new();
        assert_eq!(
            type_all(&mut gate, "ENT"),
            vec![GateProgress::Advanced; 3]
        );
        assert_eq!(gate.progress(), 3);
        assert_eq!(gate.letters()[2], GateLetter::Typed('T'));
        assert_eq!(
            gate.letters()[3],
            GateLetter::Current {
                letter: 'E',
                visible: true
            }
        );
    }

    #[test]
    fn wrong_keys_click_but_do_not_advance() {
        let mut gate = TitleGate::new();
        assert_eq!(gate.submit('x'), GateProgress::Ignored);
        assert_eq!(gate.submit('N'), GateProgress::Ignored);
        assert_eq!(gate.progress(), 0);
        assert_eq!(gate.drain_cues(), vec![Cue::Keystroke, Cue::Keystroke]);
    }

    #[test]
    fn lower_case_is_folded() {
        let mut gate = TitleGate::new();
        assert_eq!(
            type_all(&mut gate, "enteR"),
            vec![
                GateProgress::Advanced,
                GateProgress::Advanced,
                GateProgress::Advanced,
                GateProgress::Advanced,
                GateProgress::Complete,
            ]
        );
        assert!(gate.is_complete());
    }

    #[test]
    fn completion_unlocks_once() {
        let mut gate = TitleGate::new();
        type_all(&mut gate, "EXNTER");
        assert!(gate.is_complete());

        let cues = gate.drain_cues();
        assert_eq!(cues.len(), 7);
        assert_eq!(cues.last(), Some(&Cue::Unlocked));

        assert_eq!(gate.submit('E'), GateProgress::Ignored);
        assert!(gate.drain_cues().is_empty());
        assert!(gate.letters().iter().all(|l| matches!(l, GateLetter::Typed(_))));
    }

    #[test]
    fn current_letter_blinks_every_half_second() {
        let mut gate = TitleGate::new();
        let visible = |gate: &TitleGate| match gate.letters()[gate.progress()] {
            GateLetter::Current { visible, .. } => visible,
            other => panic!("unexpected {other:?}"),
        };

        gate.advance(0.25);
        assert!(visible(&gate));
        gate.advance(0.25);
        assert!(!visible(&gate));
        gate.advance(0.5);
        assert!(visible(&gate));
        // A long frame toggles once per elapsed interval
        gate.advance(1.5);
        assert!(!visible(&gate));
    }

    #[test]
    fn typing_shows_the_next_letter_immediately() {
        let mut gate = TitleGate::new();
        gate.advance(0.5);
        gate.submit('E');
        assert_eq!(
            gate.letters()[1],
            GateLetter::Current {
                letter: 'N',
                visible: true
            }
        );
        gate.advance(0.25);
        assert_eq!(
            gate.letters()[1],
            GateLetter::Current {
                letter: 'N',
                visible: true
            }
        );
    }
}
