use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    comparison::HintKind,
    lead_in::LeadInCue,
    round::{Phase, RoundState},
    session::Session,
    title_gate::{GateLetter, TitleGate, GATE_WORD},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Keeps the last `max_width` columns of `s`
fn fit_tail(s: &str, max_width: usize) -> String {
    let mut out = s.to_string();
    while out.width() > max_width {
        out.remove(0);
    }
    out
}

/// Keeps the first `max_width` columns of `s`
fn fit_head(s: &str, max_width: usize) -> String {
    let mut out = s.to_string();
    while out.width() > max_width {
        out.pop();
    }
    out
}

pub fn hint_style(hint: HintKind) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    match hint {
        HintKind::None => base.fg(Color::White),
        HintKind::Uppercase => base.fg(Color::Yellow),
        HintKind::Digit => base.fg(Color::Cyan),
    }
}

fn timer_style(round: &RoundState) -> Style {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    if round.time_remaining() < 5.5 {
        bold_style.fg(Color::Red)
    } else if round.time_remaining() < 15.0 {
        bold_style.fg(Color::Yellow)
    } else {
        bold_style.add_modifier(Modifier::DIM)
    }
}

impl Widget for &TitleGate {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Length(1), // letters
                Constraint::Length(1), // padding
                Constraint::Length(1), // prompt
                Constraint::Min(0),
            ])
            .split(area);

        let letters = self.letters().into_iter().map(|letter| match letter {
            GateLetter::Typed(c) => Span::styled(c.to_string(), bold_style.fg(Color::Green)),
            GateLetter::Current {
                letter,
                visible: true,
            } => Span::styled(letter.to_string(), bold_style.fg(Color::White)),
            GateLetter::Current { visible: false, .. } | GateLetter::Pending => {
                Span::styled("_", Style::default().add_modifier(Modifier::DIM))
            }
        });
        let spans = Itertools::intersperse(letters, Span::raw(" ")).collect::<Vec<_>>();
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!("type {GATE_WORD} to begin / (esc) quit"),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }
}

impl Widget for &Session {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let round = self.round();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        match round.phase() {
            Err(_) => {}
            Ok(Phase::CountingIn) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Percentage(40),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Length(1),
                        Constraint::Min(0),
                    ])
                    .split(area);

                let label = match self.lead_in().current() {
                    Some(LeadInCue::Ready(n)) => n.to_string(),
                    Some(LeadInCue::Go) => "GO".to_string(),
                    None => "get ready".to_string(),
                };
                Paragraph::new(Span::styled(label, bold_style.fg(Color::Magenta)))
                    .alignment(Alignment::Center)
                    .render(chunks[1], buf);

                Paragraph::new(Span::styled(
                    format!("difficulty: {}", round.difficulty()),
                    italic_style,
                ))
                .alignment(Alignment::Center)
                .render(chunks[3], buf);
            }
            Ok(Phase::Active) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Length(1), // score + timer
                        Constraint::Min(1),    // padding
                        Constraint::Length(1), // history | active | preview
                        Constraint::Length(1), // skipped
                        Constraint::Min(1),    // padding
                        Constraint::Length(1), // cadence
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                let header = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(chunks[0]);
                Paragraph::new(Span::styled(format!("score: {}", round.score()), bold_style))
                    .render(header[0], buf);
                Paragraph::new(Span::styled(
                    format!("{:.2}", round.time_remaining()),
                    timer_style(round),
                ))
                .alignment(Alignment::Right)
                .render(header[1], buf);

                let side_width = (chunks[2].width.saturating_sub(3) / 2) as usize;
                let history = round.recent_history().iter().collect::<String>();
                let preview = round.queue().iter().collect::<String>();
                let active = round.active().map(String::from).unwrap_or_default();

                let line = Line::from(vec![
                    Span::styled(
                        format!("{:>side_width$}", fit_tail(&history, side_width)),
                        Style::default().fg(Color::Green),
                    ),
                    Span::raw(" "),
                    Span::styled(active, hint_style(round.active_hint())),
                    Span::raw(" "),
                    Span::styled(
                        fit_head(&preview, side_width),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                ]);
                Paragraph::new(line)
                    .alignment(Alignment::Center)
                    .render(chunks[2], buf);

                if !round.skipped().is_empty() {
                    let skipped = round.skipped().iter().join(" ");
                    Paragraph::new(Span::styled(
                        fit_tail(&skipped, chunks[3].width as usize),
                        Style::default().fg(Color::Red).add_modifier(Modifier::CROSSED_OUT),
                    ))
                    .alignment(Alignment::Center)
                    .render(chunks[3], buf);
                }

                let cadence = self.config.cadence;
                let span = (cadence.max_pitch - cadence.min_pitch).max(f64::EPSILON);
                let ratio = ((self.feedback().pitch() - cadence.min_pitch) / span).clamp(0.0, 1.0);
                Gauge::default()
                    .gauge_style(Style::default().fg(Color::Magenta))
                    .ratio(ratio)
                    .label("")
                    .render(chunks[5], buf);

                Paragraph::new(Span::styled("(backspace) skip / (esc) end round", italic_style))
                    .render(chunks[6], buf);
            }
            Ok(Phase::Ended) => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .constraints([
                        Constraint::Percentage(35),
                        Constraint::Length(1), // final score
                        Constraint::Length(1), // best
                        Constraint::Length(1), // typed trail
                        Constraint::Length(1), // padding
                        Constraint::Length(1), // legend
                        Constraint::Min(0),
                    ])
                    .split(area);

                Paragraph::new(Span::styled(
                    format!("final score: {}", round.score()),
                    bold_style.fg(Color::Green),
                ))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);

                if let Some(best) = self.best_score() {
                    Paragraph::new(Span::styled(
                        format!("best on {}: {}", round.difficulty(), best),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
                    ))
                    .alignment(Alignment::Center)
                    .render(chunks[2], buf);
                }

                let history = round.recent_history().iter().collect::<String>();
                Paragraph::new(Span::styled(
                    history,
                    Style::default().add_modifier(Modifier::DIM),
                ))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[3], buf);

                Paragraph::new(Span::styled("(r)estart / (esc)ape", italic_style))
                    .alignment(Alignment::Center)
                    .render(chunks[5], buf);
            }
        }
    }
}
