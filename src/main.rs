use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keyrush::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    feedback::Cue,
    round::RoundInput,
    runtime::{
        decode_key, CrosstermEventSource, FixedTicker, FrameClock, FrameEvent, FrameEventSource,
        KeyAction, Runner, Ticker,
    },
    scores::ScoreLog,
    session::{Session, SessionConfig},
    title_gate::TitleGate,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::Path,
    time::Duration,
};

/// timed single-character typing drills
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type each character as it appears before the 20 second clock runs out. Wrong keys cost nothing, skipping costs a point."
)]
pub struct Cli {
    /// character set and comparison strictness (defaults to the last one played)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seed the character stream for a reproducible round
    #[clap(long)]
    seed: Option<u64>,

    /// never ring the terminal bell for countdown cues
    #[clap(long)]
    no_bell: bool,

    /// frame interval in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,
}

fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // The TUI owns stdout/stderr, so logs only go to a file
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = AppDirs::log_path();
    if let Err(err) = init_logging(&log_path) {
        eprintln!("logging disabled, cannot open {}: {err}", log_path.display());
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    if let Some(difficulty) = cli.difficulty {
        config.set_difficulty(difficulty);
        if let Err(err) = store.save(&config) {
            log::warn!("could not save config to {}: {err}", store.path().display());
        }
    }

    let mut session = Session::new(SessionConfig {
        difficulty: config.difficulty(),
        cadence: config.cadence(),
        pitch_damping: config.pitch_damping,
        seed: cli.seed,
    })
    .with_score_log(ScoreLog::new());

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut session, &cli, &config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend + io::Write>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    cli: &Cli,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let tick = Duration::from_millis(cli.tick_ms.unwrap_or(config.tick_ms).max(1));
    let bell = config.bell && !cli.no_bell;
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));

    if !run_title_gate(terminal, &runner, tick, bell)? {
        return Ok(());
    }

    let mut clock = FrameClock::new();
    session.start()?;
    terminal.draw(|f| f.render_widget(&*session, f.area()))?;

    loop {
        match runner.step() {
            FrameEvent::Key(key) => match decode_key(key, session.is_over()) {
                Some(KeyAction::Round(input)) => session.queue_input(input),
                Some(KeyAction::Restart) => {
                    session.restart()?;
                    clock = FrameClock::new();
                }
                Some(KeyAction::Quit) => break,
                None => {}
            },
            FrameEvent::Resize => {
                terminal.draw(|f| f.render_widget(&*session, f.area()))?;
            }
            FrameEvent::Tick => {}
        }

        // Keystrokes arrive faster than the tick timeout under steady typing,
        // so frames are paced by the clock rather than by Tick events alone.
        if clock.since_last() >= tick {
            session.frame(clock.delta())?;
            play_cues(terminal, bell, session.feedback_mut().drain_cues())?;
            terminal.draw(|f| f.render_widget(&*session, f.area()))?;
        }
    }

    Ok(())
}

/// Title screen. Returns false if the player quit instead of typing the word.
fn run_title_gate<B: Backend + io::Write, E: FrameEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    runner: &Runner<E, T>,
    tick: Duration,
    bell: bool,
) -> Result<bool, Box<dyn Error>> {
    let mut gate = TitleGate::new();
    let mut clock = FrameClock::new();
    terminal.draw(|f| f.render_widget(&gate, f.area()))?;

    while !gate.is_complete() {
        match runner.step() {
            FrameEvent::Key(key) => match decode_key(key, false) {
                Some(KeyAction::Round(RoundInput::Char(c))) => {
                    gate.submit(c);
                }
                Some(KeyAction::Round(RoundInput::Abort)) | Some(KeyAction::Quit) => {
                    return Ok(false)
                }
                _ => {}
            },
            FrameEvent::Resize | FrameEvent::Tick => {}
        }

        if gate.is_complete() || clock.since_last() >= tick {
            gate.advance(clock.delta());
            play_cues(terminal, bell, gate.drain_cues())?;
            terminal.draw(|f| f.render_widget(&gate, f.area()))?;
        }
    }
    Ok(true)
}

/// Only alerts are audible on a plain terminal, and only through the bell
fn play_cues<B: Backend + io::Write>(
    terminal: &mut Terminal<B>,
    bell: bool,
    cues: Vec<Cue>,
) -> io::Result<()> {
    for cue in cues {
        log::trace!("cue {cue:?}");
        if bell && cue.is_alert() {
            execute!(terminal.backend_mut(), Print('\x07'))?;
        }
    }
    Ok(())
}
