mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use last_war::compute::{self, GameState};
use last_war::config::{DifficultyCurve, GameConfig, GameOverRule};
use last_war::entities::GameStatus;
use last_war::events::GameEvent;

use display::Viewport;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Logical play field; scaled onto whatever terminal we get.
const FIELD_WIDTH: f64 = 400.0;
const FIELD_HEIGHT: f64 = 600.0;

/// Field units the ship slides per frame while a direction key is held.
const PLAYER_STEP: f64 = 12.0;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

#[derive(Parser, Debug)]
#[command(name = "last_war", about = "Hold the line: shoot the power-ups, dodge the rest")]
struct Cli {
    /// JSON balance file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// kill_only | time_only | strongest | stacked
    #[arg(long)]
    difficulty: Option<DifficultyCurve>,

    /// danger_zone | health_depleted
    #[arg(long = "game-over")]
    game_over: Option<GameOverRule>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Where tracing output goes (stdout belongs to the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".last_war_score")
}

fn load_high_score() -> u32 {
    std::fs::read_to_string(high_score_path())
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

/// Persist `score` if it beats `best`.
fn record_high_score(best: &mut u32, score: u32) {
    if score > *best {
        *best = score;
        save_high_score(score);
    }
}

fn save_high_score(score: u32) {
    if let Err(err) = std::fs::write(high_score_path(), score.to_string()) {
        tracing::warn!(%err, "could not save high score");
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| std::env::temp_dir().join("last_war.log"));
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(curve) = cli.difficulty {
        config.rules.difficulty = curve;
    }
    if let Some(rule) = cli.game_over {
        config.rules.game_over = rule;
    }
    Ok(config)
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(GameOverRule),
    Quit,
}

fn text_at<W: Write>(
    out: &mut W,
    col: u16,
    row: u16,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn centred<W: Write>(
    out: &mut W,
    cx: u16,
    row: u16,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    text_at(out, cx.saturating_sub(text.chars().count() as u16 / 2), row, color, text)
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
    current: GameOverRule,
) -> std::io::Result<MenuResult> {
    let (cols, rows) = terminal::size()?;
    let (cx, cy) = (cols / 2, rows / 2);
    let left = cx.saturating_sub(20);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    centred(out, cx, cy.saturating_sub(7), Color::Cyan, "★  LAST  WAR  ★")?;
    if high_score > 0 {
        let best = format!("Best Score: {}", high_score);
        centred(out, cx, cy.saturating_sub(6), Color::Yellow, &best)?;
    }

    text_at(out, left, cy.saturating_sub(4), Color::White, "Game over when:")?;
    let rules = [
        ('1', GameOverRule::DangerZone, Color::Green, "an enemy crosses the red line"),
        ('2', GameOverRule::HealthDepleted, Color::Yellow, "your hull breaks (enemies ram)"),
    ];
    for (i, (key, rule, color, desc)) in rules.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        let marker = if *rule == current { '›' } else { ' ' };
        text_at(out, left, row, Color::DarkGrey, &format!("{}[{}] ", marker, key))?;
        text_at(out, left + 5, row, *color, desc)?;
    }

    let notes = [
        "Your ship fires on its own.",
        "Shoot falling items for a bonus; flying into them backfires.",
        "",
        "Enter : Start   ← → / A D : Move   P : Pause   Q : Quit",
    ];
    for (i, line) in notes.iter().enumerate() {
        text_at(out, left, cy + 2 + i as u16, Color::DarkGrey, line)?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        let Ok(event) = rx.recv() else {
            // Input thread is gone; nothing can drive the menu any more.
            return Ok(MenuResult::Quit);
        };
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = event else {
            continue;
        };
        match code {
            KeyCode::Char('1') => return Ok(MenuResult::Start(GameOverRule::DangerZone)),
            KeyCode::Char('2') => return Ok(MenuResult::Start(GameOverRule::HealthDepleted)),
            KeyCode::Enter => return Ok(MenuResult::Start(current)),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Menu,
}

/// Log the events a sound/particle layer would consume.
fn dispatch(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::GameOver { .. } | GameEvent::LevelUp { .. } => {
                tracing::info!(?event, "game event")
            }
            GameEvent::ShotFired { .. } | GameEvent::EnemyFired { .. } => {
                tracing::trace!(?event, "game event")
            }
            _ => tracing::debug!(?event, "game event"),
        }
    }
}

/// Input model: a `key_frame` map records the frame of the last
/// press/repeat event for every key, so held keys keep acting until they
/// expire (or a release event arrives on keyboard-enhanced terminals).
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut impl Rng,
    mut high_score: u32,
) -> std::io::Result<(LoopExit, u32)> {
    let epoch = Instant::now();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    // Best score before the current session, for the "new best" banner.
    let mut prior_best = high_score;

    dispatch(&compute::start(state));

    loop {
        let frame_start = Instant::now();
        frame += 1;

        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            record_high_score(&mut high_score, state.stats.score);
                            return Ok((LoopExit::Quit, high_score));
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            record_high_score(&mut high_score, state.stats.score);
                            return Ok((LoopExit::Quit, high_score));
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => compute::toggle_pause(state),
                        KeyCode::Char('m') | KeyCode::Char('M') => {
                            record_high_score(&mut high_score, state.stats.score);
                            compute::go_to_menu(state);
                            return Ok((LoopExit::Menu, high_score));
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status == GameStatus::GameOver =>
                        {
                            prior_best = high_score;
                            dispatch(&compute::start(state));
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if state.status == GameStatus::Playing {
            let left = is_held(&key_frame, &KeyCode::Left, frame)
                || is_held(&key_frame, &KeyCode::Char('a'), frame)
                || is_held(&key_frame, &KeyCode::Char('A'), frame);
            let right = is_held(&key_frame, &KeyCode::Right, frame)
                || is_held(&key_frame, &KeyCode::Char('d'), frame)
                || is_held(&key_frame, &KeyCode::Char('D'), frame);

            let target = state.player.x
                + match (left, right) {
                    (true, false) => -PLAYER_STEP,
                    (false, true) => PLAYER_STEP,
                    _ => 0.0,
                };
            compute::set_player_target_x(state, target);
        }

        let host_now = epoch.elapsed().as_secs_f64() * 1000.0;
        let events = compute::tick(state, host_now, rng);
        dispatch(&events);
        if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
            record_high_score(&mut high_score, state.stats.score);
        }

        let (cols, rows) = terminal::size()?;
        let view = Viewport {
            cols,
            rows,
            field_width: state.width,
            field_height: state.height,
        };
        display::render(out, &view, &state.snapshot(), prior_best)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.clone())?;
    let config = load_config(&cli)?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread to blocking event reads so the game loop never
    // blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, config, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("game loop failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    rng: &mut impl Rng,
) -> std::io::Result<()> {
    let mut high_score = load_high_score();
    let mut state = compute::init_state(config, FIELD_WIDTH, FIELD_HEIGHT);

    loop {
        match show_menu(out, rx, high_score, state.config.rules.game_over)? {
            MenuResult::Quit => break,
            MenuResult::Start(rule) => {
                state.config.rules.game_over = rule;
                let (exit, best) = game_loop(out, &mut state, rx, rng, high_score)?;
                high_score = best;

                match exit {
                    LoopExit::Quit => break,
                    LoopExit::Menu => {}
                }
            }
        }
    }
    Ok(())
}
