mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use env_logger::{Builder, Env, Target};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use collect_the_point::config::GameConfig;
use collect_the_point::game::{Flow, Game};
use collect_the_point::platform::{Clock, Input, Key};

use display::TerminalSurface;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// 8 frames @ 60 FPS ≈ 133 ms, shorter than a typical OS repeat interval.
const HOLD_WINDOW: u64 = 8;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode, so log lines go to a file instead of stderr.
fn init_logging() {
    let path = std::env::var_os("COLLECT_THE_POINT_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("collect_the_point.log"));
    if let Ok(file) = File::create(&path) {
        Builder::from_env(Env::default().default_filter_or("info"))
            .target(Target::Pipe(Box::new(file)))
            .init();
    }
}

// ── Audio backend ─────────────────────────────────────────────────────────────

#[cfg(feature = "sound")]
fn audio_backend() -> collect_the_point::audio::rodio_backend::RodioAudio {
    let dir = std::env::var_os("COLLECT_THE_POINT_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));
    let audio = collect_the_point::audio::rodio_backend::RodioAudio::new(dir);
    info!(
        "audio output {}",
        if audio.is_enabled() { "enabled" } else { "unavailable, running silent" }
    );
    audio
}

#[cfg(not(feature = "sound"))]
fn audio_backend() -> collect_the_point::audio::NullAudio {
    collect_the_point::audio::NullAudio
}

// ── Clock ─────────────────────────────────────────────────────────────────────

struct SystemClock {
    start: Instant,
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

// ── Held-key input ────────────────────────────────────────────────────────────

/// Terminal keys bound to each game key.
fn bindings(key: Key) -> &'static [KeyCode] {
    match key {
        Key::PlayerUp => &[KeyCode::Up],
        Key::PlayerDown => &[KeyCode::Down],
        Key::PlayerLeft => &[KeyCode::Left],
        Key::PlayerRight => &[KeyCode::Right],
        Key::EnemyUp => &[KeyCode::Char('w'), KeyCode::Char('W')],
        Key::EnemyDown => &[KeyCode::Char('s'), KeyCode::Char('S')],
        Key::EnemyLeft => &[KeyCode::Char('a'), KeyCode::Char('A')],
        Key::EnemyRight => &[KeyCode::Char('d'), KeyCode::Char('D')],
        Key::Pause => &[KeyCode::Char('p'), KeyCode::Char('P')],
        Key::Confirm => &[KeyCode::Enter],
        Key::Restart => &[KeyCode::Char('r'), KeyCode::Char('R')],
        Key::Cancel => &[KeyCode::Esc],
        Key::Mute => &[KeyCode::Char('m'), KeyCode::Char('M')],
        Key::SelectHuman => &[KeyCode::Char('1')],
        Key::SelectAutonomous => &[KeyCode::Char('2')],
        Key::TargetPlayer => &[KeyCode::Char('j'), KeyCode::Char('J')],
        Key::TargetCoin => &[KeyCode::Char('c'), KeyCode::Char('C')],
    }
}

/// Instead of acting on each key event individually, we record the frame of
/// the last press/repeat event for every key and report a key as held while
/// that record is fresh.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`). Keys expire after `HOLD_WINDOW` frames of silence.
#[derive(Default)]
struct HeldKeys {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    quit: bool,
}

impl HeldKeys {
    fn drain(&mut self, rx: &mpsc::Receiver<Event>) {
        self.frame += 1;
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if kind == KeyEventKind::Press
                        && (code == KeyCode::Char('q')
                            || (code == KeyCode::Char('c')
                                && modifiers.contains(KeyModifiers::CONTROL)))
                    {
                        self.quit = true;
                    }
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            }
        }
    }

    fn fresh(&self, code: &KeyCode) -> bool {
        self.key_frame
            .get(code)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }
}

impl Input for HeldKeys {
    fn is_held(&self, key: Key) -> bool {
        bindings(key).iter().any(|code| self.fresh(code))
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = GameConfig::default();
    let clock = SystemClock {
        start: Instant::now(),
    };
    let mut game = Game::new(config, audio_backend(), StdRng::from_entropy(), clock.now_ms())?;
    info!("starting at {} fps", game.config().fps);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
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

    let result = run(&mut out, &mut game, &clock, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("final score {}", game.score());
    result
}

fn run<W: Write, A: collect_the_point::platform::Audio>(
    out: &mut W,
    game: &mut Game<A>,
    clock: &SystemClock,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let frame_time = game.config().frame_duration();
    let (cols, rows) = terminal::size()?;
    let mut surface = TerminalSurface::new(out, game.config().bounds(), cols, rows);
    let mut input = HeldKeys::default();

    loop {
        let frame_start = Instant::now();

        input.drain(rx);
        let now = clock.now_ms();
        if game.tick(&input, now) == Flow::Quit {
            break;
        }

        let (cols, rows) = terminal::size()?;
        surface.resize(cols, rows);
        game.draw(&mut surface, now)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
    Ok(())
}
