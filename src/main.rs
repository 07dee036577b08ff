mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Print,
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hero_monsters::compute::{init_state, restart, tick, toggle_pause};
use hero_monsters::entities::{FrameInput, GameState, SoundEvent, SoundKind};
use hero_monsters::rules::{Rules, FRAME_MS};

const FRAME: Duration = Duration::from_millis(FRAME_MS);

/// Frames a direction key stays live after its last press or repeat.  Without
/// release events this is the only way a key goes up; 4 frames (80 ms) is
/// longer than the usual OS auto-repeat gap.
const HOLD_WINDOW: u64 = 4;

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

const LOG_FILE: &str = "hero_monsters.log";

fn any_held(last_seen: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        last_seen
            .get(key)
            .is_some_and(|&seen| frame.saturating_sub(seen) <= HOLD_WINDOW)
    })
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw/alternate-screen mode, so logs go to a file in the
/// temp directory.  Filter with `RUST_LOG` (default `info`).
fn init_logging() {
    let path = std::env::temp_dir().join(LOG_FILE);
    let Ok(file) = File::create(&path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!(path = %path.display(), "logging started");
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Owns raw mode and the alternate screen.  Dropping it puts the terminal
/// back, whichever way `main` leaves.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        let mut guard = TerminalGuard { keyboard_enhanced: false };

        out.execute(terminal::EnterAlternateScreen)
            .context("failed to enter the alternate screen")?;
        out.execute(cursor::Hide).context("failed to hide the cursor")?;

        // Release events are only reported by kitty-protocol terminals; the
        // rest keep working through HOLD_WINDOW expiry.
        guard.keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking reads happen on their own thread; the frame loop only polls the
/// channel.
fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });
    rx
}

// ── Audio ─────────────────────────────────────────────────────────────────────

/// A terminal has no mixer: hits ring the bell, pickups are only logged.
fn play_sounds<W: Write>(out: &mut W, sounds: &[SoundEvent]) -> std::io::Result<()> {
    for sound in sounds {
        match sound.kind {
            SoundKind::Hit => {
                out.queue(Print('\x07'))?;
            }
            SoundKind::Coin | SoundKind::Jewel => {
                debug!(kind = ?sound.kind, volume = sound.volume, "pickup sound");
            }
        }
    }
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Direction keys are tracked as "last frame seen" rather than acted on per
/// event, so holding a key moves the hero every frame and both directions
/// can be read at once.  Pause, restart and quit fire once per press.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let clock = Instant::now();

    let mut last_seen: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Input ─────────────────────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    last_seen.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            *state = toggle_pause(state);
                        }
                        KeyCode::Char(' ') => {
                            *state = restart(state);
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    last_seen.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    last_seen.remove(&code);
                }
            }
        }

        let input = FrameInput {
            left: any_held(&last_seen, &LEFT_KEYS, frame),
            right: any_held(&last_seen, &RIGHT_KEYS, frame),
        };

        // ── Simulate and draw ─────────────────────────────────────────────────
        let now = clock.elapsed().as_millis() as u64;
        *state = tick(state, now, input, &mut rng);

        play_sounds(out, &state.sounds)?;
        display::render(out, state, now)?;

        if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();

    let mut state = init_state(Rules::default()).context("invalid built-in rule set")?;
    let mut out = BufWriter::new(stdout());

    let result = {
        let _terminal = TerminalGuard::enter(&mut out)?;
        let rx = spawn_event_reader();
        let result = game_loop(&mut out, &mut state, &rx);
        let _ = out.flush();
        result
    };

    info!(score = state.score, "quit");
    result.context("game loop failed")
}
