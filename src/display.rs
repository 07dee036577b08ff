//! Terminal renderer for the playfield.
//!
//! Takes a writer and a read-only `GameState` and queues crossterm commands;
//! it never mutates the game.  Playfield units are scaled down onto the
//! character grid inside the border.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use hero_monsters::compute::{scene, status};
use hero_monsters::entities::{EntityKind, GameState, GameStatus, Rect, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIFE: Color = Color::Red;
const C_HUD_TEXT: Color = Color::Grey;
const C_HERO: Color = Color::White;
const C_HERO_GLOW: Color = Color::Red;
const C_MONSTER_WEAK: Color = Color::Green;
const C_MONSTER_MID: Color = Color::Yellow;
const C_MONSTER_STRONG: Color = Color::Red;
const C_MONSTER_FADING: Color = Color::DarkGrey;
const C_COIN: Color = Color::Yellow;
const C_JEWEL: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Half of the hero's blink period.
const BLINK_PHASE_MS: u64 = 500;

// ── Grid mapping ──────────────────────────────────────────────────────────────

/// Terminal area the playfield is projected onto: inside the border,
/// between the HUD row and the hint row.
struct Viewport {
    cols: i32,
    rows: i32,
    field_width: i32,
    field_height: i32,
}

impl Viewport {
    const LEFT: i32 = 1;
    const TOP: i32 = 2;

    fn new(state: &GameState, width: u16, height: u16) -> Self {
        Viewport {
            cols: (width as i32 - 2).max(1),
            rows: (height as i32 - 4).max(1),
            field_width: state.rules.field_width.max(1),
            field_height: state.rules.field_height.max(1),
        }
    }

    /// Top-left cell and cell size of a playfield rectangle.
    fn project(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let col = Self::LEFT + rect.x * self.cols / self.field_width;
        let row = Self::TOP + rect.y * self.rows / self.field_height;
        let w = (rect.width * self.cols / self.field_width).max(1);
        let h = (rect.height * self.rows / self.field_height).max(1);
        (col, row, w, h)
    }

    fn contains_row(&self, row: i32) -> bool {
        (Self::TOP..Self::TOP + self.rows).contains(&row)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, now: u64) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(state, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;

    for sprite in scene(state) {
        match sprite.kind {
            EntityKind::Monster => draw_monster(out, &view, &sprite)?,
            EntityKind::Coin => draw_loot(out, &view, &sprite, '$', C_COIN)?,
            EntityKind::Jewel => draw_loot(out, &view, &sprite, '◆', C_JEWEL)?,
            EntityKind::Hero => draw_hero(out, &view, &sprite, state.hero.is_blinking, now)?,
        }
    }

    draw_controls_hint(out, height)?;

    match status(state) {
        GameStatus::GameOver => draw_game_over(out, state, width, height)?,
        GameStatus::Paused => draw_paused(out, width, height)?,
        GameStatus::Running | GameStatus::Blinking => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", state.score)))?;

    out.queue(style::SetForegroundColor(C_HUD_LIFE))?;
    out.queue(Print(format!("   ♥ {:>2}", state.hero.life_points)))?;

    out.queue(style::SetForegroundColor(C_HUD_TEXT))?;
    out.queue(Print(format!("   Level {}", state.level)))?;

    let tally = format!(
        "$ {}   ◆ {}",
        state.collected_coins, state.collected_jewels
    );
    let rx = width.saturating_sub(tally.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(&tally))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn put<W: Write>(
    out: &mut W,
    view: &Viewport,
    col: i32,
    row: i32,
    text: &str,
) -> std::io::Result<()> {
    if !view.contains_row(row) {
        return Ok(());
    }
    let max_col = Viewport::LEFT + view.cols;
    let col = col.clamp(Viewport::LEFT, max_col - 1);
    let room = (max_col - col).max(0) as usize;
    let clipped: String = text.chars().take(room).collect();
    out.queue(cursor::MoveTo(col as u16, row as u16))?;
    out.queue(Print(clipped))?;
    Ok(())
}

fn draw_hero<W: Write>(
    out: &mut W,
    view: &Viewport,
    sprite: &Sprite,
    blinking: bool,
    now: u64,
) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲
    //  /|\
    let (col, row, w, h) = view.project(&sprite.rect);
    let glow = blinking && (now / BLINK_PHASE_MS) % 2 == 1;
    out.queue(style::SetForegroundColor(if glow { C_HERO_GLOW } else { C_HERO }))?;

    let mid = col + w / 2;
    put(out, view, mid, row, "▲")?;
    if h > 1 {
        put(out, view, mid - 1, row + 1, "/|\\")?;
    }
    Ok(())
}

fn monster_color(sprite: &Sprite) -> Color {
    if sprite.alpha < 255 {
        return C_MONSTER_FADING;
    }
    match sprite.value.unwrap_or(1) {
        0..=2 => C_MONSTER_WEAK,
        3 => C_MONSTER_MID,
        _ => C_MONSTER_STRONG,
    }
}

fn draw_monster<W: Write>(out: &mut W, view: &Viewport, sprite: &Sprite) -> std::io::Result<()> {
    // Row 0:  <▼▼>
    // Row n:  [__]
    let (col, row, w, h) = view.project(&sprite.rect);
    let inner = (w - 2).max(1) as usize;
    out.queue(style::SetForegroundColor(monster_color(sprite)))?;

    put(out, view, col, row, &format!("<{}>", "▼".repeat(inner)))?;
    for dy in 1..h {
        put(out, view, col, row + dy, &format!("[{}]", "_".repeat(inner)))?;
    }
    Ok(())
}

fn draw_loot<W: Write>(
    out: &mut W,
    view: &Viewport,
    sprite: &Sprite,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let (col, row, _, _) = view.project(&sprite.rect);
    out.queue(style::SetForegroundColor(color))?;
    let label = match sprite.value {
        Some(value) => format!("{glyph}{value}"),
        None => glyph.to_string(),
    };
    put(out, view, col, row, &label)
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_paused<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Cyan),
        ("║      PAUSED      ║", Color::Cyan),
        ("╚══════════════════╝", Color::Cyan),
        ("P - Resume  Q - Quit", Color::White),
    ];
    draw_centered(out, lines, width, height)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", state.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("SPACE - Play Again  Q - Quit", Color::White),
    ];
    draw_centered(out, lines, width, height)
}
