//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, the clock and an RNG handle) and returns a
//! brand-new `GameState`.  Side effects are limited to the injected RNG.
//!
//! Time is a monotonic millisecond counter supplied by the caller.

use rand::Rng;
use tracing::{debug, info};

use crate::collision;
use crate::entities::{
    Entity, EntityKind, Falling, FrameInput, GameState, GameStatus, Hero, Liveness, Sprite,
};
use crate::error::RulesError;
use crate::rules::Rules;
use crate::spawn;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state, rejecting rule sets the game cannot run with.
pub fn init_state(rules: Rules) -> Result<GameState, RulesError> {
    rules.validate()?;
    Ok(fresh_state(rules))
}

fn fresh_state(rules: Rules) -> GameState {
    GameState {
        hero: Hero::starting(&rules),
        monsters: Vec::new(),
        coins: Vec::new(),
        jewels: Vec::new(),
        score: 0,
        level: 1,
        collected_coins: 0,
        collected_jewels: 0,
        game_over: false,
        paused: false,
        frame: 0,
        sounds: Vec::new(),
        rules,
    }
}

/// Empty every collection, zero the counters and recreate the hero.
/// The rule set is carried over.
pub fn reset(state: &GameState) -> GameState {
    info!(final_score = state.score, "game reset");
    fresh_state(state.rules.clone())
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

pub fn toggle_pause(state: &GameState) -> GameState {
    let paused = !state.paused;
    info!(paused, "pause toggled");
    GameState {
        paused,
        ..state.clone()
    }
}

/// Restart after game over.  Ignored while the game is still going.
pub fn restart(state: &GameState) -> GameState {
    if state.game_over {
        reset(state)
    } else {
        state.clone()
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub fn status(state: &GameState) -> GameStatus {
    if state.game_over {
        GameStatus::GameOver
    } else if state.paused {
        GameStatus::Paused
    } else if state.hero.is_blinking {
        GameStatus::Blinking
    } else {
        GameStatus::Running
    }
}

/// Everything the renderer needs to draw, back to front (hero last).
pub fn scene(state: &GameState) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(
        state.monsters.len() + state.coins.len() + state.jewels.len() + 1,
    );
    for monster in &state.monsters {
        sprites.push(Sprite {
            kind: EntityKind::Monster,
            rect: monster.rect(),
            value: Some(monster.damage),
            alpha: monster.alpha(),
        });
    }
    for coin in &state.coins {
        sprites.push(Sprite {
            kind: EntityKind::Coin,
            rect: coin.rect(),
            value: Some(coin.value),
            alpha: 255,
        });
    }
    for jewel in &state.jewels {
        sprites.push(Sprite {
            kind: EntityKind::Jewel,
            rect: jewel.rect(),
            value: Some(jewel.value),
            alpha: 255,
        });
    }
    sprites.push(Sprite {
        kind: EntityKind::Hero,
        rect: state.hero.rect(),
        value: None,
        alpha: 255,
    });
    sprites
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Only a running game moves: while paused, blinking or over, the state is
/// returned untouched apart from the frame counter and blink expiry.  During
/// a blink, hit monsters keep fading in place.
pub fn tick(
    state: &GameState,
    now: u64,
    input: FrameInput,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    next.sounds.clear();
    next.frame += 1;

    // ── 1. Blink window ──────────────────────────────────────────────────────
    if next.hero.expire_blink(now, next.rules.blink_duration_ms) {
        debug!("hero stopped blinking");
    }
    match status(&next) {
        GameStatus::Running => {}
        GameStatus::Blinking => {
            next.monsters.retain_mut(|m| m.advance_fade(now) == Liveness::Alive);
            return next;
        }
        GameStatus::Paused | GameStatus::GameOver => return next,
    }

    // ── 2. Move hero and falling entities ────────────────────────────────────
    let (width, height) = (next.rules.field_width, next.rules.field_height);
    next.hero.update(input, width);
    next.monsters.retain_mut(|m| m.update(now, height) == Liveness::Alive);
    next.coins.retain_mut(|c| c.update(now, height) == Liveness::Alive);
    next.jewels.retain_mut(|j| j.update(now, height) == Liveness::Alive);

    // ── 3. Spawn ─────────────────────────────────────────────────────────────
    spawn::spawn_all(&mut next, rng);

    // ── 4. Collisions ────────────────────────────────────────────────────────
    collision::resolve(&mut next, now);

    next
}
