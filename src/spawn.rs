//! Randomised spawning of monsters, coins and jewels.
//!
//! Every kind rolls its own spawn chance each frame.  A candidate is placed
//! on the top edge at a random column and kept only if its bounding box is
//! clear of every live monster, coin and jewel.  At most
//! `Rules::spawn_attempts` columns are tried; running out means nothing
//! spawns this frame.  All randomness comes through the injected RNG.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{debug, warn};

use crate::entities::{Body, Coin, GameState, Jewel, Monster, Rect};
use crate::rules::{KindRules, COIN_VALUE_WEIGHTS, JEWEL_VALUE_MAX, JEWEL_VALUE_MIN, MONSTER_DAMAGES};

// ── Attribute rolls ──────────────────────────────────────────────────────────

/// Monster damage, weighted `1 / (damage + 1)`.
pub fn roll_damage(rng: &mut impl Rng) -> u32 {
    let weights = MONSTER_DAMAGES.iter().map(|&d| 1.0 / (d as f64 + 1.0));
    match WeightedIndex::new(weights) {
        Ok(dist) => MONSTER_DAMAGES[dist.sample(rng)],
        Err(_) => MONSTER_DAMAGES[0],
    }
}

pub fn roll_coin_value(rng: &mut impl Rng) -> u32 {
    match WeightedIndex::new(COIN_VALUE_WEIGHTS.iter().map(|&(_, weight)| weight)) {
        Ok(dist) => COIN_VALUE_WEIGHTS[dist.sample(rng)].0,
        Err(_) => COIN_VALUE_WEIGHTS[0].0,
    }
}

pub fn roll_jewel_value(rng: &mut impl Rng) -> u32 {
    rng.gen_range(JEWEL_VALUE_MIN..=JEWEL_VALUE_MAX)
}

// ── Placement ────────────────────────────────────────────────────────────────

/// True if `candidate` overlaps none of the live monsters, coins or jewels.
pub fn is_positionable(candidate: &Rect, state: &GameState) -> bool {
    state.occupied().all(|r| !r.intersects(candidate))
}

/// Find a free top-edge slot for a `width` x `height` entity, or `None` if
/// every attempt collided (or the entity is wider than the playfield).
pub fn place(rng: &mut impl Rng, state: &GameState, width: i32, height: i32) -> Option<Rect> {
    let max_x = state.rules.field_width - width;
    if max_x < 0 {
        return None;
    }
    for _ in 0..state.rules.spawn_attempts {
        let candidate = Rect::new(rng.gen_range(0..=max_x), 0, width, height);
        if is_positionable(&candidate, state) {
            return Some(candidate);
        }
    }
    None
}

fn should_attempt(rng: &mut impl Rng, live: usize, kind: &KindRules) -> bool {
    live < kind.cap && rng.gen_bool(kind.spawn_probability)
}

fn new_body(
    rng: &mut impl Rng,
    state: &GameState,
    (width, height): (i32, i32),
    speed: i32,
) -> Option<Body> {
    let rect = place(rng, state, width, height)?;
    match Body::new(rect.x, rect.y, width, height, speed) {
        Ok(body) => Some(body),
        Err(err) => {
            warn!("rejected spawn: {err}");
            None
        }
    }
}

// ── Per-kind spawners ────────────────────────────────────────────────────────

/// Returns true if a monster was added.
pub fn spawn_monster(state: &mut GameState, rng: &mut impl Rng) -> bool {
    if !should_attempt(rng, state.monsters.len(), &state.rules.monster) {
        return false;
    }
    let damage = roll_damage(rng);
    let size = state.rules.monster_size(damage);
    let speed = state.rules.monster.speed;
    let Some(body) = new_body(rng, &*state, size, speed) else {
        return false;
    };
    debug!(x = body.rect.x, damage, "monster spawned");
    let fade = state.rules.fade_duration_ms;
    state.monsters.push(Monster::new(body, damage, fade));
    true
}

/// Returns true if a coin was added.
pub fn spawn_coin(state: &mut GameState, rng: &mut impl Rng) -> bool {
    if !should_attempt(rng, state.coins.len(), &state.rules.coin) {
        return false;
    }
    let value = roll_coin_value(rng);
    let size = (state.rules.coin.width, state.rules.coin.height);
    let speed = state.rules.coin.speed;
    let Some(body) = new_body(rng, &*state, size, speed) else {
        return false;
    };
    debug!(x = body.rect.x, value, "coin spawned");
    state.coins.push(Coin { body, value });
    true
}

/// Returns true if a jewel was added.
pub fn spawn_jewel(state: &mut GameState, rng: &mut impl Rng) -> bool {
    if !should_attempt(rng, state.jewels.len(), &state.rules.jewel) {
        return false;
    }
    let value = roll_jewel_value(rng);
    let size = (state.rules.jewel.width, state.rules.jewel.height);
    let speed = state.rules.jewel.speed;
    let Some(body) = new_body(rng, &*state, size, speed) else {
        return false;
    };
    debug!(x = body.rect.x, value, "jewel spawned");
    state.jewels.push(Jewel { body, value });
    true
}

/// One spawn round: monsters, then coins, then jewels.
pub fn spawn_all(state: &mut GameState, rng: &mut impl Rng) {
    spawn_monster(state, rng);
    spawn_coin(state, rng);
    spawn_jewel(state, rng);
}
