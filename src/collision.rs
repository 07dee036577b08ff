//! Hero collisions against the monster, coin and jewel groups.
//!
//! Detection is plain bounding-box overlap.  Monsters hurt (gated by the
//! hero's cooldown) and start fading; coins and jewels are picked up on
//! contact.

use tracing::{debug, info};

use crate::entities::{Collectible, Entity, GameState, Rect, SoundEvent, SoundKind};

/// What happened during one resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Total damage dealt to the hero.
    pub damage: u32,
    /// Values of coins collected, in collection order.
    pub coins: Vec<u32>,
    pub jewels: Vec<u32>,
}

/// Indices of every entity in `group` overlapping `target`.
pub fn overlapping<T: Entity>(target: &Rect, group: &[T]) -> Vec<usize> {
    group
        .iter()
        .enumerate()
        .filter(|(_, e)| e.rect().intersects(target))
        .map(|(i, _)| i)
        .collect()
}

/// Loudness of a collection sound: `log10(value + 1) / log10(cap)`, in [0, 1].
pub fn collection_volume(value: u32, cap: u32) -> f32 {
    if cap <= 1 {
        return 1.0;
    }
    let volume = (value as f64 + 1.0).log10() / (cap as f64).log10();
    volume.clamp(0.0, 1.0) as f32
}

// ── Monsters ─────────────────────────────────────────────────────────────────

/// Apply hero-vs-monster damage.  Returns the damage dealt (0 when nothing
/// touched the hero or the cooldown is still running).
///
/// Fading monsters are harmless.  Every newly hit monster starts fading and
/// keeps falling until the fade completes.
pub fn resolve_monsters(state: &mut GameState, now: u64) -> u32 {
    let hero = state.hero.rect();
    let hits: Vec<usize> = overlapping(&hero, &state.monsters)
        .into_iter()
        .filter(|&i| !state.monsters[i].is_fading())
        .collect();

    if hits.is_empty() || !state.hero.cooldown_elapsed(now) {
        return 0;
    }

    let damage: u32 = hits.iter().map(|&i| state.monsters[i].damage).sum();
    for &i in &hits {
        state.monsters[i].fade_out(now);
    }
    state.hero.take_hit(damage, now);
    state.sounds.push(SoundEvent {
        kind: SoundKind::Hit,
        volume: 1.0,
        repeats: state.rules.hit_sound_repeats,
    });
    info!(
        damage,
        monsters = hits.len(),
        life = state.hero.life_points,
        "hero hit"
    );

    if state.hero.life_points == 0 {
        state.game_over = true;
        info!(score = state.score, "game over");
    }
    damage
}

// ── Coins & jewels ───────────────────────────────────────────────────────────

/// Remove every item overlapping `target` and return their values.
pub fn collect<T: Collectible>(target: &Rect, items: &mut Vec<T>) -> Vec<u32> {
    let mut values = Vec::new();
    items.retain(|item| {
        if item.rect().intersects(target) {
            values.push(item.value());
            false
        } else {
            true
        }
    });
    values
}

/// Pick up coins and jewels touching the hero, crediting score and counters.
pub fn resolve_pickups(state: &mut GameState) -> (Vec<u32>, Vec<u32>) {
    let hero = state.hero.rect();

    let coins = collect(&hero, &mut state.coins);
    for &value in &coins {
        state.score += value;
        state.collected_coins += 1;
        state.sounds.push(SoundEvent {
            kind: SoundKind::Coin,
            volume: collection_volume(value, state.rules.coin_volume_cap),
            repeats: 0,
        });
        debug!(value, score = state.score, "coin collected");
    }

    let jewels = collect(&hero, &mut state.jewels);
    for &value in &jewels {
        state.score += value;
        state.collected_jewels += 1;
        state.sounds.push(SoundEvent {
            kind: SoundKind::Jewel,
            volume: collection_volume(value, state.rules.jewel_volume_cap),
            repeats: 0,
        });
        debug!(value, score = state.score, "jewel collected");
    }

    (coins, jewels)
}

/// Full resolution pass for one running frame.
pub fn resolve(state: &mut GameState, now: u64) -> CollisionReport {
    let damage = resolve_monsters(state, now);
    let (coins, jewels) = resolve_pickups(state);
    CollisionReport { damage, coins, jewels }
}
