//! Tunable game constants.
//!
//! `Rules::default()` is the canonical rule set the binary plays with.
//! Tests build their own variants (e.g. a spawn probability of 1.0) to make
//! the simulation deterministic.

use crate::error::{EntityError, RulesError};

/// Frame period of the main loop (50 frames per second).
pub const FRAME_MS: u64 = 20;

// ── Value tables ─────────────────────────────────────────────────────────────

/// Possible monster damages.  Each is drawn with weight `1 / (damage + 1)`,
/// so weak monsters are the common case.
pub const MONSTER_DAMAGES: [u32; 5] = [1, 2, 3, 4, 5];

/// Coin values paired with their relative draw weight.
pub const COIN_VALUE_WEIGHTS: [(u32, u32); 5] = [(1, 50), (2, 20), (3, 15), (4, 10), (5, 5)];

/// Inclusive bounds of a jewel's (uniform) value.
pub const JEWEL_VALUE_MIN: u32 = 50;
pub const JEWEL_VALUE_MAX: u32 = 100;

// ── Per-kind tuning ──────────────────────────────────────────────────────────

/// Geometry, speed and spawn behaviour shared by every falling entity kind.
#[derive(Clone, Debug, PartialEq)]
pub struct KindRules {
    pub width: i32,
    pub height: i32,
    /// Vertical distance covered per frame.
    pub speed: i32,
    /// Maximum number alive at once.
    pub cap: usize,
    /// Chance per frame of attempting a spawn.
    pub spawn_probability: f64,
}

impl KindRules {
    fn validate(&self, what: &'static str) -> Result<(), RulesError> {
        if self.width < 0 || self.height < 0 {
            return Err(RulesError::Entity {
                what,
                source: EntityError::NegativeSize { width: self.width, height: self.height },
            });
        }
        if self.speed < 0 {
            return Err(RulesError::Entity { what, source: EntityError::NegativeSpeed(self.speed) });
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            return Err(RulesError::InvalidProbability { what, value: self.spawn_probability });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    pub field_width: i32,
    pub field_height: i32,

    pub hero_width: i32,
    pub hero_height: i32,
    /// Horizontal distance covered per frame while a direction key is held.
    pub hero_speed: i32,
    /// Gap between the hero's feet and the bottom of the playfield.
    pub hero_bottom_margin: i32,
    pub hero_life: u32,
    /// Minimum time between two damaging monster collisions.
    pub collision_cooldown_ms: u64,
    /// Length of the invulnerability blink after a hit.
    pub blink_duration_ms: u64,

    pub monster: KindRules,
    pub coin: KindRules,
    pub jewel: KindRules,

    /// Time a hit monster takes to fade from opaque to gone.
    pub fade_duration_ms: u64,
    /// Candidate positions tried per kind per frame before giving up.
    pub spawn_attempts: u32,

    /// Collection sound volume reaches 1.0 at this value.
    pub coin_volume_cap: u32,
    pub jewel_volume_cap: u32,
    pub hit_sound_repeats: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            field_width: 1024,
            field_height: 768,

            hero_width: 64,
            hero_height: 64,
            hero_speed: 5,
            hero_bottom_margin: 10,
            hero_life: 10,
            collision_cooldown_ms: 1000,
            blink_duration_ms: 2000,

            monster: KindRules {
                width: 48,
                height: 48,
                speed: 3,
                cap: 5,
                spawn_probability: 0.06,
            },
            coin: KindRules {
                width: 32,
                height: 32,
                speed: 5,
                cap: 3,
                spawn_probability: 0.05,
            },
            jewel: KindRules {
                width: 40,
                height: 40,
                speed: 7,
                cap: 1,
                spawn_probability: 0.005,
            },

            fade_duration_ms: 1200,
            spawn_attempts: 1,

            coin_volume_cap: 26,
            jewel_volume_cap: 100,
            hit_sound_repeats: 3,
        }
    }
}

impl Rules {
    /// Reject rule sets the simulation cannot run with.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.field_width <= 0 || self.field_height <= 0 {
            return Err(RulesError::EmptyPlayfield {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.hero_width < 0 || self.hero_height < 0 {
            return Err(RulesError::Entity {
                what: "hero",
                source: EntityError::NegativeSize {
                    width: self.hero_width,
                    height: self.hero_height,
                },
            });
        }
        if self.hero_speed < 0 {
            return Err(RulesError::Entity {
                what: "hero",
                source: EntityError::NegativeSpeed(self.hero_speed),
            });
        }
        if self.hero_bottom_margin < 0 {
            return Err(RulesError::NegativeMargin(self.hero_bottom_margin));
        }
        if self.hero_width > self.field_width
            || self.hero_height + self.hero_bottom_margin > self.field_height
        {
            return Err(RulesError::HeroDoesNotFit {
                width: self.hero_width,
                height: self.hero_height,
            });
        }
        self.monster.validate("monster")?;
        self.coin.validate("coin")?;
        self.jewel.validate("jewel")?;
        if self.spawn_attempts == 0 {
            return Err(RulesError::NoSpawnAttempts);
        }
        Ok(())
    }

    /// Monster edge length for a given damage: bigger hits look bigger.
    pub fn monster_size(&self, damage: u32) -> (i32, i32) {
        let scale = |base: i32| base + base * damage as i32 / 10;
        (scale(self.monster.width), scale(self.monster.height))
    }
}
