//! All game entity types and the master game state.
//!
//! Shared movement lives on `Body` and the `Falling` trait; each kind only
//! carries its own extra fields.

use crate::error::EntityError;
use crate::rules::Rules;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in playfield units.  `y` grows downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Bounding-box overlap.  Rectangles that merely share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Position, size and speed common to every entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub speed: i32,
}

impl Body {
    /// Validated constructor: coordinates, size and speed must be non-negative.
    pub fn new(x: i32, y: i32, width: i32, height: i32, speed: i32) -> Result<Self, EntityError> {
        if x < 0 {
            return Err(EntityError::NegativeCoordinate { axis: 'x', value: x });
        }
        if y < 0 {
            return Err(EntityError::NegativeCoordinate { axis: 'y', value: y });
        }
        if width < 0 || height < 0 {
            return Err(EntityError::NegativeSize { width, height });
        }
        if speed < 0 {
            return Err(EntityError::NegativeSpeed(speed));
        }
        Ok(Body {
            rect: Rect::new(x, y, width, height),
            speed,
        })
    }

    /// Move down by one frame's worth of speed.
    pub fn fall(&mut self) {
        self.rect.y += self.speed;
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Hero,
    Monster,
    Coin,
    Jewel,
}

/// Outcome of a per-frame update: dead entities are dropped by their owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

/// Anything with a body in the playfield.
pub trait Entity {
    fn body(&self) -> &Body;
    fn kind(&self) -> EntityKind;

    fn rect(&self) -> Rect {
        self.body().rect
    }
}

/// Entities that drift down the screen and vanish below it.
pub trait Falling: Entity {
    fn body_mut(&mut self) -> &mut Body;

    /// Advance one frame.  The entity dies once its top edge has passed the
    /// bottom of the playfield, so it slides fully out of view first.
    fn update(&mut self, _now: u64, field_height: i32) -> Liveness {
        let body = self.body_mut();
        body.fall();
        if body.rect.top() > field_height {
            Liveness::Dead
        } else {
            Liveness::Alive
        }
    }
}

/// Falling entities the hero picks up for score.
pub trait Collectible: Falling {
    fn value(&self) -> u32;
}

// ── Hero ─────────────────────────────────────────────────────────────────────

/// Held-key state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hero {
    pub body: Body,
    pub life_points: u32,
    pub collision_cooldown_ms: u64,
    /// `None` until the first damaging collision.
    pub last_collision_time: Option<u64>,
    pub is_blinking: bool,
    pub blink_started_at: u64,
}

impl Hero {
    pub fn new(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        speed: i32,
        life_points: u32,
        collision_cooldown_ms: u64,
    ) -> Result<Self, EntityError> {
        Ok(Hero {
            body: Body::new(x, y, width, height, speed)?,
            life_points,
            collision_cooldown_ms,
            last_collision_time: None,
            is_blinking: false,
            blink_started_at: 0,
        })
    }

    /// A fresh hero, centred at the bottom of the playfield.
    ///
    /// Infallible: out-of-range rule values are clamped to zero.  Rule sets
    /// that went through `Rules::validate` never need clamping.
    pub fn starting(rules: &Rules) -> Self {
        let width = rules.hero_width.max(0);
        let height = rules.hero_height.max(0);
        let x = (rules.field_width / 2 - width / 2).max(0);
        let y = (rules.field_height - height - rules.hero_bottom_margin).max(0);
        Hero {
            body: Body {
                rect: Rect::new(x, y, width, height),
                speed: rules.hero_speed.max(0),
            },
            life_points: rules.hero_life,
            collision_cooldown_ms: rules.collision_cooldown_ms,
            last_collision_time: None,
            is_blinking: false,
            blink_started_at: 0,
        }
    }

    /// Slide horizontally according to the held keys, staying fully inside
    /// the playfield.  Holding both directions cancels out.
    pub fn update(&mut self, input: FrameInput, field_width: i32) {
        let mut dx = 0;
        if input.left {
            dx -= self.body.speed;
        }
        if input.right {
            dx += self.body.speed;
        }
        let max_x = (field_width - self.body.rect.width).max(0);
        self.body.rect.x = (self.body.rect.x + dx).clamp(0, max_x);
    }

    /// True once enough time has passed since the last damaging collision.
    pub fn cooldown_elapsed(&self, now: u64) -> bool {
        match self.last_collision_time {
            None => true,
            Some(last) => now.saturating_sub(last) > self.collision_cooldown_ms,
        }
    }

    /// Apply damage (floored at zero) and start the invulnerability blink.
    pub fn take_hit(&mut self, damage: u32, now: u64) {
        self.life_points = self.life_points.saturating_sub(damage);
        self.last_collision_time = Some(now);
        self.is_blinking = true;
        self.blink_started_at = now;
    }

    /// Stop blinking once `duration_ms` has passed.  Returns true on the
    /// frame the blink ends.
    pub fn expire_blink(&mut self, now: u64, duration_ms: u64) -> bool {
        if self.is_blinking && now.saturating_sub(self.blink_started_at) >= duration_ms {
            self.is_blinking = false;
            return true;
        }
        false
    }
}

impl Entity for Hero {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Hero
    }
}

// ── Monster ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeState {
    NotFading,
    Fading { started_at: u64, alpha: u8 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Monster {
    pub body: Body,
    pub damage: u32,
    pub fade_state: FadeState,
    pub fade_duration_ms: u64,
}

impl Monster {
    pub fn new(body: Body, damage: u32, fade_duration_ms: u64) -> Self {
        Monster {
            body,
            damage,
            fade_state: FadeState::NotFading,
            fade_duration_ms,
        }
    }

    /// Start fading.  A monster already fading keeps its original start time.
    pub fn fade_out(&mut self, now: u64) {
        if self.fade_state == FadeState::NotFading {
            self.fade_state = FadeState::Fading { started_at: now, alpha: 255 };
        }
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.fade_state, FadeState::Fading { .. })
    }

    pub fn alpha(&self) -> u8 {
        match self.fade_state {
            FadeState::NotFading => 255,
            FadeState::Fading { alpha, .. } => alpha,
        }
    }

    /// Recompute opacity for `now` without moving.  Dead once the fade has
    /// run its full duration.
    pub fn advance_fade(&mut self, now: u64) -> Liveness {
        let FadeState::Fading { started_at, .. } = self.fade_state else {
            return Liveness::Alive;
        };
        let elapsed = now.saturating_sub(started_at);
        if elapsed >= self.fade_duration_ms {
            return Liveness::Dead;
        }
        let alpha = 255 - 255 * elapsed / self.fade_duration_ms;
        self.fade_state = FadeState::Fading { started_at, alpha: alpha as u8 };
        Liveness::Alive
    }
}

impl Entity for Monster {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Monster
    }
}

impl Falling for Monster {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Falls like everything else; a fading monster also loses opacity
    /// linearly and dies when it reaches zero.
    fn update(&mut self, now: u64, field_height: i32) -> Liveness {
        self.body.fall();
        if self.body.rect.top() > field_height {
            return Liveness::Dead;
        }
        self.advance_fade(now)
    }
}

// ── Coin & Jewel ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    pub body: Body,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Jewel {
    pub body: Body,
    pub value: u32,
}

impl Entity for Coin {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Coin
    }
}

impl Falling for Coin {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Collectible for Coin {
    fn value(&self) -> u32 {
        self.value
    }
}

impl Entity for Jewel {
    fn body(&self) -> &Body {
        &self.body
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Jewel
    }
}

impl Falling for Jewel {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Collectible for Jewel {
    fn value(&self) -> u32 {
        self.value
    }
}

// ── Audio & render views ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundKind {
    Coin,
    Jewel,
    Hit,
}

/// A sound the front-end should play this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundEvent {
    pub kind: SoundKind,
    /// In [0, 1].
    pub volume: f32,
    /// Extra plays after the first.
    pub repeats: u32,
}

/// One drawable entity, flattened for the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub kind: EntityKind,
    pub rect: Rect,
    /// Score value for coins and jewels, damage for monsters.
    pub value: Option<u32>,
    pub alpha: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Paused,
    /// Hero invulnerability window after a hit; simulation is frozen.
    Blinking,
    GameOver,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub hero: Hero,
    pub monsters: Vec<Monster>,
    pub coins: Vec<Coin>,
    pub jewels: Vec<Jewel>,
    pub score: u32,
    pub level: u32,
    pub collected_coins: u32,
    pub collected_jewels: u32,
    pub game_over: bool,
    pub paused: bool,
    /// Number of ticks processed since the last reset.
    pub frame: u64,
    /// Sounds triggered by the most recent tick.
    pub sounds: Vec<SoundEvent>,
    pub rules: Rules,
}

impl GameState {
    /// Bounding boxes of everything a new spawn must stay clear of.
    /// The hero is deliberately not included.
    pub fn occupied(&self) -> impl Iterator<Item = Rect> + '_ {
        self.monsters
            .iter()
            .map(|m| m.rect())
            .chain(self.coins.iter().map(|c| c.rect()))
            .chain(self.jewels.iter().map(|j| j.rect()))
    }
}
