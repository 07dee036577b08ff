use hero_monsters::compute::init_state;
use hero_monsters::entities::*;
use hero_monsters::rules::{Rules, JEWEL_VALUE_MAX, JEWEL_VALUE_MIN, MONSTER_DAMAGES};
use hero_monsters::spawn::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn quiet_rules() -> Rules {
    let mut rules = Rules::default();
    rules.monster.spawn_probability = 0.0;
    rules.coin.spawn_probability = 0.0;
    rules.jewel.spawn_probability = 0.0;
    rules
}

fn make_state(rules: Rules) -> GameState {
    init_state(rules).unwrap()
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn coin(x: i32, y: i32, width: i32) -> Coin {
    Coin {
        body: Body::new(x, y, width, 32, 5).unwrap(),
        value: 1,
    }
}

// ── Attribute rolls ───────────────────────────────────────────────────────────

#[test]
fn rolled_values_stay_in_range() {
    let mut rng = seeded_rng();
    for _ in 0..500 {
        assert!(MONSTER_DAMAGES.contains(&roll_damage(&mut rng)));
        assert!((1..=5).contains(&roll_coin_value(&mut rng)));
        assert!((JEWEL_VALUE_MIN..=JEWEL_VALUE_MAX).contains(&roll_jewel_value(&mut rng)));
    }
}

#[test]
fn small_values_are_more_common() {
    let mut rng = seeded_rng();
    let damages: Vec<u32> = (0..2000).map(|_| roll_damage(&mut rng)).collect();
    let weak = damages.iter().filter(|&&d| d == 1).count();
    let strong = damages.iter().filter(|&&d| d == 5).count();
    assert!(weak > strong);

    let coins: Vec<u32> = (0..2000).map(|_| roll_coin_value(&mut rng)).collect();
    let ones = coins.iter().filter(|&&v| v == 1).count();
    let fives = coins.iter().filter(|&&v| v == 5).count();
    assert!(ones > fives);
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[test]
fn positionable_only_when_clear() {
    let mut s = make_state(quiet_rules());
    s.coins.push(coin(100, 0, 32));
    assert!(!is_positionable(&Rect::new(110, 0, 40, 40), &s));
    assert!(is_positionable(&Rect::new(132, 0, 40, 40), &s));
}

#[test]
fn hero_does_not_block_placement() {
    let s = make_state(quiet_rules());
    assert!(is_positionable(&s.hero.rect(), &s));
}

#[test]
fn place_rejects_entity_wider_than_field() {
    let s = make_state(quiet_rules());
    assert_eq!(place(&mut seeded_rng(), &s, 2000, 10), None);
}

#[test]
fn place_gives_up_when_field_is_full() {
    let mut rules = quiet_rules();
    rules.spawn_attempts = 25;
    let mut s = make_state(rules);
    s.coins.push(coin(0, 0, 1024));
    assert_eq!(place(&mut seeded_rng(), &s, 32, 32), None);
}

#[test]
fn placed_rect_is_on_top_edge_inside_field() {
    let s = make_state(quiet_rules());
    let mut rng = seeded_rng();
    for _ in 0..100 {
        let r = place(&mut rng, &s, 40, 40).unwrap();
        assert_eq!(r.y, 0);
        assert!(r.x >= 0 && r.right() <= 1024);
    }
}

// ── Spawners ──────────────────────────────────────────────────────────────────

#[test]
fn zero_probability_never_spawns() {
    let mut s = make_state(quiet_rules());
    let mut rng = seeded_rng();
    for _ in 0..200 {
        spawn_all(&mut s, &mut rng);
    }
    assert!(s.monsters.is_empty());
    assert!(s.coins.is_empty());
    assert!(s.jewels.is_empty());
}

#[test]
fn spawned_monster_has_rolled_damage_and_matching_size() {
    let mut rules = quiet_rules();
    rules.monster.spawn_probability = 1.0;
    let mut s = make_state(rules);
    assert!(spawn_monster(&mut s, &mut seeded_rng()));

    let m = &s.monsters[0];
    assert!(MONSTER_DAMAGES.contains(&m.damage));
    let (w, h) = s.rules.monster_size(m.damage);
    assert_eq!((m.rect().width, m.rect().height), (w, h));
    assert_eq!(m.rect().y, 0);
    assert_eq!(m.body.speed, 3);
    assert_eq!(m.fade_state, FadeState::NotFading);
    assert_eq!(m.fade_duration_ms, 1200);
}

#[test]
fn spawned_coin_and_jewel_carry_values() {
    let mut rules = quiet_rules();
    rules.coin.spawn_probability = 1.0;
    rules.jewel.spawn_probability = 1.0;
    rules.spawn_attempts = 20;
    let mut s = make_state(rules);
    let mut rng = seeded_rng();
    assert!(spawn_coin(&mut s, &mut rng));
    assert!(spawn_jewel(&mut s, &mut rng));

    assert!((1..=5).contains(&s.coins[0].value));
    assert_eq!(s.coins[0].body.speed, 5);
    assert!((50..=100).contains(&s.jewels[0].value));
    assert_eq!(s.jewels[0].body.speed, 7);
}

#[test]
fn spawn_blocked_by_full_row_creates_nothing() {
    let mut rules = quiet_rules();
    rules.monster.spawn_probability = 1.0;
    let mut s = make_state(rules);
    s.coins.push(coin(0, 0, 1024));
    assert!(!spawn_monster(&mut s, &mut seeded_rng()));
    assert!(s.monsters.is_empty());
}

#[test]
fn caps_are_never_exceeded() {
    let mut rules = quiet_rules();
    rules.monster.spawn_probability = 1.0;
    rules.coin.spawn_probability = 1.0;
    rules.jewel.spawn_probability = 1.0;
    rules.spawn_attempts = 200;
    let mut s = make_state(rules);
    let mut rng = seeded_rng();
    for _ in 0..100 {
        spawn_all(&mut s, &mut rng);
        assert!(s.monsters.len() <= 5);
        assert!(s.coins.len() <= 3);
        assert!(s.jewels.len() <= 1);
    }
    assert!(!s.monsters.is_empty());
}

#[test]
fn monsters_fill_up_to_cap() {
    // Four monsters of at most 72 units leave hundreds of valid columns for
    // a fifth in a 1024-unit row.
    let mut rules = quiet_rules();
    rules.monster.spawn_probability = 1.0;
    rules.spawn_attempts = 500;
    let mut s = make_state(rules);
    let mut rng = seeded_rng();
    for _ in 0..20 {
        spawn_monster(&mut s, &mut rng);
    }
    assert_eq!(s.monsters.len(), 5);
}

#[test]
fn spawned_entities_never_overlap() {
    let mut rules = quiet_rules();
    rules.monster.spawn_probability = 1.0;
    rules.coin.spawn_probability = 1.0;
    rules.jewel.spawn_probability = 1.0;
    rules.monster.cap = 20;
    rules.coin.cap = 20;
    rules.jewel.cap = 20;
    rules.spawn_attempts = 10;
    let mut s = make_state(rules);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..300 {
        spawn_all(&mut s, &mut rng);
    }

    let rects: Vec<Rect> = s.occupied().collect();
    assert!(rects.len() > 3);
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn spawning_is_deterministic_for_a_seed() {
    let mut rules = quiet_rules();
    rules.monster.spawn_probability = 0.5;
    rules.coin.spawn_probability = 0.5;
    let run = || {
        let mut s = make_state(rules.clone());
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..20 {
            spawn_all(&mut s, &mut rng);
        }
        let rects: Vec<Rect> = s.occupied().collect();
        rects
    };
    assert_eq!(run(), run());
}
