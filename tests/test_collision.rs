use hero_monsters::collision::*;
use hero_monsters::compute::init_state;
use hero_monsters::entities::*;
use hero_monsters::rules::Rules;

fn quiet_rules() -> Rules {
    let mut rules = Rules::default();
    rules.monster.spawn_probability = 0.0;
    rules.coin.spawn_probability = 0.0;
    rules.jewel.spawn_probability = 0.0;
    rules
}

/// Hero sits at (480, 694), 64x64.
fn make_state() -> GameState {
    init_state(quiet_rules()).unwrap()
}

fn monster(x: i32, y: i32, damage: u32) -> Monster {
    Monster::new(Body::new(x, y, 48, 48, 3).unwrap(), damage, 1200)
}

fn coin(x: i32, y: i32, value: u32) -> Coin {
    Coin {
        body: Body::new(x, y, 32, 32, 5).unwrap(),
        value,
    }
}

fn jewel(x: i32, y: i32, value: u32) -> Jewel {
    Jewel {
        body: Body::new(x, y, 40, 40, 7).unwrap(),
        value,
    }
}

// ── Detection ─────────────────────────────────────────────────────────────────

#[test]
fn overlapping_returns_matching_indices() {
    let group = vec![monster(0, 0, 1), monster(480, 690, 1), monster(900, 700, 1)];
    let hero = Rect::new(480, 694, 64, 64);
    assert_eq!(overlapping(&hero, &group), vec![1]);
}

#[test]
fn volume_is_log_scaled_and_clamped() {
    let v = collection_volume(4, 26);
    assert!((v - (5f32.log10() / 26f32.log10())).abs() < 1e-6);
    assert_eq!(collection_volume(100, 26), 1.0);
    assert_eq!(collection_volume(25, 26), 1.0);
    assert!(collection_volume(0, 100) >= 0.0);
}

// ── Monsters ──────────────────────────────────────────────────────────────────

#[test]
fn monster_hit_subtracts_damage_and_starts_fade() {
    let mut s = make_state();
    s.monsters.push(monster(480, 680, 3));
    let dealt = resolve_monsters(&mut s, 5000);

    assert_eq!(dealt, 3);
    assert_eq!(s.hero.life_points, 7);
    assert!(!s.game_over);
    assert!(s.monsters[0].is_fading());
    assert_eq!(s.hero.last_collision_time, Some(5000));
    assert!(s.hero.is_blinking);
    assert_eq!(s.sounds.len(), 1);
    assert_eq!(s.sounds[0].kind, SoundKind::Hit);
    assert_eq!(s.sounds[0].repeats, 3);
}

#[test]
fn simultaneous_hits_sum_damage() {
    let mut s = make_state();
    s.monsters.push(monster(470, 680, 2));
    s.monsters.push(monster(510, 690, 4));
    s.monsters.push(monster(0, 0, 5)); // far away
    assert_eq!(resolve_monsters(&mut s, 5000), 6);
    assert_eq!(s.hero.life_points, 4);
    assert!(s.monsters[0].is_fading());
    assert!(s.monsters[1].is_fading());
    assert!(!s.monsters[2].is_fading());
}

#[test]
fn lethal_hit_clamps_life_and_ends_game() {
    let mut s = make_state();
    s.hero.life_points = 3;
    s.monsters.push(monster(480, 680, 5));
    resolve_monsters(&mut s, 5000);
    assert_eq!(s.hero.life_points, 0);
    assert!(s.game_over);
}

#[test]
fn hit_within_cooldown_is_ignored() {
    let mut s = make_state();
    s.hero.last_collision_time = Some(4500);
    s.monsters.push(monster(480, 680, 3));
    assert_eq!(resolve_monsters(&mut s, 5000), 0);
    assert_eq!(s.hero.life_points, 10);
    assert!(!s.monsters[0].is_fading());
    assert!(s.sounds.is_empty());
}

#[test]
fn second_hit_inside_cooldown_deals_nothing() {
    let mut s = make_state();
    s.monsters.push(monster(480, 680, 2));
    resolve_monsters(&mut s, 5000);
    s.monsters.push(monster(500, 690, 4));
    assert_eq!(resolve_monsters(&mut s, 5800), 0);
    assert_eq!(s.hero.life_points, 8);
    assert_eq!(resolve_monsters(&mut s, 6001), 4);
    assert_eq!(s.hero.life_points, 4);
}

#[test]
fn fading_monsters_are_harmless() {
    let mut s = make_state();
    let mut m = monster(480, 680, 3);
    m.fade_out(100);
    s.monsters.push(m);
    assert_eq!(resolve_monsters(&mut s, 5000), 0);
    assert_eq!(s.hero.life_points, 10);
    assert_eq!(s.monsters.len(), 1);
}

#[test]
fn no_contact_no_damage() {
    let mut s = make_state();
    s.monsters.push(monster(0, 0, 5));
    assert_eq!(resolve_monsters(&mut s, 5000), 0);
    assert_eq!(s.hero.last_collision_time, None);
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn coin_pickup_scores_and_removes() {
    let mut s = make_state();
    s.coins.push(coin(490, 700, 4));
    s.coins.push(coin(10, 10, 2));
    let (coins, jewels) = resolve_pickups(&mut s);

    assert_eq!(coins, vec![4]);
    assert!(jewels.is_empty());
    assert_eq!(s.score, 4);
    assert_eq!(s.collected_coins, 1);
    assert_eq!(s.coins.len(), 1);
    assert_eq!(s.coins[0].value, 2);
    assert_eq!(s.sounds[0].kind, SoundKind::Coin);
    assert_eq!(s.sounds[0].volume, collection_volume(4, 26));
}

#[test]
fn jewel_pickup_scores_and_counts() {
    let mut s = make_state();
    s.score = 10;
    s.jewels.push(jewel(500, 700, 80));
    resolve_pickups(&mut s);
    assert_eq!(s.score, 90);
    assert_eq!(s.collected_jewels, 1);
    assert_eq!(s.collected_coins, 0);
    assert!(s.jewels.is_empty());
    assert_eq!(s.sounds[0].kind, SoundKind::Jewel);
}

#[test]
fn pickups_ignore_cooldown() {
    let mut s = make_state();
    s.hero.last_collision_time = Some(4999);
    s.coins.push(coin(490, 700, 1));
    s.coins.push(coin(520, 700, 3));
    let report = resolve(&mut s, 5000);
    assert_eq!(report.coins.len(), 2);
    assert_eq!(s.score, 4);
    assert_eq!(s.collected_coins, 2);
}

#[test]
fn resolve_reports_everything() {
    let mut s = make_state();
    s.monsters.push(monster(480, 680, 1));
    s.coins.push(coin(490, 700, 5));
    s.jewels.push(jewel(500, 700, 60));
    let report = resolve(&mut s, 5000);
    assert_eq!(
        report,
        CollisionReport { damage: 1, coins: vec![5], jewels: vec![60] }
    );
    assert_eq!(s.score, 65);
    assert_eq!(s.hero.life_points, 9);
}
