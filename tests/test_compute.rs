use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use last_war::compute::*;
use last_war::config::{GameConfig, GameOverRule};
use last_war::entities::*;
use last_war::events::{GameEvent, GameOverReason};
use last_war::movement::REFERENCE_FRAME_MS;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn playing_state(rule: GameOverRule) -> GameState {
    let mut config = GameConfig::default();
    config.rules.game_over = rule;
    let mut state = init_state(config, 400.0, 600.0);
    start(&mut state);
    state
}

fn make_enemy(id: u64, kind: EnemyKind, x: f64, y: f64) -> Enemy {
    let p = kind.profile();
    Enemy {
        id: EntityId(id),
        kind,
        x,
        y,
        spawn_x: x,
        width: p.width,
        height: p.height,
        health: p.base_health,
        max_health: p.base_health,
        score: p.score,
        drop_chance: p.drop_chance,
        movement: p.movement,
        attack: p.attack,
        spawned_at: 0.0,
        move_phase: 0.0,
        flash_until: 0.0,
    }
}

/// Drive `tick` at a steady 16 ms cadence for `ms` of host time.
fn run_for(state: &mut GameState, from: f64, ms: f64, rng: &mut StdRng) -> (f64, Vec<GameEvent>) {
    let mut now = from;
    let mut events = Vec::new();
    while now < from + ms {
        now += 16.0;
        events.extend(tick(state, now, rng));
    }
    (now, events)
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_sits_at_menu() {
    let s = init_state(GameConfig::default(), 400.0, 600.0);
    assert_eq!(s.status, GameStatus::Menu);
    assert_eq!(s.clock, 0.0);
    assert!(s.enemies.is_empty());
    assert_eq!(s.stats.score, 0);
}

#[test]
fn player_starts_centred_in_bottom_band() {
    let s = init_state(GameConfig::default(), 400.0, 600.0);
    assert_relative_eq!(s.player.rect().center_x(), 200.0);
    assert_relative_eq!(s.player.y, 480.0);
    assert_eq!(s.player.health, 100);
    assert_eq!(s.player.power, 10);
    assert_eq!(s.player.shot_count, 1);
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn start_announces_a_session() {
    let mut s = init_state(GameConfig::default(), 400.0, 600.0);
    let events = start(&mut s);
    assert_eq!(events, vec![GameEvent::SessionStarted]);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn menu_does_not_advance() {
    let mut s = init_state(GameConfig::default(), 400.0, 600.0);
    let mut rng = seeded_rng();
    assert!(tick(&mut s, 0.0, &mut rng).is_empty());
    assert!(tick(&mut s, 5000.0, &mut rng).is_empty());
    assert_eq!(s.clock, 0.0);
    assert_eq!(s.last_host_time, Some(5000.0));
}

#[test]
fn first_tick_has_zero_delta() {
    let mut s = playing_state(GameOverRule::DangerZone);
    tick(&mut s, 123_456.0, &mut seeded_rng());
    assert_eq!(s.clock, 0.0);
}

#[test]
fn pause_freezes_the_clock() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    tick(&mut s, 0.0, &mut rng);
    tick(&mut s, 100.0, &mut rng);
    assert_relative_eq!(s.clock, 100.0);

    pause(&mut s);
    assert_eq!(s.status, GameStatus::Paused);
    let snapshot_enemies = s.enemies.clone();
    tick(&mut s, 60_000.0, &mut rng);
    assert_relative_eq!(s.clock, 100.0);
    assert_eq!(s.enemies, snapshot_enemies);

    resume(&mut s);
    tick(&mut s, 60_100.0, &mut rng);
    assert_relative_eq!(s.clock, 200.0);
}

#[test]
fn long_pause_does_not_burst_spawns() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    let (now, _) = run_for(&mut s, 0.0, 1000.0, &mut rng);
    let spawned_before = s.ids.clone().next_id();

    toggle_pause(&mut s);
    tick(&mut s, now + 120_000.0, &mut rng);
    toggle_pause(&mut s);
    tick(&mut s, now + 120_016.0, &mut rng);

    assert!(s.clock < 1100.0);
    // At most the one spawn that was due anyway
    assert!(s.ids.clone().next_id().0 <= spawned_before.0 + 3);
}

#[test]
fn negative_host_delta_is_ignored() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    tick(&mut s, 1000.0, &mut rng);
    tick(&mut s, 1100.0, &mut rng);
    tick(&mut s, 900.0, &mut rng);
    assert_relative_eq!(s.clock, 100.0);
}

#[test]
fn toggle_pause_ignores_game_over_and_menu() {
    let mut s = init_state(GameConfig::default(), 400.0, 600.0);
    toggle_pause(&mut s);
    assert_eq!(s.status, GameStatus::Menu);
    s.status = GameStatus::GameOver;
    toggle_pause(&mut s);
    assert_eq!(s.status, GameStatus::GameOver);
}

#[test]
fn restart_clears_the_session() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    run_for(&mut s, 0.0, 3000.0, &mut rng);
    s.player.health = 30;
    s.status = GameStatus::GameOver;

    start(&mut s);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.clock, 0.0);
    assert_eq!(s.stats.score, 0);
    assert_eq!(s.player.health, 100);
    assert!(s.enemies.is_empty());
    assert!(s.player_bullets.is_empty());
    assert_eq!(s.spawner.last_spawn, None);
    assert_eq!(s.game_over_reason, None);
}

#[test]
fn go_to_menu_tears_down() {
    let mut s = playing_state(GameOverRule::DangerZone);
    run_for(&mut s, 0.0, 2000.0, &mut seeded_rng());
    go_to_menu(&mut s);
    assert_eq!(s.status, GameStatus::Menu);
    assert!(s.player_bullets.is_empty());
    assert_eq!(s.clock, 0.0);
}

#[test]
fn target_x_is_clamped() {
    let mut s = playing_state(GameOverRule::DangerZone);
    set_player_target_x(&mut s, -50.0);
    assert_eq!(s.player.x, 0.0);
    set_player_target_x(&mut s, 1000.0);
    assert_eq!(s.player.x, 360.0);
    set_player_target_x(&mut s, 123.0);
    assert_eq!(s.player.x, 123.0);
    assert_eq!(s.player.y, 480.0);
}

// ── Per-frame behaviour ───────────────────────────────────────────────────────

#[test]
fn survival_awards_a_point_per_second() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    step(&mut s, 1000.0, &mut rng);
    assert_eq!(s.stats.score, 1);
    step(&mut s, 500.0, &mut rng);
    assert_eq!(s.stats.score, 1);
    step(&mut s, 500.0, &mut rng);
    assert_eq!(s.stats.score, 2);
}

#[test]
fn first_spawn_waits_a_full_interval() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    let (now, _) = run_for(&mut s, 0.0, 1100.0, &mut rng);
    assert_eq!(s.enemies.len() + s.stats.kills as usize, 0);

    run_for(&mut s, now, 300.0, &mut rng);
    assert_eq!(s.enemies.len() + s.stats.kills as usize, 1);
}

#[test]
fn auto_fire_produces_bullets() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    let (_, events) = run_for(&mut s, 0.0, 500.0, &mut rng);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::ShotFired { bullets: 1 })));
    assert!(!s.player_bullets.is_empty());
}

#[test]
fn kill_that_crosses_a_level_boundary_levels_up() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    s.stats.kills = 7;
    s.enemies.push(make_enemy(500, EnemyKind::Basic, 180.0, 290.0));
    s.player_bullets.push(PlayerBullet {
        x: 190.0,
        y: 300.0,
        width: 4.0,
        height: 10.0,
        speed: 8.0,
    });

    let events = step(&mut s, REFERENCE_FRAME_MS, &mut rng);

    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::EnemyDestroyed { id: EntityId(500), points: 100, .. }
    )));
    assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    assert_eq!(s.stats.kills, 8);
}

#[test]
fn enemies_leaving_the_field_escape() {
    let mut s = playing_state(GameOverRule::HealthDepleted);
    let mut rng = seeded_rng();
    s.enemies.push(make_enemy(500, EnemyKind::Basic, 0.0, 639.0));
    let events = step(&mut s, REFERENCE_FRAME_MS, &mut rng);
    assert!(events.contains(&GameEvent::EnemyEscaped { id: EntityId(500) }));
    assert!(s.enemies.is_empty());
    assert_eq!(s.status, GameStatus::Playing);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn crossing_the_danger_line_ends_the_game() {
    let mut s = playing_state(GameOverRule::DangerZone);
    let mut rng = seeded_rng();
    assert_eq!(s.danger_line(), Some(480.0));
    s.enemies.push(make_enemy(500, EnemyKind::Basic, 0.0, 479.0));

    let events = step(&mut s, REFERENCE_FRAME_MS, &mut rng);

    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.game_over_reason, Some(GameOverReason::DangerZone));
    assert!(events.contains(&GameEvent::GameOver {
        reason: GameOverReason::DangerZone
    }));

    // Frozen afterwards
    let clock = s.clock;
    assert!(step(&mut s, 1000.0, &mut rng).is_empty());
    assert_eq!(s.clock, clock);
}

#[test]
fn health_rule_has_no_danger_line() {
    let mut s = playing_state(GameOverRule::HealthDepleted);
    let mut rng = seeded_rng();
    assert_eq!(s.danger_line(), None);
    s.enemies.push(make_enemy(500, EnemyKind::Basic, 0.0, 500.0));
    step(&mut s, REFERENCE_FRAME_MS, &mut rng);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn depleted_health_ends_the_game_under_either_rule() {
    for rule in [GameOverRule::DangerZone, GameOverRule::HealthDepleted] {
        let mut s = playing_state(rule);
        let mut rng = seeded_rng();
        s.player.health = 20;
        let (px, py) = (s.player.x, s.player.y);
        s.enemy_bullets.push(EnemyBullet {
            id: EntityId(900),
            owner: EnemyKind::Tank,
            x: px + 10.0,
            y: py + 5.0,
            width: 4.0,
            height: 8.0,
            speed: 4.0,
            dx: 0.0,
            dy: 1.0,
        });

        let events = step(&mut s, REFERENCE_FRAME_MS, &mut rng);

        assert_eq!(s.player.health, 0, "{:?}", rule);
        assert_eq!(s.status, GameStatus::GameOver, "{:?}", rule);
        assert!(events.contains(&GameEvent::GameOver {
            reason: GameOverReason::HealthDepleted
        }));
    }
}

#[test]
fn snapshot_reflects_state() {
    let mut s = playing_state(GameOverRule::DangerZone);
    run_for(&mut s, 0.0, 2000.0, &mut seeded_rng());
    let snap = s.snapshot();
    assert_eq!(snap.status, GameStatus::Playing);
    assert_eq!(snap.enemies.len(), s.enemies.len());
    assert_eq!(snap.danger_line, Some(480.0));
    assert_eq!(snap.clock, s.clock);
}

// ── Determinism ───────────────────────────────────────────────────────────────

#[test]
fn same_seed_same_session() {
    let mut a = playing_state(GameOverRule::DangerZone);
    let mut b = playing_state(GameOverRule::DangerZone);
    let mut rng_a = seeded_rng();
    let mut rng_b = seeded_rng();

    let (_, events_a) = run_for(&mut a, 0.0, 8000.0, &mut rng_a);
    let (_, events_b) = run_for(&mut b, 0.0, 8000.0, &mut rng_b);

    assert_eq!(events_a, events_b);
    assert_eq!(a.stats, b.stats);
    assert_eq!(a.enemies, b.enemies);
    assert_eq!(a.power_ups, b.power_ups);
}
