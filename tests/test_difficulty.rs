use approx::assert_relative_eq;

use last_war::config::{DifficultyCurve, GameConfig};
use last_war::difficulty::*;

fn config_with(curve: DifficultyCurve) -> GameConfig {
    let mut config = GameConfig::default();
    config.rules.difficulty = curve;
    config
}

// ── Levels ────────────────────────────────────────────────────────────────────

#[test]
fn kill_level_steps_every_eight_kills() {
    let c = GameConfig::default();
    assert_eq!(kill_level(0, &c), 1);
    assert_eq!(kill_level(7, &c), 1);
    assert_eq!(kill_level(8, &c), 2);
    assert_eq!(kill_level(80, &c), 11);
}

#[test]
fn time_level_steps_every_fifteen_seconds_and_caps() {
    let c = GameConfig::default();
    assert_eq!(time_level(0.0, &c), 0);
    assert_eq!(time_level(14.9, &c), 0);
    assert_eq!(time_level(15.0, &c), 1);
    assert_eq!(time_level(10_000.0, &c), 20);
}

#[test]
fn kills_until_next_level_counts_down() {
    let c = GameConfig::default();
    assert_eq!(kills_until_next_level(0, &c), 8);
    assert_eq!(kills_until_next_level(3, &c), 5);
    assert_eq!(kills_until_next_level(8, &c), 8);
}

#[test]
fn zero_kills_per_level_counts_as_one() {
    let mut c = GameConfig::default();
    c.level.kills_per_level = 0;
    assert_eq!(kill_level(3, &c), 4);
    assert_eq!(kills_until_next_level(0, &c), 1);
    assert_eq!(kills_until_next_level(3, &c), 1);
}

// ── Kill curve ────────────────────────────────────────────────────────────────

#[test]
fn kill_curve_starts_at_base() {
    let c = GameConfig::default();
    let (point, multiplier) = kill_curve(1, &c);
    assert_relative_eq!(point.spawn_interval_ms, 1200.0);
    assert_relative_eq!(point.enemy_speed, 2.0);
    assert_relative_eq!(multiplier, 1.0);
}

#[test]
fn kill_curve_early_then_late_segment() {
    let c = GameConfig::default();
    let (l5, _) = kill_curve(5, &c);
    assert_relative_eq!(l5.spawn_interval_ms, 720.0);
    assert_relative_eq!(l5.enemy_speed, 3.2, epsilon = 1e-9);

    let (l6, _) = kill_curve(6, &c);
    assert_relative_eq!(l6.spawn_interval_ms, 640.0);
    assert_relative_eq!(l6.enemy_speed, 3.5, epsilon = 1e-9);
}

#[test]
fn kill_curve_clamps_and_maxes_out() {
    let c = GameConfig::default();
    let (l10, m10) = kill_curve(10, &c);
    assert_relative_eq!(l10.spawn_interval_ms, 500.0);
    assert_relative_eq!(l10.enemy_speed, 4.0);
    assert_relative_eq!(m10, 1.0);

    let (l11, m11) = kill_curve(11, &c);
    assert_relative_eq!(l11.spawn_interval_ms, 500.0);
    assert_relative_eq!(l11.enemy_speed, 4.0);
    assert_relative_eq!(m11, 1.5);
}

#[test]
fn spawn_interval_is_floored_and_non_increasing() {
    let c = config_with(DifficultyCurve::KillOnly);
    let mut previous = f64::INFINITY;
    for level in 1..=10u32 {
        let kills = (level - 1) * c.level.kills_per_level;
        let d = difficulty_for(kills, 0.0, &c);
        assert_eq!(d.kill_level, level);
        assert!(d.spawn_interval_ms >= 500.0, "level {}", level);
        assert!(d.spawn_interval_ms <= previous, "level {}", level);
        previous = d.spawn_interval_ms;
    }
}

// ── Time curve ────────────────────────────────────────────────────────────────

#[test]
fn time_curve_values() {
    let c = GameConfig::default();
    let t1 = time_curve(1, &c);
    assert_relative_eq!(t1.spawn_interval_ms, 1170.0);
    assert_relative_eq!(t1.enemy_speed, 2.1, epsilon = 1e-9);

    let t20 = time_curve(20, &c);
    assert_relative_eq!(t20.spawn_interval_ms, 600.0);
    assert_relative_eq!(t20.enemy_speed, 4.0, epsilon = 1e-9);
}

#[test]
fn speed_grows_with_time_then_holds() {
    let c = config_with(DifficultyCurve::TimeOnly);
    let mut previous = 0.0;
    for second in 0..=600 {
        let d = difficulty_for(0, second as f64, &c);
        assert!(d.enemy_speed >= previous, "t = {}", second);
        assert!(d.enemy_speed <= c.enemy.max_speed + 1e-9);
        previous = d.enemy_speed;
    }
    let plateau = difficulty_for(0, 300.0, &c).enemy_speed;
    for second in [301.0, 400.0, 600.0] {
        assert_relative_eq!(difficulty_for(0, second, &c).enemy_speed, plateau);
    }
}

// ── Combination ───────────────────────────────────────────────────────────────

#[test]
fn strongest_takes_the_harder_value() {
    let c = config_with(DifficultyCurve::Strongest);
    // Kill level 1, time level 4
    let d = difficulty_for(0, 60.0, &c);
    assert_relative_eq!(d.spawn_interval_ms, 1080.0);
    assert_relative_eq!(d.enemy_speed, 2.4, epsilon = 1e-9);

    // Kill level 5 beats time level 1
    let d = difficulty_for(32, 15.0, &c);
    assert_relative_eq!(d.spawn_interval_ms, 720.0);
    assert_relative_eq!(d.enemy_speed, 3.2, epsilon = 1e-9);
}

#[test]
fn stacked_adds_time_on_top_of_kills() {
    let c = config_with(DifficultyCurve::Stacked);
    let d = difficulty_for(32, 60.0, &c);
    assert_relative_eq!(d.spawn_interval_ms, 600.0);
    assert_relative_eq!(d.enemy_speed, 3.6, epsilon = 1e-9);

    let maxed = difficulty_for(72, 300.0, &c);
    assert_relative_eq!(maxed.spawn_interval_ms, 500.0);
    assert_relative_eq!(maxed.enemy_speed, 4.0);
}

#[test]
fn kill_only_ignores_time() {
    let c = config_with(DifficultyCurve::KillOnly);
    let d = difficulty_for(0, 600.0, &c);
    assert_relative_eq!(d.spawn_interval_ms, 1200.0);
    assert_relative_eq!(d.enemy_speed, 2.0);
    assert_eq!(d.time_level, 20);
}

#[test]
fn multiplier_follows_kill_level_under_every_curve() {
    for curve in [
        DifficultyCurve::KillOnly,
        DifficultyCurve::TimeOnly,
        DifficultyCurve::Strongest,
        DifficultyCurve::Stacked,
    ] {
        let c = config_with(curve);
        assert_relative_eq!(difficulty_for(0, 0.0, &c).score_multiplier, 1.0);
        assert_relative_eq!(difficulty_for(80, 0.0, &c).score_multiplier, 1.5);
    }
}
