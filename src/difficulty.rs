/// Difficulty model: pure functions from (kills, survival time) to the
/// spawn interval, enemy speed and score multiplier for the next frame.

use crate::config::{DifficultyCurve, GameConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    pub spawn_interval_ms: f64,
    pub enemy_speed: f64,
    pub score_multiplier: f64,
    pub kill_level: u32,
    pub time_level: u32,
}

/// One curve's opinion before combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    pub spawn_interval_ms: f64,
    pub enemy_speed: f64,
}

pub fn kill_level(kills: u32, config: &GameConfig) -> u32 {
    kills / config.level.kills_per_level.max(1) + 1
}

pub fn time_level(survival_s: f64, config: &GameConfig) -> u32 {
    let t = &config.time_curve;
    if survival_s <= 0.0 || t.interval_s <= 0.0 {
        return 0;
    }
    ((survival_s / t.interval_s).floor() as u32).min(t.max_time_level)
}

// ── Kill-based curve ──────────────────────────────────────────────────────────

/// Piecewise-linear in level: a steep early segment, a gentler late segment,
/// then flat maximum difficulty with the high-level score multiplier.
pub fn kill_curve(level: u32, config: &GameConfig) -> (CurvePoint, f64) {
    let e = &config.enemy;
    let k = &config.kill_curve;
    let early_cap = config.level.early_level_cap;
    let level = level.max(1);

    if level > config.level.max_level_for_scaling {
        return (
            CurvePoint {
                spawn_interval_ms: e.min_spawn_interval_ms,
                enemy_speed: e.max_speed,
            },
            config.score.high_level_multiplier,
        );
    }

    let early_steps = (level.min(early_cap) - 1) as f64;
    let late_steps = level.saturating_sub(early_cap) as f64;

    let interval = e.base_spawn_interval_ms
        - early_steps * k.early_spawn_reduction_ms
        - late_steps * k.late_spawn_reduction_ms;
    let speed =
        e.base_speed + early_steps * k.early_speed_increase + late_steps * k.late_speed_increase;

    (clamp_point(interval, speed, config), 1.0)
}

// ── Time-based curve ──────────────────────────────────────────────────────────

pub fn time_curve(time_level: u32, config: &GameConfig) -> CurvePoint {
    let e = &config.enemy;
    let t = &config.time_curve;
    let steps = time_level.min(t.max_time_level) as f64;
    clamp_point(
        e.base_spawn_interval_ms - steps * t.spawn_reduction_ms,
        e.base_speed + steps * t.speed_increase,
        config,
    )
}

fn clamp_point(interval: f64, speed: f64, config: &GameConfig) -> CurvePoint {
    CurvePoint {
        spawn_interval_ms: interval.max(config.enemy.min_spawn_interval_ms),
        enemy_speed: speed.min(config.enemy.max_speed),
    }
}

// ── Combination ───────────────────────────────────────────────────────────────

pub fn difficulty_for(kills: u32, survival_s: f64, config: &GameConfig) -> Difficulty {
    let kill_level = kill_level(kills, config);
    let time_level = time_level(survival_s, config);
    let (by_kills, score_multiplier) = kill_curve(kill_level, config);
    let by_time = time_curve(time_level, config);

    let point = match config.rules.difficulty {
        DifficultyCurve::KillOnly => by_kills,
        DifficultyCurve::TimeOnly => by_time,
        DifficultyCurve::Strongest => CurvePoint {
            spawn_interval_ms: by_kills.spawn_interval_ms.min(by_time.spawn_interval_ms),
            enemy_speed: by_kills.enemy_speed.max(by_time.enemy_speed),
        },
        DifficultyCurve::Stacked => {
            let steps = time_level as f64;
            clamp_point(
                by_kills.spawn_interval_ms - steps * config.time_curve.spawn_reduction_ms,
                by_kills.enemy_speed + steps * config.time_curve.speed_increase,
                config,
            )
        }
    };

    Difficulty {
        spawn_interval_ms: point.spawn_interval_ms,
        enemy_speed: point.enemy_speed,
        score_multiplier,
        kill_level,
        time_level,
    }
}

/// Kills still needed before the next kill level.
pub fn kills_until_next_level(kills: u32, config: &GameConfig) -> u32 {
    let per_level = config.level.kills_per_level.max(1);
    (kill_level(kills, config) * per_level).saturating_sub(kills)
}
