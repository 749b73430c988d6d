/// Spawn scheduler. Decides once per frame whether a new enemy appears,
/// and builds it from the stat table scaled by the current kill level.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::config::GameConfig;
use crate::difficulty::Difficulty;
use crate::entities::{Enemy, EnemyKind, EntityId};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnScheduler {
    /// `None` until the first frame of a session.
    pub last_spawn: Option<f64>,
}

impl SpawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first call only arms the clock, so a session never opens with
    /// an instant spawn. Afterwards a spawn is due once `interval_ms` has
    /// elapsed since the previous one.
    pub fn should_spawn(&mut self, now: f64, interval_ms: f64) -> bool {
        match self.last_spawn {
            None => {
                self.last_spawn = Some(now);
                false
            }
            Some(last) if now - last < interval_ms => false,
            Some(_) => {
                self.last_spawn = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_spawn = None;
    }
}

// ── Type selection ────────────────────────────────────────────────────────────

/// Relative weights for Basic, Fast, Tank, Boss (in `EnemyKind::ALL` order).
pub fn spawn_weights(level: u32) -> [u32; 4] {
    let basic = match level {
        0..=3 => 10,
        4..=6 => 8,
        _ => 5,
    };
    let fast = match level {
        0..=3 => 0,
        4..=6 => 4,
        _ => 6,
    };
    let tank = match level {
        0..=5 => 0,
        6..=8 => 2,
        _ => 4,
    };
    let boss = if level <= 8 { 0 } else { 1 };
    [basic, fast, tank, boss]
}

pub fn select_kind(level: u32, rng: &mut impl Rng) -> EnemyKind {
    match WeightedIndex::new(spawn_weights(level)) {
        Ok(dist) => EnemyKind::ALL[dist.sample(rng)],
        Err(err) => {
            tracing::warn!(level, %err, "no spawnable kind, falling back to basic");
            EnemyKind::Basic
        }
    }
}

/// Level scaling for enemy health, capped at double.
pub fn health_multiplier(level: u32) -> f64 {
    (1.0 + level.saturating_sub(1) as f64 * 0.1).min(2.0)
}

// ── Construction ──────────────────────────────────────────────────────────────

/// Build an enemy of `kind` just above the visible field.
pub fn spawn_enemy(
    kind: EnemyKind,
    difficulty: &Difficulty,
    now: f64,
    field_width: f64,
    id: EntityId,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Enemy {
    let profile = kind.profile();
    let health =
        (profile.base_health as f64 * health_multiplier(difficulty.kill_level)).floor() as u32;

    let max_x = field_width - profile.width;
    let x = if max_x > 0.0 {
        rng.gen_range(0.0..max_x)
    } else {
        0.0
    };

    // Difficulty speeds are relative to the base enemy speed.
    let speed_scale = difficulty.enemy_speed / config.enemy.base_speed;
    let mut movement = profile.movement;
    movement.params.speed = Some(movement.params.speed.unwrap_or(profile.speed) * speed_scale);

    tracing::debug!(
        id = id.0,
        ?kind,
        x,
        health,
        level = difficulty.kill_level,
        "enemy spawned"
    );

    Enemy {
        id,
        kind,
        x,
        y: -profile.height,
        spawn_x: x,
        width: profile.width,
        height: profile.height,
        health,
        max_health: health,
        score: profile.score,
        drop_chance: profile.drop_chance,
        movement,
        attack: profile.attack,
        spawned_at: now,
        move_phase: 0.0,
        flash_until: 0.0,
    }
}
