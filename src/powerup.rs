/// Power-up spawning, falling and the shoot/touch effect contract.
///
/// Shooting an item grants its effect. Touching it with the ship inverts it:
///
/// | kind       | shoot                 | touch                |
/// |------------|-----------------------|----------------------|
/// | DamageUp   | power + damage_up     | power - penalty      |
/// | Health     | heal health_restore   | take a fixed hit     |
/// | MultiShot  | one more bullet/volley| power - penalty      |
/// | Shield     | invulnerable for a while | nothing           |
/// | DamageDown | nothing               | power - penalty      |

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{CollectionMethod, EntityId, IdGenerator, Player, PowerUp, PowerUpKind};

/// Kinds that can appear on the field.
pub const SPAWNABLE: [PowerUpKind; 4] = [
    PowerUpKind::DamageUp,
    PowerUpKind::Health,
    PowerUpKind::MultiShot,
    PowerUpKind::Shield,
];

/// Slack below the field before a power-up is discarded.
const FALL_MARGIN: f64 = 50.0;

pub fn nominal_value(kind: PowerUpKind, config: &GameConfig) -> i64 {
    let p = &config.power_up;
    match kind {
        PowerUpKind::DamageUp => p.damage_up as i64,
        PowerUpKind::Health => p.health_restore as i64,
        PowerUpKind::MultiShot => 1,
        PowerUpKind::Shield => p.shield_ms as i64,
        PowerUpKind::DamageDown => -(p.damage_penalty as i64),
    }
}

pub fn random_kind(rng: &mut impl Rng) -> PowerUpKind {
    SPAWNABLE[rng.gen_range(0..SPAWNABLE.len())]
}

pub fn spawn_power_up(
    kind: PowerUpKind,
    x: f64,
    y: f64,
    id: EntityId,
    config: &GameConfig,
) -> PowerUp {
    let p = &config.power_up;
    PowerUp {
        id,
        kind,
        x,
        y,
        width: p.width,
        height: p.height,
        value: nominal_value(kind, config),
        fall_speed: p.fall_speed,
    }
}

/// Timed roll: every `roll_interval_ms` of play, a chance to drop an item
/// from above the field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerUpRoller {
    pub last_roll: f64,
}

impl PowerUpRoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roll(
        &mut self,
        now: f64,
        field_width: f64,
        ids: &mut IdGenerator,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Option<PowerUp> {
        let p = &config.power_up;
        if now - self.last_roll < p.roll_interval_ms {
            return None;
        }
        self.last_roll = now;
        if !rng.gen_bool(p.spawn_chance.clamp(0.0, 1.0)) {
            return None;
        }
        let max_x = field_width - p.width;
        let x = if max_x > 0.0 { rng.gen_range(0.0..max_x) } else { 0.0 };
        Some(spawn_power_up(random_kind(rng), x, -p.height, ids.next_id(), config))
    }

    pub fn reset(&mut self) {
        self.last_roll = 0.0;
    }
}

pub fn advance(power_up: &mut PowerUp, delta_ms: f64) {
    power_up.y += power_up.fall_speed * (delta_ms.max(0.0) / 1000.0);
}

pub fn out_of_bounds(power_up: &PowerUp, field_height: f64) -> bool {
    power_up.y > field_height + FALL_MARGIN
}

// ── Effects ───────────────────────────────────────────────────────────────────

/// What a collection actually did to the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpEffect {
    /// Effective kind after touch inversion (DamageUp touched → DamageDown).
    pub applied: PowerUpKind,
    /// Signed change in the affected stat.
    pub value: i64,
    pub beneficial: bool,
}

fn lose_power(player: &mut Player, config: &GameConfig) -> PowerUpEffect {
    let before = player.power;
    player.set_power(before.saturating_sub(config.power_up.damage_penalty));
    PowerUpEffect {
        applied: PowerUpKind::DamageDown,
        value: player.power as i64 - before as i64,
        beneficial: false,
    }
}

pub fn apply_effect(
    player: &mut Player,
    kind: PowerUpKind,
    method: CollectionMethod,
    config: &GameConfig,
) -> PowerUpEffect {
    let p = &config.power_up;
    match method {
        CollectionMethod::Shoot => {
            let value = match kind {
                PowerUpKind::DamageUp => {
                    let before = player.power;
                    player.set_power(before.saturating_add(p.damage_up));
                    player.power as i64 - before as i64
                }
                PowerUpKind::Health => {
                    let before = player.health;
                    player.heal(p.health_restore);
                    player.health as i64 - before as i64
                }
                PowerUpKind::MultiShot => {
                    let before = player.shot_count;
                    player.shot_count = (before + 1).min(config.player.max_shot_count);
                    player.shot_count as i64 - before as i64
                }
                PowerUpKind::Shield => {
                    player.invulnerable_ms = player.invulnerable_ms.max(p.shield_ms);
                    p.shield_ms as i64
                }
                PowerUpKind::DamageDown => 0,
            };
            PowerUpEffect {
                applied: kind,
                value,
                beneficial: true,
            }
        }
        CollectionMethod::Touch => match kind {
            PowerUpKind::DamageUp | PowerUpKind::MultiShot | PowerUpKind::DamageDown => {
                lose_power(player, config)
            }
            PowerUpKind::Health => {
                let before = player.health;
                player.take_damage(p.touch_health_penalty, config.player.invulnerable_ms);
                PowerUpEffect {
                    applied: PowerUpKind::Health,
                    value: player.health as i64 - before as i64,
                    beneficial: false,
                }
            }
            PowerUpKind::Shield => PowerUpEffect {
                applied: PowerUpKind::Shield,
                value: 0,
                beneficial: false,
            },
        },
    }
}
