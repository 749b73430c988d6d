//! Balance constants and rule-set selection.
//!
//! Every section deserializes with `#[serde(default)]`, so a config file
//! only has to name the values it overrides:
//!
//! ```json
//! { "rules": { "difficulty": "stacked", "game_over": "health_depleted" },
//!   "enemy": { "min_spawn_interval_ms": 400.0 } }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

// ── Rule variants ─────────────────────────────────────────────────────────────

/// How the kill-based and time-based difficulty curves are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyCurve {
    /// Kill level alone drives difficulty.
    KillOnly,
    /// Survival time alone drives difficulty.
    TimeOnly,
    /// Whichever curve is harder wins: min interval, max speed.
    #[default]
    Strongest,
    /// Time reductions are subtracted from the kill curve, then clamped.
    Stacked,
}

/// What ends a session besides the player's health reaching zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverRule {
    /// An enemy crossing the danger line ends the game. Enemies deal no
    /// contact damage.
    #[default]
    DangerZone,
    /// Enemies ram the player for contact damage; there is no danger line.
    HealthDepleted,
}

impl FromStr for DifficultyCurve {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "kill_only" | "kill" => Ok(DifficultyCurve::KillOnly),
            "time_only" | "time" => Ok(DifficultyCurve::TimeOnly),
            "strongest" => Ok(DifficultyCurve::Strongest),
            "stacked" => Ok(DifficultyCurve::Stacked),
            other => Err(ConfigError::Invalid(format!(
                "unknown difficulty curve '{}'",
                other
            ))),
        }
    }
}

impl FromStr for GameOverRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "danger_zone" | "zone" => Ok(GameOverRule::DangerZone),
            "health_depleted" | "health" | "hp" => Ok(GameOverRule::HealthDepleted),
            other => Err(ConfigError::Invalid(format!(
                "unknown game-over rule '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DifficultyCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifficultyCurve::KillOnly => "kill_only",
            DifficultyCurve::TimeOnly => "time_only",
            DifficultyCurve::Strongest => "strongest",
            DifficultyCurve::Stacked => "stacked",
        };
        f.write_str(name)
    }
}

impl fmt::Display for GameOverRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameOverRule::DangerZone => "danger_zone",
            GameOverRule::HealthDepleted => "health_depleted",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub difficulty: DifficultyCurve,
    pub game_over: GameOverRule,
}

// ── Balance sections ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub initial_health: u32,
    pub initial_power: u32,
    /// The ship lives in the bottom `area_ratio` of the field.
    pub area_ratio: f64,
    pub width: f64,
    pub height: f64,
    /// Grace period after taking a hit.
    pub invulnerable_ms: f64,
    pub max_shot_count: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_health: 100,
            initial_power: 10,
            area_ratio: 0.2,
            width: 40.0,
            height: 40.0,
            invulnerable_ms: 1000.0,
            max_shot_count: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub base_fire_interval_ms: f64,
    pub min_fire_interval_ms: f64,
    /// Interval shaved off per power point above the initial power.
    pub power_reduction_ms: f64,
    pub bullet_speed: f64,
    pub bullet_width: f64,
    pub bullet_height: f64,
    /// Horizontal gap between bullets of one multi-shot volley.
    pub volley_spacing: f64,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            base_fire_interval_ms: 200.0,
            min_fire_interval_ms: 100.0,
            power_reduction_ms: 10.0,
            bullet_speed: 8.0,
            bullet_width: 4.0,
            bullet_height: 10.0,
            volley_spacing: 12.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub contact_damage: u32,
    pub bullet_damage: u32,
    pub base_spawn_interval_ms: f64,
    pub min_spawn_interval_ms: f64,
    pub base_speed: f64,
    pub max_speed: f64,
    /// Fraction of field height where the danger line sits.
    pub game_over_zone_ratio: f64,
    pub flash_ms: f64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            contact_damage: 20,
            bullet_damage: 20,
            base_spawn_interval_ms: 1200.0,
            min_spawn_interval_ms: 500.0,
            base_speed: 2.0,
            max_speed: 4.0,
            game_over_zone_ratio: 0.8,
            flash_ms: 200.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub kills_per_level: u32,
    /// Last level of the early (steeper spawn) segment.
    pub early_level_cap: u32,
    /// Last level where difficulty still scales; above it everything is max.
    pub max_level_for_scaling: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            kills_per_level: 8,
            early_level_cap: 5,
            max_level_for_scaling: 10,
        }
    }
}

/// Slopes of the kill-based curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KillCurveConfig {
    pub early_spawn_reduction_ms: f64,
    pub early_speed_increase: f64,
    pub late_spawn_reduction_ms: f64,
    pub late_speed_increase: f64,
}

impl Default for KillCurveConfig {
    fn default() -> Self {
        Self {
            early_spawn_reduction_ms: 120.0,
            early_speed_increase: 0.3,
            late_spawn_reduction_ms: 80.0,
            late_speed_increase: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeCurveConfig {
    pub interval_s: f64,
    pub spawn_reduction_ms: f64,
    pub speed_increase: f64,
    pub max_time_level: u32,
}

impl Default for TimeCurveConfig {
    fn default() -> Self {
        Self {
            interval_s: 15.0,
            spawn_reduction_ms: 30.0,
            speed_increase: 0.1,
            max_time_level: 20,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    /// Chance that a timed roll produces a power-up.
    pub spawn_chance: f64,
    pub roll_interval_ms: f64,
    pub width: f64,
    pub height: f64,
    /// Units per second.
    pub fall_speed: f64,
    pub damage_up: u32,
    /// Power lost on a detrimental collection.
    pub damage_penalty: u32,
    pub health_restore: u32,
    /// Damage taken when touching a Health item.
    pub touch_health_penalty: u32,
    pub shield_ms: f64,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.3,
            roll_interval_ms: 3000.0,
            width: 25.0,
            height: 25.0,
            fall_speed: 50.0,
            damage_up: 3,
            damage_penalty: 3,
            health_restore: 25,
            touch_health_penalty: 10,
            shield_ms: 3000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub power_up_collect: u32,
    pub survival_per_second: u32,
    pub high_level_multiplier: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            power_up_collect: 50,
            survival_per_second: 1,
            high_level_multiplier: 1.5,
        }
    }
}

// ── Top level ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub weapon: WeaponConfig,
    pub enemy: EnemyConfig,
    pub level: LevelConfig,
    pub kill_curve: KillCurveConfig,
    pub time_curve: TimeCurveConfig,
    pub power_up: PowerUpConfig,
    pub score: ScoreConfig,
    pub rules: Rules,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(
            path = %path.as_ref().display(),
            difficulty = %config.rules.difficulty,
            game_over = %config.rules.game_over,
            "loaded game config"
        );
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.player.initial_health == 0 {
            return invalid("player.initial_health must be positive");
        }
        if self.player.initial_power == 0 {
            return invalid("player.initial_power must be at least 1");
        }
        if !(0.0..1.0).contains(&self.player.area_ratio) {
            return invalid("player.area_ratio must be in [0, 1)");
        }
        if self.player.width <= 0.0 || self.player.height <= 0.0 {
            return invalid("player extent must be positive");
        }
        if self.player.max_shot_count == 0 {
            return invalid("player.max_shot_count must be at least 1");
        }
        if self.weapon.min_fire_interval_ms <= 0.0
            || self.weapon.min_fire_interval_ms > self.weapon.base_fire_interval_ms
        {
            return invalid("weapon fire intervals must satisfy 0 < min <= base");
        }
        if self.enemy.min_spawn_interval_ms <= 0.0
            || self.enemy.min_spawn_interval_ms > self.enemy.base_spawn_interval_ms
        {
            return invalid("enemy spawn intervals must satisfy 0 < min <= base");
        }
        if self.enemy.base_speed <= 0.0 || self.enemy.max_speed < self.enemy.base_speed {
            return invalid("enemy speeds must satisfy 0 < base <= max");
        }
        if !(0.0..=1.0).contains(&self.enemy.game_over_zone_ratio) {
            return invalid("enemy.game_over_zone_ratio must be in [0, 1]");
        }
        if self.level.kills_per_level == 0 {
            return invalid("level.kills_per_level must be positive");
        }
        if self.level.early_level_cap == 0
            || self.level.early_level_cap > self.level.max_level_for_scaling
        {
            return invalid("level caps must satisfy 1 <= early <= max");
        }
        if self.time_curve.interval_s <= 0.0 {
            return invalid("time_curve.interval_s must be positive");
        }
        if !(0.0..=1.0).contains(&self.power_up.spawn_chance) {
            return invalid("power_up.spawn_chance must be in [0, 1]");
        }
        if self.power_up.roll_interval_ms <= 0.0 {
            return invalid("power_up.roll_interval_ms must be positive");
        }
        Ok(())
    }
}
