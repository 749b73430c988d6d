/// Player auto-fire.

use crate::config::GameConfig;
use crate::entities::{Player, PlayerBullet};
use crate::movement::frame_scale;

/// Shot interval for a given power: faster with power, floored.
pub fn fire_interval(power: u32, config: &GameConfig) -> f64 {
    let w = &config.weapon;
    let bonus = power as f64 - config.player.initial_power as f64;
    (w.base_fire_interval_ms - bonus * w.power_reduction_ms).max(w.min_fire_interval_ms)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoFire {
    pub last_shot: f64,
}

impl AutoFire {
    pub fn new() -> Self {
        Self::default()
    }

    /// A volley of `shot_count` bullets centred on the ship, or nothing if the
    /// interval has not elapsed.
    pub fn try_fire(
        &mut self,
        now: f64,
        player: &Player,
        config: &GameConfig,
    ) -> Vec<PlayerBullet> {
        if now - self.last_shot < fire_interval(player.power, config) {
            return Vec::new();
        }
        self.last_shot = now;

        let w = &config.weapon;
        let count = player.shot_count.max(1);
        let centre = player.x + player.width / 2.0;
        let first = centre - (count - 1) as f64 * w.volley_spacing / 2.0;

        (0..count)
            .map(|i| PlayerBullet {
                x: first + i as f64 * w.volley_spacing - w.bullet_width / 2.0,
                y: player.y,
                width: w.bullet_width,
                height: w.bullet_height,
                speed: w.bullet_speed,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.last_shot = 0.0;
    }
}

pub fn advance_bullet(bullet: &mut PlayerBullet, delta_ms: f64) {
    bullet.y -= bullet.speed * frame_scale(delta_ms);
}

pub fn bullet_out_of_bounds(bullet: &PlayerBullet) -> bool {
    bullet.y + bullet.height < 0.0
}
