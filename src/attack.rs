/// Attack pattern engine and enemy bullet motion.

use crate::entities::{Enemy, EnemyBullet, IdGenerator};
use crate::movement::frame_scale;

pub const ENEMY_BULLET_WIDTH: f64 = 4.0;
pub const ENEMY_BULLET_HEIGHT: f64 = 8.0;

/// Slack around the field before an enemy bullet is discarded.
const BULLET_MARGIN: f64 = 20.0;

/// Fan angles in radians for a volley of `count` bullets over `spread_deg`.
pub fn volley_angles(count: u32, spread_deg: f64) -> Vec<f64> {
    let spread = spread_deg.to_radians();
    let step = if count > 1 {
        spread / (count - 1) as f64
    } else {
        0.0
    };
    (0..count)
        .map(|i| if count > 1 { -spread / 2.0 + step * i as f64 } else { 0.0 })
        .collect()
}

/// Emit a volley if the enemy's fire interval has elapsed.
///
/// Bullets leave from the enemy's bottom-centre. `last_fired` is updated
/// whenever a volley goes out.
pub fn fire(enemy: &mut Enemy, now: f64, ids: &mut IdGenerator) -> Vec<EnemyBullet> {
    let owner = enemy.kind;
    let attack = &mut enemy.attack;
    if !attack.enabled || now - attack.last_fired < attack.fire_rate_ms {
        return Vec::new();
    }
    attack.last_fired = now;

    let origin_x = enemy.x + enemy.width / 2.0;
    let origin_y = enemy.y + enemy.height;
    let speed = attack.bullet_speed;

    volley_angles(attack.bullet_count, attack.spread_deg)
        .into_iter()
        .map(|angle| EnemyBullet {
            id: ids.next_id(),
            owner,
            x: origin_x,
            y: origin_y,
            width: ENEMY_BULLET_WIDTH,
            height: ENEMY_BULLET_HEIGHT,
            speed,
            dx: angle.sin(),
            dy: angle.cos(),
        })
        .collect()
}

pub fn advance_bullet(bullet: &mut EnemyBullet, delta_ms: f64) {
    let scale = frame_scale(delta_ms);
    bullet.x += bullet.dx * bullet.speed * scale;
    bullet.y += bullet.dy * bullet.speed * scale;
}

pub fn bullet_out_of_bounds(bullet: &EnemyBullet, field_width: f64, field_height: f64) -> bool {
    bullet.y > field_height + BULLET_MARGIN
        || bullet.x < -BULLET_MARGIN
        || bullet.x > field_width + BULLET_MARGIN
}
