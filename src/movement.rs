/// Movement pattern engine.
///
/// Speeds are expressed per 60 Hz reference frame and scaled by the real
/// frame delta, so a trajectory depends on elapsed time, not frame count.
/// Horizontal offsets that are functions of time (zigzag, sine, circle) are
/// evaluated directly from the time since spawn.

use crate::entities::{Enemy, MoveKind};

/// Length of one reference frame.
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

const DEFAULT_SPEED: f64 = 2.0;

/// Fraction of base speed kept for descent while circling.
const CIRCULAR_DESCENT: f64 = 0.7;
const CHASE_SPEED: f64 = 0.8;
/// Assumed player location as a fraction of field height.
const CHASE_TARGET_Y: f64 = 0.8;

pub fn frame_scale(delta_ms: f64) -> f64 {
    delta_ms.max(0.0) / REFERENCE_FRAME_MS
}

/// Unit triangle wave: 0 at phase 0, peaks +1 at 0.25, -1 at 0.75.
pub fn triangle_wave(phase: f64) -> f64 {
    let p = (phase + 0.25).rem_euclid(1.0);
    if p < 0.5 {
        4.0 * p - 1.0
    } else {
        3.0 - 4.0 * p
    }
}

fn clamp_x(x: f64, enemy_width: f64, field_width: f64) -> f64 {
    x.min(field_width - enemy_width).max(0.0)
}

/// Compute where `enemy` should be after `delta_ms`.
pub fn next_position(
    enemy: &Enemy,
    delta_ms: f64,
    now: f64,
    field_width: f64,
    field_height: f64,
) -> (f64, f64) {
    let params = &enemy.movement.params;
    let elapsed = now - enemy.spawned_at;
    let scale = frame_scale(delta_ms);
    let step = params.speed.unwrap_or(DEFAULT_SPEED) * scale;

    let (x, y) = match enemy.movement.kind {
        MoveKind::Linear => (enemy.x, enemy.y + step),
        MoveKind::Zigzag => {
            let amplitude = params.amplitude.unwrap_or(80.0);
            let frequency = params.frequency.unwrap_or(0.003);
            let offset = amplitude * triangle_wave(elapsed * frequency);
            (enemy.spawn_x + offset, enemy.y + step)
        }
        MoveKind::SineWave => {
            let amplitude = params.amplitude.unwrap_or(120.0);
            let frequency = params.frequency.unwrap_or(0.002);
            let phase = params.phase.unwrap_or(0.0);
            let x = field_width / 2.0 + amplitude * (elapsed * frequency + phase).sin();
            (x, enemy.y + step)
        }
        MoveKind::Circular => {
            let radius = params.radius.unwrap_or(60.0);
            let center_x = params.center_x.unwrap_or(field_width / 2.0);
            let frequency = params.frequency.unwrap_or(0.003);
            let x = center_x + radius * (elapsed * frequency).cos();
            (x, enemy.y + step * CIRCULAR_DESCENT)
        }
        MoveKind::Chase => {
            let dx = field_width / 2.0 - enemy.x;
            let dy = field_height * CHASE_TARGET_Y - enemy.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance == 0.0 {
                (enemy.x, enemy.y)
            } else {
                let chase = step * CHASE_SPEED;
                let x = enemy.x + dx / distance * chase;
                // Never climb back up once past the target line.
                let y = (enemy.y + dy / distance * chase).max(enemy.y);
                (x, y)
            }
        }
    };

    (clamp_x(x, enemy.width, field_width), y)
}

/// Move an enemy in place and advance its phase accumulator.
pub fn advance(enemy: &mut Enemy, delta_ms: f64, now: f64, field_width: f64, field_height: f64) {
    let (x, y) = next_position(enemy, delta_ms, now, field_width, field_height);
    enemy.x = x;
    enemy.y = y;
    enemy.move_phase += delta_ms * 0.001;
}
