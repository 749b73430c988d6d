/// Collision & damage resolution.
///
/// Runs in two phases. `detect` reads the collections and records every
/// contact without touching them; `resolve` then applies damage, effects and
/// removals in one pass. No entity removed this tick can be hit again.

use rand::Rng;

use crate::compute::GameState;
use crate::config::GameOverRule;
use crate::entities::{
    CollectionMethod, Enemy, EnemyBullet, EntityId, Player, PlayerBullet, PowerUp, Rect,
};
use crate::events::GameEvent;
use crate::powerup;

/// Strict axis-aligned overlap; touching edges do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

// ── Enemy damage ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DamageOutcome {
    /// No live enemy has that id.
    Missing,
    Damaged { remaining: u32 },
    Destroyed(Enemy),
}

/// Apply `damage` to the enemy with `id`. At zero health it is removed and
/// returned; otherwise it flashes until `now + flash_ms`.
pub fn damage_enemy(
    enemies: &mut Vec<Enemy>,
    id: EntityId,
    damage: u32,
    now: f64,
    flash_ms: f64,
) -> DamageOutcome {
    let Some(index) = enemies.iter().position(|e| e.id == id) else {
        return DamageOutcome::Missing;
    };
    let enemy = &mut enemies[index];
    enemy.health = enemy.health.saturating_sub(damage);
    if enemy.health == 0 {
        DamageOutcome::Destroyed(enemies.remove(index))
    } else {
        enemy.flash_until = now + flash_ms;
        DamageOutcome::Damaged {
            remaining: enemy.health,
        }
    }
}

// ── Phase 1: detection ────────────────────────────────────────────────────────

/// Everything that touched something this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contacts {
    /// Accumulated bullet damage per enemy, in first-hit order.
    pub enemy_damage: Vec<(EntityId, u32)>,
    /// Indexed like the player bullet collection.
    pub spent_bullets: Vec<bool>,
    pub shot_power_ups: Vec<EntityId>,
    pub touched_power_ups: Vec<EntityId>,
    pub ramming_enemies: Vec<EntityId>,
    pub hitting_bullets: Vec<EntityId>,
}

pub fn detect(
    player: &Player,
    player_bullets: &[PlayerBullet],
    enemies: &[Enemy],
    enemy_bullets: &[EnemyBullet],
    power_ups: &[PowerUp],
    rule: GameOverRule,
) -> Contacts {
    let mut contacts = Contacts {
        spent_bullets: vec![false; player_bullets.len()],
        ..Contacts::default()
    };
    let mut pending = vec![0u32; enemies.len()];
    let mut shot = vec![false; power_ups.len()];

    // 1. Player bullets × enemies. A bullet is spent on the first enemy it
    //    overlaps that earlier bullets have not already doomed.
    for (bi, bullet) in player_bullets.iter().enumerate() {
        let rect = bullet.rect();
        for (ei, enemy) in enemies.iter().enumerate() {
            if pending[ei] >= enemy.health || !overlaps(&rect, &enemy.rect()) {
                continue;
            }
            if pending[ei] == 0 {
                contacts.enemy_damage.push((enemy.id, 0));
            }
            pending[ei] = pending[ei].saturating_add(player.power);
            contacts.spent_bullets[bi] = true;
            break;
        }
    }
    for (id, damage) in contacts.enemy_damage.iter_mut() {
        if let Some(ei) = enemies.iter().position(|e| e.id == *id) {
            *damage = pending[ei];
        }
    }

    // 2. Remaining player bullets × power-ups.
    for (bi, bullet) in player_bullets.iter().enumerate() {
        if contacts.spent_bullets[bi] {
            continue;
        }
        let rect = bullet.rect();
        for (pi, power_up) in power_ups.iter().enumerate() {
            if !shot[pi] && overlaps(&rect, &power_up.rect()) {
                shot[pi] = true;
                contacts.shot_power_ups.push(power_up.id);
                contacts.spent_bullets[bi] = true;
                break;
            }
        }
    }

    // 3. Player × power-ups nobody shot.
    let player_rect = player.rect();
    for (pi, power_up) in power_ups.iter().enumerate() {
        if !shot[pi] && overlaps(&player_rect, &power_up.rect()) {
            contacts.touched_power_ups.push(power_up.id);
        }
    }

    // 4. Enemies and enemy bullets × player.
    if rule == GameOverRule::HealthDepleted {
        for (ei, enemy) in enemies.iter().enumerate() {
            if pending[ei] < enemy.health && overlaps(&player_rect, &enemy.rect()) {
                contacts.ramming_enemies.push(enemy.id);
            }
        }
    }
    for bullet in enemy_bullets {
        if overlaps(&player_rect, &bullet.rect()) {
            contacts.hitting_bullets.push(bullet.id);
        }
    }

    contacts
}

// ── Phase 2: resolution ───────────────────────────────────────────────────────

/// Detect and apply all of this tick's collisions.
pub fn resolve(state: &mut GameState, rng: &mut impl Rng) -> Vec<GameEvent> {
    let contacts = detect(
        &state.player,
        &state.player_bullets,
        &state.enemies,
        &state.enemy_bullets,
        &state.power_ups,
        state.config.rules.game_over,
    );
    let mut events = Vec::new();
    let now = state.clock;

    // Enemy damage, kills and drops.
    for &(id, damage) in &contacts.enemy_damage {
        let outcome = damage_enemy(
            &mut state.enemies,
            id,
            damage,
            now,
            state.config.enemy.flash_ms,
        );
        if let DamageOutcome::Destroyed(enemy) = outcome {
            let points = (enemy.score as f64 * state.difficulty.score_multiplier).floor() as u32;
            state.stats.score = state.stats.score.saturating_add(points);
            state.stats.kills += 1;
            events.push(GameEvent::EnemyDestroyed {
                id: enemy.id,
                kind: enemy.kind,
                points,
            });
            if rng.gen_bool(enemy.drop_chance.clamp(0.0, 1.0)) {
                let kind = powerup::random_kind(rng);
                let rect = enemy.rect();
                let x = rect.center_x() - state.config.power_up.width / 2.0;
                let y = rect.center_y() - state.config.power_up.height / 2.0;
                let drop = powerup::spawn_power_up(kind, x, y, state.ids.next_id(), &state.config);
                events.push(GameEvent::PowerUpSpawned { id: drop.id, kind });
                state.power_ups.push(drop);
            }
        }
    }

    let mut spent = contacts.spent_bullets.iter();
    state
        .player_bullets
        .retain(|_| !spent.next().copied().unwrap_or(false));

    // Power-ups: shot first, then touched.
    let collections = contacts
        .shot_power_ups
        .iter()
        .map(|id| (*id, CollectionMethod::Shoot))
        .chain(
            contacts
                .touched_power_ups
                .iter()
                .map(|id| (*id, CollectionMethod::Touch)),
        );
    for (id, method) in collections {
        let Some(index) = state.power_ups.iter().position(|p| p.id == id) else {
            continue;
        };
        let power_up = state.power_ups.remove(index);
        let health_before = state.player.health;
        let effect = powerup::apply_effect(&mut state.player, power_up.kind, method, &state.config);
        state.stats.power_ups_collected += 1;
        if method == CollectionMethod::Shoot {
            state.stats.score = state
                .stats
                .score
                .saturating_add(state.config.score.power_up_collect);
        }
        events.push(GameEvent::PowerUpCollected {
            id,
            kind: power_up.kind,
            beneficial: effect.beneficial,
        });
        if state.player.health < health_before {
            events.push(GameEvent::PlayerDamaged {
                amount: health_before - state.player.health,
                health: state.player.health,
            });
        }
    }

    // Direct hits on the player. The first one opens the invulnerability
    // window, which blocks the rest.
    let invulnerable_ms = state.config.player.invulnerable_ms;
    for id in contacts.ramming_enemies {
        let amount = state.config.enemy.contact_damage;
        if !state.player.take_damage(amount, invulnerable_ms) {
            continue;
        }
        events.push(GameEvent::PlayerDamaged {
            amount,
            health: state.player.health,
        });
        if let Some(index) = state.enemies.iter().position(|e| e.id == id) {
            let enemy = state.enemies.remove(index);
            events.push(GameEvent::EnemyCrashed {
                id,
                kind: enemy.kind,
            });
        }
    }
    for id in contacts.hitting_bullets {
        state.enemy_bullets.retain(|b| b.id != id);
        let amount = state.config.enemy.bullet_damage;
        if state.player.take_damage(amount, invulnerable_ms) {
            events.push(GameEvent::PlayerDamaged {
                amount,
                health: state.player.health,
            });
        }
    }

    if !events.is_empty() {
        tracing::trace!(count = events.len(), "collisions resolved");
    }
    events
}
