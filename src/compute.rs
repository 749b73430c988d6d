/// Simulation driver and game-status state machine.
///
/// The host calls `tick` once per display refresh with its own timestamp.
/// All randomness comes through the injected `rng` so callers control
/// determinism (tests use a seeded RNG). Every timer runs on the simulation
/// clock, which only advances while `Playing`; a pause therefore never
/// produces a burst of catch-up spawns.

use rand::Rng;

use crate::attack;
use crate::collision;
use crate::config::{GameConfig, GameOverRule};
use crate::difficulty::{self, Difficulty};
use crate::entities::{
    Enemy, EnemyBullet, GameStatus, IdGenerator, Player, PlayerBullet, PowerUp,
};
use crate::events::{GameEvent, GameOverReason, SessionStats};
use crate::movement;
use crate::powerup::{self, PowerUpRoller};
use crate::spawn::{self, SpawnScheduler};
use crate::weapon::{self, AutoFire};

// ── State ─────────────────────────────────────────────────────────────────────

/// The entire session. Owned by the host; only `tick` and the lifecycle
/// functions below mutate it.
#[derive(Clone, Debug)]
pub struct GameState {
    pub config: GameConfig,
    pub width: f64,
    pub height: f64,
    pub status: GameStatus,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub player_bullets: Vec<PlayerBullet>,
    pub power_ups: Vec<PowerUp>,
    pub stats: SessionStats,
    pub difficulty: Difficulty,
    pub spawner: SpawnScheduler,
    pub auto_fire: AutoFire,
    pub power_up_roller: PowerUpRoller,
    pub ids: IdGenerator,
    /// Milliseconds of `Playing` time since the session started.
    pub clock: f64,
    pub last_host_time: Option<f64>,
    pub game_over_reason: Option<GameOverReason>,
}

/// Read-only view handed to renderers.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub status: GameStatus,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub enemy_bullets: &'a [EnemyBullet],
    pub player_bullets: &'a [PlayerBullet],
    pub power_ups: &'a [PowerUp],
    pub stats: &'a SessionStats,
    pub difficulty: &'a Difficulty,
    pub danger_line: Option<f64>,
    pub clock: f64,
    pub game_over_reason: Option<GameOverReason>,
}

impl GameState {
    /// Y coordinate of the danger line, when the zone rule is active.
    pub fn danger_line(&self) -> Option<f64> {
        match self.config.rules.game_over {
            GameOverRule::DangerZone => Some(self.height * self.config.enemy.game_over_zone_ratio),
            GameOverRule::HealthDepleted => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            status: self.status,
            player: &self.player,
            enemies: &self.enemies,
            enemy_bullets: &self.enemy_bullets,
            player_bullets: &self.player_bullets,
            power_ups: &self.power_ups,
            stats: &self.stats,
            difficulty: &self.difficulty,
            danger_line: self.danger_line(),
            clock: self.clock,
            game_over_reason: self.game_over_reason,
        }
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

fn new_player(config: &GameConfig, width: f64, height: f64) -> Player {
    let p = &config.player;
    Player {
        x: ((width - p.width) / 2.0).max(0.0),
        y: height * (1.0 - p.area_ratio),
        width: p.width,
        height: p.height,
        health: p.initial_health,
        max_health: p.initial_health,
        power: p.initial_power.max(1),
        shot_count: 1,
        invulnerable_ms: 0.0,
    }
}

/// Build a session sitting at the menu for a field of `width` × `height`.
pub fn init_state(config: GameConfig, width: f64, height: f64) -> GameState {
    let player = new_player(&config, width, height);
    let difficulty = difficulty::difficulty_for(0, 0.0, &config);
    GameState {
        config,
        width,
        height,
        status: GameStatus::Menu,
        player,
        enemies: Vec::new(),
        enemy_bullets: Vec::new(),
        player_bullets: Vec::new(),
        power_ups: Vec::new(),
        stats: SessionStats::default(),
        difficulty,
        spawner: SpawnScheduler::new(),
        auto_fire: AutoFire::new(),
        power_up_roller: PowerUpRoller::new(),
        ids: IdGenerator::new(),
        clock: 0.0,
        last_host_time: None,
        game_over_reason: None,
    }
}

// ── Lifecycle commands ────────────────────────────────────────────────────────

fn clear_session(state: &mut GameState) {
    state.player = new_player(&state.config, state.width, state.height);
    state.enemies.clear();
    state.enemy_bullets.clear();
    state.player_bullets.clear();
    state.power_ups.clear();
    state.stats = SessionStats::default();
    state.difficulty = difficulty::difficulty_for(0, 0.0, &state.config);
    state.spawner.reset();
    state.auto_fire.reset();
    state.power_up_roller.reset();
    state.ids = IdGenerator::new();
    state.clock = 0.0;
    state.last_host_time = None;
    state.game_over_reason = None;
}

/// Begin a new session from any status.
pub fn start(state: &mut GameState) -> Vec<GameEvent> {
    reset(state);
    tracing::info!(
        width = state.width,
        height = state.height,
        difficulty = %state.config.rules.difficulty,
        game_over = %state.config.rules.game_over,
        "session started"
    );
    vec![GameEvent::SessionStarted]
}

/// Same as `start` without announcing a new session.
pub fn reset(state: &mut GameState) {
    clear_session(state);
    state.status = GameStatus::Playing;
}

pub fn pause(state: &mut GameState) {
    if state.status == GameStatus::Playing {
        state.status = GameStatus::Paused;
        tracing::debug!(clock = state.clock, "paused");
    }
}

pub fn resume(state: &mut GameState) {
    if state.status == GameStatus::Paused {
        state.status = GameStatus::Playing;
        tracing::debug!(clock = state.clock, "resumed");
    }
}

pub fn toggle_pause(state: &mut GameState) {
    match state.status {
        GameStatus::Playing => pause(state),
        GameStatus::Paused => resume(state),
        _ => {}
    }
}

/// Tear the session down and return to the menu.
pub fn go_to_menu(state: &mut GameState) {
    clear_session(state);
    state.status = GameStatus::Menu;
}

/// Apply a horizontal target already mapped into field space. The ship's y
/// never changes.
pub fn set_player_target_x(state: &mut GameState, x: f64) {
    let max_x = (state.width - state.player.width).max(0.0);
    state.player.x = x.clamp(0.0, max_x);
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the simulation to host time `host_now` (milliseconds).
///
/// Outside `Playing` this only records the timestamp.
pub fn tick(state: &mut GameState, host_now: f64, rng: &mut impl Rng) -> Vec<GameEvent> {
    let delta = match state.last_host_time {
        Some(last) => (host_now - last).max(0.0),
        None => 0.0,
    };
    state.last_host_time = Some(host_now);

    if state.status != GameStatus::Playing {
        return Vec::new();
    }
    step(state, delta, rng)
}

/// Advance a playing session by exactly `delta` milliseconds.
pub fn step(state: &mut GameState, delta: f64, rng: &mut impl Rng) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.status != GameStatus::Playing {
        return events;
    }

    let delta = delta.max(0.0);
    state.clock += delta;
    let now = state.clock;

    // ── 1. Timers & survival bonus ───────────────────────────────────────────
    state.player.tick_invulnerability(delta);
    let seconds_before = (state.stats.survival_ms / 1000.0).floor() as u32;
    state.stats.survival_ms += delta;
    let seconds_after = (state.stats.survival_ms / 1000.0).floor() as u32;
    let survival_bonus = (seconds_after - seconds_before) * state.config.score.survival_per_second;
    state.stats.score = state.stats.score.saturating_add(survival_bonus);

    // ── 2. Difficulty ────────────────────────────────────────────────────────
    state.difficulty = difficulty::difficulty_for(
        state.stats.kills,
        state.stats.survival_seconds(),
        &state.config,
    );

    // ── 3. Spawn ─────────────────────────────────────────────────────────────
    if state
        .spawner
        .should_spawn(now, state.difficulty.spawn_interval_ms)
    {
        let kind = spawn::select_kind(state.difficulty.kill_level, rng);
        let id = state.ids.next_id();
        let enemy = spawn::spawn_enemy(
            kind,
            &state.difficulty,
            now,
            state.width,
            id,
            &state.config,
            rng,
        );
        state.enemies.push(enemy);
    }

    // ── 4. Movement ──────────────────────────────────────────────────────────
    for enemy in state.enemies.iter_mut() {
        movement::advance(enemy, delta, now, state.width, state.height);
    }

    // ── 5. Enemy attacks & bullets ───────────────────────────────────────────
    for enemy in state.enemies.iter_mut() {
        let volley = attack::fire(enemy, now, &mut state.ids);
        if !volley.is_empty() {
            events.push(GameEvent::EnemyFired {
                id: enemy.id,
                bullets: volley.len(),
            });
            state.enemy_bullets.extend(volley);
        }
    }
    for bullet in state.enemy_bullets.iter_mut() {
        attack::advance_bullet(bullet, delta);
    }

    // ── 6. Auto-fire & player bullets ────────────────────────────────────────
    for bullet in state.player_bullets.iter_mut() {
        weapon::advance_bullet(bullet, delta);
    }
    let volley = state.auto_fire.try_fire(now, &state.player, &state.config);
    if !volley.is_empty() {
        events.push(GameEvent::ShotFired {
            bullets: volley.len(),
        });
        state.player_bullets.extend(volley);
    }

    // ── 7. Power-ups ─────────────────────────────────────────────────────────
    for power_up in state.power_ups.iter_mut() {
        powerup::advance(power_up, delta);
    }
    if let Some(power_up) =
        state
            .power_up_roller
            .roll(now, state.width, &mut state.ids, &state.config, rng)
    {
        events.push(GameEvent::PowerUpSpawned {
            id: power_up.id,
            kind: power_up.kind,
        });
        state.power_ups.push(power_up);
    }

    // ── 8. Collisions ────────────────────────────────────────────────────────
    let level_before = state.difficulty.kill_level;
    events.extend(collision::resolve(state, rng));
    let level_after = difficulty::kill_level(state.stats.kills, &state.config);
    if level_after > level_before {
        tracing::debug!(level = level_after, kills = state.stats.kills, "level up");
        events.push(GameEvent::LevelUp { level: level_after });
    }

    // ── 9. Out-of-bounds pruning ─────────────────────────────────────────────
    let (width, height) = (state.width, state.height);
    state.enemies.retain(|e| {
        let inside = e.y < height + e.height;
        if !inside {
            events.push(GameEvent::EnemyEscaped { id: e.id });
        }
        inside
    });
    state
        .enemy_bullets
        .retain(|b| !attack::bullet_out_of_bounds(b, width, height));
    state
        .player_bullets
        .retain(|b| !weapon::bullet_out_of_bounds(b));
    state
        .power_ups
        .retain(|p| !powerup::out_of_bounds(p, height));

    // ── 10. Game over ────────────────────────────────────────────────────────
    if let Some(reason) = check_game_over(state) {
        state.status = GameStatus::GameOver;
        state.game_over_reason = Some(reason);
        tracing::info!(
            ?reason,
            score = state.stats.score,
            kills = state.stats.kills,
            survival_s = state.stats.survival_seconds(),
            "game over"
        );
        events.push(GameEvent::GameOver { reason });
    }

    tracing::trace!(
        clock = now,
        enemies = state.enemies.len(),
        bullets = state.player_bullets.len() + state.enemy_bullets.len(),
        "tick"
    );
    events
}

/// Health depletion always ends the session; the danger line only under the
/// zone rule.
pub fn check_game_over(state: &GameState) -> Option<GameOverReason> {
    if state.player.is_dead() {
        return Some(GameOverReason::HealthDepleted);
    }
    let line = state.danger_line()?;
    state
        .enemies
        .iter()
        .any(|e| e.y >= line)
        .then_some(GameOverReason::DangerZone)
}
