/// All game entity types: plain data plus small invariant-keeping helpers.
///
/// Coordinates are field units with x growing right and y growing down.
/// Times are milliseconds on the simulation clock.

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle used for every collision test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Monotonic id source owned by the session.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Straight down, one-shot at level 1.
    Basic,
    /// Zigzags; unlocks after level 3.
    Fast,
    /// Slow and armoured, fires single shots; unlocks after level 5.
    Tank,
    /// Sine-wave sweep with a 3-way spread; unlocks after level 8.
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Boss,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Menu,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    DamageUp,
    Health,
    MultiShot,
    Shield,
    /// Never spawned; only appears as the inverted form of a touched item.
    DamageDown,
}

/// How a power-up was picked up: shot down (beneficial) or rammed (penalty).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionMethod {
    Shoot,
    Touch,
}

// ── Patterns ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Linear,
    Zigzag,
    SineWave,
    Circular,
    Chase,
}

/// Pattern parameters. Missing values fall back to per-pattern defaults
/// inside the movement engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveParams {
    pub amplitude: Option<f64>,
    pub frequency: Option<f64>,
    pub phase: Option<f64>,
    pub radius: Option<f64>,
    pub center_x: Option<f64>,
    /// Units per reference frame.
    pub speed: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovePattern {
    pub kind: MoveKind,
    pub params: MoveParams,
}

impl MovePattern {
    pub fn linear(speed: f64) -> Self {
        Self {
            kind: MoveKind::Linear,
            params: MoveParams {
                speed: Some(speed),
                ..MoveParams::default()
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackPattern {
    pub enabled: bool,
    pub fire_rate_ms: f64,
    pub bullet_speed: f64,
    pub bullet_count: u32,
    /// Total fan angle in degrees.
    pub spread_deg: f64,
    pub last_fired: f64,
}

impl AttackPattern {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            fire_rate_ms: 0.0,
            bullet_speed: 0.0,
            bullet_count: 0,
            spread_deg: 0.0,
            last_fired: 0.0,
        }
    }
}

// ── Enemy stat table ──────────────────────────────────────────────────────────

/// Fixed per-kind stats before level scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    pub speed: f64,
    pub width: f64,
    pub height: f64,
    pub score: u32,
    pub drop_chance: f64,
    pub base_health: u32,
    pub movement: MovePattern,
    pub attack: AttackPattern,
}

impl EnemyKind {
    pub fn profile(self) -> EnemyProfile {
        match self {
            EnemyKind::Basic => EnemyProfile {
                speed: 2.0,
                width: 40.0,
                height: 40.0,
                score: 100,
                drop_chance: 0.3,
                base_health: 10,
                movement: MovePattern::linear(2.0),
                attack: AttackPattern::disabled(),
            },
            EnemyKind::Fast => EnemyProfile {
                speed: 3.0,
                width: 35.0,
                height: 35.0,
                score: 150,
                drop_chance: 0.25,
                base_health: 10,
                movement: MovePattern {
                    kind: MoveKind::Zigzag,
                    params: MoveParams {
                        speed: Some(3.0),
                        amplitude: Some(80.0),
                        frequency: Some(0.003),
                        ..MoveParams::default()
                    },
                },
                attack: AttackPattern::disabled(),
            },
            EnemyKind::Tank => EnemyProfile {
                speed: 1.2,
                width: 50.0,
                height: 50.0,
                score: 300,
                drop_chance: 0.5,
                base_health: 30,
                movement: MovePattern::linear(1.2),
                attack: AttackPattern {
                    enabled: true,
                    fire_rate_ms: 2000.0,
                    bullet_speed: 4.0,
                    bullet_count: 1,
                    spread_deg: 0.0,
                    last_fired: 0.0,
                },
            },
            EnemyKind::Boss => EnemyProfile {
                speed: 1.5,
                width: 80.0,
                height: 80.0,
                score: 1000,
                drop_chance: 0.8,
                base_health: 50,
                movement: MovePattern {
                    kind: MoveKind::SineWave,
                    params: MoveParams {
                        speed: Some(1.5),
                        amplitude: Some(120.0),
                        frequency: Some(0.002),
                        ..MoveParams::default()
                    },
                },
                attack: AttackPattern {
                    enabled: true,
                    fire_rate_ms: 1500.0,
                    bullet_speed: 5.0,
                    bullet_count: 3,
                    spread_deg: 30.0,
                    last_fired: 0.0,
                },
            },
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    /// Fixed for the whole session.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub health: u32,
    pub max_health: u32,
    /// Bullet damage; also shortens the fire interval. Never below 1.
    pub power: u32,
    /// Bullets per volley. Never below 1.
    pub shot_count: u32,
    pub invulnerable_ms: f64,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Returns `false` (and changes nothing) while invulnerable.
    pub fn take_damage(&mut self, amount: u32, invulnerable_ms: f64) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.invulnerable_ms = invulnerable_ms;
        true
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    pub fn set_power(&mut self, power: u32) {
        self.power = power.max(1);
    }

    pub fn tick_invulnerability(&mut self, delta_ms: f64) {
        self.invulnerable_ms = (self.invulnerable_ms - delta_ms).max(0.0);
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub x: f64,
    pub y: f64,
    /// Horizontal anchor the zigzag pattern oscillates around.
    pub spawn_x: f64,
    pub width: f64,
    pub height: f64,
    pub health: u32,
    pub max_health: u32,
    pub score: u32,
    pub drop_chance: f64,
    pub movement: MovePattern,
    pub attack: AttackPattern,
    pub spawned_at: f64,
    pub move_phase: f64,
    /// Hit-flash deadline; rendering only.
    pub flash_until: f64,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_flashing(&self, now: f64) -> bool {
        now < self.flash_until
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBullet {
    pub id: EntityId,
    /// Kind of the enemy that fired it; picks the bullet's colour.
    pub owner: EnemyKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    /// Unit direction vector.
    pub dx: f64,
    pub dy: f64,
}

impl EnemyBullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Player bullets only travel straight up.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBullet {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl PlayerBullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Nominal effect magnitude, for display.
    pub value: i64,
    /// Units per second.
    pub fall_speed: f64,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Short tag drawn beside the item, e.g. `+3` or `3s` for a shield.
    pub fn value_label(&self) -> String {
        match self.kind {
            PowerUpKind::Shield => format!("{}s", self.value / 1000),
            _ => format!("{:+}", self.value),
        }
    }
}
