/// Fire-and-forget notifications for audio, particles and statistics
/// collaborators, plus the per-session counters the driver maintains.

use crate::entities::{EnemyKind, EntityId, PowerUpKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    /// Player health reached zero.
    HealthDepleted,
    /// An enemy crossed the danger line.
    DangerZone,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    SessionStarted,
    EnemyDestroyed {
        id: EntityId,
        kind: EnemyKind,
        points: u32,
    },
    /// Left the field without being killed.
    EnemyEscaped { id: EntityId },
    /// Rammed the player (health-depleted rule only).
    EnemyCrashed { id: EntityId, kind: EnemyKind },
    PlayerDamaged { amount: u32, health: u32 },
    PowerUpSpawned { id: EntityId, kind: PowerUpKind },
    PowerUpCollected {
        id: EntityId,
        kind: PowerUpKind,
        beneficial: bool,
    },
    ShotFired { bullets: usize },
    EnemyFired { id: EntityId, bullets: usize },
    LevelUp { level: u32 },
    GameOver { reason: GameOverReason },
}

/// Cumulative counters for the current session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionStats {
    pub score: u32,
    pub kills: u32,
    pub power_ups_collected: u32,
    pub survival_ms: f64,
}

impl SessionStats {
    pub fn survival_seconds(&self) -> f64 {
        self.survival_ms / 1000.0
    }
}
