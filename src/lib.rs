//! Combat core for a bottom-edge defence shooter.
//!
//! The host drives [`compute::tick`] once per frame and renders the
//! resulting [`compute::Snapshot`]; everything else in here is the
//! deterministic simulation behind it.

pub mod attack;
pub mod collision;
pub mod compute;
pub mod config;
pub mod difficulty;
pub mod entities;
pub mod error;
pub mod events;
pub mod movement;
pub mod powerup;
pub mod spawn;
pub mod weapon;

pub use compute::{init_state, tick, GameState};
pub use config::{DifficultyCurve, GameConfig, GameOverRule};
pub use error::{ConfigError, Result};
pub use events::{GameEvent, GameOverReason};
