//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Every mutation goes through [`dispatch`]
//! - No wall-clock time; the simulation clock advances only with ticks
//! - No randomness; spawns that need it arrive as actions from the driver
//! - No rendering or platform dependencies

pub mod achievements;
pub mod action;
pub mod collision;
pub mod dispatch;
pub mod events;
pub mod levels;
pub mod obstacles;
pub mod physics;
pub mod powerups;
pub mod scoring;
pub mod state;
mod tick;

pub use achievements::{Achievement, AchievementContext, AchievementId};
pub use action::{Action, AimUpdate};
pub use collision::ObstacleHit;
pub use dispatch::dispatch;
pub use events::GameEvent;
pub use levels::{LEVELS, LevelConfig, level_config};
pub use state::{
    ActiveEffects, AimData, Ball, CollisionState, GamePhase, GameState, Obstacle, ObstacleKind,
    Platform, PowerUp, PowerUpKind, ScoreData, Surface,
};
