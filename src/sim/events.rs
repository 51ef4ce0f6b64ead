//! Events produced by the simulation for feedback collaborators
//!
//! Events are queued on the snapshot and drained by whoever drives the game.
//! Nothing reads them back into the simulation.

use serde::{Deserialize, Serialize};

use super::achievements::AchievementId;
use super::state::{ObstacleKind, PowerUpKind, Surface};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched,
    Bounce {
        surface: Surface,
        hit_position: Option<f32>,
        points: u64,
    },
    ObstacleHit {
        kind: ObstacleKind,
    },
    ObstacleDestroyed {
        id: u32,
        points: u64,
    },
    PowerUpCollected {
        kind: PowerUpKind,
    },
    PowerUpExpired {
        kind: PowerUpKind,
    },
    ShieldAbsorbed {
        remaining: u32,
    },
    LifeLost {
        lives: u8,
    },
    LevelComplete {
        level: u32,
        bonus: u64,
    },
    GameOver {
        score: u64,
    },
    NewHighScore {
        score: u64,
    },
    AchievementUnlocked {
        id: AchievementId,
    },
}
