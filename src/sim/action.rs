//! The action contract
//!
//! Every change to a [`GameState`](super::GameState) is one of these, applied
//! by [`dispatch`](super::dispatch).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::achievements::AchievementId;
use super::state::{Ball, Obstacle, PowerUp, Surface};

/// Partial aim update from the input layer; `None` fields are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AimUpdate {
    pub angle: Option<f32>,
    pub power: Option<f32>,
    pub drag_start: Option<Vec2>,
    pub drag_end: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Menu or game over: reset to level 1 and start aiming
    StartGame,
    /// Level complete: begin aiming on the freshly loaded level
    EnterAiming,
    /// Fire the ball; angle in degrees, power in percent
    LaunchBall { angle: f32, power: f32 },
    PauseGame,
    ResumeGame,
    /// Back to the menu with a fresh game
    ResetGame,
    UpdatePlatformPosition { x: f32 },
    BallBounce {
        surface: Surface,
        hit_position: Option<f32>,
    },
    LoseLife,
    NextLevel,
    GameOver,
    /// Add play time, in seconds
    UpdateTime { seconds: f32 },
    ResetCombo,
    UpdateAimData(AimUpdate),
    SpawnPowerUp(PowerUp),
    CollectPowerUp { id: u32 },
    ActivatePowerUp(PowerUp),
    DeactivatePowerUp { id: u32 },
    SpawnObstacle(Obstacle),
    RemoveObstacle { id: u32 },
    UpdateObstacle(Obstacle),
    UnlockAchievement { id: AchievementId },
    AddMultiBall(Ball),
    UpdateShieldBounces { count: u32 },
    SetMagneticRange { range: f32 },
    /// Advance the simulation by `dt` reference frames
    Tick { dt: f32 },
}
