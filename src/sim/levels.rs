//! Level table and progression
//!
//! Five fixed levels, each strictly harder than the one before: smaller
//! platform, faster ball, stronger gravity, more bounces, less time.

use serde::{Deserialize, Serialize};

use super::obstacles;
use super::state::{AimData, CollisionState, GameState, Platform, ScoreData};
use crate::consts::MAX_VELOCITY_FACTOR;

/// Immutable per-level tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub ball_speed: f32,
    pub platform_width: f32,
    pub platform_speed: f32,
    pub gravity: f32,
    pub bounce_coefficient: f32,
    /// Platform bounces needed to clear the level
    pub target_bounces: u32,
    /// Seconds of play allowed per life
    pub time_limit: f32,
}

impl LevelConfig {
    /// Velocity limit for balls on this level
    pub fn max_velocity(&self) -> f32 {
        self.ball_speed * MAX_VELOCITY_FACTOR
    }
}

pub static LEVELS: [LevelConfig; 5] = [
    LevelConfig {
        ball_speed: 8.0,
        platform_width: 120.0,
        platform_speed: 10.0,
        gravity: 0.4,
        bounce_coefficient: 0.9,
        target_bounces: 10,
        time_limit: 60.0,
    },
    LevelConfig {
        ball_speed: 9.0,
        platform_width: 105.0,
        platform_speed: 11.0,
        gravity: 0.5,
        bounce_coefficient: 0.88,
        target_bounces: 15,
        time_limit: 55.0,
    },
    LevelConfig {
        ball_speed: 10.0,
        platform_width: 95.0,
        platform_speed: 12.0,
        gravity: 0.6,
        bounce_coefficient: 0.86,
        target_bounces: 20,
        time_limit: 50.0,
    },
    LevelConfig {
        ball_speed: 11.0,
        platform_width: 85.0,
        platform_speed: 13.0,
        gravity: 0.7,
        bounce_coefficient: 0.84,
        target_bounces: 25,
        time_limit: 45.0,
    },
    LevelConfig {
        ball_speed: 12.0,
        platform_width: 75.0,
        platform_speed: 14.0,
        gravity: 0.8,
        bounce_coefficient: 0.82,
        target_bounces: 30,
        time_limit: 40.0,
    },
];

/// Config for a 1-based level number; `None` past the last level
pub fn level_config(level: u32) -> Option<&'static LevelConfig> {
    let index = level.checked_sub(1)? as usize;
    LEVELS.get(index)
}

pub fn level_count() -> u32 {
    LEVELS.len() as u32
}

pub fn is_level_complete(score: &ScoreData, config: &LevelConfig) -> bool {
    score.bounce_count >= config.target_bounces
}

pub fn is_time_expired(score: &ScoreData, config: &LevelConfig) -> bool {
    score.time_elapsed >= config.time_limit
}

/// Load `level`: reset per-level counters, re-seed ball and platform,
/// swap in the level's obstacles and drop power-ups from the previous level.
///
/// Score, lives and high score carry over.
pub fn enter_level(state: &mut GameState, level: u32) {
    super::powerups::deactivate_all(state);
    state.power_ups.clear();
    state.obstacles.clear();

    state.score.level = level;
    state.score.bounce_count = 0;
    state.score.time_elapsed = 0.0;
    state.score.consecutive_bounces = 0;
    state.score.multiplier = 1.0;

    let config = state.level_config();
    state.platform = Platform::for_level(
        config,
        state.settings.canvas_width,
        state.settings.canvas_height,
    );
    state.reset_ball();
    state.aim = AimData::default();
    state.collision = CollisionState::default();

    let layout = obstacles::layout_for_level(state, level);
    state.obstacles.extend(layout);

    log::info!(
        "Level {} entered: {} bounces in {}s, {} obstacles",
        level,
        config.target_bounces,
        config.time_limit,
        state.obstacles.len()
    );
}
