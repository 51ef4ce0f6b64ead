//! Bounce Arcade - deterministic simulation core for a ball-bounce arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, state machine)
//! - `driver`: Fixed-step scheduler owning the real-time timers
//! - `autopilot`: Demo player that drives the game through the action contract
//! - `persistence`: High score storage collaborator
//! - `feedback`: Audio/haptic cue mapping for simulation events

pub mod autopilot;
pub mod driver;
pub mod feedback;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use driver::GameDriver;
pub use highscores::HighScores;
pub use persistence::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame duration; `dt = 1.0` means one frame of this length
    pub const FRAME_MS: f32 = 16.67;
    /// Undrained events kept on the state; older ones are dropped first
    pub const MAX_QUEUED_EVENTS: usize = 1024;
    /// Ticks shorter than this are dropped as no-ops
    pub const MIN_DT: f32 = 0.1;
    /// Longest step a single tick will integrate
    pub const MAX_DT: f32 = 3.0;

    /// Default playfield dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Max velocity as a multiple of the level's ball speed
    pub const MAX_VELOCITY_FACTOR: f32 = 2.0;
    /// Gravity is scaled down to keep pixel-space acceleration sane
    pub const GRAVITY_SCALE: f32 = 0.1;

    /// Platform defaults - top edge sits this far above the floor
    pub const PLATFORM_FLOOR_GAP: f32 = 50.0;
    pub const PLATFORM_HEIGHT: f32 = 15.0;
    /// Lateral velocity added per unit of off-center hit
    pub const PLATFORM_HIT_KICK: f32 = 2.0;

    pub const INITIAL_LIVES: u8 = 3;

    /// Scoring
    pub const BOUNCE_BASE_POINTS: f32 = 10.0;
    pub const CENTER_HIT_BONUS: f32 = 5.0;
    pub const LEVEL_COMPLETE_BONUS: u64 = 100;
    pub const TIME_BONUS_PER_SECOND: f32 = 2.0;

    /// Power-ups
    pub const POWERUP_RADIUS: f32 = 15.0;
    pub const MULTI_BALL_SPREAD_DEG: f32 = 30.0;
    pub const LARGER_PADDLE_FACTOR: f32 = 1.5;
    pub const SLOW_MO_FACTOR: f32 = 0.6;
    pub const SCORE_BOOST_FACTOR: f32 = 2.0;
    pub const SHIELD_BOUNCES: u32 = 5;
    pub const MAGNETIC_RANGE: f32 = 100.0;
    pub const MAGNETIC_STRENGTH: f32 = 0.5;

    /// Obstacles
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;
    pub const BRICK_HEALTH: i32 = 2;
    pub const BRICK_POINTS: u64 = 50;
}

/// Clamp `value` into `[min, max]`, mapping NaN to `min`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Seconds of game time covered by a tick of `dt` reference frames
#[inline]
pub fn frames_to_seconds(dt: f32) -> f32 {
    dt * consts::FRAME_MS / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(50.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(f32::NAN, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_frames_to_seconds() {
        assert!((frames_to_seconds(60.0) - 1.0002).abs() < 1e-4);
    }
}
