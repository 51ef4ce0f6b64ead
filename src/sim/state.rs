//! Game state and core simulation types
//!
//! [`GameState`] is the snapshot: everything a renderer or UI reads lives here,
//! and only the dispatcher writes to it.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::achievements::{self, Achievement};
use super::events::GameEvent;
use super::levels::{self, LevelConfig};
use crate::clamp;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Ball parked, waiting for the player to aim and launch
    Aiming,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
    /// Level cleared, next level loaded and waiting to be entered
    LevelComplete,
}

/// Surfaces the ball can bounce off (or fall through)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Platform,
    Wall,
    Ceiling,
    Floor,
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Downward acceleration before [`GRAVITY_SCALE`]
    pub gravity: f32,
    /// Fraction of velocity kept after a bounce
    pub bounce_coefficient: f32,
    /// Per-component velocity limit
    pub max_velocity: f32,
}

impl Ball {
    /// A resting ball tuned for the given level
    pub fn new(id: u32, pos: Vec2, config: &LevelConfig) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            gravity: config.gravity,
            bounce_coefficient: config.bounce_coefficient,
            max_velocity: config.max_velocity(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Bounding box as (min, max)
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let r = Vec2::splat(self.radius);
        (self.pos - r, self.pos + r)
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Horizontal center
    pub x: f32,
    /// Top edge (fixed for the whole game)
    pub y: f32,
    pub width: f32,
    /// Level width, restored when a resize power-up ends
    pub base_width: f32,
    pub height: f32,
    /// Max horizontal travel per reference frame (used by input translation)
    pub speed: f32,
}

impl Platform {
    /// Centered platform for a level
    pub fn for_level(config: &LevelConfig, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            x: canvas_width / 2.0,
            y: canvas_height - PLATFORM_FLOOR_GAP,
            width: config.platform_width,
            base_width: config.platform_width,
            height: PLATFORM_HEIGHT,
            speed: config.platform_speed,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Point on the top edge at the center, where the magnet pulls toward
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move to `x`, keeping the whole paddle on the canvas
    pub fn move_to(&mut self, x: f32, canvas_width: f32) {
        let half = self.width / 2.0;
        self.x = clamp(x, half, (canvas_width - half).max(half));
    }

    /// Change width around the current center
    pub fn resize(&mut self, width: f32, canvas_width: f32) {
        self.width = width;
        self.move_to(self.x, canvas_width);
    }
}

/// Score, lives and streak bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreData {
    pub score: u64,
    pub lives: u8,
    /// Current level, 1-based
    pub level: u32,
    pub high_score: u64,
    /// Platform bounces this level
    pub bounce_count: u32,
    /// Seconds spent in play this level
    pub time_elapsed: f32,
    pub multiplier: f32,
    pub consecutive_bounces: u32,
    pub combo_count: u32,
}

impl ScoreData {
    pub fn new(lives: u8, high_score: u64) -> Self {
        Self {
            score: 0,
            lives,
            level: 1,
            high_score,
            bounce_count: 0,
            time_elapsed: 0.0,
            multiplier: 1.0,
            consecutive_bounces: 0,
            combo_count: 0,
        }
    }
}

/// Surfaces touched during the last tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionState {
    pub wall: bool,
    pub ceiling: bool,
    pub platform: bool,
    pub floor: bool,
    /// Normalized offset of the last platform contact
    pub hit_position: Option<f32>,
}

impl CollisionState {
    /// Fold another ball's hits into this tick's summary
    pub fn merge(&mut self, other: &CollisionState) {
        self.wall |= other.wall;
        self.ceiling |= other.ceiling;
        self.platform |= other.platform;
        self.floor |= other.floor;
        if other.hit_position.is_some() {
            self.hit_position = other.hit_position;
        }
    }

    pub fn any(&self) -> bool {
        self.wall || self.ceiling || self.platform || self.floor
    }
}

/// Drag distance (pixels) that maps to full launch power
pub const MAX_DRAG_DISTANCE: f32 = 150.0;

/// Aim input, meaningful only while aiming
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimData {
    /// Degrees, 0 = right, 90 = straight up, 180 = left
    pub angle: f32,
    /// Percent of max velocity
    pub power: f32,
    pub drag_start: Option<Vec2>,
    pub drag_end: Option<Vec2>,
}

impl Default for AimData {
    fn default() -> Self {
        Self {
            angle: 90.0,
            power: 50.0,
            drag_start: None,
            drag_end: None,
        }
    }
}

impl AimData {
    /// Slingshot aim: pulling back from `start` to `end` launches toward `start`
    pub fn from_drag(start: Vec2, end: Vec2) -> Self {
        let pull = start - end;
        // Screen y grows downward, so flip it for a conventional angle
        let angle = (-pull.y).atan2(pull.x).to_degrees();
        let power = pull.length() / MAX_DRAG_DISTANCE * 100.0;
        Self {
            angle: clamp(angle, 0.0, 180.0),
            power: clamp(power, 0.0, 100.0),
            drag_start: Some(start),
            drag_end: Some(end),
        }
    }

    /// Angle and power forced into their valid ranges
    pub fn clamped(self) -> Self {
        Self {
            angle: clamp(self.angle, 0.0, 180.0),
            power: clamp(self.power, 0.0, 100.0),
            ..self
        }
    }
}

/// Power-up types
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PowerUpKind {
    MultiBall,
    LargerPaddle,
    SlowMo,
    Shield,
    ScoreMultiplier,
    MagneticPaddle,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::MultiBall,
        PowerUpKind::LargerPaddle,
        PowerUpKind::SlowMo,
        PowerUpKind::Shield,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::MagneticPaddle,
    ];

    /// How long the effect stays active once collected
    pub fn duration_ms(self) -> f64 {
        match self {
            PowerUpKind::MultiBall => 1_000.0,
            PowerUpKind::LargerPaddle => 10_000.0,
            PowerUpKind::SlowMo => 8_000.0,
            // Count-based, the duration only matters for display
            PowerUpKind::Shield => 30_000.0,
            PowerUpKind::ScoreMultiplier => 12_000.0,
            PowerUpKind::MagneticPaddle => 10_000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::MultiBall => "multi-ball",
            PowerUpKind::LargerPaddle => "larger-paddle",
            PowerUpKind::SlowMo => "slow-mo",
            PowerUpKind::Shield => "shield",
            PowerUpKind::ScoreMultiplier => "score-multiplier",
            PowerUpKind::MagneticPaddle => "magnetic-paddle",
        }
    }
}

/// A collectible power-up, either on the field or active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub duration_ms: f64,
    /// Simulation clock reading at activation
    pub start_time_ms: f64,
    pub active: bool,
    pub collected: bool,
}

impl PowerUp {
    /// An uncollected power-up sitting on the field
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            duration_ms: kind.duration_ms(),
            start_time_ms: 0.0,
            active: false,
            collected: false,
        }
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.start_time_ms >= self.duration_ms
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    StaticBlock,
    MovingBarrier,
    BreakableBrick,
    SpeedBoost,
}

/// A rectangular obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(default)]
    pub vel: Option<Vec2>,
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub points: Option<u64>,
}

impl Obstacle {
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
}

/// Effect values driven by active power-ups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Floor hits the shield will still absorb
    pub shield_bounces: u32,
    /// Magnet pull radius (0 = off)
    pub magnetic_range: f32,
    /// Factor applied to every score gain
    pub score_multiplier: f32,
    /// Factor currently applied to ball speed
    pub speed_factor: f32,
}

impl Default for ActiveEffects {
    fn default() -> Self {
        Self {
            shield_bounces: 0,
            magnetic_range: 0.0,
            score_multiplier: 1.0,
            speed_factor: 1.0,
        }
    }
}

/// Complete game snapshot (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    pub phase: GamePhase,
    /// Primary ball
    pub ball: Ball,
    /// Secondary balls from multi-ball
    pub extra_balls: Vec<Ball>,
    pub platform: Platform,
    pub score: ScoreData,
    /// Hits from the most recent tick
    pub collision: CollisionState,
    pub aim: AimData,
    /// Uncollected power-ups on the field
    pub power_ups: Vec<PowerUp>,
    /// Collected power-ups whose effect is running
    pub active_power_ups: Vec<PowerUp>,
    pub obstacles: Vec<Obstacle>,
    pub effects: ActiveEffects,
    pub achievements: Vec<Achievement>,
    /// Power-up kinds collected this run
    pub used_power_ups: BTreeSet<PowerUpKind>,
    /// Simulation clock, advanced only by ticks
    pub clock_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced since the last drain (not gameplay-affecting),
    /// at most [`MAX_QUEUED_EVENTS`]
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh game on the menu screen, with level 1 loaded
    pub fn new(settings: Settings) -> Self {
        let settings = settings.validated();
        let config = &levels::LEVELS[0];
        let platform = Platform::for_level(config, settings.canvas_width, settings.canvas_height);
        let mut state = Self {
            phase: GamePhase::Menu,
            ball: Ball::new(0, Vec2::ZERO, config),
            extra_balls: Vec::new(),
            platform,
            score: ScoreData::new(settings.initial_lives, 0),
            collision: CollisionState::default(),
            aim: AimData::default(),
            power_ups: Vec::new(),
            active_power_ups: Vec::new(),
            obstacles: Vec::new(),
            effects: ActiveEffects::default(),
            achievements: achievements::catalogue(),
            used_power_ups: BTreeSet::new(),
            clock_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            settings,
            next_id: 1,
        };
        state.reset_ball();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Tuning for the current level (falls back to the last level)
    pub fn level_config(&self) -> &'static LevelConfig {
        levels::level_config(self.score.level).unwrap_or(&levels::LEVELS[levels::LEVELS.len() - 1])
    }

    /// Where the ball waits while aiming
    pub fn ball_start_position(&self) -> Vec2 {
        Vec2::new(
            self.settings.canvas_width / 2.0,
            self.platform.y - BALL_RADIUS * 4.0,
        )
    }

    /// Park a fresh primary ball and drop any secondary balls
    pub fn reset_ball(&mut self) {
        let id = self.next_entity_id();
        let start = self.ball_start_position();
        self.ball = Ball::new(id, start, self.level_config());
        self.extra_balls.clear();
    }

    /// Primary ball followed by secondary balls
    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        std::iter::once(&self.ball).chain(self.extra_balls.iter())
    }

    pub fn ball_count(&self) -> usize {
        1 + self.extra_balls.len()
    }

    pub fn is_power_up_active(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups.iter().any(|p| p.kind == kind)
    }

    /// Queue an event for feedback collaborators
    ///
    /// A host that never drains loses the oldest events, not memory.
    pub fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_QUEUED_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
