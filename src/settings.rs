//! Game settings
//!
//! Persisted as a JSON file next to the leaderboard. Missing or broken files
//! fall back to defaults; the game never refuses to start over settings.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, INITIAL_LIVES};

/// Tunable game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Rules ===
    pub initial_lives: u8,
    /// Shortest wait between field power-up spawns
    pub power_up_interval_min_ms: f64,
    /// Longest wait between field power-up spawns
    pub power_up_interval_max_ms: f64,
    /// Uncollected power-ups allowed on the field at once
    pub max_field_power_ups: usize,
    /// Primary plus secondary balls
    pub max_balls: usize,

    // === Scheduling ===
    /// Pause on the level-complete screen before aiming resumes
    pub level_complete_delay_ms: f64,
    /// Ticks a single frame may catch up on
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            initial_lives: INITIAL_LIVES,
            power_up_interval_min_ms: 15_000.0,
            power_up_interval_max_ms: 25_000.0,
            max_field_power_ups: 3,
            max_balls: 5,

            level_complete_delay_ms: 2_000.0,
            max_substeps: 8,
        }
    }
}

impl Settings {
    /// Smallest playfield the layouts still fit in
    const MIN_CANVAS: f32 = 200.0;

    /// Copy with every field forced into a usable range
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let dimension = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.max(Self::MIN_CANVAS)
            } else {
                fallback
            }
        };
        let interval = |value: f64, fallback: f64| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                fallback
            }
        };

        let min_interval = interval(self.power_up_interval_min_ms, defaults.power_up_interval_min_ms);
        let max_interval = interval(self.power_up_interval_max_ms, defaults.power_up_interval_max_ms);

        Self {
            canvas_width: dimension(self.canvas_width, defaults.canvas_width),
            canvas_height: dimension(self.canvas_height, defaults.canvas_height),
            initial_lives: self.initial_lives.max(1),
            power_up_interval_min_ms: min_interval,
            power_up_interval_max_ms: max_interval.max(min_interval),
            max_field_power_ups: self.max_field_power_ups,
            max_balls: self.max_balls.max(1),
            level_complete_delay_ms: interval(self.level_complete_delay_ms, defaults.level_complete_delay_ms),
            max_substeps: self.max_substeps.max(1),
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(err) => {
                log::warn!("Failed to read settings {}: {err}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.validated()
            }
            Err(err) => {
                log::warn!("Ignoring corrupt settings {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
