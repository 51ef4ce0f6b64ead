//! Score, combo and bonus rules

use super::state::{ScoreData, Surface};
use crate::consts::*;

/// Combo multiplier staircase for a platform streak, bounded to [1, 3]
pub fn combo_multiplier(consecutive_bounces: u32) -> f32 {
    match consecutive_bounces {
        0..=1 => 1.0,
        2..=3 => 1.5,
        4..=5 => 2.0,
        6..=10 => 2.5,
        _ => 3.0,
    }
}

/// Points for a single bounce
///
/// Platform hits earn up to [`CENTER_HIT_BONUS`] extra the closer they land
/// to the center. A missing hit position counts as a center hit.
pub fn bounce_score(surface: Surface, hit_position: Option<f32>, multiplier: f32) -> u64 {
    let bonus = match surface {
        Surface::Platform => {
            let offset = hit_position.unwrap_or(0.0).abs();
            (1.0 - offset).max(0.0) * CENTER_HIT_BONUS
        }
        Surface::Wall | Surface::Ceiling | Surface::Floor => 0.0,
    };
    ((BOUNCE_BASE_POINTS + bonus) * multiplier).floor() as u64
}

/// Flat bonus for reaching the level's bounce target
pub fn level_completion_bonus(bounce_count: u32, target_bounces: u32) -> u64 {
    if bounce_count >= target_bounces {
        LEVEL_COMPLETE_BONUS
    } else {
        0
    }
}

/// Bonus for time left on the clock
pub fn time_bonus(time_limit: f32, time_elapsed: f32) -> u64 {
    ((time_limit - time_elapsed).max(0.0) * TIME_BONUS_PER_SECOND).floor() as u64
}

/// Apply a bounce to the streak counters and return the points it earned
///
/// `score_boost` is the power-up factor applied on top of the combo
/// multiplier.
pub fn register_bounce(
    score: &mut ScoreData,
    surface: Surface,
    hit_position: Option<f32>,
    score_boost: f32,
) -> u64 {
    match surface {
        Surface::Platform => {
            let previous = score.consecutive_bounces;
            let consecutive = previous + 1;
            if consecutive > previous {
                score.combo_count += 1;
            }
            score.consecutive_bounces = consecutive;
            score.multiplier = combo_multiplier(consecutive);
            score.bounce_count += 1;
        }
        Surface::Wall | Surface::Ceiling => break_combo(score),
        Surface::Floor => {}
    }

    let points = bounce_score(surface, hit_position, score.multiplier);
    let points = boosted(points, score_boost);
    score.score += points;
    points
}

/// Reset the platform streak
pub fn break_combo(score: &mut ScoreData) {
    score.consecutive_bounces = 0;
    score.multiplier = combo_multiplier(0);
}

/// Apply a power-up score factor
pub fn boosted(points: u64, score_boost: f32) -> u64 {
    (points as f32 * score_boost).floor() as u64
}

/// Raise the high score to the current score; true if it went up
pub fn update_high_score(score: &mut ScoreData) -> bool {
    if score.score > score.high_score {
        score.high_score = score.score;
        true
    } else {
        false
    }
}
