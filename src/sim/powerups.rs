//! Power-up spawning, effects and expiry
//!
//! Effects are applied when a power-up becomes active and reverted when it
//! is deactivated. Multi-ball has nothing to revert; the shield ends when its
//! absorb counter runs out rather than on a timer.

use glam::Vec2;
use rand::Rng;

use super::physics;
use super::state::{Ball, GameState, PowerUp, PowerUpKind};
use crate::consts::*;
use crate::rotate;
use crate::settings::Settings;

/// Margin kept between spawned power-ups and the canvas edges
const SPAWN_MARGIN: f32 = 50.0;

/// Delay until the next field spawn
pub fn next_spawn_delay_ms<R: Rng>(rng: &mut R, settings: &Settings) -> f64 {
    let min = settings.power_up_interval_min_ms;
    let max = settings.power_up_interval_max_ms.max(min);
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

/// A random power-up somewhere in the upper part of the playfield
pub fn random_power_up<R: Rng>(rng: &mut R, id: u32, settings: &Settings) -> PowerUp {
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
    let max_x = (settings.canvas_width - SPAWN_MARGIN).max(SPAWN_MARGIN);
    let max_y = (settings.canvas_height / 2.0).max(SPAWN_MARGIN);
    let pos = Vec2::new(
        rng.random_range(SPAWN_MARGIN..=max_x),
        rng.random_range(SPAWN_MARGIN..=max_y),
    );
    PowerUp::new(id, kind, pos)
}

/// Two copies of `ball` heading ±30° off its current direction, same speed
pub fn split_ball(ball: &Ball) -> [Ball; 2] {
    let spread = MULTI_BALL_SPREAD_DEG.to_radians();
    [spread, -spread].map(|angle| Ball {
        vel: rotate(ball.vel, angle),
        ..*ball
    })
}

/// Add a secondary ball if there's room; returns false when at the cap
pub fn add_ball(state: &mut GameState, mut ball: Ball) -> bool {
    if state.ball_count() >= state.settings.max_balls {
        log::debug!("Ball cap reached ({}), dropping extra ball", state.settings.max_balls);
        return false;
    }
    ball.id = state.next_entity_id();
    state.extra_balls.push(ball);
    true
}

/// Make a power-up active and apply its effect
///
/// Re-collecting a kind that is already running restarts its timer instead
/// of stacking the effect.
pub fn activate(state: &mut GameState, mut power_up: PowerUp) {
    power_up.collected = true;
    power_up.active = true;
    power_up.start_time_ms = state.clock_ms;
    state.used_power_ups.insert(power_up.kind);

    if let Some(running) = state
        .active_power_ups
        .iter_mut()
        .find(|p| p.kind == power_up.kind)
    {
        running.start_time_ms = power_up.start_time_ms;
        match power_up.kind {
            PowerUpKind::Shield => state.effects.shield_bounces = SHIELD_BOUNCES,
            PowerUpKind::MultiBall => spawn_multi_ball(state),
            _ => {}
        }
        log::debug!("Power-up {} refreshed", power_up.kind.as_str());
        return;
    }

    match power_up.kind {
        PowerUpKind::MultiBall => spawn_multi_ball(state),
        PowerUpKind::LargerPaddle => {
            let width = state.platform.base_width * LARGER_PADDLE_FACTOR;
            state.platform.resize(width, state.settings.canvas_width);
        }
        PowerUpKind::SlowMo => {
            state.effects.speed_factor = SLOW_MO_FACTOR;
            for_each_ball(state, |ball| physics::scale_speed(ball, SLOW_MO_FACTOR));
        }
        PowerUpKind::Shield => state.effects.shield_bounces = SHIELD_BOUNCES,
        PowerUpKind::ScoreMultiplier => state.effects.score_multiplier = SCORE_BOOST_FACTOR,
        PowerUpKind::MagneticPaddle => state.effects.magnetic_range = MAGNETIC_RANGE,
    }

    log::debug!(
        "Power-up {} active for {}ms",
        power_up.kind.as_str(),
        power_up.duration_ms
    );
    state.active_power_ups.push(power_up);
}

/// Remove an active power-up and revert its effect; false if not active
pub fn deactivate(state: &mut GameState, id: u32) -> bool {
    let Some(index) = state.active_power_ups.iter().position(|p| p.id == id) else {
        return false;
    };
    let power_up = state.active_power_ups.remove(index);

    match power_up.kind {
        PowerUpKind::MultiBall => {}
        PowerUpKind::LargerPaddle => {
            let width = state.platform.base_width;
            state.platform.resize(width, state.settings.canvas_width);
        }
        PowerUpKind::SlowMo => {
            let factor = state.effects.speed_factor;
            state.effects.speed_factor = 1.0;
            if factor > 0.0 {
                for_each_ball(state, |ball| physics::scale_speed(ball, 1.0 / factor));
            }
        }
        PowerUpKind::Shield => state.effects.shield_bounces = 0,
        PowerUpKind::ScoreMultiplier => state.effects.score_multiplier = 1.0,
        PowerUpKind::MagneticPaddle => state.effects.magnetic_range = 0.0,
    }

    log::debug!("Power-up {} ended", power_up.kind.as_str());
    true
}

/// Deactivate everything, e.g. when leaving a level
pub fn deactivate_all(state: &mut GameState) {
    let ids: Vec<u32> = state.active_power_ups.iter().map(|p| p.id).collect();
    for id in ids {
        deactivate(state, id);
    }
}

/// Active power-ups whose effect should end now
pub fn expired_ids(state: &GameState) -> Vec<u32> {
    state
        .active_power_ups
        .iter()
        .filter(|p| match p.kind {
            PowerUpKind::Shield => state.effects.shield_bounces == 0,
            _ => p.is_expired(state.clock_ms),
        })
        .map(|p| p.id)
        .collect()
}

fn spawn_multi_ball(state: &mut GameState) {
    for ball in split_ball(&state.ball) {
        add_ball(state, ball);
    }
}

fn for_each_ball(state: &mut GameState, f: impl Fn(Ball) -> Ball) {
    state.ball = f(state.ball);
    for ball in state.extra_balls.iter_mut() {
        *ball = f(*ball);
    }
}
