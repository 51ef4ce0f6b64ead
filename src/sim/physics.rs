//! Ball integration and launch
//!
//! `dt` is measured in reference frames (see [`FRAME_MS`](crate::consts::FRAME_MS)).

use glam::Vec2;

use super::state::Ball;
use crate::consts::{GRAVITY_SCALE, MAGNETIC_STRENGTH};

/// Advance a ball by `dt` frames under gravity
///
/// Velocity is updated before position, then each component is clamped to
/// `[-max_velocity, max_velocity]`.
pub fn integrate(ball: Ball, dt: f32) -> Ball {
    let mut next = ball;
    next.vel.y += ball.gravity * dt * GRAVITY_SCALE;
    next.pos += next.vel * dt;
    next.vel = clamp_velocity(next.vel, next.max_velocity);
    next
}

/// Clamp each velocity component independently
#[inline]
pub fn clamp_velocity(vel: Vec2, max_velocity: f32) -> Vec2 {
    let max = max_velocity.abs();
    vel.clamp(Vec2::splat(-max), Vec2::splat(max))
}

/// Set the ball moving at `angle_deg` (0 = right, 90 = up) with `power` percent
/// of `max_velocity`. Callers clamp angle and power beforehand.
pub fn launch(ball: Ball, angle_deg: f32, power: f32, max_velocity: f32) -> Ball {
    let speed = power / 100.0 * max_velocity;
    let angle = angle_deg.to_radians();
    Ball {
        // Screen y grows downward, so "up" is negative
        vel: Vec2::new(speed * angle.cos(), -speed * angle.sin()),
        ..ball
    }
}

/// Pull a ball toward `target` when within `range`
///
/// Force falls off linearly from [`MAGNETIC_STRENGTH`] at the target to zero
/// at the edge of the range.
pub fn apply_magnetism(ball: Ball, target: Vec2, range: f32, dt: f32) -> Ball {
    if range <= 0.0 {
        return ball;
    }
    let to_target = target - ball.pos;
    let distance = to_target.length();
    if distance >= range || distance <= f32::EPSILON {
        return ball;
    }
    let strength = (range - distance) / range * MAGNETIC_STRENGTH;
    Ball {
        vel: ball.vel + to_target / distance * strength * dt,
        ..ball
    }
}

/// Scale a ball's speed, keeping its heading
pub fn scale_speed(ball: Ball, factor: f32) -> Ball {
    Ball {
        vel: clamp_velocity(ball.vel * factor, ball.max_velocity),
        ..ball
    }
}
