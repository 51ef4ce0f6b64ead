//! Collision detection and response
//!
//! Boundary checks run per ball in a fixed order: platform, wall, ceiling,
//! floor. The platform goes first so its position snap lands before any
//! wall or ceiling reflection on the same tick; the floor is last because it
//! only reports, it never bounces.
//!
//! Obstacles get no positional correction. A fast ball can tunnel through a
//! thin obstacle at a low frame rate.

use glam::Vec2;

use super::state::{Ball, CollisionState, Obstacle, ObstacleKind, Platform, PowerUp};
use crate::consts::{PLATFORM_HIT_KICK, POWERUP_RADIUS, SPEED_BOOST_FACTOR};

/// Result of a ball touching an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleHit {
    /// Velocity inverted and damped
    Bounced,
    /// Velocity scaled up, heading kept
    Boosted,
    /// Brick lost health; destroyed at zero
    Damaged { destroyed: bool },
}

/// Overlap test between two axis-aligned boxes given as (min, max)
#[inline]
pub fn aabb_overlap(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2) -> bool {
    a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
}

/// Bounce off the platform if falling onto it
///
/// Returns the normalized hit position: 0 at center, ±1 at the edges. It is
/// not clamped, so overlaps past the edge report slightly more than 1.
pub fn resolve_platform(ball: &mut Ball, platform: &Platform) -> Option<f32> {
    // Only a falling ball can hit; stops repeat bounces while still overlapping
    if ball.vel.y <= 0.0 {
        return None;
    }
    let (ball_min, ball_max) = ball.bounds();
    let platform_min = Vec2::new(platform.left(), platform.y);
    let platform_max = Vec2::new(platform.right(), platform.bottom());
    if !aabb_overlap(ball_min, ball_max, platform_min, platform_max) {
        return None;
    }

    ball.pos.y = platform.y - ball.radius;
    ball.vel.y = -ball.vel.y * ball.bounce_coefficient;

    let hit_position = (ball.pos.x - platform.x) / (platform.width / 2.0);
    ball.vel.x += hit_position * PLATFORM_HIT_KICK;
    Some(hit_position)
}

/// Reflect off the side walls, keeping the ball inside `[r, width - r]`
pub fn resolve_walls(ball: &mut Ball, width: f32) -> bool {
    let r = ball.radius;
    let hit = if ball.pos.x - r < 0.0 {
        ball.pos.x = r;
        true
    } else if ball.pos.x + r > width {
        ball.pos.x = width - r;
        true
    } else {
        false
    };
    if hit {
        ball.vel.x = -ball.vel.x * ball.bounce_coefficient;
    }
    hit
}

/// Reflect off the ceiling
pub fn resolve_ceiling(ball: &mut Ball) -> bool {
    if ball.pos.y - ball.radius < 0.0 {
        ball.pos.y = ball.radius;
        ball.vel.y = -ball.vel.y * ball.bounce_coefficient;
        return true;
    }
    false
}

/// Ball has dropped past the bottom of the canvas
#[inline]
pub fn hits_floor(ball: &Ball, height: f32) -> bool {
    ball.pos.y + ball.radius > height
}

/// Run the four boundary checks in order and report what was touched
pub fn resolve_boundaries(
    ball: &mut Ball,
    platform: &Platform,
    width: f32,
    height: f32,
) -> CollisionState {
    let hit_position = resolve_platform(ball, platform);
    let wall = resolve_walls(ball, width);
    let ceiling = resolve_ceiling(ball);
    let floor = hits_floor(ball, height);
    CollisionState {
        wall,
        ceiling,
        platform: hit_position.is_some(),
        floor,
        hit_position,
    }
}

/// Resolve a ball against one obstacle
pub fn resolve_obstacle(ball: &mut Ball, obstacle: &mut Obstacle) -> Option<ObstacleHit> {
    let (ball_min, ball_max) = ball.bounds();
    if !aabb_overlap(ball_min, ball_max, obstacle.min(), obstacle.max()) {
        return None;
    }

    let hit = match obstacle.kind {
        ObstacleKind::BreakableBrick => {
            let health = obstacle.health.unwrap_or(1) - 1;
            obstacle.health = Some(health);
            ObstacleHit::Damaged {
                destroyed: health <= 0,
            }
        }
        ObstacleKind::SpeedBoost => {
            ball.vel *= SPEED_BOOST_FACTOR;
            ObstacleHit::Boosted
        }
        ObstacleKind::StaticBlock | ObstacleKind::MovingBarrier => {
            ball.vel = -ball.vel * ball.bounce_coefficient;
            ObstacleHit::Bounced
        }
    };
    Some(hit)
}

/// Ball is close enough to pick up a power-up
#[inline]
pub fn touches_power_up(ball: &Ball, power_up: &PowerUp) -> bool {
    !power_up.collected && ball.pos.distance(power_up.pos) < ball.radius + POWERUP_RADIUS
}
