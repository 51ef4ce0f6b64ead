//! Per-level obstacle layouts and obstacle movement
//!
//! Layouts are deterministic: the same level always produces the same set.

use glam::Vec2;

use super::state::{GameState, Obstacle, ObstacleKind};
use crate::consts::{BRICK_HEALTH, BRICK_POINTS};

const BLOCK_SIZE: Vec2 = Vec2::new(80.0, 20.0);
const BARRIER_SIZE: Vec2 = Vec2::new(120.0, 15.0);
const BRICK_SIZE: Vec2 = Vec2::new(60.0, 20.0);
const BOOST_SIZE: Vec2 = Vec2::new(100.0, 40.0);
const BARRIER_SPEED: f32 = 2.0;

/// Obstacles for a level, laid out on the state's canvas
///
/// - level 2+: `min(level - 1, 3)` static blocks in a row
/// - level 3+: one moving barrier
/// - level 4+: two breakable bricks
/// - level 5+: one speed-boost zone
pub fn layout_for_level(state: &mut GameState, level: u32) -> Vec<Obstacle> {
    let width = state.settings.canvas_width;
    let height = state.settings.canvas_height;
    let mut layout = Vec::new();

    if level >= 2 {
        let count = (level - 1).min(3);
        let slot = width / (count + 1) as f32;
        for i in 0..count {
            let center_x = slot * (i + 1) as f32;
            layout.push(Obstacle {
                id: state.next_entity_id(),
                kind: ObstacleKind::StaticBlock,
                pos: Vec2::new(center_x - BLOCK_SIZE.x / 2.0, height * 0.3),
                size: BLOCK_SIZE,
                vel: None,
                health: None,
                points: None,
            });
        }
    }

    if level >= 3 {
        layout.push(Obstacle {
            id: state.next_entity_id(),
            kind: ObstacleKind::MovingBarrier,
            pos: Vec2::new(width / 2.0 - BARRIER_SIZE.x / 2.0, height * 0.5),
            size: BARRIER_SIZE,
            vel: Some(Vec2::new(BARRIER_SPEED, 0.0)),
            health: None,
            points: None,
        });
    }

    if level >= 4 {
        for x in [width * 0.25, width * 0.75] {
            layout.push(Obstacle {
                id: state.next_entity_id(),
                kind: ObstacleKind::BreakableBrick,
                pos: Vec2::new(x - BRICK_SIZE.x / 2.0, height * 0.15),
                size: BRICK_SIZE,
                vel: None,
                health: Some(BRICK_HEALTH),
                points: Some(BRICK_POINTS),
            });
        }
    }

    if level >= 5 {
        layout.push(Obstacle {
            id: state.next_entity_id(),
            kind: ObstacleKind::SpeedBoost,
            pos: Vec2::new(width / 2.0 - BOOST_SIZE.x / 2.0, height * 0.4),
            size: BOOST_SIZE,
            vel: None,
            health: None,
            points: None,
        });
    }

    layout
}

/// Slide moving obstacles, reversing at the canvas edges
pub fn move_obstacles(obstacles: &mut [Obstacle], canvas_width: f32, dt: f32) {
    for obstacle in obstacles.iter_mut() {
        let Some(vel) = obstacle.vel.as_mut() else {
            continue;
        };
        obstacle.pos += *vel * dt;
        let max_x = (canvas_width - obstacle.size.x).max(0.0);
        if obstacle.pos.x < 0.0 {
            obstacle.pos.x = 0.0;
            vel.x = vel.x.abs();
        } else if obstacle.pos.x > max_x {
            obstacle.pos.x = max_x;
            vel.x = -vel.x.abs();
        }
    }
}
