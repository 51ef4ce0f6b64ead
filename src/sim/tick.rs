//! Fixed timestep simulation tick
//!
//! One tick moves every ball, resolves collisions and then feeds what
//! happened back through [`dispatch`] as ordinary actions. The terminal
//! checks (life lost, time up, level cleared) use the counters as they stood
//! before the tick, and at most one of them fires per tick.

use super::action::Action;
use super::achievements::{self, AchievementContext};
use super::collision::{self, ObstacleHit};
use super::dispatch::dispatch;
use super::events::GameEvent;
use super::levels;
use super::obstacles;
use super::physics;
use super::powerups;
use super::scoring;
use super::state::{
    Ball, CollisionState, GamePhase, GameState, Obstacle, ObstacleKind, Platform, PowerUp, Surface,
};
use crate::consts::*;
use crate::frames_to_seconds;

/// Everything the balls touched this tick, applied after all balls moved
#[derive(Debug, Default)]
struct TickHits {
    bounces: Vec<(Surface, Option<f32>)>,
    obstacles: Vec<ObstacleKind>,
    destroyed: Vec<u32>,
    power_ups: Vec<u32>,
}

/// Advance the game by `dt` reference frames
pub(super) fn tick(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if !dt.is_finite() || dt < MIN_DT {
        log::debug!("Tick of {dt} frames dropped");
        return;
    }
    let dt = dt.min(MAX_DT);

    let config = state.level_config();
    let before = state.score.clone();

    state.time_ticks += 1;
    state.clock_ms += f64::from(dt * FRAME_MS);

    let width = state.settings.canvas_width;
    let height = state.settings.canvas_height;

    // Movement
    let anchor = state.platform.anchor();
    let range = state.effects.magnetic_range;
    let step = |ball: Ball| physics::integrate(physics::apply_magnetism(ball, anchor, range, dt), dt);
    state.ball = step(state.ball);
    for ball in state.extra_balls.iter_mut() {
        *ball = step(*ball);
    }
    obstacles::move_obstacles(&mut state.obstacles, width, dt);

    // Collisions
    let mut hits = TickHits::default();
    let mut summary = collide_ball(
        &mut state.ball,
        &state.platform,
        &mut state.obstacles,
        &state.power_ups,
        (width, height),
        &mut hits,
    );
    let primary_on_floor = summary.floor;
    for ball in state.extra_balls.iter_mut() {
        let extra = collide_ball(
            ball,
            &state.platform,
            &mut state.obstacles,
            &state.power_ups,
            (width, height),
            &mut hits,
        );
        summary.merge(&extra);
    }
    state.collision = summary;

    for (surface, hit_position) in hits.bounces {
        dispatch(
            state,
            Action::BallBounce {
                surface,
                hit_position,
            },
        );
    }
    for kind in hits.obstacles {
        state.emit(GameEvent::ObstacleHit { kind });
    }
    for id in hits.destroyed {
        destroy_obstacle(state, id);
    }
    for id in hits.power_ups {
        dispatch(state, Action::CollectPowerUp { id });
    }

    // Secondary balls just disappear through the floor
    state
        .extra_balls
        .retain(|ball| !collision::hits_floor(ball, height));

    let mut life_lost = false;
    if primary_on_floor {
        if state.effects.shield_bounces > 0 {
            let ball = &mut state.ball;
            ball.pos.y = height - ball.radius;
            ball.vel.y = -ball.vel.y.abs() * ball.bounce_coefficient;
            let remaining = state.effects.shield_bounces - 1;
            dispatch(state, Action::UpdateShieldBounces { count: remaining });
            state.emit(GameEvent::ShieldAbsorbed { remaining });
        } else if !state.extra_balls.is_empty() {
            state.ball = state.extra_balls.remove(0);
        } else {
            life_lost = true;
        }
    }

    if life_lost || levels::is_time_expired(&before, config) {
        dispatch(state, Action::LoseLife);
    } else if levels::is_level_complete(&before, config) {
        dispatch(state, Action::NextLevel);
    }

    if state.phase == GamePhase::Playing {
        dispatch(
            state,
            Action::UpdateTime {
                seconds: frames_to_seconds(dt),
            },
        );
    }
    for id in powerups::expired_ids(state) {
        dispatch(state, Action::DeactivatePowerUp { id });
    }

    let ctx = AchievementContext::from_state(state);
    for id in achievements::update_progress(&mut state.achievements, &ctx) {
        dispatch(state, Action::UnlockAchievement { id });
    }
}

/// Boundary, obstacle and pickup checks for one ball
fn collide_ball(
    ball: &mut Ball,
    platform: &Platform,
    obstacles: &mut [Obstacle],
    power_ups: &[PowerUp],
    (width, height): (f32, f32),
    hits: &mut TickHits,
) -> CollisionState {
    let contact = collision::resolve_boundaries(ball, platform, width, height);
    if contact.platform {
        hits.bounces.push((Surface::Platform, contact.hit_position));
    }
    if contact.wall {
        hits.bounces.push((Surface::Wall, None));
    }
    if contact.ceiling {
        hits.bounces.push((Surface::Ceiling, None));
    }

    for obstacle in obstacles.iter_mut() {
        // Already broken by another ball this tick
        if hits.destroyed.contains(&obstacle.id) {
            continue;
        }
        match collision::resolve_obstacle(ball, obstacle) {
            Some(ObstacleHit::Damaged { destroyed: true }) => {
                hits.obstacles.push(obstacle.kind);
                hits.destroyed.push(obstacle.id);
            }
            Some(_) => hits.obstacles.push(obstacle.kind),
            None => {}
        }
    }

    for power_up in power_ups {
        if collision::touches_power_up(ball, power_up) && !hits.power_ups.contains(&power_up.id) {
            hits.power_ups.push(power_up.id);
        }
    }

    contact
}

fn destroy_obstacle(state: &mut GameState, id: u32) {
    let Some(obstacle) = state.obstacles.iter().find(|o| o.id == id) else {
        return;
    };
    let points = scoring::boosted(
        obstacle.points.unwrap_or(BRICK_POINTS),
        state.effects.score_multiplier,
    );
    state.score.score += points;
    dispatch(state, Action::RemoveObstacle { id });
    state.emit(GameEvent::ObstacleDestroyed { id, points });
}
