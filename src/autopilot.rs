//! Demo player
//!
//! Plays through the same actions a human would send: aim and launch, then
//! slide the platform under the next ball to come down. When a power-up is on
//! the field it takes the ball off-center to steer toward it.

use crate::clamp;
use crate::sim::collision;
use crate::sim::physics;
use crate::sim::{Action, Ball, GamePhase, GameState};

/// Frames of lookahead when predicting a landing
const PREDICTION_FRAMES: u32 = 600;
/// Largest off-center hit the autopilot will aim for
const MAX_STEER: f32 = 0.45;

#[derive(Debug, Clone)]
pub struct Autopilot {
    launches: u32,
    launch_power: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            launches: 0,
            launch_power: 85.0,
        }
    }

    /// Actions to send this frame
    pub fn next_actions(&mut self, state: &GameState) -> Vec<Action> {
        match state.phase {
            GamePhase::Aiming => {
                // Vary the launch so runs don't loop the same way
                let swing = (self.launches as f32 * 0.7).sin() * 15.0;
                self.launches += 1;
                vec![Action::LaunchBall {
                    angle: 90.0 + swing,
                    power: self.launch_power,
                }]
            }
            GamePhase::Playing => self.track(state).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn track(&self, state: &GameState) -> Option<Action> {
        let platform = &state.platform;
        let width = state.settings.canvas_width;

        // Soonest landing among balls coming down
        let landing = state
            .balls()
            .filter(|b| b.vel.y > 0.0)
            .filter_map(|b| predict_landing(b, platform.y, width))
            .min_by_key(|&(_, frames)| frames)
            .map(|(x, _)| x);

        let target = match landing {
            Some(x) => {
                let offset = self.steer(state, x);
                x - offset * platform.width / 2.0
            }
            // Nothing falling yet: hover under the lowest ball
            None => state
                .balls()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|b| b.pos.x)?,
        };

        let dx = clamp(target - platform.x, -platform.speed, platform.speed);
        if dx.abs() < f32::EPSILON {
            return None;
        }
        Some(Action::UpdatePlatformPosition { x: platform.x + dx })
    }

    /// Desired hit position for a ball landing at `landing_x`
    fn steer(&self, state: &GameState, landing_x: f32) -> f32 {
        let nearest = state
            .power_ups
            .iter()
            .filter(|p| !p.collected)
            .min_by(|a, b| {
                (a.pos.x - landing_x)
                    .abs()
                    .total_cmp(&(b.pos.x - landing_x).abs())
            });

        match nearest {
            // Positive hits kick the ball right
            Some(p) => clamp((p.pos.x - landing_x) / 200.0, -MAX_STEER, MAX_STEER),
            None => {
                let t = state.time_ticks as f32 * 0.01;
                let offset = t.sin() * 0.3 + (t * 0.7).sin() * 0.15;
                clamp(offset, -MAX_STEER, MAX_STEER)
            }
        }
    }
}

/// Where and after how many frames a ball reaches the platform's height,
/// bouncing off the side walls on the way
fn predict_landing(ball: &Ball, platform_y: f32, width: f32) -> Option<(f32, u32)> {
    let mut ghost = *ball;
    for frame in 0..PREDICTION_FRAMES {
        if ghost.pos.y + ghost.radius >= platform_y {
            return Some((ghost.pos.x, frame));
        }
        ghost = physics::integrate(ghost, 1.0);
        collision::resolve_walls(&mut ghost, width);
        collision::resolve_ceiling(&mut ghost);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{PowerUp, PowerUpKind, dispatch};
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(Settings::default());
        dispatch(&mut state, Action::StartGame);
        dispatch(&mut state, Action::LaunchBall { angle: 90.0, power: 50.0 });
        state
    }

    #[test]
    fn test_launches_when_aiming() {
        let mut state = GameState::new(Settings::default());
        dispatch(&mut state, Action::StartGame);
        let mut pilot = Autopilot::new();
        for _ in 0..10 {
            let actions = pilot.next_actions(&state);
            let [Action::LaunchBall { angle, power }] = actions.as_slice() else {
                panic!("expected a launch, got {actions:?}");
            };
            assert!((75.0..=105.0).contains(angle));
            assert_eq!(*power, 85.0);
        }
    }

    #[test]
    fn test_idle_outside_play() {
        let state = GameState::new(Settings::default());
        assert!(Autopilot::new().next_actions(&state).is_empty());
    }

    #[test]
    fn test_moves_toward_falling_ball_at_platform_speed() {
        let mut state = playing();
        state.ball.pos = Vec2::new(150.0, 300.0);
        state.ball.vel = Vec2::new(0.0, 4.0);
        let actions = Autopilot::new().next_actions(&state);
        let [Action::UpdatePlatformPosition { x }] = actions.as_slice() else {
            panic!("expected a platform move, got {actions:?}");
        };
        assert!((*x - (state.platform.x - state.platform.speed)).abs() < 1e-4);
    }

    #[test]
    fn test_prediction_folds_at_walls() {
        let state = playing();
        let mut ball = state.ball;
        ball.pos = Vec2::new(780.0, 300.0);
        ball.vel = Vec2::new(6.0, 2.0);
        let (x, frames) = predict_landing(&ball, state.platform.y, 800.0).unwrap();
        assert!(frames > 0);
        assert!(x < 780.0);
        assert!(x >= ball.radius);
    }

    #[test]
    fn test_steers_toward_power_up() {
        let mut state = playing();
        state.power_ups.push(PowerUp::new(50, PowerUpKind::Shield, Vec2::new(700.0, 100.0)));
        let offset = Autopilot::new().steer(&state, 400.0);
        assert!(offset > 0.0 && offset <= MAX_STEER);
    }
}
