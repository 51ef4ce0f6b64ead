//! Single-writer state machine
//!
//! [`dispatch`] is the only function that mutates a [`GameState`]. Actions
//! that make no sense in the current phase are ignored, and out-of-range
//! payloads are clamped; nothing here panics or fails.

use super::action::{Action, AimUpdate};
use super::events::GameEvent;
use super::state::{AimData, GamePhase, GameState, PowerUp, PowerUpKind};
use super::{levels, physics, powerups, scoring, tick};
use crate::clamp;

/// Apply one action to the game
pub fn dispatch(state: &mut GameState, action: Action) {
    let phase = state.phase;
    match action {
        Action::StartGame => match phase {
            GamePhase::Menu | GamePhase::GameOver => start_game(state),
            _ => ignored(phase, "StartGame"),
        },

        Action::EnterAiming => match phase {
            GamePhase::LevelComplete => state.phase = GamePhase::Aiming,
            _ => ignored(phase, "EnterAiming"),
        },

        Action::LaunchBall { angle, power } => match phase {
            GamePhase::Aiming => {
                let angle = clamp(angle, 0.0, 180.0);
                let power = clamp(power, 0.0, 100.0);
                let max_velocity = state.ball.max_velocity;
                let launched = physics::launch(state.ball, angle, power, max_velocity);
                // A running slow-mo covers the new ball too
                state.ball = physics::scale_speed(launched, state.effects.speed_factor);
                state.aim = AimData::default();
                state.phase = GamePhase::Playing;
                state.emit(GameEvent::BallLaunched);
            }
            _ => ignored(phase, "LaunchBall"),
        },

        Action::PauseGame => match phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            _ => ignored(phase, "PauseGame"),
        },

        Action::ResumeGame => match phase {
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => ignored(phase, "ResumeGame"),
        },

        Action::ResetGame => {
            *state = fresh_game(state);
        }

        Action::UpdatePlatformPosition { x } => match phase {
            GamePhase::Aiming | GamePhase::Playing => {
                let width = state.settings.canvas_width;
                state.platform.move_to(x, width);
            }
            _ => ignored(phase, "UpdatePlatformPosition"),
        },

        Action::BallBounce {
            surface,
            hit_position,
        } => match phase {
            GamePhase::Playing => {
                let boost = state.effects.score_multiplier;
                let points = scoring::register_bounce(&mut state.score, surface, hit_position, boost);
                state.emit(GameEvent::Bounce {
                    surface,
                    hit_position,
                    points,
                });
            }
            _ => ignored(phase, "BallBounce"),
        },

        Action::LoseLife => match phase {
            GamePhase::Playing => lose_life(state),
            _ => ignored(phase, "LoseLife"),
        },

        Action::NextLevel => match phase {
            GamePhase::Playing => next_level(state),
            _ => ignored(phase, "NextLevel"),
        },

        Action::GameOver => match phase {
            GamePhase::GameOver | GamePhase::Menu => ignored(phase, "GameOver"),
            _ => game_over(state),
        },

        Action::UpdateTime { seconds } => match phase {
            GamePhase::Playing if seconds.is_finite() && seconds > 0.0 => {
                state.score.time_elapsed += seconds;
            }
            _ => ignored(phase, "UpdateTime"),
        },

        Action::ResetCombo => scoring::break_combo(&mut state.score),

        Action::UpdateAimData(update) => match phase {
            GamePhase::Aiming => update_aim(state, update),
            _ => ignored(phase, "UpdateAimData"),
        },

        Action::SpawnPowerUp(power_up) => match phase {
            GamePhase::Playing => spawn_power_up(state, power_up),
            _ => ignored(phase, "SpawnPowerUp"),
        },

        Action::CollectPowerUp { id } => {
            let Some(index) = state
                .power_ups
                .iter()
                .position(|p| p.id == id && !p.collected)
            else {
                return;
            };
            let mut power_up = state.power_ups.remove(index);
            power_up.collected = true;
            let kind = power_up.kind;
            powerups::activate(state, power_up);
            state.emit(GameEvent::PowerUpCollected { kind });
        }

        Action::ActivatePowerUp(power_up) => powerups::activate(state, power_up),

        Action::DeactivatePowerUp { id } => {
            let kind = state
                .active_power_ups
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.kind);
            if let Some(kind) = kind {
                powerups::deactivate(state, id);
                state.emit(GameEvent::PowerUpExpired { kind });
            }
        }

        Action::SpawnObstacle(obstacle) => {
            if state.obstacles.iter().all(|o| o.id != obstacle.id) {
                state.obstacles.push(obstacle);
            }
        }

        Action::RemoveObstacle { id } => state.obstacles.retain(|o| o.id != id),

        Action::UpdateObstacle(obstacle) => {
            if let Some(existing) = state.obstacles.iter_mut().find(|o| o.id == obstacle.id) {
                *existing = obstacle;
            }
        }

        Action::UnlockAchievement { id } => {
            let now = state.clock_ms;
            let unlocked = state
                .achievements
                .iter_mut()
                .find(|a| a.id == id)
                .is_some_and(|a| a.unlock(now));
            if unlocked {
                log::info!("Achievement unlocked: {}", id.as_str());
                state.emit(GameEvent::AchievementUnlocked { id });
            }
        }

        Action::AddMultiBall(ball) => {
            let ball = physics::scale_speed(ball, state.effects.speed_factor);
            powerups::add_ball(state, ball);
        }

        Action::UpdateShieldBounces { count } => {
            state.effects.shield_bounces = count;
            if count == 0 {
                let shields: Vec<u32> = state
                    .active_power_ups
                    .iter()
                    .filter(|p| p.kind == PowerUpKind::Shield)
                    .map(|p| p.id)
                    .collect();
                for id in shields {
                    dispatch(state, Action::DeactivatePowerUp { id });
                }
            }
        }

        Action::SetMagneticRange { range } => {
            state.effects.magnetic_range = if range.is_finite() { range.max(0.0) } else { 0.0 };
        }

        Action::Tick { dt } => tick::tick(state, dt),
    }
}

fn ignored(phase: GamePhase, action: &str) {
    log::debug!("{action} ignored in {phase:?}");
}

/// New game on the menu, keeping what outlives a run
fn fresh_game(state: &GameState) -> GameState {
    let mut fresh = GameState::new(state.settings.clone());
    fresh.score.high_score = state.score.high_score;
    fresh.achievements = state.achievements.clone();
    fresh
}

fn start_game(state: &mut GameState) {
    *state = fresh_game(state);
    levels::enter_level(state, 1);
    state.phase = GamePhase::Aiming;
    log::info!("Game started");
}

fn lose_life(state: &mut GameState) {
    state.score.lives = state.score.lives.saturating_sub(1);
    scoring::break_combo(&mut state.score);
    state.emit(GameEvent::LifeLost {
        lives: state.score.lives,
    });

    if state.score.lives == 0 {
        game_over(state);
        return;
    }

    // Same level, fresh ball and a fresh clock
    state.reset_ball();
    state.aim = AimData::default();
    state.score.time_elapsed = 0.0;
    state.phase = GamePhase::Aiming;
    log::info!("Life lost, {} remaining", state.score.lives);
}

fn next_level(state: &mut GameState) {
    let config = state.level_config();
    let bonus = scoring::level_completion_bonus(state.score.bounce_count, config.target_bounces)
        + scoring::time_bonus(config.time_limit, state.score.time_elapsed);
    state.score.score += bonus;

    let finished = state.score.level;
    state.emit(GameEvent::LevelComplete {
        level: finished,
        bonus,
    });

    match levels::level_config(finished + 1) {
        Some(_) => {
            levels::enter_level(state, finished + 1);
            state.phase = GamePhase::LevelComplete;
        }
        None => {
            log::info!("Final level complete");
            game_over(state);
        }
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    let score = state.score.score;
    if scoring::update_high_score(&mut state.score) {
        log::info!("New high score: {score}");
        state.emit(GameEvent::NewHighScore { score });
    }
    state.emit(GameEvent::GameOver { score });
    log::info!("Game over at level {} with {score} points", state.score.level);
}

fn update_aim(state: &mut GameState, update: AimUpdate) {
    let mut aim = state.aim;
    if let Some(start) = update.drag_start {
        aim.drag_start = Some(start);
    }
    if let Some(end) = update.drag_end {
        aim.drag_end = Some(end);
    }
    // A complete drag sets angle and power unless they were given explicitly
    if let (Some(start), Some(end)) = (aim.drag_start, aim.drag_end) {
        if update.drag_start.is_some() || update.drag_end.is_some() {
            let dragged = AimData::from_drag(start, end);
            aim.angle = dragged.angle;
            aim.power = dragged.power;
        }
    }
    if let Some(angle) = update.angle {
        aim.angle = angle;
    }
    if let Some(power) = update.power {
        aim.power = power;
    }
    state.aim = aim.clamped();
}

fn spawn_power_up(state: &mut GameState, power_up: PowerUp) {
    if state.power_ups.len() >= state.settings.max_field_power_ups {
        log::debug!("Field full, power-up {} dropped", power_up.kind.as_str());
        return;
    }
    if state.power_ups.iter().any(|p| p.id == power_up.id) {
        return;
    }
    state.power_ups.push(PowerUp {
        collected: false,
        active: false,
        ..power_up
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::achievements::AchievementId;
    use crate::sim::state::{Obstacle, ObstacleKind, Surface};
    use glam::Vec2;

    fn new_game() -> GameState {
        let mut state = GameState::new(Settings::default());
        dispatch(&mut state, Action::StartGame);
        state
    }

    fn playing() -> GameState {
        let mut state = new_game();
        dispatch(&mut state, Action::LaunchBall { angle: 90.0, power: 50.0 });
        state
    }

    #[test]
    fn test_menu_to_aiming_to_playing() {
        let mut state = GameState::new(Settings::default());
        assert_eq!(state.phase, GamePhase::Menu);
        dispatch(&mut state, Action::StartGame);
        assert_eq!(state.phase, GamePhase::Aiming);
        dispatch(&mut state, Action::LaunchBall { angle: 90.0, power: 100.0 });
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.ball.vel.x.abs() < 1e-5);
        assert!((state.ball.vel.y + state.ball.max_velocity).abs() < 1e-5);
    }

    #[test]
    fn test_launch_clamps_out_of_range_input() {
        let mut state = new_game();
        dispatch(&mut state, Action::LaunchBall { angle: 270.0, power: 400.0 });
        // Clamped to 180 degrees at full power: straight left
        assert!((state.ball.vel.x + state.ball.max_velocity).abs() < 1e-4);
        assert!(state.ball.vel.y.abs() < 1e-4);
    }

    #[test]
    fn test_launch_ignored_outside_aiming() {
        let mut state = GameState::new(Settings::default());
        dispatch(&mut state, Action::LaunchBall { angle: 90.0, power: 100.0 });
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_pause_resume() {
        let mut state = playing();
        dispatch(&mut state, Action::PauseGame);
        assert_eq!(state.phase, GamePhase::Paused);
        let before = state.ball;
        dispatch(&mut state, Action::Tick { dt: 1.0 });
        assert_eq!(state.ball, before);
        dispatch(&mut state, Action::ResumeGame);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_keeps_high_score() {
        let mut state = playing();
        state.score.high_score = 900;
        state.score.score = 300;
        dispatch(&mut state, Action::ResetGame);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.score.score, 0);
        assert_eq!(state.score.high_score, 900);
    }

    #[test]
    fn test_combo_sequence_through_dispatch() {
        let mut state = playing();
        let sequence = [
            Surface::Platform,
            Surface::Platform,
            Surface::Platform,
            Surface::Wall,
            Surface::Platform,
        ];
        let mut multipliers = Vec::new();
        for surface in sequence {
            dispatch(
                &mut state,
                Action::BallBounce {
                    surface,
                    hit_position: None,
                },
            );
            multipliers.push(state.score.multiplier);
        }
        assert_eq!(multipliers, vec![1.0, 1.5, 1.5, 1.0, 1.0]);
        assert_eq!(
            state.score.multiplier,
            scoring::combo_multiplier(state.score.consecutive_bounces)
        );
    }

    #[test]
    fn test_lose_life_back_to_aiming() {
        let mut state = playing();
        state.score.consecutive_bounces = 4;
        state.score.time_elapsed = 12.0;
        dispatch(&mut state, Action::LoseLife);
        assert_eq!(state.score.lives, 2);
        assert_eq!(state.phase, GamePhase::Aiming);
        assert_eq!(state.score.consecutive_bounces, 0);
        assert_eq!(state.score.time_elapsed, 0.0);
        assert_eq!(state.score.level, 1);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_last_life_ends_game_with_high_score() {
        let mut state = playing();
        state.score.lives = 1;
        state.score.score = 420;
        state.score.high_score = 100;
        dispatch(&mut state, Action::LoseLife);
        assert_eq!(state.score.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score.high_score, 420);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::NewHighScore { score: 420 }));
    }

    #[test]
    fn test_next_level_awards_bonuses() {
        let mut state = playing();
        state.score.bounce_count = 10;
        state.score.time_elapsed = 20.0;
        state.score.score = 50;
        dispatch(&mut state, Action::NextLevel);
        // 100 completion + (60 - 20) * 2 time bonus
        assert_eq!(state.score.score, 50 + 100 + 80);
        assert_eq!(state.score.level, 2);
        assert_eq!(state.score.bounce_count, 0);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(state.obstacles.len(), 1);

        dispatch(&mut state, Action::EnterAiming);
        assert_eq!(state.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_final_level_ends_game() {
        let mut state = playing();
        levels::enter_level(&mut state, 5);
        state.phase = GamePhase::Playing;
        state.score.bounce_count = 30;
        state.score.time_elapsed = 40.0;
        dispatch(&mut state, Action::NextLevel);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score.level, 5);
        assert_eq!(state.score.high_score, 100);
    }

    #[test]
    fn test_aim_update_merges_and_clamps() {
        let mut state = new_game();
        dispatch(
            &mut state,
            Action::UpdateAimData(AimUpdate {
                angle: Some(200.0),
                ..Default::default()
            }),
        );
        assert_eq!(state.aim.angle, 180.0);
        assert_eq!(state.aim.power, 50.0);

        dispatch(
            &mut state,
            Action::UpdateAimData(AimUpdate {
                drag_start: Some(Vec2::new(400.0, 400.0)),
                drag_end: Some(Vec2::new(400.0, 475.0)),
                ..Default::default()
            }),
        );
        assert!((state.aim.angle - 90.0).abs() < 1e-3);
        assert!((state.aim.power - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_collect_power_up_once() {
        let mut state = playing();
        let id = state.next_entity_id();
        let p = PowerUp::new(id, PowerUpKind::ScoreMultiplier, Vec2::new(200.0, 200.0));
        dispatch(&mut state, Action::SpawnPowerUp(p));
        assert_eq!(state.power_ups.len(), 1);

        dispatch(&mut state, Action::CollectPowerUp { id });
        dispatch(&mut state, Action::CollectPowerUp { id });
        assert!(state.power_ups.is_empty());
        assert_eq!(state.active_power_ups.len(), 1);
        assert!(state.active_power_ups[0].collected && state.active_power_ups[0].active);
        assert_eq!(state.effects.score_multiplier, 2.0);
        assert!(state.used_power_ups.contains(&PowerUpKind::ScoreMultiplier));

        dispatch(&mut state, Action::DeactivatePowerUp { id });
        dispatch(&mut state, Action::DeactivatePowerUp { id });
        assert!(state.active_power_ups.is_empty());
        assert_eq!(state.effects.score_multiplier, 1.0);
    }

    #[test]
    fn test_field_power_up_cap() {
        let mut state = playing();
        for _ in 0..10 {
            let id = state.next_entity_id();
            dispatch(
                &mut state,
                Action::SpawnPowerUp(PowerUp::new(id, PowerUpKind::Shield, Vec2::ZERO)),
            );
        }
        assert_eq!(state.power_ups.len(), state.settings.max_field_power_ups);
    }

    #[test]
    fn test_shield_counter_zero_deactivates_shield() {
        let mut state = playing();
        let id = state.next_entity_id();
        dispatch(
            &mut state,
            Action::ActivatePowerUp(PowerUp::new(id, PowerUpKind::Shield, Vec2::ZERO)),
        );
        assert_eq!(state.effects.shield_bounces, 5);
        dispatch(&mut state, Action::UpdateShieldBounces { count: 0 });
        assert!(!state.is_power_up_active(PowerUpKind::Shield));
    }

    #[test]
    fn test_obstacle_actions() {
        let mut state = playing();
        let id = state.next_entity_id();
        let obstacle = Obstacle {
            id,
            kind: ObstacleKind::StaticBlock,
            pos: Vec2::new(10.0, 10.0),
            size: Vec2::new(20.0, 20.0),
            vel: None,
            health: None,
            points: None,
        };
        dispatch(&mut state, Action::SpawnObstacle(obstacle.clone()));
        dispatch(&mut state, Action::SpawnObstacle(obstacle.clone()));
        assert_eq!(state.obstacles.len(), 1);

        let moved = Obstacle {
            pos: Vec2::new(50.0, 50.0),
            ..obstacle
        };
        dispatch(&mut state, Action::UpdateObstacle(moved));
        assert_eq!(state.obstacles[0].pos, Vec2::new(50.0, 50.0));

        dispatch(&mut state, Action::RemoveObstacle { id });
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_unlock_achievement_latches() {
        let mut state = playing();
        let id = AchievementId::ComboStreak;
        dispatch(&mut state, Action::UnlockAchievement { id });
        dispatch(&mut state, Action::UnlockAchievement { id });
        let unlocked: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::AchievementUnlocked { .. }))
            .collect();
        assert_eq!(unlocked.len(), 1);
    }

    #[test]
    fn test_slow_mo_covers_relaunch_after_lost_life() {
        let mut state = playing();
        let full_speed = state.ball.vel.length();
        let id = state.next_entity_id();
        dispatch(
            &mut state,
            Action::ActivatePowerUp(PowerUp::new(id, PowerUpKind::SlowMo, Vec2::ZERO)),
        );
        dispatch(&mut state, Action::LoseLife);
        dispatch(&mut state, Action::LaunchBall { angle: 90.0, power: 50.0 });
        assert!((state.ball.vel.length() - full_speed * 0.6).abs() < 1e-4);

        dispatch(&mut state, Action::DeactivatePowerUp { id });
        assert!((state.ball.vel.length() - full_speed).abs() < 1e-4);
    }

    #[test]
    fn test_slow_mo_covers_added_ball() {
        let mut state = playing();
        let id = state.next_entity_id();
        dispatch(
            &mut state,
            Action::ActivatePowerUp(PowerUp::new(id, PowerUpKind::SlowMo, Vec2::ZERO)),
        );
        let mut extra = state.ball;
        extra.vel = Vec2::new(5.0, -5.0);
        dispatch(&mut state, Action::AddMultiBall(extra));
        assert!((state.extra_balls[0].vel - Vec2::new(3.0, -3.0)).length() < 1e-4);

        dispatch(&mut state, Action::DeactivatePowerUp { id });
        assert!((state.extra_balls[0].vel - Vec2::new(5.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_magnetic_range_never_negative() {
        let mut state = playing();
        dispatch(&mut state, Action::SetMagneticRange { range: -20.0 });
        assert_eq!(state.effects.magnetic_range, 0.0);
        dispatch(&mut state, Action::SetMagneticRange { range: 80.0 });
        assert_eq!(state.effects.magnetic_range, 80.0);
    }
}
