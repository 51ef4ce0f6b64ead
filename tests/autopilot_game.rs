use bounce_arcade::autopilot::Autopilot;
use bounce_arcade::sim::scoring::combo_multiplier;
use bounce_arcade::sim::{Action, GameEvent, GamePhase, GameState, Surface, dispatch};
use bounce_arcade::{FileHighScoreStore, GameDriver, HighScoreStore, MemoryHighScoreStore, Settings};

/// Play one autopilot game, calling `check` after every frame
fn play<S: HighScoreStore>(
    driver: &mut GameDriver<S>,
    max_frames: u32,
    mut check: impl FnMut(&GameState, &[GameEvent]),
) -> u32 {
    let mut pilot = Autopilot::new();
    driver.dispatch(Action::StartGame);
    let mut frames = 0;
    while frames < max_frames && driver.state().phase != GamePhase::GameOver {
        for action in pilot.next_actions(driver.state()) {
            driver.dispatch(action);
        }
        driver.step();
        frames += 1;
        let events = driver.drain_events();
        check(driver.state(), &events);
    }
    frames
}

#[test]
fn autopilot_game_keeps_invariants() {
    let settings = Settings::default();
    let mut driver = GameDriver::new(settings.clone(), MemoryHighScoreStore::new(), 7);

    let mut last_score = 0;
    let mut last_high = 0;
    let mut platform_bounces = 0;

    play(&mut driver, 30_000, |state, events| {
        let score = &state.score;
        assert!(score.lives <= settings.initial_lives);
        assert!((1..=5).contains(&score.level));
        assert!(score.score >= last_score, "score went down");
        assert!(score.high_score >= last_high, "high score went down");
        assert!((1.0..=3.0).contains(&score.multiplier));
        assert_eq!(score.multiplier, combo_multiplier(score.consecutive_bounces));
        assert!(state.ball_count() <= settings.max_balls);
        assert!(state.power_ups.len() <= settings.max_field_power_ups);

        if state.phase == GamePhase::Playing {
            for ball in state.balls() {
                assert!(ball.pos.x >= ball.radius - 1e-3);
                assert!(ball.pos.x <= settings.canvas_width - ball.radius + 1e-3);
            }
            let platform = &state.platform;
            assert!(platform.left() >= -1e-3);
            assert!(platform.right() <= settings.canvas_width + 1e-3);
        }

        platform_bounces += events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    GameEvent::Bounce {
                        surface: Surface::Platform,
                        ..
                    }
                )
            })
            .count();

        last_score = score.score;
        last_high = score.high_score;
    });

    assert!(platform_bounces > 0);
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let mut driver = GameDriver::new(Settings::default(), MemoryHighScoreStore::new(), 99);
        let mut log = Vec::new();
        play(&mut driver, 5_000, |_, events| log.extend_from_slice(events));
        (serde_json::to_string(driver.state()).unwrap(), log)
    };
    let (state_a, events_a) = run();
    let (state_b, events_b) = run();
    assert_eq!(state_a, state_b);
    assert_eq!(events_a, events_b);
}

#[test]
fn finished_game_lands_on_the_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");

    let mut driver = GameDriver::new(Settings::default(), FileHighScoreStore::open(&path), 3);
    play(&mut driver, 20_000, |_, _| {});
    if driver.state().phase != GamePhase::GameOver {
        driver.dispatch(Action::GameOver);
    }
    let score = driver.state().score.score;
    assert!(score > 0);

    let reopened = FileHighScoreStore::open(&path);
    assert_eq!(reopened.high_score(), score);
    assert_eq!(reopened.leaderboard().entries[0].level, driver.state().score.level);
}

#[test]
fn level_one_clears_into_level_two() {
    let mut state = GameState::new(Settings::default());
    dispatch(&mut state, Action::StartGame);
    dispatch(&mut state, Action::LaunchBall { angle: 90.0, power: 60.0 });
    for _ in 0..10 {
        dispatch(
            &mut state,
            Action::BallBounce {
                surface: Surface::Platform,
                hit_position: Some(0.0),
            },
        );
    }
    dispatch(&mut state, Action::Tick { dt: 1.0 });

    assert_eq!(state.phase, GamePhase::LevelComplete);
    assert_eq!(state.score.level, 2);
    assert_eq!(state.score.bounce_count, 0);
    assert_eq!(state.platform.width, 105.0);

    dispatch(&mut state, Action::EnterAiming);
    assert_eq!(state.phase, GamePhase::Aiming);
}

#[test]
fn last_life_on_the_floor_ends_the_game() {
    let mut state = GameState::new(Settings::default());
    dispatch(&mut state, Action::StartGame);
    dispatch(&mut state, Action::LaunchBall { angle: 90.0, power: 50.0 });
    state.score.lives = 1;
    state.score.score = 75;
    state.ball.pos.x = 100.0;
    state.ball.pos.y = state.settings.canvas_height;
    state.ball.vel = glam::Vec2::ZERO;

    dispatch(&mut state, Action::Tick { dt: 1.0 });

    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.score.lives, 0);
    assert_eq!(state.score.high_score, 75);
}
