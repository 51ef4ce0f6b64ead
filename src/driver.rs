//! Scheduler around the simulation
//!
//! The driver owns everything the pure simulation may not: randomness, the
//! power-up spawn timer, the level-complete interstitial and the high score
//! store. Timers live on the driver's own clock, which advances one reference
//! frame per [`GameDriver::step`] whatever the phase, and they act only by
//! dispatching actions.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::FRAME_MS;
use crate::persistence::{HighScoreStore, MemoryHighScoreStore};
use crate::settings::Settings;
use crate::sim::{self, Action, GameEvent, GamePhase, GameState, powerups};

/// Runs a game at a fixed step and keeps its timers
pub struct GameDriver<S: HighScoreStore = MemoryHighScoreStore> {
    state: GameState,
    store: S,
    rng: Pcg32,
    /// Driver clock in ms
    now_ms: f64,
    spawn_deadline: Option<f64>,
    interstitial_deadline: Option<f64>,
    /// Unsimulated real time, in seconds
    accumulator: f32,
}

impl<S: HighScoreStore> GameDriver<S> {
    pub fn new(settings: Settings, store: S, seed: u64) -> Self {
        let mut state = GameState::new(settings);
        state.score.high_score = store.high_score();
        Self {
            state,
            store,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0.0,
            spawn_deadline: None,
            interstitial_deadline: None,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Driver clock in ms
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Apply an action and react to any phase change it caused
    pub fn dispatch(&mut self, action: Action) {
        let before = self.state.phase;
        sim::dispatch(&mut self.state, action);
        let after = self.state.phase;
        if after != before {
            self.on_phase_change(before, after);
        }
    }

    /// One reference frame: tick, then fire due timers
    pub fn step(&mut self) {
        self.dispatch(Action::Tick { dt: 1.0 });
        self.now_ms += f64::from(FRAME_MS);
        self.fire_timers();
    }

    /// Feed real elapsed time and run as many whole frames as fit, up to the
    /// substep cap. Returns the number of frames run.
    ///
    /// Events from every substep stay queued until [`drain_events`](Self::drain_events).
    pub fn advance(&mut self, frame_seconds: f32) -> u32 {
        if !frame_seconds.is_finite() || frame_seconds <= 0.0 {
            return 0;
        }
        let frame = FRAME_MS / 1000.0;
        let max_substeps = self.state.settings.max_substeps;
        self.accumulator += frame_seconds;

        let mut substeps = 0;
        while self.accumulator >= frame && substeps < max_substeps {
            self.step();
            self.accumulator -= frame;
            substeps += 1;
        }
        if substeps == max_substeps {
            // Too far behind; drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(frame);
        }
        substeps
    }

    fn on_phase_change(&mut self, before: GamePhase, after: GamePhase) {
        log::debug!("Phase {before:?} -> {after:?}");

        if after == GamePhase::Playing {
            self.arm_spawn_timer();
        } else {
            self.spawn_deadline = None;
        }

        self.interstitial_deadline = match after {
            GamePhase::LevelComplete => Some(self.now_ms + self.state.settings.level_complete_delay_ms),
            _ => None,
        };

        if after == GamePhase::GameOver {
            self.submit_score();
        }
    }

    fn arm_spawn_timer(&mut self) {
        let delay = powerups::next_spawn_delay_ms(&mut self.rng, &self.state.settings);
        self.spawn_deadline = Some(self.now_ms + delay);
    }

    fn fire_timers(&mut self) {
        if self.spawn_deadline.is_some_and(|deadline| self.now_ms >= deadline) {
            let id = self.state.next_entity_id();
            let power_up = powerups::random_power_up(&mut self.rng, id, &self.state.settings);
            log::debug!("Spawning {} at {:?}", power_up.kind.as_str(), power_up.pos);
            self.dispatch(Action::SpawnPowerUp(power_up));
            if self.state.phase == GamePhase::Playing {
                self.arm_spawn_timer();
            }
        }

        if self
            .interstitial_deadline
            .is_some_and(|deadline| self.now_ms >= deadline)
        {
            self.interstitial_deadline = None;
            self.dispatch(Action::EnterAiming);
        }
    }

    fn submit_score(&mut self) {
        let score = self.state.score.score;
        let level = self.state.score.level;
        if self.store.set_high_score_if_greater(score) {
            log::info!("Stored new high score {score}");
        }
        if let Some(rank) = self.store.record_run(score, level) {
            log::info!("Run placed #{rank} on the leaderboard");
        }
    }
}
