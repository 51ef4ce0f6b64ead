//! Headless runner
//!
//! Plays seeded games with the autopilot and prints a JSON summary per run.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use bounce_arcade::autopilot::Autopilot;
    use bounce_arcade::feedback::{FeedbackCue, FeedbackMixer};
    use bounce_arcade::sim::{Action, GameEvent, GamePhase, Surface};
    use bounce_arcade::{FileHighScoreStore, GameDriver, HighScoreStore, MemoryHighScoreStore, Settings};
    use clap::Parser;
    use serde::Serialize;

    #[derive(Parser, Debug)]
    #[command(name = "bounce-arcade")]
    #[command(about = "Run deterministic bounce arcade games with the autopilot")]
    struct Cli {
        /// Seed for the first game; later games use seed + n
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: u32,
        /// Frame budget per game (30 min at 60fps = 108000)
        #[arg(long, default_value_t = 108_000)]
        max_frames: u32,
        /// Settings JSON (defaults when missing)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Write the effective settings back to --settings
        #[arg(long, default_value_t = false)]
        save_settings: bool,
        /// Leaderboard JSON; kept in memory when omitted
        #[arg(long)]
        scores: Option<PathBuf>,
        /// Write all run summaries to this file as well as stdout
        #[arg(long)]
        summary: Option<PathBuf>,
    }

    #[derive(Debug, Default, Serialize)]
    struct RunSummary {
        seed: u64,
        frames: u32,
        score: u64,
        level: u32,
        lives: u8,
        high_score: u64,
        platform_bounces: u32,
        power_ups: u32,
        bricks: u32,
        achievements: Vec<&'static str>,
        cues: u32,
        completed: bool,
    }

    impl RunSummary {
        fn record(&mut self, event: &GameEvent, mixer: &FeedbackMixer) {
            match event {
                GameEvent::Bounce {
                    surface: Surface::Platform,
                    ..
                } => self.platform_bounces += 1,
                GameEvent::PowerUpCollected { .. } => self.power_ups += 1,
                GameEvent::ObstacleDestroyed { .. } => self.bricks += 1,
                GameEvent::AchievementUnlocked { id } => self.achievements.push(id.as_str()),
                _ => {}
            }
            if let Some(cue) = FeedbackCue::for_event(event) {
                if !mixer.render(cue).is_empty() {
                    self.cues += 1;
                }
            }
        }
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        if cli.games == 0 {
            bail!("--games must be at least 1");
        }
        if cli.save_settings && cli.settings.is_none() {
            bail!("--save-settings needs --settings");
        }

        let settings = match &cli.settings {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };
        if cli.save_settings {
            if let Some(path) = &cli.settings {
                settings
                    .save(path)
                    .with_context(|| format!("writing settings {}", path.display()))?;
            }
        }

        let summaries = match &cli.scores {
            Some(path) => play_all(&cli, &settings, FileHighScoreStore::open(path))?,
            None => play_all(&cli, &settings, MemoryHighScoreStore::new())?,
        };

        let json = serde_json::to_string_pretty(&summaries)?;
        println!("{json}");
        if let Some(path) = &cli.summary {
            fs::write(path, &json).with_context(|| format!("writing summary {}", path.display()))?;
            log::info!("Summary written to {}", path.display());
        }
        Ok(())
    }

    fn play_all<S: HighScoreStore>(cli: &Cli, settings: &Settings, mut store: S) -> Result<Vec<RunSummary>> {
        let mut summaries = Vec::new();
        for n in 0..cli.games {
            let seed = cli
                .seed
                .checked_add(u64::from(n))
                .context("seed range overflows u64")?;
            let (summary, returned) = play_one(settings.clone(), store, seed, cli.max_frames);
            store = returned;
            log::info!(
                "Game {}/{}: seed={} score={} level={}",
                n + 1,
                cli.games,
                seed,
                summary.score,
                summary.level
            );
            summaries.push(summary);
        }
        Ok(summaries)
    }

    fn play_one<S: HighScoreStore>(settings: Settings, store: S, seed: u64, max_frames: u32) -> (RunSummary, S) {
        let mut driver = GameDriver::new(settings, store, seed);
        let mut pilot = Autopilot::new();
        let mixer = FeedbackMixer::new();
        let mut summary = RunSummary {
            seed,
            ..Default::default()
        };

        driver.dispatch(Action::StartGame);
        while summary.frames < max_frames && driver.state().phase != GamePhase::GameOver {
            for action in pilot.next_actions(driver.state()) {
                driver.dispatch(action);
            }
            driver.step();
            summary.frames += 1;
            for event in driver.drain_events() {
                summary.record(&event, &mixer);
            }
        }

        summary.completed = driver.state().phase == GamePhase::GameOver;
        if !summary.completed {
            log::info!("Frame budget spent, ending run");
            driver.dispatch(Action::GameOver);
            for event in driver.drain_events() {
                summary.record(&event, &mixer);
            }
        }

        let state = driver.state();
        summary.score = state.score.score;
        summary.level = state.score.level;
        summary.lives = state.score.lives;
        summary.high_score = state.score.high_score;
        (summary, driver.into_store())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only
}
