//! High score persistence
//!
//! The simulation only needs the best score; stores may also keep a full
//! leaderboard. Failures are logged and never reach the game.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::highscores::HighScores;

/// Where the best score is read from and written to
pub trait HighScoreStore {
    fn high_score(&self) -> u64;

    /// Store `score` if it beats the current best; true if it did
    fn set_high_score_if_greater(&mut self, score: u64) -> bool;

    /// Record a finished run on the leaderboard, returning its rank
    fn record_run(&mut self, _score: u64, _level: u32) -> Option<usize> {
        None
    }
}

/// Process-local store, forgotten on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    best: u64,
    scores: HighScores,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaderboard(&self) -> &HighScores {
        &self.scores
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn high_score(&self) -> u64 {
        self.best.max(self.scores.top_score().unwrap_or(0))
    }

    fn set_high_score_if_greater(&mut self, score: u64) -> bool {
        if score > self.high_score() {
            self.best = score;
            true
        } else {
            false
        }
    }

    fn record_run(&mut self, score: u64, level: u32) -> Option<usize> {
        self.scores.add_score(score, level, now_ms())
    }
}

/// On-disk layout: the best score next to the leaderboard entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScoreFile {
    #[serde(default)]
    best: u64,
    #[serde(flatten)]
    scores: HighScores,
}

/// Leaderboard kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
    file: ScoreFile,
}

impl FileHighScoreStore {
    /// Open the leaderboard at `path`, starting empty if it's missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = Self::load(&path);
        Self { path, file }
    }

    fn load(path: &Path) -> ScoreFile {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                return ScoreFile::default();
            }
            Err(err) => {
                log::warn!("Failed to read high scores {}: {err}", path.display());
                return ScoreFile::default();
            }
        };
        match serde_json::from_str::<ScoreFile>(&json) {
            Ok(file) => {
                log::info!("Loaded {} high scores", file.scores.entries.len());
                file
            }
            Err(err) => {
                log::warn!("Ignoring corrupt high scores {}: {err}", path.display());
                ScoreFile::default()
            }
        }
    }

    /// Write the best score and leaderboard back to disk
    pub fn save(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.file)?;
        fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", self.file.scores.entries.len());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn leaderboard(&self) -> &HighScores {
        &self.file.scores
    }

    fn save_or_warn(&self) {
        if let Err(err) = self.save() {
            log::warn!("Failed to save high scores {}: {err}", self.path.display());
        }
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn high_score(&self) -> u64 {
        self.file.best.max(self.file.scores.top_score().unwrap_or(0))
    }

    fn set_high_score_if_greater(&mut self, score: u64) -> bool {
        if score <= self.high_score() {
            return false;
        }
        self.file.best = score;
        self.save_or_warn();
        true
    }

    fn record_run(&mut self, score: u64, level: u32) -> Option<usize> {
        let rank = self.file.scores.add_score(score, level, now_ms())?;
        self.save_or_warn();
        Some(rank)
    }
}

/// Wall-clock time for leaderboard timestamps
fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
