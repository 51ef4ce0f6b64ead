//! Audio and haptic cues for simulation events
//!
//! Procedural cues: each is a short oscillator tone plus an optional
//! vibration pattern, described as data so any backend can play it. Nothing
//! here feeds back into the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, ObstacleKind, Surface};

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single tone with an exponential decay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub waveform: Waveform,
    pub start_hz: f32,
    /// Frequency at the end of the sweep (same as start for a flat tone)
    pub end_hz: f32,
    pub duration_ms: u32,
    /// Peak gain before volume is applied (0.0 - 1.0)
    pub gain: f32,
}

/// Cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackCue {
    /// Ball hits platform
    PlatformHit,
    /// Ball hits wall or ceiling
    WallHit,
    /// Ball hits an obstacle without breaking it
    ObstacleHit,
    /// Brick breaks
    ObstacleBreak,
    Launch,
    PowerUpCollect,
    PowerUpExpire,
    ShieldBlock,
    LifeLost,
    LevelClear,
    GameOver,
    HighScore,
    Achievement,
}

impl FeedbackCue {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let cue = match event {
            GameEvent::BallLaunched => FeedbackCue::Launch,
            GameEvent::Bounce { surface, .. } => match surface {
                Surface::Platform => FeedbackCue::PlatformHit,
                Surface::Wall | Surface::Ceiling => FeedbackCue::WallHit,
                Surface::Floor => return None,
            },
            // Boost zones are silent, they don't stop the ball
            GameEvent::ObstacleHit {
                kind: ObstacleKind::SpeedBoost,
            } => return None,
            GameEvent::ObstacleHit { .. } => FeedbackCue::ObstacleHit,
            GameEvent::ObstacleDestroyed { .. } => FeedbackCue::ObstacleBreak,
            GameEvent::PowerUpCollected { .. } => FeedbackCue::PowerUpCollect,
            GameEvent::PowerUpExpired { .. } => FeedbackCue::PowerUpExpire,
            GameEvent::ShieldAbsorbed { .. } => FeedbackCue::ShieldBlock,
            GameEvent::LifeLost { .. } => FeedbackCue::LifeLost,
            GameEvent::LevelComplete { .. } => FeedbackCue::LevelClear,
            GameEvent::GameOver { .. } => FeedbackCue::GameOver,
            GameEvent::NewHighScore { .. } => FeedbackCue::HighScore,
            GameEvent::AchievementUnlocked { .. } => FeedbackCue::Achievement,
        };
        Some(cue)
    }

    /// Tone layers making up the cue
    pub fn tones(&self) -> &'static [Tone] {
        match self {
            FeedbackCue::PlatformHit => PLATFORM_HIT,
            FeedbackCue::WallHit => WALL_HIT,
            FeedbackCue::ObstacleHit => OBSTACLE_HIT,
            FeedbackCue::ObstacleBreak => OBSTACLE_BREAK,
            FeedbackCue::Launch => LAUNCH,
            FeedbackCue::PowerUpCollect => POWER_UP_COLLECT,
            FeedbackCue::PowerUpExpire => POWER_UP_EXPIRE,
            FeedbackCue::ShieldBlock => SHIELD_BLOCK,
            FeedbackCue::LifeLost => LIFE_LOST,
            FeedbackCue::LevelClear => LEVEL_CLEAR,
            FeedbackCue::GameOver => GAME_OVER,
            FeedbackCue::HighScore => HIGH_SCORE,
            FeedbackCue::Achievement => ACHIEVEMENT,
        }
    }

    /// Vibration pattern in ms (on, off, on, ...); empty for none
    pub fn haptic_pattern(&self) -> &'static [u32] {
        match self {
            FeedbackCue::PlatformHit | FeedbackCue::ObstacleHit => &[15],
            FeedbackCue::ObstacleBreak | FeedbackCue::ShieldBlock => &[30],
            FeedbackCue::LifeLost => &[80, 40, 80],
            FeedbackCue::GameOver => &[200],
            FeedbackCue::LevelClear | FeedbackCue::HighScore => &[40, 30, 40, 30, 40],
            _ => &[],
        }
    }
}

// === Cue sounds ===

/// Solid thump
const PLATFORM_HIT: &[Tone] = &[tone(Waveform::Sine, 150.0, 60.0, 150, 0.6)];
/// Higher ping
const WALL_HIT: &[Tone] = &[tone(Waveform::Sine, 400.0, 400.0, 100, 0.3)];
/// Soft tap
const OBSTACLE_HIT: &[Tone] = &[tone(Waveform::Triangle, 300.0, 300.0, 80, 0.25)];
/// Crackle over a bass thump
const OBSTACLE_BREAK: &[Tone] = &[
    tone(Waveform::Sawtooth, 100.0, 50.0, 200, 0.35),
    tone(Waveform::Sine, 60.0, 60.0, 120, 0.3),
];
const LAUNCH: &[Tone] = &[tone(Waveform::Square, 200.0, 600.0, 120, 0.25)];
const POWER_UP_COLLECT: &[Tone] = &[
    tone(Waveform::Sine, 600.0, 1200.0, 150, 0.3),
    tone(Waveform::Triangle, 900.0, 1800.0, 150, 0.15),
];
const POWER_UP_EXPIRE: &[Tone] = &[tone(Waveform::Triangle, 800.0, 300.0, 200, 0.2)];
const SHIELD_BLOCK: &[Tone] = &[tone(Waveform::Square, 250.0, 500.0, 120, 0.3)];
const LIFE_LOST: &[Tone] = &[tone(Waveform::Sawtooth, 200.0, 30.0, 600, 0.5)];
/// C-E-G arpeggio
const LEVEL_CLEAR: &[Tone] = &[
    tone(Waveform::Sine, 523.0, 523.0, 300, 0.3),
    tone(Waveform::Sine, 659.0, 659.0, 300, 0.3),
    tone(Waveform::Sine, 784.0, 784.0, 400, 0.3),
];
const GAME_OVER: &[Tone] = &[tone(Waveform::Sawtooth, 300.0, 50.0, 1000, 0.4)];
const HIGH_SCORE: &[Tone] = &[
    tone(Waveform::Sine, 784.0, 784.0, 250, 0.35),
    tone(Waveform::Sine, 1047.0, 1047.0, 500, 0.35),
];
/// Sparkly chime
const ACHIEVEMENT: &[Tone] = &[
    tone(Waveform::Sine, 1200.0, 1200.0, 300, 0.2),
    tone(Waveform::Sine, 1800.0, 1800.0, 300, 0.2),
];

const fn tone(waveform: Waveform, start_hz: f32, end_hz: f32, duration_ms: u32, gain: f32) -> Tone {
    Tone {
        waveform,
        start_hz,
        end_hz,
        duration_ms,
        gain,
    }
}

/// Volume and mute state applied to cues before playback
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackMixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    haptics: bool,
}

impl Default for FeedbackMixer {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            haptics: true,
        }
    }
}

impl FeedbackMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn set_haptics(&mut self, enabled: bool) {
        self.haptics = enabled;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Tones for `cue` with volume applied; empty when silent
    pub fn render(&self, cue: FeedbackCue) -> Vec<Tone> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Vec::new();
        }
        cue.tones()
            .iter()
            .map(|t| Tone {
                gain: t.gain * vol,
                ..*t
            })
            .collect()
    }

    /// Vibration for `cue`, if haptics are on
    pub fn vibration(&self, cue: FeedbackCue) -> &'static [u32] {
        if self.haptics {
            cue.haptic_pattern()
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AchievementId, PowerUpKind};

    #[test]
    fn test_event_mapping() {
        let bounce = |surface| GameEvent::Bounce {
            surface,
            hit_position: None,
            points: 10,
        };
        assert_eq!(FeedbackCue::for_event(&bounce(Surface::Platform)), Some(FeedbackCue::PlatformHit));
        assert_eq!(FeedbackCue::for_event(&bounce(Surface::Ceiling)), Some(FeedbackCue::WallHit));
        assert_eq!(FeedbackCue::for_event(&bounce(Surface::Floor)), None);
        assert_eq!(
            FeedbackCue::for_event(&GameEvent::ObstacleHit {
                kind: ObstacleKind::SpeedBoost
            }),
            None
        );
        assert_eq!(
            FeedbackCue::for_event(&GameEvent::PowerUpCollected {
                kind: PowerUpKind::Shield
            }),
            Some(FeedbackCue::PowerUpCollect)
        );
        assert_eq!(
            FeedbackCue::for_event(&GameEvent::AchievementUnlocked {
                id: AchievementId::FirstBounce
            }),
            Some(FeedbackCue::Achievement)
        );
    }

    #[test]
    fn test_every_cue_has_sound() {
        let cues = [
            FeedbackCue::PlatformHit,
            FeedbackCue::WallHit,
            FeedbackCue::ObstacleHit,
            FeedbackCue::ObstacleBreak,
            FeedbackCue::Launch,
            FeedbackCue::PowerUpCollect,
            FeedbackCue::PowerUpExpire,
            FeedbackCue::ShieldBlock,
            FeedbackCue::LifeLost,
            FeedbackCue::LevelClear,
            FeedbackCue::GameOver,
            FeedbackCue::HighScore,
            FeedbackCue::Achievement,
        ];
        for cue in cues {
            assert!(!cue.tones().is_empty(), "{cue:?}");
            assert!(cue.tones().iter().all(|t| t.gain > 0.0 && t.gain <= 1.0));
        }
    }

    #[test]
    fn test_mixer_volume() {
        let mut mixer = FeedbackMixer::new();
        mixer.set_master_volume(0.5);
        mixer.set_sfx_volume(2.0);
        assert_eq!(mixer.effective_volume(), 0.5);

        let tones = mixer.render(FeedbackCue::PlatformHit);
        assert!((tones[0].gain - 0.3).abs() < 1e-6);

        mixer.set_muted(true);
        assert!(mixer.render(FeedbackCue::PlatformHit).is_empty());
    }

    #[test]
    fn test_haptics_toggle() {
        let mut mixer = FeedbackMixer::new();
        assert_eq!(mixer.vibration(FeedbackCue::LifeLost), &[80, 40, 80]);
        mixer.set_haptics(false);
        assert!(mixer.vibration(FeedbackCue::LifeLost).is_empty());
    }
}
