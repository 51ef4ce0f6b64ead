//! Achievement catalogue and progress tracking
//!
//! Progress only ever goes up and unlocking is a one-way latch.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::state::{GameState, PowerUpKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    FirstBounce,
    ComboStreak,
    ScoreThousand,
    ReachLevelThree,
    ReachLevelFive,
    PowerCollector,
}

impl AchievementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstBounce => "first-bounce",
            AchievementId::ComboStreak => "combo-streak",
            AchievementId::ScoreThousand => "score-1000",
            AchievementId::ReachLevelThree => "level-3",
            AchievementId::ReachLevelFive => "level-5",
            AchievementId::PowerCollector => "power-collector",
        }
    }

    /// Progress needed to unlock
    pub fn target(&self) -> u64 {
        match self {
            AchievementId::FirstBounce => 1,
            AchievementId::ComboStreak => 10,
            AchievementId::ScoreThousand => 1_000,
            AchievementId::ReachLevelThree => 3,
            AchievementId::ReachLevelFive => 5,
            AchievementId::PowerCollector => PowerUpKind::ALL.len() as u64,
        }
    }

    /// Current progress value read from the context
    fn measure(&self, ctx: &AchievementContext) -> u64 {
        match self {
            AchievementId::FirstBounce => u64::from(ctx.bounce_count),
            AchievementId::ComboStreak => u64::from(ctx.consecutive_bounces),
            AchievementId::ScoreThousand => ctx.score,
            AchievementId::ReachLevelThree | AchievementId::ReachLevelFive => u64::from(ctx.level),
            AchievementId::PowerCollector => ctx.used_power_ups.len() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub progress: u64,
    pub target: u64,
    pub unlocked: bool,
    /// Simulation clock reading when unlocked
    pub unlocked_at_ms: Option<f64>,
}

impl Achievement {
    pub fn new(id: AchievementId) -> Self {
        Self {
            id,
            progress: 0,
            target: id.target(),
            unlocked: false,
            unlocked_at_ms: None,
        }
    }

    /// Latch the achievement; false if it was already unlocked
    pub fn unlock(&mut self, now_ms: f64) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.unlocked_at_ms = Some(now_ms);
        self.progress = self.progress.max(self.target);
        true
    }
}

/// The fields achievements are measured against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AchievementContext {
    pub score: u64,
    pub consecutive_bounces: u32,
    pub level: u32,
    pub bounce_count: u32,
    pub used_power_ups: BTreeSet<PowerUpKind>,
}

impl AchievementContext {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score.score,
            consecutive_bounces: state.score.consecutive_bounces,
            level: state.score.level,
            bounce_count: state.score.bounce_count,
            used_power_ups: state.used_power_ups.clone(),
        }
    }
}

/// Every achievement, locked
pub fn catalogue() -> Vec<Achievement> {
    [
        AchievementId::FirstBounce,
        AchievementId::ComboStreak,
        AchievementId::ScoreThousand,
        AchievementId::ReachLevelThree,
        AchievementId::ReachLevelFive,
        AchievementId::PowerCollector,
    ]
    .into_iter()
    .map(Achievement::new)
    .collect()
}

/// Raise progress from the context and return the ids that are now due to
/// unlock. Unlocking itself goes through the dispatcher.
pub fn update_progress(achievements: &mut [Achievement], ctx: &AchievementContext) -> Vec<AchievementId> {
    let mut due = Vec::new();
    for achievement in achievements.iter_mut() {
        let measured = achievement.id.measure(ctx);
        achievement.progress = achievement.progress.max(measured);
        if !achievement.unlocked && achievement.progress >= achievement.target {
            due.push(achievement.id);
        }
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_never_decreases() {
        let mut list = catalogue();
        let ctx = AchievementContext {
            consecutive_bounces: 7,
            ..Default::default()
        };
        update_progress(&mut list, &ctx);
        let combo = list.iter().find(|a| a.id == AchievementId::ComboStreak).unwrap();
        assert_eq!(combo.progress, 7);

        // Streak broken
        update_progress(&mut list, &AchievementContext::default());
        let combo = list.iter().find(|a| a.id == AchievementId::ComboStreak).unwrap();
        assert_eq!(combo.progress, 7);
    }

    #[test]
    fn test_due_when_target_reached() {
        let mut list = catalogue();
        let ctx = AchievementContext {
            bounce_count: 1,
            level: 3,
            ..Default::default()
        };
        let due = update_progress(&mut list, &ctx);
        assert_eq!(
            due,
            vec![AchievementId::FirstBounce, AchievementId::ReachLevelThree]
        );
    }

    #[test]
    fn test_unlock_is_a_latch() {
        let mut achievement = Achievement::new(AchievementId::ScoreThousand);
        assert!(achievement.unlock(500.0));
        assert!(!achievement.unlock(900.0));
        assert_eq!(achievement.unlocked_at_ms, Some(500.0));
        assert_eq!(achievement.progress, 1_000);
    }

    #[test]
    fn test_unlocked_not_reported_again() {
        let mut list = catalogue();
        let ctx = AchievementContext {
            bounce_count: 3,
            ..Default::default()
        };
        let due = update_progress(&mut list, &ctx);
        assert_eq!(due, vec![AchievementId::FirstBounce]);
        list[0].unlock(0.0);
        assert!(update_progress(&mut list, &ctx).is_empty());
    }

    #[test]
    fn test_power_collector_needs_every_kind() {
        let mut list = catalogue();
        let mut ctx = AchievementContext::default();
        ctx.used_power_ups.extend(PowerUpKind::ALL.iter().take(5).copied());
        assert!(update_progress(&mut list, &ctx).is_empty());
        ctx.used_power_ups.insert(PowerUpKind::ALL[5]);
        assert_eq!(update_progress(&mut list, &ctx), vec![AchievementId::PowerCollector]);
    }
}
