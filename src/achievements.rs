//! Achievement progress re-derivation.

use chrono::{DateTime, Utc};

use crate::domain::{Achievement, AchievementKind, AchievementMetric, UserProgress};

fn metric_for(a: &Achievement) -> Option<AchievementMetric> {
  a.metric.or(match a.kind {
    AchievementKind::Milestone => Some(AchievementMetric::Stages),
    AchievementKind::Skill => Some(AchievementMetric::Skills),
    AchievementKind::Consistency => Some(AchievementMetric::Streak),
    AchievementKind::Challenge => None,
  })
}

fn measure(metric: AchievementMetric, progress: &UserProgress) -> u64 {
  match metric {
    AchievementMetric::Stages => progress.completed_stages.len() as u64,
    AchievementMetric::Points => progress.total_points,
    AchievementMetric::Skills => progress.skill_masteries.len() as u64,
    AchievementMetric::Streak => progress.streak.current_streak as u64,
  }
}

/// Recompute `current` for every achievement from the snapshot.
/// `completed` never flips back, and `completed_at` is stamped only the first time.
pub fn update_achievements(
  achievements: &[Achievement],
  progress: &UserProgress,
  now: DateTime<Utc>,
) -> Vec<Achievement> {
  achievements
    .iter()
    .map(|a| {
      let mut next = a.clone();
      if let Some(metric) = metric_for(a) {
        next.progress.current = measure(metric, progress);
      }
      if !next.completed && next.progress.current >= next.progress.target {
        next.completed = true;
        next.completed_at = Some(now);
      }
      next
    })
    .collect()
}
