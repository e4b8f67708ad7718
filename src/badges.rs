//! Badge rule engine.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{Badge, BadgeRequirement, BadgeTemplate, UserProgress};

/// Does the snapshot satisfy a single requirement?
pub fn requirement_met(req: &BadgeRequirement, progress: &UserProgress) -> bool {
  match req {
    BadgeRequirement::CompleteStages { value } => progress.completed_stages.len() >= *value as usize,
    BadgeRequirement::StreakDays { value } => progress.streak.current_streak >= *value,
    BadgeRequirement::TotalPoints { value } => progress.total_points >= *value,
    BadgeRequirement::SkillMastery { value, details: None } => {
      progress.skill_masteries.len() >= *value as usize
    }
    BadgeRequirement::SkillMastery { value, details: Some(level) } => {
      progress.skills_at_least(*level) >= *value as usize
    }
    BadgeRequirement::AssessmentScore { value, details } => {
      let needed = details.unwrap_or(1).max(1) as usize;
      progress.assessment_scores.iter().filter(|s| **s >= *value).count() >= needed
    }
  }
}

/// Templates not yet unlocked whose requirement now holds, stamped with `now`.
/// Unlocked ids are skipped without evaluation, so a second call on the same
/// snapshot (after appending the result) returns nothing.
pub fn check_eligibility(templates: &[BadgeTemplate], progress: &UserProgress, now: DateTime<Utc>) -> Vec<Badge> {
  templates
    .iter()
    .filter(|t| !progress.has_badge(&t.id))
    .filter(|t| requirement_met(&t.requirements, progress))
    .map(|t| {
      debug!(target: "progress", badge = %t.id, "Badge requirement met");
      t.unlock(now)
    })
    .collect()
}
