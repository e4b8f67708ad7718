//! Domain models: progress snapshot, levels, badges, achievements, roadmap and update events.
//!
//! JSON field names are camelCase because the presentation layer reads these
//! snapshots directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Qualitative skill level. Ordering matters: beginner < intermediate < advanced < expert.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MasteryLevel {
  Beginner,
  Intermediate,
  Advanced,
  Expert,
}
impl Default for MasteryLevel {
  fn default() -> Self { MasteryLevel::Beginner }
}

impl MasteryLevel {
  /// Level implied by a progress value, checked highest threshold first.
  pub fn for_progress(progress: u8) -> Self {
    match progress {
      80..=u8::MAX => MasteryLevel::Expert,
      60..=79 => MasteryLevel::Advanced,
      40..=59 => MasteryLevel::Intermediate,
      _ => MasteryLevel::Beginner,
    }
  }
}

/// Stage difficulty, drives the point multiplier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}
impl Default for Difficulty {
  fn default() -> Self { Difficulty::Beginner }
}

impl Difficulty {
  pub fn multiplier(self) -> f64 {
    match self {
      Difficulty::Beginner => 1.0,
      Difficulty::Intermediate => 1.5,
      Difficulty::Advanced => 2.0,
    }
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
  Skill,
  Progress,
  Streak,
  Achievement,
  Milestone,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
  Common,
  Rare,
  Epic,
  Legendary,
}

/// Machine-checkable badge predicate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeRequirement {
  CompleteStages { value: u32 },
  StreakDays { value: u32 },
  TotalPoints { value: u64 },
  /// Without `details`: number of tracked skills. With `details`: skills at or above that level.
  SkillMastery {
    value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<MasteryLevel>,
  },
  /// `value` is the minimum percentage; `details` how many such assessments (default 1).
  AssessmentScore {
    value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<u32>,
  },
}

/// Catalog entry a badge is minted from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BadgeTemplate {
  pub id: String,
  pub name: String,
  pub description: String,
  pub icon: String,
  pub category: BadgeCategory,
  pub rarity: Rarity,
  #[serde(default)]
  pub points: u32,
  pub requirements: BadgeRequirement,
}

impl BadgeTemplate {
  pub fn unlock(&self, at: DateTime<Utc>) -> Badge {
    Badge {
      id: self.id.clone(),
      name: self.name.clone(),
      description: self.description.clone(),
      icon: self.icon.clone(),
      category: self.category,
      rarity: self.rarity,
      points: self.points,
      requirements: self.requirements.clone(),
      unlocked_at: at,
    }
  }
}

/// An unlocked badge. Never mutated after creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
  pub id: String,
  pub name: String,
  pub description: String,
  pub icon: String,
  pub category: BadgeCategory,
  pub rarity: Rarity,
  pub points: u32,
  pub requirements: BadgeRequirement,
  pub unlocked_at: DateTime<Utc>,
}

/// One row of the level table. `max_points = None` marks the open-ended top level.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserLevel {
  pub level: u32,
  pub title: String,
  pub min_points: u64,
  #[serde(default)]
  pub max_points: Option<u64>,
  #[serde(default)]
  pub benefits: Vec<String>,
}

impl UserLevel {
  pub fn contains(&self, points: u64) -> bool {
    points >= self.min_points && self.max_points.map_or(true, |max| points <= max)
  }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
  Milestone,
  Challenge,
  Skill,
  Consistency,
}

/// Snapshot quantity an achievement tracks.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AchievementMetric {
  Stages,
  Points,
  Skills,
  Streak,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AchievementProgress {
  pub current: u64,
  pub target: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
  pub id: String,
  pub name: String,
  pub description: String,
  pub icon: String,
  #[serde(rename = "type")]
  pub kind: AchievementKind,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metric: Option<AchievementMetric>,
  #[serde(default)]
  pub points: u32,
  pub progress: AchievementProgress,
  #[serde(default)]
  pub completed: bool,
  #[serde(default)]
  pub completed_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub requirements: Vec<String>,
}

/// Consecutive-day activity counter. Invariant: `longest_streak >= current_streak`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
  pub current_streak: u32,
  pub longest_streak: u32,
  #[serde(default)]
  pub last_activity_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillMastery {
  pub level: MasteryLevel,
  /// 0..=100, never decreases.
  pub progress: u8,
}

/// Weekly or monthly counter tied to a calendar period.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalPeriod {
  pub target: u32,
  pub current: u32,
  pub period_key: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  StageCompleted,
  StageProgress,
  SkillPracticed,
  ResourceCompleted,
  DailyActivity,
  AssessmentCompleted,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
  pub kind: ActivityKind,
  pub timestamp: DateTime<Utc>,
}

/// The per-user aggregate. Only the progress aggregator produces new versions of it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
  #[serde(default)]
  pub domain: String,
  pub total_points: u64,
  pub current_level: UserLevel,
  #[serde(default)]
  pub next_level: Option<UserLevel>,
  #[serde(default)]
  pub badges: Vec<Badge>,
  #[serde(default)]
  pub achievements: Vec<Achievement>,
  #[serde(default)]
  pub streak: Streak,
  #[serde(default)]
  pub completed_stages: Vec<String>,
  #[serde(default)]
  pub skill_masteries: BTreeMap<String, SkillMastery>,
  pub weekly_goals: GoalPeriod,
  pub monthly_goals: GoalPeriod,
  #[serde(default)]
  pub assessment_scores: Vec<u32>,
  #[serde(default)]
  pub activity_log: Vec<ActivityRecord>,
}

impl UserProgress {
  pub fn has_badge(&self, id: &str) -> bool {
    self.badges.iter().any(|b| b.id == id)
  }

  pub fn has_completed(&self, stage_id: &str) -> bool {
    self.completed_stages.iter().any(|s| s == stage_id)
  }

  /// Number of tracked skills at or above `level`.
  pub fn skills_at_least(&self, level: MasteryLevel) -> usize {
    self.skill_masteries.values().filter(|m| m.level >= level).count()
  }
}

/// A learning milestone inside a roadmap.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStage {
  #[serde(default)]
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub difficulty: Difficulty,
  #[serde(default)]
  pub estimated_time: String,
  #[serde(default)]
  pub points: u32,
  #[serde(default)]
  pub prerequisites: Vec<String>,
  #[serde(default)]
  pub skills: Vec<String>,
  #[serde(default)]
  pub order: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CareerRoadmap {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub domain: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub total_stages: u32,
  #[serde(default)]
  pub estimated_duration: String,
  #[serde(default)]
  pub stages: Vec<RoadmapStage>,
  #[serde(default)]
  pub skills: Vec<String>,
  #[serde(default)]
  pub career_paths: Vec<String>,
}

impl CareerRoadmap {
  pub fn stage(&self, id: &str) -> Option<&RoadmapStage> {
    self.stages.iter().find(|s| s.id == id)
  }

  /// Stage count used for completion rates; falls back to the stage list length.
  pub fn stage_count(&self) -> u32 {
    if self.total_stages > 0 { self.total_stages } else { self.stages.len() as u32 }
  }
}

/// One user activity fed into the progress aggregator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressUpdate {
  StageCompleted {
    #[serde(rename = "stageId")]
    stage_id: String,
  },
  /// `progress` is a percentage, 0..=100.
  StageProgress {
    #[serde(rename = "stageId", default)]
    stage_id: Option<String>,
    progress: f64,
  },
  SkillPracticed {
    #[serde(rename = "skillName")]
    skill_name: String,
  },
  ResourceCompleted {
    #[serde(rename = "resourceId", default)]
    resource_id: Option<String>,
    #[serde(default)]
    points: Option<i64>,
  },
  DailyActivity,
  AssessmentCompleted {
    score: u32,
  },
}

impl ProgressUpdate {
  pub fn kind(&self) -> ActivityKind {
    match self {
      ProgressUpdate::StageCompleted { .. } => ActivityKind::StageCompleted,
      ProgressUpdate::StageProgress { .. } => ActivityKind::StageProgress,
      ProgressUpdate::SkillPracticed { .. } => ActivityKind::SkillPracticed,
      ProgressUpdate::ResourceCompleted { .. } => ActivityKind::ResourceCompleted,
      ProgressUpdate::DailyActivity => ActivityKind::DailyActivity,
      ProgressUpdate::AssessmentCompleted { .. } => ActivityKind::AssessmentCompleted,
    }
  }
}
