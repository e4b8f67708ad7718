//! Built-in content: level table, badge templates and starter achievements.
//!
//! These are data, not logic. `AppConfig` may replace any of the three lists
//! from TOML; `Catalog::validate` enforces the invariants the engines rely on.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::info;

use crate::domain::{
  Achievement, AchievementKind, AchievementMetric, AchievementProgress, BadgeCategory,
  BadgeRequirement, BadgeTemplate, MasteryLevel, Rarity, UserLevel,
};
use crate::error::{CareerError, Result};
use crate::levels::validate_levels;

/// Everything the gamification engines read but never mutate.
#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
  #[serde(default = "default_levels")]
  pub levels: Vec<UserLevel>,
  #[serde(default = "default_badges")]
  pub badges: Vec<BadgeTemplate>,
  #[serde(default = "default_achievements")]
  pub achievements: Vec<Achievement>,
}

impl Default for Catalog {
  fn default() -> Self {
    Self {
      levels: default_levels(),
      badges: default_badges(),
      achievements: default_achievements(),
    }
  }
}

impl Catalog {
  pub fn validate(&self) -> Result<()> {
    validate_levels(&self.levels)?;

    let mut seen = HashSet::new();
    for b in &self.badges {
      if !seen.insert(b.id.as_str()) {
        return Err(CareerError::ContractViolation(format!("duplicate badge id '{}'", b.id)));
      }
    }

    let mut seen = HashSet::new();
    for a in &self.achievements {
      if !seen.insert(a.id.as_str()) {
        return Err(CareerError::ContractViolation(format!("duplicate achievement id '{}'", a.id)));
      }
      if a.progress.target == 0 {
        return Err(CareerError::ContractViolation(format!("achievement '{}' has a zero target", a.id)));
      }
    }

    info!(
      target: "career_progress",
      levels = self.levels.len(),
      badges = self.badges.len(),
      achievements = self.achievements.len(),
      "Catalog validated"
    );
    Ok(())
  }
}

fn level(level: u32, title: &str, min: u64, max: Option<u64>, benefits: &[&str]) -> UserLevel {
  UserLevel {
    level,
    title: title.into(),
    min_points: min,
    max_points: max,
    benefits: benefits.iter().map(|b| b.to_string()).collect(),
  }
}

pub fn default_levels() -> Vec<UserLevel> {
  vec![
    level(1, "Career Explorer", 0, Some(499), &["Basic roadmap access", "Daily challenges"]),
    level(2, "Skill Seeker", 500, Some(1_499), &["Weekly quests", "Progress tracking", "Basic badges"]),
    level(3, "Knowledge Warrior", 1_500, Some(3_499), &["Advanced resources", "Skill mastery tracking", "Achievement system"]),
    level(4, "Growth Hacker", 3_500, Some(7_499), &["Personalized recommendations", "Priority support", "Exclusive content"]),
    level(5, "Career Ninja", 7_500, Some(14_999), &["Mentor matching", "Advanced analytics", "Custom roadmaps"]),
    level(6, "Industry Expert", 15_000, Some(29_999), &["Leadership challenges", "Community features", "Beta access"]),
    level(7, "Career Master", 30_000, Some(59_999), &["Mentorship opportunities", "Industry insights", "VIP support"]),
    level(8, "Domain Legend", 60_000, Some(99_999), &["Thought leadership", "Speaking opportunities", "Premium networking"]),
    level(9, "Career Architect", 100_000, Some(199_999), &["Industry partnerships", "Executive coaching", "Global recognition"]),
    level(10, "Visionary Leader", 200_000, None, &["Lifetime access", "Advisory board", "Legacy features"]),
  ]
}

#[allow(clippy::too_many_arguments)]
fn badge(
  id: &str,
  name: &str,
  description: &str,
  icon: &str,
  category: BadgeCategory,
  rarity: Rarity,
  points: u32,
  requirements: BadgeRequirement,
) -> BadgeTemplate {
  BadgeTemplate {
    id: id.into(),
    name: name.into(),
    description: description.into(),
    icon: icon.into(),
    category,
    rarity,
    points,
    requirements,
  }
}

pub fn default_badges() -> Vec<BadgeTemplate> {
  use BadgeCategory as C;
  use BadgeRequirement as R;
  use Rarity::*;

  vec![
    // Progress
    badge("first_steps", "First Steps", "Complete your first roadmap stage", "🚀", C::Progress, Common, 50, R::CompleteStages { value: 1 }),
    badge("momentum_builder", "Momentum Builder", "Complete 5 roadmap stages", "⚡", C::Progress, Common, 200, R::CompleteStages { value: 5 }),
    badge("progress_pioneer", "Progress Pioneer", "Complete 10 roadmap stages", "🎯", C::Progress, Rare, 500, R::CompleteStages { value: 10 }),
    badge("stage_master", "Stage Master", "Complete 25 roadmap stages", "👑", C::Progress, Epic, 1_000, R::CompleteStages { value: 25 }),
    badge("completion_legend", "Completion Legend", "Complete 50 roadmap stages", "🏆", C::Progress, Legendary, 2_500, R::CompleteStages { value: 50 }),
    // Streak
    badge("consistent_learner", "Consistent Learner", "Maintain a 7-day learning streak", "🔥", C::Streak, Common, 100, R::StreakDays { value: 7 }),
    badge("dedication_medal", "Dedication Medal", "Maintain a 30-day learning streak", "🎖️", C::Streak, Rare, 500, R::StreakDays { value: 30 }),
    badge("unstoppable_force", "Unstoppable Force", "Maintain a 100-day learning streak", "💎", C::Streak, Epic, 1_500, R::StreakDays { value: 100 }),
    badge("eternal_flame", "Eternal Flame", "Maintain a 365-day learning streak", "🔥💎", C::Streak, Legendary, 5_000, R::StreakDays { value: 365 }),
    // Skill
    badge("skill_sampler", "Skill Sampler", "Practice 5 different skills", "🎨", C::Skill, Common, 150, R::SkillMastery { value: 5, details: None }),
    badge("versatile_learner", "Versatile Learner", "Achieve intermediate level in 3 skills", "🌟", C::Skill, Rare, 750, R::SkillMastery { value: 3, details: Some(MasteryLevel::Intermediate) }),
    badge("expert_builder", "Expert Builder", "Master an advanced skill", "🚀", C::Skill, Epic, 1_250, R::SkillMastery { value: 1, details: Some(MasteryLevel::Advanced) }),
    badge("domain_expert", "Domain Expert", "Become expert in 2 skills", "🧠", C::Skill, Legendary, 3_000, R::SkillMastery { value: 2, details: Some(MasteryLevel::Expert) }),
    // Assessment
    badge("high_achiever", "High Achiever", "Score 80%+ on 5 assessments", "📊", C::Achievement, Rare, 600, R::AssessmentScore { value: 80, details: Some(5) }),
    badge("perfect_score", "Perfect Score", "Score 100% on an assessment", "💯", C::Achievement, Epic, 1_000, R::AssessmentScore { value: 100, details: None }),
    // Point milestones
    badge("point_collector", "Point Collector", "Earn 10,000 total points", "💰", C::Milestone, Rare, 0, R::TotalPoints { value: 10_000 }),
    badge("point_magnate", "Point Magnate", "Earn 50,000 total points", "💎", C::Milestone, Epic, 0, R::TotalPoints { value: 50_000 }),
    badge("point_emperor", "Point Emperor", "Earn 100,000 total points", "👑", C::Milestone, Legendary, 0, R::TotalPoints { value: 100_000 }),
  ]
}

#[allow(clippy::too_many_arguments)]
fn achievement(
  id: &str,
  name: &str,
  description: &str,
  icon: &str,
  kind: AchievementKind,
  metric: AchievementMetric,
  points: u32,
  target: u64,
  requirement: &str,
) -> Achievement {
  Achievement {
    id: id.into(),
    name: name.into(),
    description: description.into(),
    icon: icon.into(),
    kind,
    metric: Some(metric),
    points,
    progress: AchievementProgress { current: 0, target },
    completed: false,
    completed_at: None,
    requirements: vec![requirement.into()],
  }
}

pub fn default_achievements() -> Vec<Achievement> {
  vec![
    achievement("first_stage", "First Steps", "Complete your first learning stage", "🚀",
      AchievementKind::Milestone, AchievementMetric::Stages, 100, 1, "Complete any stage in your roadmap"),
    achievement("week_streak", "Consistent Learner", "Maintain a 7-day learning streak", "🔥",
      AchievementKind::Consistency, AchievementMetric::Streak, 200, 7, "Learn something every day for 7 consecutive days"),
    achievement("skill_master", "Skill Builder", "Master 3 different skills", "🎯",
      AchievementKind::Skill, AchievementMetric::Skills, 300, 3, "Track progress in 3 different skills"),
  ]
}
