//! Dashboard views derived from a snapshot: statistics, motivation and next steps.
//!
//! Read-only; nothing here mutates `UserProgress`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Timelike, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::challenges::daily_challenges;
use crate::domain::{CareerRoadmap, UserProgress};
use crate::util::slugify;

/// Assumed learning time per completed stage, in minutes.
pub const MINUTES_PER_STAGE: u64 = 30;
pub const MAX_MOTIVATIONAL_ITEMS: usize = 3;
pub const PRODUCTIVE_HOURS_SHOWN: usize = 5;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourCount {
  pub hour: u32,
  pub count: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkillShare {
  pub skill: String,
  pub percentage: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
  /// Minutes.
  pub total_time_spent: u64,
  pub completion_rate: f64,
  pub average_session_time: f64,
  pub weekly_goal_progress: f64,
  pub monthly_goal_progress: f64,
  pub last_activity_date: DateTime<Utc>,
  pub active_days: usize,
  pub productive_hours: Vec<HourCount>,
  pub skill_distribution: Vec<SkillShare>,
}

fn percent(part: f64, whole: f64) -> f64 {
  if whole > 0.0 { part / whole * 100.0 } else { 0.0 }
}

pub fn progress_stats(progress: &UserProgress, roadmap: &CareerRoadmap, now: DateTime<Utc>) -> ProgressStats {
  let completed = progress.completed_stages.len() as u64;
  let total_time_spent = completed * MINUTES_PER_STAGE;
  let activities = &progress.activity_log;

  let active_days = activities
    .iter()
    .map(|a| a.timestamp.date_naive())
    .collect::<BTreeSet<_>>()
    .len();

  let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
  for a in activities {
    *by_hour.entry(a.timestamp.hour()).or_default() += 1;
  }
  let mut productive_hours: Vec<HourCount> =
    by_hour.into_iter().map(|(hour, count)| HourCount { hour, count }).collect();
  // Stable sort keeps earlier hours first on ties.
  productive_hours.sort_by(|a, b| b.count.cmp(&a.count));
  productive_hours.truncate(PRODUCTIVE_HOURS_SHOWN);

  let skill_total: f64 = progress.skill_masteries.values().map(|m| f64::from(m.progress)).sum();
  let mut skill_distribution: Vec<SkillShare> = progress
    .skill_masteries
    .iter()
    .map(|(skill, m)| SkillShare { skill: skill.clone(), percentage: percent(f64::from(m.progress), skill_total) })
    .collect();
  skill_distribution.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

  ProgressStats {
    total_time_spent,
    completion_rate: percent(completed as f64, f64::from(roadmap.stage_count())),
    average_session_time: total_time_spent as f64 / activities.len().max(1) as f64,
    weekly_goal_progress: percent(f64::from(progress.weekly_goals.current), f64::from(progress.weekly_goals.target)),
    monthly_goal_progress: percent(f64::from(progress.monthly_goals.current), f64::from(progress.monthly_goals.target)),
    last_activity_date: activities.last().map(|a| a.timestamp).unwrap_or(now),
    active_days,
    productive_hours,
    skill_distribution,
  }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MotivationKind {
  Streak,
  Encouragement,
  Milestone,
  Achievement,
  Challenge,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MotivationalContent {
  pub message: String,
  #[serde(rename = "type")]
  pub kind: MotivationKind,
  pub emoji: String,
  pub action_text: String,
  pub action_url: String,
}

fn content(kind: MotivationKind, emoji: &str, message: String, action_text: &str, action_url: &str) -> MotivationalContent {
  MotivationalContent {
    message,
    kind,
    emoji: emoji.into(),
    action_text: action_text.into(),
    action_url: action_url.into(),
  }
}

/// Most relevant first, at most `MAX_MOTIVATIONAL_ITEMS`.
pub fn motivational_content(
  progress: &UserProgress,
  stats: &ProgressStats,
  now: DateTime<Utc>,
) -> Vec<MotivationalContent> {
  use MotivationKind::*;
  let mut out = Vec::new();
  let streak = progress.streak.current_streak;

  if streak >= 7 {
    out.push(content(Streak, "🔥", format!("Amazing! You're on a {}-day streak!", streak), "Keep it going!", "/dashboard"));
  } else if streak == 0 {
    out.push(content(
      Encouragement,
      "🌱",
      "Start a new learning streak today! Every expert was once a beginner.".into(),
      "Begin learning",
      "/roadmap",
    ));
  }

  if progress.current_level.level >= 5 {
    out.push(content(
      Milestone,
      "👑",
      format!("Congratulations on reaching {}! You're in the top tier of learners.", progress.current_level.title),
      "See your achievements",
      "/achievements",
    ));
  }

  if stats.weekly_goal_progress >= 100.0 {
    out.push(content(
      Achievement,
      "🎯",
      "You've completed this week's learning goal! Time to set new challenges.".into(),
      "Set new goals",
      "/goals",
    ));
  } else if stats.weekly_goal_progress >= 80.0 {
    out.push(content(
      Encouragement,
      "⚡",
      "Almost there! You're just a few steps away from your weekly goal.".into(),
      "Complete goal",
      "/roadmap",
    ));
  }

  let waiting = daily_challenges(progress, now.date_naive()).iter().filter(|c| !c.completed).count();
  if waiting > 0 {
    out.push(content(
      Challenge,
      "🎮",
      format!("You have {} daily challenges waiting for you!", waiting),
      "View challenges",
      "/challenges",
    ));
  }

  if stats.completion_rate < 10.0 {
    out.push(content(
      Encouragement,
      "🚀",
      "Every journey begins with a single step. You've got this!".into(),
      "Continue learning",
      "/roadmap",
    ));
  } else if stats.completion_rate >= 50.0 {
    out.push(content(
      Milestone,
      "🌟",
      "Halfway there! Your dedication is paying off beautifully.".into(),
      "See progress",
      "/progress",
    ));
  }

  out.truncate(MAX_MOTIVATIONAL_ITEMS);
  out
}

/// One random line, tiered by streak (7+ days), then level (3+), then general.
pub fn motivational_message<R: Rng + ?Sized>(progress: &UserProgress, rng: &mut R) -> String {
  let streak = progress.streak.current_streak;
  let title = &progress.current_level.title;

  let pool: Vec<String> = if streak >= 7 {
    vec![
      format!("🔥 Amazing! You're on a {}-day streak! Keep the momentum going!", streak),
      format!("💪 Consistency is key! Your {}-day streak shows your dedication!", streak),
      format!("🌟 {} days of learning! You're building an incredible habit!", streak),
    ]
  } else if progress.current_level.level >= 3 {
    vec![
      format!("🚀 Welcome to {}! You're making fantastic progress!", title),
      format!("👑 As a {}, you're unlocking new opportunities!", title),
      format!("⚡ Your journey as a {} is just getting started!", title),
    ]
  } else {
    vec![
      "🎯 Every step forward is progress! Keep up the great work!".into(),
      "💡 Learning is a journey, not a destination. You're doing amazingly!".into(),
      "🌱 Growth happens one step at a time. You're on the right path!".into(),
      "🏆 Your dedication to learning is inspiring! Keep pushing forward!".into(),
    ]
  };

  pool.choose(rng).cloned().unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
  Stage,
  Skill,
  Challenge,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
  Medium,
  High,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NextAction {
  #[serde(rename = "type")]
  pub kind: ActionKind,
  pub title: String,
  pub description: String,
  pub estimated_time: String,
  pub points: u32,
  pub priority: Priority,
  pub action_url: String,
}

const NEXT_STAGES_SHOWN: usize = 2;
const WEAK_SKILL_THRESHOLD: u8 = 50;
const SKILL_PRACTICE_REWARD: u32 = 50;

/// Recommendations in priority order: unlocked stages, weakest skill, today's challenge.
pub fn next_actions(
  progress: &UserProgress,
  roadmap: &CareerRoadmap,
  now: DateTime<Utc>,
  limit: usize,
) -> Vec<NextAction> {
  let mut out = Vec::new();

  let mut open: Vec<_> = roadmap
    .stages
    .iter()
    .filter(|s| !progress.has_completed(&s.id))
    .filter(|s| s.prerequisites.iter().all(|p| progress.has_completed(p)))
    .collect();
  open.sort_by_key(|s| s.order);
  for stage in open.into_iter().take(NEXT_STAGES_SHOWN) {
    out.push(NextAction {
      kind: ActionKind::Stage,
      title: format!("Continue: {}", stage.title),
      description: stage.description.clone(),
      estimated_time: stage.estimated_time.clone(),
      points: stage.points,
      priority: Priority::High,
      action_url: format!("/roadmap/stage/{}", stage.id),
    });
  }

  let weakest = progress
    .skill_masteries
    .iter()
    .filter(|(_, m)| m.progress < WEAK_SKILL_THRESHOLD)
    .min_by_key(|(_, m)| m.progress);
  if let Some((skill, _)) = weakest {
    out.push(NextAction {
      kind: ActionKind::Skill,
      title: format!("Practice: {}", skill),
      description: format!("Improve your {} skills with targeted practice", skill),
      estimated_time: "20-30 minutes".into(),
      points: SKILL_PRACTICE_REWARD,
      priority: Priority::Medium,
      action_url: format!("/practice/{}", slugify(skill)),
    });
  }

  if let Some(challenge) = daily_challenges(progress, now.date_naive()).into_iter().find(|c| !c.completed) {
    out.push(NextAction {
      kind: ActionKind::Challenge,
      title: challenge.title,
      description: challenge.description,
      estimated_time: challenge.time_estimate,
      points: challenge.points,
      priority: Priority::Medium,
      action_url: format!("/challenges/{}", challenge.id),
    });
  }

  out.truncate(limit);
  out
}
