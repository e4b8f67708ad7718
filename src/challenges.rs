//! Daily challenges and the weekly quest offered to a learner.
//!
//! Both are derived from the snapshot and the date alone, so the same user sees
//! the same set all day (ids are keyed by date).

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{BadgeCategory, BadgeRequirement, BadgeTemplate, Rarity, UserProgress};

/// Level from which the hard daily challenge is offered.
pub const HARD_CHALLENGE_LEVEL: u32 = 3;
pub const MENTOR_OBJECTIVE_LEVEL: u32 = 4;
pub const QUEST_BADGE_LEVEL: u32 = 5;
pub const QUEST_UNLOCK_LEVEL: u32 = 6;
pub const QUEST_REWARD_POINTS: u32 = 200;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
  SkillPractice,
  Learning,
  Project,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeDifficulty {
  Easy,
  Medium,
  Hard,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
  pub id: String,
  pub title: String,
  pub description: String,
  #[serde(rename = "type")]
  pub kind: ChallengeKind,
  pub difficulty: ChallengeDifficulty,
  pub points: u32,
  pub time_estimate: String,
  pub category: String,
  pub expires_at: NaiveDate,
  pub completed: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestObjective {
  pub id: String,
  pub description: String,
  pub completed: bool,
  pub points: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestReward {
  pub points: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub badge: Option<BadgeTemplate>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub unlocks: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyQuest {
  pub id: String,
  pub title: String,
  pub description: String,
  pub objectives: Vec<QuestObjective>,
  pub total_points: u32,
  pub progress: u32,
  pub starts_at: NaiveDate,
  pub ends_at: NaiveDate,
  pub completed: bool,
  pub reward: QuestReward,
}

#[allow(clippy::too_many_arguments)]
fn daily(
  today: NaiveDate,
  tag: &str,
  title: &str,
  description: &str,
  kind: ChallengeKind,
  difficulty: ChallengeDifficulty,
  points: u32,
  time_estimate: &str,
  category: &str,
) -> DailyChallenge {
  DailyChallenge {
    id: format!("daily_{}_{}", tag, today.format("%Y-%m-%d")),
    title: title.into(),
    description: description.into(),
    kind,
    difficulty,
    points,
    time_estimate: time_estimate.into(),
    category: category.into(),
    expires_at: today.checked_add_days(Days::new(1)).unwrap_or(today),
    completed: false,
  }
}

/// Easy and medium always; hard once the learner reaches `HARD_CHALLENGE_LEVEL`.
pub fn daily_challenges(progress: &UserProgress, today: NaiveDate) -> Vec<DailyChallenge> {
  let mut out = vec![
    daily(
      today,
      "easy",
      "Quick Skill Review",
      "Spend 15 minutes reviewing a skill you've learned recently",
      ChallengeKind::SkillPractice,
      ChallengeDifficulty::Easy,
      25,
      "15 minutes",
      "practice",
    ),
    daily(
      today,
      "medium",
      "Learning Session",
      "Complete a tutorial or watch an educational video in your domain",
      ChallengeKind::Learning,
      ChallengeDifficulty::Medium,
      50,
      "30 minutes",
      "education",
    ),
  ];
  if progress.current_level.level >= HARD_CHALLENGE_LEVEL {
    out.push(daily(
      today,
      "hard",
      "Project Challenge",
      "Work on a personal project or complete a coding challenge",
      ChallengeKind::Project,
      ChallengeDifficulty::Hard,
      100,
      "1 hour",
      "application",
    ));
  }
  out
}

fn objective(id: &str, description: &str, points: u32) -> QuestObjective {
  QuestObjective { id: id.into(), description: description.into(), completed: false, points }
}

fn weekly_champion() -> BadgeTemplate {
  BadgeTemplate {
    id: "weekly_champion".into(),
    name: "Weekly Champion".into(),
    description: "Completed a weekly quest".into(),
    icon: "🏅".into(),
    category: BadgeCategory::Achievement,
    rarity: Rarity::Rare,
    points: 100,
    requirements: BadgeRequirement::CompleteStages { value: 1 },
  }
}

/// Quest for the ISO week containing `now` (Monday to next Monday).
pub fn weekly_quest(progress: &UserProgress, now: DateTime<Utc>) -> WeeklyQuest {
  let level = progress.current_level.level;
  let today = now.date_naive();
  let starts_at = today
    .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_monday())))
    .unwrap_or(today);
  let ends_at = starts_at.checked_add_days(Days::new(7)).unwrap_or(starts_at);

  let mut objectives = vec![
    objective("complete_stages", "Complete 3 roadmap stages", 150),
    objective("daily_streak", "Maintain daily learning streak", 100),
    objective("skill_practice", "Practice 2 different skills", 75),
  ];
  if level >= MENTOR_OBJECTIVE_LEVEL {
    objectives.push(objective("mentor_interaction", "Engage with community or mentorship", 125));
  }
  let total_points: u32 = objectives.iter().map(|o| o.points).sum();

  let reward = QuestReward {
    points: QUEST_REWARD_POINTS,
    badge: (level >= QUEST_BADGE_LEVEL).then(weekly_champion),
    unlocks: if level >= QUEST_UNLOCK_LEVEL {
      vec!["Advanced Analytics Dashboard".to_string()]
    } else {
      Vec::new()
    },
  };

  WeeklyQuest {
    id: format!("weekly_{}", starts_at.format("%Y-%m-%d")),
    title: "Weekly Learning Quest".into(),
    description: "Complete your weekly learning objectives to earn bonus rewards".into(),
    objectives,
    total_points,
    progress: 0,
    starts_at,
    ends_at,
    completed: false,
    reward,
  }
}
