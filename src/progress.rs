//! Progress aggregator: folds one `ProgressUpdate` into a `UserProgress` snapshot.
//!
//! Pure and synchronous. The input snapshot is only borrowed; callers persist
//! the returned snapshot themselves (see `service`). Concurrent updates for the
//! same user must be serialized by the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::achievements::update_achievements;
use crate::badges::check_eligibility;
use crate::catalog::Catalog;
use crate::domain::{
  ActivityRecord, Badge, CareerRoadmap, MasteryLevel, ProgressUpdate, RoadmapStage, SkillMastery,
  Streak, UserProgress,
};
use crate::error::{CareerError, Result};
use crate::goals::{self, initial_monthly, initial_weekly};
use crate::levels::{level_for, next_level};
use crate::streak::update_streak;

pub const STAGE_SKILL_BONUS: u8 = 20;
pub const PRACTICE_SKILL_BONUS: u8 = 5;
pub const SKILL_PRACTICE_POINTS: u64 = 25;
pub const RESOURCE_DEFAULT_POINTS: u64 = 50;
pub const DAILY_ACTIVITY_POINTS: u64 = 10;
pub const ACTIVITY_LOG_CAP: usize = 1000;
pub const ASSESSMENT_HISTORY_CAP: usize = 50;

/// Result of applying one update.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressOutcome {
  pub progress: UserProgress,
  pub new_badges: Vec<Badge>,
  pub points_earned: u64,
  pub leveled_up: bool,
}

/// Fresh snapshot for a new user in `domain`.
pub fn initialize_user_progress(domain: &str, catalog: &Catalog, now: DateTime<Utc>) -> UserProgress {
  let current = level_for(&catalog.levels, 0).clone();
  let next = next_level(&catalog.levels, current.level).cloned();
  UserProgress {
    domain: domain.to_string(),
    total_points: 0,
    weekly_goals: initial_weekly(now),
    monthly_goals: initial_monthly(now),
    current_level: current,
    next_level: next,
    badges: Vec::new(),
    achievements: catalog.achievements.clone(),
    streak: Streak::default(),
    completed_stages: Vec::new(),
    skill_masteries: Default::default(),
    assessment_scores: Vec::new(),
    activity_log: Vec::new(),
  }
}

/// Points for finishing a stage: base points scaled by difficulty, rounded.
pub fn stage_points(stage: &RoadmapStage) -> u64 {
  (stage.points as f64 * stage.difficulty.multiplier()).round() as u64
}

/// Raise a skill's progress (capped at 100) and re-derive its level without ever lowering it.
fn bump_skill(progress: &mut UserProgress, skill: &str, amount: u8) {
  let entry = progress
    .skill_masteries
    .entry(skill.to_string())
    .or_insert_with(SkillMastery::default);
  entry.progress = entry.progress.saturating_add(amount).min(100);
  entry.level = entry.level.max(MasteryLevel::for_progress(entry.progress));
  debug!(target: "progress", %skill, progress = entry.progress, level = ?entry.level, "Skill mastery updated");
}

/// Apply `update` at the current wall-clock time.
pub fn apply(
  progress: &UserProgress,
  update: &ProgressUpdate,
  roadmap: &CareerRoadmap,
  catalog: &Catalog,
) -> Result<ProgressOutcome> {
  apply_at(progress, update, roadmap, catalog, Utc::now())
}

/// Apply `update` as if it happened at `now`.
#[instrument(level = "info", skip(progress, update, roadmap, catalog), fields(kind = ?update.kind(), points_before = progress.total_points))]
pub fn apply_at(
  progress: &UserProgress,
  update: &ProgressUpdate,
  roadmap: &CareerRoadmap,
  catalog: &Catalog,
  now: DateTime<Utc>,
) -> Result<ProgressOutcome> {
  let mut next = progress.clone();

  // 1) Activity record (bounded history).
  next.activity_log.push(ActivityRecord { kind: update.kind(), timestamp: now });
  if next.activity_log.len() > ACTIVITY_LOG_CAP {
    let excess = next.activity_log.len() - ACTIVITY_LOG_CAP;
    next.activity_log.drain(..excess);
  }

  // 2) Dispatch.
  let mut points_earned: u64 = 0;
  match update {
    ProgressUpdate::StageCompleted { stage_id } => {
      if !next.has_completed(stage_id) {
        next.completed_stages.push(stage_id.clone());
        match roadmap.stage(stage_id) {
          Some(stage) => {
            points_earned = stage_points(stage);
            for skill in &stage.skills {
              bump_skill(&mut next, skill, STAGE_SKILL_BONUS);
            }
          }
          None => {
            warn!(target: "progress", %stage_id, roadmap = %roadmap.id, "Completed stage not in roadmap; no points awarded");
          }
        }
        next.weekly_goals.current += 1;
        next.monthly_goals.current += 1;
      } else {
        debug!(target: "progress", %stage_id, "Stage already completed; ignoring");
      }
    }
    ProgressUpdate::StageProgress { progress: pct, .. } => {
      if !pct.is_finite() || *pct < 0.0 || *pct > 100.0 {
        return Err(CareerError::ContractViolation(format!("stage progress {} outside 0..=100", pct)));
      }
      points_earned = (pct * 0.1).round() as u64;
    }
    ProgressUpdate::SkillPracticed { skill_name } => {
      points_earned = SKILL_PRACTICE_POINTS;
      bump_skill(&mut next, skill_name, PRACTICE_SKILL_BONUS);
    }
    ProgressUpdate::ResourceCompleted { points, .. } => {
      points_earned = match points {
        Some(p) if *p < 0 => {
          return Err(CareerError::ContractViolation(format!("negative resource points {}", p)));
        }
        Some(p) => *p as u64,
        None => RESOURCE_DEFAULT_POINTS,
      };
    }
    ProgressUpdate::DailyActivity => {
      points_earned = DAILY_ACTIVITY_POINTS;
    }
    ProgressUpdate::AssessmentCompleted { score } => {
      if *score > 100 {
        return Err(CareerError::ContractViolation(format!("assessment score {} above 100", score)));
      }
      next.assessment_scores.push(*score);
      if next.assessment_scores.len() > ASSESSMENT_HISTORY_CAP {
        next.assessment_scores.remove(0);
      }
    }
  }

  // 3) Points and level.
  let previous_level = level_for(&catalog.levels, progress.total_points).level;
  next.total_points = next.total_points.saturating_add(points_earned);
  next.current_level = level_for(&catalog.levels, next.total_points).clone();
  next.next_level = next_level(&catalog.levels, next.current_level.level).cloned();
  let leveled_up = next.current_level.level > previous_level;

  // 4) Streak.
  next.streak = update_streak(&next.streak, now);

  // 5) Badges.
  let new_badges = check_eligibility(&catalog.badges, &next, now);
  next.badges.extend(new_badges.iter().cloned());

  // 6) Achievements.
  next.achievements = update_achievements(&next.achievements, &next, now);

  // 7) Goals. Rolling into a new period starts it at zero, after this event's increment.
  let level = next.current_level.level;
  next.weekly_goals = goals::rollover(&next.weekly_goals, &goals::week_key(now), goals::weekly_target(level));
  next.monthly_goals = goals::rollover(&next.monthly_goals, &goals::month_key(now), goals::monthly_target(level));

  info!(
    target: "progress",
    points_earned,
    total_points = next.total_points,
    level = next.current_level.level,
    leveled_up,
    new_badges = new_badges.len(),
    streak = next.streak.current_streak,
    "Progress update applied"
  );

  Ok(ProgressOutcome { progress: next, new_badges, points_earned, leveled_up })
}
