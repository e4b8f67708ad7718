//! Level/points table lookups.
//!
//! The table is ordered by `min_points` and covers `[0, ∞)` without gaps, so
//! `level_for` is total once `validate_levels` has accepted the table.

use crate::domain::UserLevel;
use crate::error::{CareerError, Result};

/// Level whose band contains `points`, scanning from the highest threshold down.
/// Panics on an empty table; `validate_levels` rejects those.
pub fn level_for(levels: &[UserLevel], points: u64) -> &UserLevel {
  levels
    .iter()
    .rev()
    .find(|l| points >= l.min_points)
    .unwrap_or(&levels[0])
}

/// Entry with `level + 1`, or `None` at the ceiling.
pub fn next_level(levels: &[UserLevel], level: u32) -> Option<&UserLevel> {
  levels.iter().find(|l| l.level == level + 1)
}

pub fn points_to_next_level(levels: &[UserLevel], points: u64) -> u64 {
  let current = level_for(levels, points);
  next_level(levels, current.level)
    .map(|next| next.min_points.saturating_sub(points))
    .unwrap_or(0)
}

/// How far through the current band `points` is, 0..=100. The top level reports 100.
pub fn level_progress_percent(levels: &[UserLevel], points: u64) -> u8 {
  let current = level_for(levels, points);
  match next_level(levels, current.level) {
    Some(next) => {
      let span = next.min_points - current.min_points;
      let into = points - current.min_points;
      ((into * 100) / span.max(1)).min(100) as u8
    }
    None => 100,
  }
}

/// Enforces: non-empty, starts at 0, contiguous bands, increasing level numbers,
/// and only the last entry open-ended.
pub fn validate_levels(levels: &[UserLevel]) -> Result<()> {
  let first = levels
    .first()
    .ok_or_else(|| CareerError::ContractViolation("level table is empty".into()))?;
  if first.min_points != 0 {
    return Err(CareerError::ContractViolation(format!(
      "lowest level must start at 0 points, found {}",
      first.min_points
    )));
  }

  for pair in levels.windows(2) {
    let (prev, next) = (&pair[0], &pair[1]);
    let max = prev.max_points.ok_or_else(|| {
      CareerError::ContractViolation(format!("level {} is open-ended but not last", prev.level))
    })?;
    if max < prev.min_points {
      return Err(CareerError::ContractViolation(format!("level {} has max below min", prev.level)));
    }
    if next.level != prev.level + 1 {
      return Err(CareerError::ContractViolation(format!(
        "level numbers must increase by one ({} -> {})",
        prev.level, next.level
      )));
    }
    if next.min_points != max + 1 {
      return Err(CareerError::ContractViolation(format!(
        "levels {} and {} leave a gap or overlap ({} -> {})",
        prev.level, next.level, max, next.min_points
      )));
    }
  }

  if let Some(last) = levels.last() {
    if last.max_points.is_some() {
      return Err(CareerError::ContractViolation(format!(
        "top level {} must be open-ended",
        last.level
      )));
    }
  }
  Ok(())
}
