//! Weekly/monthly goal periods and their rollover.

use chrono::{DateTime, Datelike, Utc};

use crate::domain::GoalPeriod;

pub const WEEKLY_CAP: u32 = 10;
pub const MONTHLY_CAP: u32 = 40;
/// Targets for a brand-new learner, before the first rollover applies the level formula.
pub const INITIAL_WEEKLY_TARGET: u32 = 5;
pub const INITIAL_MONTHLY_TARGET: u32 = 20;

/// ISO week key, e.g. "2026-W42".
pub fn week_key(now: DateTime<Utc>) -> String {
  let iso = now.iso_week();
  format!("{}-W{:02}", iso.year(), iso.week())
}

/// Calendar month key, e.g. "2026-10".
pub fn month_key(now: DateTime<Utc>) -> String {
  format!("{}-{:02}", now.year(), now.month())
}

/// Stages per week: grows with level, capped.
pub fn weekly_target(level: u32) -> u32 {
  3u32.saturating_add(level).min(WEEKLY_CAP)
}

/// Stages per month: grows with level, capped.
pub fn monthly_target(level: u32) -> u32 {
  10u32.saturating_add(level.saturating_mul(3)).min(MONTHLY_CAP)
}

/// Reset the goal when its period no longer matches; otherwise return it as is.
pub fn rollover(goal: &GoalPeriod, period_key: &str, target: u32) -> GoalPeriod {
  if goal.period_key == period_key {
    return goal.clone();
  }
  GoalPeriod { target, current: 0, period_key: period_key.to_string() }
}

pub fn initial_weekly(now: DateTime<Utc>) -> GoalPeriod {
  GoalPeriod { target: INITIAL_WEEKLY_TARGET, current: 0, period_key: week_key(now) }
}

pub fn initial_monthly(now: DateTime<Utc>) -> GoalPeriod {
  GoalPeriod { target: INITIAL_MONTHLY_TARGET, current: 0, period_key: month_key(now) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn iso_week_key_crosses_year_boundary() {
    // 2027-01-01 is a Friday, still ISO week 53 of 2026.
    let d = Utc.with_ymd_and_hms(2027, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(week_key(d), "2026-W53");
    assert_eq!(month_key(d), "2027-01");
  }
}
