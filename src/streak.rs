//! Consecutive-day streak tracking. Days are UTC calendar days.

use chrono::{DateTime, Utc};

use crate::domain::Streak;

/// Fold one activity into the streak.
///
/// - same day as the last activity: unchanged (a zero streak still counts that day once)
/// - exactly one day later: +1
/// - first activity or a gap of two or more days: back to 1
/// - earlier than the last activity (backfill, clock skew): unchanged
pub fn update_streak(streak: &Streak, activity: DateTime<Utc>) -> Streak {
  let today = activity.date_naive();

  let Some(last) = streak.last_activity_date else {
    return Streak {
      current_streak: 1,
      longest_streak: streak.longest_streak.max(1),
      last_activity_date: Some(activity),
    };
  };

  let delta = (today - last.date_naive()).num_days();
  match delta {
    d if d < 0 => streak.clone(),
    0 if streak.current_streak > 0 => streak.clone(),
    0 => Streak {
      current_streak: 1,
      longest_streak: streak.longest_streak.max(1),
      last_activity_date: streak.last_activity_date,
    },
    1 => {
      let current = streak.current_streak + 1;
      Streak {
        current_streak: current,
        longest_streak: streak.longest_streak.max(current),
        last_activity_date: Some(activity),
      }
    }
    _ => Streak {
      current_streak: 1,
      longest_streak: streak.longest_streak.max(1),
      last_activity_date: Some(activity),
    },
  }
}
