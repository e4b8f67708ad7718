//! Tests for [`career_progress::streak`]

mod common;

use career_progress::domain::Streak;
use career_progress::streak::update_streak;
use common::at;

#[test]
fn test_first_activity_starts_streak() {
    let s = update_streak(&Streak::default(), at(2026, 3, 10, 9));
    assert_eq!(s.current_streak, 1);
    assert_eq!(s.longest_streak, 1);
    assert_eq!(s.last_activity_date, Some(at(2026, 3, 10, 9)));
}

/// 5/9 with activity yesterday, new activity today: 6/9.
#[test]
fn test_consecutive_day_increments() {
    let s = Streak { current_streak: 5, longest_streak: 9, last_activity_date: Some(at(2026, 3, 9, 22)) };
    let next = update_streak(&s, at(2026, 3, 10, 7));
    assert_eq!(next.current_streak, 6);
    assert_eq!(next.longest_streak, 9);
}

#[test]
fn test_same_day_is_idempotent() {
    let first = update_streak(&Streak::default(), at(2026, 3, 10, 9));
    let second = update_streak(&first, at(2026, 3, 10, 9));
    let third = update_streak(&second, at(2026, 3, 10, 23));
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn test_gap_resets_to_one() {
    let s = Streak { current_streak: 12, longest_streak: 12, last_activity_date: Some(at(2026, 3, 1, 9)) };
    let next = update_streak(&s, at(2026, 3, 3, 9));
    assert_eq!(next.current_streak, 1);
    assert_eq!(next.longest_streak, 12, "longest never decreases");
}

#[test]
fn test_longest_tracks_new_record() {
    let s = Streak { current_streak: 9, longest_streak: 9, last_activity_date: Some(at(2026, 3, 9, 9)) };
    let next = update_streak(&s, at(2026, 3, 10, 9));
    assert_eq!((next.current_streak, next.longest_streak), (10, 10));
}

#[test]
fn test_backfill_is_ignored() {
    let s = Streak { current_streak: 3, longest_streak: 4, last_activity_date: Some(at(2026, 3, 10, 9)) };
    assert_eq!(update_streak(&s, at(2026, 3, 8, 9)), s);
}

/// Month boundaries are plain consecutive days.
#[test]
fn test_crosses_month_boundary() {
    let s = Streak { current_streak: 2, longest_streak: 2, last_activity_date: Some(at(2026, 2, 28, 20)) };
    assert_eq!(update_streak(&s, at(2026, 3, 1, 1)).current_streak, 3);
}
