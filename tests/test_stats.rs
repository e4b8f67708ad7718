//! Tests for [`career_progress::stats`] and [`career_progress::challenges`]

mod common;

use career_progress::catalog::Catalog;
use career_progress::challenges::{daily_challenges, weekly_quest, ChallengeDifficulty};
use career_progress::domain::{ActivityKind, ActivityRecord, MasteryLevel, SkillMastery};
use career_progress::levels::level_for;
use career_progress::stats::{motivational_content, motivational_message, next_actions, progress_stats, ActionKind, MotivationKind};
use chrono::NaiveDate;
use common::{at, fresh, roadmap};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn record(day: u32, hour: u32) -> ActivityRecord {
    ActivityRecord { kind: ActivityKind::DailyActivity, timestamp: at(2026, 10, day, hour) }
}

#[test]
fn test_progress_stats() {
    let now = at(2026, 10, 14, 9);
    let mut p = fresh(now);
    p.completed_stages = vec!["basics".into(), "stats".into()];
    p.activity_log = vec![record(12, 9), record(12, 9), record(13, 20), record(14, 9)];
    p.weekly_goals.current = 2;
    p.skill_masteries.insert("Python".into(), SkillMastery { level: MasteryLevel::Beginner, progress: 30 });
    p.skill_masteries.insert("SQL".into(), SkillMastery { level: MasteryLevel::Beginner, progress: 10 });

    let s = progress_stats(&p, &roadmap(), now);
    assert_eq!(s.total_time_spent, 60);
    assert_eq!(s.completion_rate, 50.0);
    assert_eq!(s.average_session_time, 15.0);
    assert_eq!(s.weekly_goal_progress, 40.0);
    assert_eq!(s.active_days, 3);
    assert_eq!(s.last_activity_date, at(2026, 10, 14, 9));
    assert_eq!((s.productive_hours[0].hour, s.productive_hours[0].count), (9, 3));
    assert_eq!(s.skill_distribution[0].skill, "Python");
    assert_eq!(s.skill_distribution[0].percentage, 75.0);
}

#[test]
fn test_stats_on_empty_roadmap_do_not_divide_by_zero() {
    let now = at(2026, 10, 14, 9);
    let s = progress_stats(&fresh(now), &Default::default(), now);
    assert_eq!(s.completion_rate, 0.0);
    assert_eq!(s.average_session_time, 0.0);
    assert_eq!(s.last_activity_date, now);
    assert!(s.skill_distribution.is_empty());
}

#[test]
fn test_motivational_content_capped() {
    let now = at(2026, 10, 14, 9);
    let p = fresh(now);
    let stats = progress_stats(&p, &roadmap(), now);
    let items = motivational_content(&p, &stats, now);
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].kind, MotivationKind::Encouragement);
    assert_eq!(items[1].kind, MotivationKind::Challenge);
    assert!(items[1].message.contains("2 daily challenges"));
}

#[test]
fn test_motivational_message_tiers() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut p = fresh(at(2026, 10, 14, 9));
    p.streak.current_streak = 8;
    assert!(motivational_message(&p, &mut rng).contains("8"));

    p.streak.current_streak = 1;
    p.current_level = level_for(&Catalog::default().levels, 2_000).clone();
    assert!(motivational_message(&p, &mut rng).contains("Knowledge Warrior"));
}

#[test]
fn test_next_actions_order_and_limit() {
    let now = at(2026, 10, 14, 9);
    let mut p = fresh(now);
    p.completed_stages = vec!["basics".into()];
    p.skill_masteries.insert("Machine Learning".into(), SkillMastery { level: MasteryLevel::Beginner, progress: 10 });
    p.skill_masteries.insert("Python".into(), SkillMastery { level: MasteryLevel::Beginner, progress: 20 });

    let actions = next_actions(&p, &roadmap(), now, 5);
    let kinds: Vec<_> = actions.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ActionKind::Stage, ActionKind::Skill, ActionKind::Challenge]);
    // "ml" still waits on "stats".
    assert_eq!(actions[0].action_url, "/roadmap/stage/stats");
    assert_eq!(actions[1].action_url, "/practice/machine-learning");
    assert_eq!(actions[2].action_url, "/challenges/daily_easy_2026-10-14");

    assert_eq!(next_actions(&p, &roadmap(), now, 1).len(), 1);
}

#[test]
fn test_daily_challenges_by_level() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let mut p = fresh(at(2026, 10, 14, 9));
    let easy = daily_challenges(&p, today);
    assert_eq!(easy.len(), 2);
    assert_eq!(easy[0].id, "daily_easy_2026-10-14");
    assert_eq!(easy[0].expires_at, NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());

    p.current_level = level_for(&Catalog::default().levels, 2_000).clone();
    let all = daily_challenges(&p, today);
    assert_eq!(all.len(), 3);
    assert_eq!(all[2].difficulty, ChallengeDifficulty::Hard);
    assert_eq!(all[2].points, 100);
}

#[test]
fn test_weekly_quest_by_level() {
    let now = at(2026, 10, 14, 9);
    let levels = Catalog::default().levels;
    let mut p = fresh(now);

    let q = weekly_quest(&p, now);
    assert_eq!(q.id, "weekly_2026-10-12");
    assert_eq!(q.objectives.len(), 3);
    assert_eq!(q.total_points, 325);
    assert!(q.reward.badge.is_none());
    assert!(q.reward.unlocks.is_empty());

    p.current_level = level_for(&levels, 20_000).clone();
    let q = weekly_quest(&p, now);
    assert_eq!(q.objectives.len(), 4);
    assert_eq!(q.total_points, 450);
    assert_eq!(q.reward.badge.as_ref().map(|b| b.id.as_str()), Some("weekly_champion"));
    assert_eq!(q.reward.unlocks, vec!["Advanced Analytics Dashboard".to_string()]);
}
