//! Tests for [`career_progress::badges`] and [`career_progress::achievements`]

mod common;

use career_progress::achievements::update_achievements;
use career_progress::badges::{check_eligibility, requirement_met};
use career_progress::catalog::Catalog;
use career_progress::domain::{BadgeRequirement, MasteryLevel, SkillMastery};
use common::{at, fresh};

/// A second check on the updated snapshot returns nothing.
#[test]
fn test_eligibility_is_idempotent() {
    let catalog = Catalog::default();
    let now = at(2026, 5, 1, 10);
    let mut p = fresh(now);
    p.completed_stages = vec!["a".into()];

    let first = check_eligibility(&catalog.badges, &p, now);
    assert_eq!(first.iter().map(|b| b.id.as_str()).collect::<Vec<_>>(), vec!["first_steps"]);
    assert_eq!(first[0].unlocked_at, now);

    p.badges.extend(first);
    assert!(check_eligibility(&catalog.badges, &p, now).is_empty());
}

#[test]
fn test_multiple_thresholds_at_once() {
    let catalog = Catalog::default();
    let now = at(2026, 5, 1, 10);
    let mut p = fresh(now);
    p.completed_stages = (0..5).map(|i| format!("s{}", i)).collect();
    p.total_points = 10_000;

    let ids: Vec<_> = check_eligibility(&catalog.badges, &p, now).into_iter().map(|b| b.id).collect();
    assert!(ids.contains(&"first_steps".to_string()));
    assert!(ids.contains(&"momentum_builder".to_string()));
    assert!(ids.contains(&"point_collector".to_string()));
    assert!(!ids.contains(&"progress_pioneer".to_string()));
}

#[test]
fn test_skill_mastery_with_level_detail() {
    let mut p = fresh(at(2026, 5, 1, 10));
    let req = BadgeRequirement::SkillMastery { value: 2, details: Some(MasteryLevel::Advanced) };
    p.skill_masteries.insert("Rust".into(), SkillMastery { level: MasteryLevel::Expert, progress: 90 });
    p.skill_masteries.insert("SQL".into(), SkillMastery { level: MasteryLevel::Intermediate, progress: 45 });
    assert!(!requirement_met(&req, &p));

    p.skill_masteries.insert("Go".into(), SkillMastery { level: MasteryLevel::Advanced, progress: 60 });
    assert!(requirement_met(&req, &p));
}

#[test]
fn test_skill_count_without_detail() {
    let mut p = fresh(at(2026, 5, 1, 10));
    let req = BadgeRequirement::SkillMastery { value: 2, details: None };
    p.skill_masteries.insert("Rust".into(), SkillMastery::default());
    assert!(!requirement_met(&req, &p));
    p.skill_masteries.insert("SQL".into(), SkillMastery::default());
    assert!(requirement_met(&req, &p));
}

#[test]
fn test_assessment_score_counts_qualifying_scores() {
    let mut p = fresh(at(2026, 5, 1, 10));
    let req = BadgeRequirement::AssessmentScore { value: 80, details: Some(3) };
    p.assessment_scores = vec![85, 60, 92];
    assert!(!requirement_met(&req, &p));
    p.assessment_scores.push(80);
    assert!(requirement_met(&req, &p));

    let perfect = BadgeRequirement::AssessmentScore { value: 100, details: None };
    assert!(!requirement_met(&perfect, &p));
    p.assessment_scores.push(100);
    assert!(requirement_met(&perfect, &p));
}

#[test]
fn test_requirement_json_shape() {
    let req: BadgeRequirement =
        serde_json::from_str(r#"{"type":"skill_mastery","value":3,"details":"intermediate"}"#).unwrap();
    assert_eq!(req, BadgeRequirement::SkillMastery { value: 3, details: Some(MasteryLevel::Intermediate) });
}

/// Completion is stamped once and never reverts.
#[test]
fn test_achievements_complete_once() {
    let t1 = at(2026, 5, 1, 10);
    let t2 = at(2026, 5, 2, 10);
    let mut p = fresh(t1);
    p.completed_stages.push("basics".into());

    let after = update_achievements(&p.achievements, &p, t1);
    let first = after.iter().find(|a| a.id == "first_stage").unwrap();
    assert!(first.completed);
    assert_eq!(first.completed_at, Some(t1));
    assert_eq!(first.progress.current, 1);

    p.completed_stages.clear();
    let again = update_achievements(&after, &p, t2);
    let first = again.iter().find(|a| a.id == "first_stage").unwrap();
    assert!(first.completed);
    assert_eq!(first.completed_at, Some(t1));
    assert_eq!(first.progress.current, 0);
}
