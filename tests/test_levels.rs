//! Tests for [`career_progress::levels`] and catalog validation.

use career_progress::catalog::{default_levels, Catalog};
use career_progress::domain::UserLevel;
use career_progress::error::CareerError;
use career_progress::levels::{level_for, level_progress_percent, next_level, points_to_next_level, validate_levels};

fn band_contains(l: &UserLevel, points: u64) -> bool {
    points >= l.min_points && l.max_points.map_or(true, |max| points <= max)
}

/// Every point total maps to exactly one level whose band contains it.
#[test]
fn test_level_for_is_total_and_unique() {
    let levels = default_levels();
    let samples = [0u64, 1, 499, 500, 501, 1_499, 1_500, 7_499, 7_500, 199_999, 200_000, 10_000_000, u64::MAX];
    for p in samples {
        let found = level_for(&levels, p);
        assert!(band_contains(found, p), "{} not in band of level {}", p, found.level);
        let matching = levels.iter().filter(|l| band_contains(l, p)).count();
        assert_eq!(matching, 1, "points {} matched {} levels", p, matching);
    }
}

#[test]
fn test_boundaries() {
    let levels = default_levels();
    assert_eq!(level_for(&levels, 499).level, 1);
    assert_eq!(level_for(&levels, 500).level, 2);
    assert_eq!(level_for(&levels, 200_000).title, "Visionary Leader");
}

#[test]
fn test_next_level_and_ceiling() {
    let levels = default_levels();
    assert_eq!(next_level(&levels, 1).map(|l| l.level), Some(2));
    assert!(next_level(&levels, 10).is_none());
}

/// Zero only at the ceiling, positive and decreasing within a band otherwise.
#[test]
fn test_points_to_next_level() {
    let levels = default_levels();
    assert_eq!(points_to_next_level(&levels, 0), 500);
    assert_eq!(points_to_next_level(&levels, 450), 50);
    assert_eq!(points_to_next_level(&levels, 499), 1);
    assert_eq!(points_to_next_level(&levels, 250_000), 0);

    let mut prev = u64::MAX;
    for p in (1_500..3_500).step_by(97) {
        let remaining = points_to_next_level(&levels, p);
        assert!(remaining > 0);
        assert!(remaining < prev, "not decreasing at {}", p);
        prev = remaining;
    }
}

#[test]
fn test_level_progress_percent() {
    let levels = default_levels();
    assert_eq!(level_progress_percent(&levels, 0), 0);
    assert_eq!(level_progress_percent(&levels, 250), 50);
    assert_eq!(level_progress_percent(&levels, 300_000), 100);
}

#[test]
fn test_default_table_validates() {
    assert!(validate_levels(&default_levels()).is_ok());
    assert!(Catalog::default().validate().is_ok());
}

#[test]
fn test_gap_is_rejected() {
    let mut levels = default_levels();
    levels[1].min_points = 600;
    assert!(matches!(validate_levels(&levels), Err(CareerError::ContractViolation(_))));
}

#[test]
fn test_overlap_is_rejected() {
    let mut levels = default_levels();
    levels[2].min_points = 1_400;
    assert!(validate_levels(&levels).is_err());
}

#[test]
fn test_closed_top_level_is_rejected() {
    let mut levels = default_levels();
    levels.last_mut().unwrap().max_points = Some(1_000_000);
    assert!(validate_levels(&levels).is_err());
}

#[test]
fn test_empty_and_nonzero_start_rejected() {
    assert!(validate_levels(&[]).is_err());
    let mut levels = default_levels();
    levels[0].min_points = 10;
    assert!(validate_levels(&levels).is_err());
}

#[test]
fn test_duplicate_badge_ids_rejected() {
    let mut catalog = Catalog::default();
    let dup = catalog.badges[0].clone();
    catalog.badges.push(dup);
    assert!(matches!(catalog.validate(), Err(CareerError::ContractViolation(_))));
}

#[test]
fn test_zero_achievement_target_rejected() {
    let mut catalog = Catalog::default();
    catalog.achievements[0].progress.target = 0;
    assert!(catalog.validate().is_err());
}
