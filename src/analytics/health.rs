//! Composite project health score.

use super::model::{CiStatus, ProjectAnalytics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const ACTIVITY_WEIGHT: f64 = 0.3;
const COMMUNITY_WEIGHT: f64 = 0.3;
const QUALITY_WEIGHT: f64 = 0.2;
const MAINTENANCE_WEIGHT: f64 = 0.2;

/// Issue response time, in hours, that earns the maintenance bonus
const FAST_ISSUE_RESPONSE_HOURS: f64 = 48.0;
/// Pull request merge time, in hours, that earns the maintenance bonus
const FAST_PR_MERGE_HOURS: f64 = 72.0;

/// Per-dimension scores, each 0 to 100, and the weighted overall score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthBreakdown {
    pub activity: f64,
    pub community: f64,
    pub quality: f64,
    pub maintenance: f64,
    pub overall: u8,
}

/// Health score of a project as of now
#[must_use]
pub fn health_score(analytics: &ProjectAnalytics) -> u8 {
    health_breakdown(analytics, Utc::now()).overall
}

/// Score every health dimension as of `now`
#[must_use]
pub fn health_breakdown(analytics: &ProjectAnalytics, now: DateTime<Utc>) -> HealthBreakdown {
    let activity = activity_score(analytics);
    let community = community_score(analytics);
    let quality = quality_score(analytics);
    let maintenance = maintenance_score(analytics, now);

    let overall = activity * ACTIVITY_WEIGHT
        + community * COMMUNITY_WEIGHT
        + quality * QUALITY_WEIGHT
        + maintenance * MAINTENANCE_WEIGHT;

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "clamped to 0..=100")]
    let overall = overall.clamp(0.0, 100.0).round() as u8;

    HealthBreakdown {
        activity,
        community,
        quality,
        maintenance,
        overall,
    }
}

const fn points(condition: bool, points: f64) -> f64 {
    if condition { points } else { 0.0 }
}

#[expect(clippy::cast_precision_loss, reason = "counts are far below 2^52")]
fn capped(value: u64, per_point: f64) -> f64 {
    (value as f64 / per_point).min(25.0)
}

fn activity_score(a: &ProjectAnalytics) -> f64 {
    points(a.commit_frequency > 0.0, 25.0)
        + points(a.total_commits > 100, 25.0)
        + points(a.weekly_activity.iter().any(|w| w.commits > 0), 25.0)
        + points(a.monthly_commits > 0, 25.0)
}

fn community_score(a: &ProjectAnalytics) -> f64 {
    let score = capped(a.stars, 100.0)
        + capped(a.forks, 20.0)
        + capped(a.contributor_count, 1.0)
        + f64::from(a.community.health_percentage.min(100)) * 0.25;
    score.min(100.0)
}

fn quality_score(a: &ProjectAnalytics) -> f64 {
    let score = a.code_quality.clamp(0.0, 100.0) * 0.25
        + a.test_coverage.clamp(0.0, 100.0) * 0.25
        + points(a.ci_status == CiStatus::Passing, 25.0)
        + points(a.community.has_readme, 25.0);
    score.min(100.0)
}

fn maintenance_score(a: &ProjectAnalytics, now: DateTime<Utc>) -> f64 {
    let recency = match a.last_commit.map(|t| (now - t).num_days()) {
        Some(days) if days < 30 => 40.0,
        Some(days) if days < 90 => 25.0,
        _ => 10.0,
    };

    let issue_bonus = points(a.issue_response_hours.is_some_and(|h| h <= FAST_ISSUE_RESPONSE_HOURS), 30.0);
    let pr_bonus = points(a.pr_merge_hours.is_some_and(|h| h <= FAST_PR_MERGE_HOURS), 30.0);

    (recency + issue_bonus + pr_bonus).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::model::Platform;
    use crate::analytics::weekly::bucket_commits;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_placeholder_scores_only_stale_maintenance() {
        let analytics = ProjectAnalytics::placeholder(Platform::Other, now());
        let breakdown = health_breakdown(&analytics, now());

        assert!(breakdown.activity.abs() < f64::EPSILON);
        assert!(breakdown.community.abs() < f64::EPSILON);
        assert!(breakdown.quality.abs() < f64::EPSILON);
        assert!((breakdown.maintenance - 10.0).abs() < f64::EPSILON);
        assert_eq!(breakdown.overall, 2);
    }

    #[test]
    fn test_healthy_project_scores_high() {
        let now = now();
        let mut analytics = ProjectAnalytics::placeholder(Platform::Github, now);
        analytics.set_weekly_activity(bucket_commits((0..60).map(|i| now - Duration::hours(i * 24)), now), Some(5000));
        analytics.last_commit = Some(now - Duration::days(1));
        analytics.stars = 50_000;
        analytics.forks = 5_000;
        analytics.contributor_count = 300;
        analytics.community.health_percentage = 100;
        analytics.community.has_readme = true;
        analytics.ci_status = CiStatus::Passing;
        analytics.issue_response_hours = Some(12.0);
        analytics.pr_merge_hours = Some(24.0);

        let breakdown = health_breakdown(&analytics, now);
        assert!((breakdown.activity - 100.0).abs() < f64::EPSILON);
        assert!((breakdown.community - 100.0).abs() < f64::EPSILON);
        assert!((breakdown.quality - 50.0).abs() < f64::EPSILON);
        assert!((breakdown.maintenance - 100.0).abs() < f64::EPSILON);
        assert_eq!(breakdown.overall, 90);
    }

    #[test]
    fn test_recency_bands() {
        let now = now();
        let mut analytics = ProjectAnalytics::placeholder(Platform::Github, now);

        analytics.last_commit = Some(now - Duration::days(29));
        assert!((maintenance_score(&analytics, now) - 40.0).abs() < f64::EPSILON);

        analytics.last_commit = Some(now - Duration::days(60));
        assert!((maintenance_score(&analytics, now) - 25.0).abs() < f64::EPSILON);

        analytics.last_commit = Some(now - Duration::days(400));
        analytics.issue_response_hours = Some(49.0);
        analytics.pr_merge_hours = Some(72.0);
        assert!((maintenance_score(&analytics, now) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_community_caps() {
        let mut analytics = ProjectAnalytics::placeholder(Platform::Github, now());
        analytics.stars = 1_000;
        analytics.forks = 100;
        analytics.contributor_count = 3;
        assert!((community_score(&analytics) - 18.0).abs() < f64::EPSILON);
    }
}
