use super::weekly::{WEEKS, WeeklyCommits, zero_weeks};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Hosting platforms the analytics engine can query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    Github,
    Gitlab,
    Codeberg,
    /// Any platform without rich analytics support
    Other,
}

impl Platform {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Gitlab => "GitLab",
            Self::Codeberg => "Codeberg",
            Self::Other => "Other",
        }
    }

    /// Platform for a source label such as `GitHub`
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        [Self::Github, Self::Gitlab, Self::Codeberg]
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label))
    }

    /// Platform serving a web host such as `github.com`
    #[must_use]
    pub fn from_host(host: &str) -> Self {
        match host.trim_start_matches("www.").to_lowercase().as_str() {
            "github.com" => Self::Github,
            "gitlab.com" => Self::Gitlab,
            "codeberg.org" => Self::Codeberg,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub contributions: u64,
}

/// Share of the code base written in one language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityProfile {
    pub has_readme: bool,
    pub has_license: bool,
    pub has_contributing: bool,
    pub has_code_of_conduct: bool,
    pub has_issue_templates: bool,
    /// Platform-computed community health, 0 to 100
    pub health_percentage: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CiStatus {
    Passing,
    Failing,
    #[default]
    Unknown,
}

/// Fields only some platforms report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformExtras {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_wiki: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_pages: Option<bool>,
}

/// Activity and community figures for one project.
///
/// The weekly series always holds exactly twelve weeks, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalytics {
    pub platform: Platform,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub open_pull_requests: u64,
    pub contributor_count: u64,
    /// Most active contributors, busiest first
    pub top_contributors: Vec<Contributor>,
    pub last_commit: Option<DateTime<Utc>>,
    /// Mean commits per week over the series
    pub commit_frequency: f64,
    pub weekly_activity: Vec<WeeklyCommits>,
    /// Commits over the last four weeks of the series
    pub monthly_commits: u64,
    pub total_commits: u64,
    /// Language shares, largest first, summing to roughly 100
    pub languages: Vec<LanguageShare>,
    pub community: CommunityProfile,
    /// Mean hours from opening to closing an issue, when known
    pub issue_response_hours: Option<f64>,
    /// Mean hours from opening to merging a pull request, when known
    pub pr_merge_hours: Option<f64>,
    pub ci_status: CiStatus,
    /// Code quality score, 0 to 100
    pub code_quality: f64,
    /// Test coverage percentage, 0 to 100
    pub test_coverage: f64,
    pub extras: PlatformExtras,
}

impl ProjectAnalytics {
    /// All-zero analytics with a zero-filled weekly series
    #[must_use]
    pub fn placeholder(platform: Platform, now: DateTime<Utc>) -> Self {
        Self {
            platform,
            stars: 0,
            forks: 0,
            open_issues: 0,
            open_pull_requests: 0,
            contributor_count: 0,
            top_contributors: Vec::new(),
            last_commit: None,
            commit_frequency: 0.0,
            weekly_activity: zero_weeks(now),
            monthly_commits: 0,
            total_commits: 0,
            languages: Vec::new(),
            community: CommunityProfile::default(),
            issue_response_hours: None,
            pr_merge_hours: None,
            ci_status: CiStatus::Unknown,
            code_quality: 0.0,
            test_coverage: 0.0,
            extras: PlatformExtras::default(),
        }
    }

    /// Install a weekly series and recompute the figures derived from it.
    ///
    /// `reported_total` is the platform's own commit count, used when it exceeds the series sum.
    pub fn set_weekly_activity(&mut self, weeks: Vec<WeeklyCommits>, reported_total: Option<u64>) {
        debug_assert_eq!(weeks.len(), WEEKS);

        let sum: u64 = weeks.iter().map(|w| w.commits).sum();

        #[expect(clippy::cast_precision_loss, reason = "commit counts are far below 2^52")]
        let frequency = sum as f64 / WEEKS as f64;

        self.commit_frequency = frequency;
        self.monthly_commits = weeks.iter().rev().take(4).map(|w| w.commits).sum();
        self.total_commits = reported_total.map_or(sum, |total| total.max(sum));
        self.weekly_activity = weeks;
    }

    /// Weekly commit counts, oldest first
    #[must_use]
    pub fn weekly_counts(&self) -> Vec<u64> {
        self.weekly_activity.iter().map(|w| w.commits).collect()
    }
}

/// Convert raw per-language sizes into percentages, largest first
#[must_use]
pub fn language_shares<I, S>(sizes: I) -> Vec<LanguageShare>
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let sizes: Vec<(String, f64)> = sizes.into_iter().map(|(n, s)| (n.into(), s.max(0.0))).collect();
    let total: f64 = sizes.iter().map(|(_, s)| s).sum();

    let mut shares: Vec<_> = sizes
        .into_iter()
        .map(|(language, size)| LanguageShare {
            language,
            percentage: if total > 0.0 { size * 100.0 / total } else { 0.0 },
        })
        .collect();

    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::weekly::bucket_commits;
    use chrono::TimeZone;

    #[test]
    fn test_platform_detection() {
        assert_eq!(Platform::from_label("GitHub"), Some(Platform::Github));
        assert_eq!(Platform::from_label("codeberg"), Some(Platform::Codeberg));
        assert_eq!(Platform::from_label("NPM"), None);
        assert_eq!(Platform::from_host("www.github.com"), Platform::Github);
        assert_eq!(Platform::from_host("bitbucket.org"), Platform::Other);
        assert_eq!("GitLab".parse::<Platform>().unwrap(), Platform::Gitlab);
    }

    #[test]
    fn test_placeholder_is_zeroed() {
        let analytics = ProjectAnalytics::placeholder(Platform::Other, Utc::now());
        assert_eq!(analytics.weekly_activity.len(), WEEKS);
        assert!(analytics.weekly_counts().iter().all(|&c| c == 0));
        assert_eq!(analytics.total_commits, 0);
    }

    #[test]
    fn test_derived_commit_figures() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let mut analytics = ProjectAnalytics::placeholder(Platform::Github, now);

        let commits = (0..24).map(|i| now - chrono::Duration::days(i * 3 + 1));
        analytics.set_weekly_activity(bucket_commits(commits, now), None);

        assert_eq!(analytics.total_commits, 24);
        assert!((analytics.commit_frequency - 2.0).abs() < f64::EPSILON);
        assert!(analytics.monthly_commits > 0);

        let weeks = analytics.weekly_activity.clone();
        analytics.set_weekly_activity(weeks, Some(5000));
        assert_eq!(analytics.total_commits, 5000);
    }

    #[test]
    fn test_language_shares() {
        let shares = language_shares([("Rust", 300.0), ("Shell", 100.0)]);
        assert_eq!(shares[0].language, "Rust");
        assert!((shares[0].percentage - 75.0).abs() < 1e-9);
        assert!((shares[1].percentage - 25.0).abs() < 1e-9);

        assert!(language_shares(Vec::<(String, f64)>::new()).is_empty());
    }
}
