//! Repository analytics from the GitHub REST API.

use super::fetch::{MAX_LISTING_PAGES, PAGE_SIZE, collect_pages, mean_hours, optional};
use super::model::{CiStatus, CommunityProfile, Contributor, Platform, PlatformExtras, ProjectAnalytics, language_shares};
use super::repo_ref::RepoRef;
use super::weekly::from_weekly_totals;
use crate::Result;
use crate::discovery::SourceError;
use crate::sources::{ClientOptions, HttpClient, TokenScheme};
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const LOG_TARGET: &str = " analytics";
const ACCEPT: &str = "application/vnd.github+json";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Contributors kept in [`ProjectAnalytics::top_contributors`]
const TOP_CONTRIBUTORS: usize = 10;

/// Recently closed items sampled for response and merge times
const TIMING_SAMPLE: &str = "30";

#[derive(Debug, Deserialize)]
struct RepoInfo {
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    pushed_at: Option<DateTime<Utc>>,
    default_branch: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    visibility: Option<String>,
    has_wiki: Option<bool>,
    has_pages: Option<bool>,
}

/// GitHub answers `202 Accepted` with an empty object while statistics are being computed
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommitActivity {
    Weeks(Vec<WeekTotal>),
    Pending {},
}

#[derive(Debug, Deserialize)]
struct WeekTotal {
    /// Unix time of the start of the week
    week: i64,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ContributorItem {
    login: Option<String>,
    contributions: u64,
}

#[derive(Debug, Deserialize)]
struct CommunityResponse {
    #[serde(default)]
    health_percentage: u8,
    #[serde(default)]
    files: CommunityFiles,
}

#[derive(Debug, Default, Deserialize)]
struct CommunityFiles {
    readme: Option<serde_json::Value>,
    license: Option<serde_json::Value>,
    contributing: Option<serde_json::Value>,
    code_of_conduct: Option<serde_json::Value>,
    issue_template: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PullItem {
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct IssueItem {
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRuns {
    #[serde(default)]
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRun {
    conclusion: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HttpClient,
    api_url: String,
}

impl Fetcher {
    pub fn new(api_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let options = ClientOptions {
            timeout,
            accept: Some(ACCEPT),
            token: token.map(|t| (t, TokenScheme::Bearer)),
        };

        Ok(Self {
            client: HttpClient::new(Platform::Github.label(), &options)?,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, repo: &RepoRef, path: &str, query: &[(&str, String)]) -> Result<T, SourceError> {
        let url = format!("{}/repos/{}/{}{path}", self.api_url, repo.owner(), repo.repo());
        self.client.get_json(&url, query).await
    }

    /// Every item of a paginated listing, up to [`MAX_LISTING_PAGES`] pages
    async fn get_all<T: DeserializeOwned>(&self, repo: &RepoRef, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, SourceError> {
        collect_pages(PAGE_SIZE, MAX_LISTING_PAGES, |page| {
            let query: Vec<_> = query
                .iter()
                .cloned()
                .chain([("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())])
                .collect();
            async move { self.get::<Vec<T>>(repo, path, &query).await }
        })
        .await
    }

    /// Collect analytics for one repository.
    ///
    /// Repository metadata, commit activity, contributors, languages and open pull requests are
    /// required; the community profile, CI runs and timing samples are best effort.
    pub async fn fetch(&self, repo: &RepoRef, now: DateTime<Utc>) -> Result<ProjectAnalytics> {
        log::info!(target: LOG_TARGET, "Querying GitHub for analytics on repository '{repo}'");

        let open = [("state", "open".to_string())];
        let (info, activity, contributors, languages, open_pulls) = tokio::join!(
            self.get::<RepoInfo>(repo, "", &[]),
            self.get::<CommitActivity>(repo, "/stats/commit_activity", &[]),
            self.get_all::<ContributorItem>(repo, "/contributors", &[]),
            self.get::<HashMap<String, f64>>(repo, "/languages", &[]),
            self.get_all::<serde_json::Value>(repo, "/pulls", &open),
        );

        let context = || format!("could not fetch GitHub analytics for '{repo}'");
        let info = info.into_app_err_with(context)?;
        let activity = activity.into_app_err_with(context)?;
        let contributors = contributors.into_app_err_with(context)?;
        let languages = languages.into_app_err_with(context)?;
        let open_pulls = open_pulls.into_app_err_with(context)?;

        let latest_run = [("per_page", "1".to_string())];
        let closed_sample = [("state", "closed".to_string()), ("per_page", TIMING_SAMPLE.to_string())];
        let (community, runs, closed_pulls, closed_issues) = tokio::join!(
            optional("community profile", self.get::<CommunityResponse>(repo, "/community/profile", &[])),
            optional("workflow runs", self.get::<WorkflowRuns>(repo, "/actions/runs", &latest_run)),
            optional("closed pull requests", self.get::<Vec<PullItem>>(repo, "/pulls", &closed_sample)),
            optional("closed issues", self.get::<Vec<IssueItem>>(repo, "/issues", &closed_sample)),
        );

        let mut analytics = ProjectAnalytics::placeholder(Platform::Github, now);
        analytics.stars = info.stargazers_count;
        analytics.forks = info.forks_count;
        analytics.open_pull_requests = open_pulls.len() as u64;
        analytics.open_issues = info.open_issues_count.saturating_sub(analytics.open_pull_requests);
        analytics.last_commit = info.pushed_at;

        let totals = match activity {
            CommitActivity::Weeks(weeks) => weeks
                .into_iter()
                .filter_map(|w| DateTime::<Utc>::from_timestamp(w.week, 0).map(|start| (start, w.total)))
                .collect(),
            CommitActivity::Pending {} => {
                log::debug!(target: LOG_TARGET, "GitHub commit statistics for '{repo}' are still being computed");
                Vec::new()
            }
        };

        let reported_total: u64 = contributors.iter().map(|c| c.contributions).sum();
        analytics.set_weekly_activity(from_weekly_totals(totals, now), Some(reported_total));

        analytics.contributor_count = contributors.len() as u64;
        analytics.top_contributors = top_contributors(contributors);
        analytics.languages = language_shares(languages);

        if let Some(community) = community {
            analytics.community = CommunityProfile {
                has_readme: community.files.readme.is_some(),
                has_license: community.files.license.is_some(),
                has_contributing: community.files.contributing.is_some(),
                has_code_of_conduct: community.files.code_of_conduct.is_some(),
                has_issue_templates: community.files.issue_template.is_some(),
                health_percentage: community.health_percentage.min(100),
            };
        }

        analytics.ci_status = runs.map_or(CiStatus::Unknown, |runs| ci_status(&runs));
        analytics.pr_merge_hours = closed_pulls.and_then(|pulls| mean_hours(pulls.into_iter().filter_map(|p| p.merged_at.map(|m| (p.created_at, m)))));
        analytics.issue_response_hours = closed_issues.and_then(|issues| {
            mean_hours(
                issues
                    .into_iter()
                    .filter(|i| i.pull_request.is_none())
                    .filter_map(|i| i.closed_at.map(|c| (i.created_at, c))),
            )
        });

        analytics.extras = PlatformExtras {
            default_branch: info.default_branch,
            topics: info.topics,
            visibility: info.visibility,
            has_wiki: info.has_wiki,
            has_pages: info.has_pages,
        };

        Ok(analytics)
    }
}

fn top_contributors(contributors: Vec<ContributorItem>) -> Vec<Contributor> {
    let mut contributors: Vec<_> = contributors
        .into_iter()
        .map(|c| Contributor {
            name: c.login.unwrap_or_else(|| "anonymous".to_string()),
            contributions: c.contributions,
        })
        .collect();

    contributors.sort_by_key(|c| core::cmp::Reverse(c.contributions));
    contributors.truncate(TOP_CONTRIBUTORS);
    contributors
}

fn ci_status(runs: &WorkflowRuns) -> CiStatus {
    match runs.workflow_runs.first().and_then(|r| r.conclusion.as_deref()) {
        Some("success") => CiStatus::Passing,
        Some("failure" | "timed_out" | "startup_failure") => CiStatus::Failing,
        _ => CiStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_commit_activity() {
        let activity: CommitActivity = serde_json::from_str("{}").unwrap();
        assert!(matches!(activity, CommitActivity::Pending {}));

        let activity: CommitActivity = serde_json::from_str(r#"[{"week": 1700000000, "total": 3, "days": [0,1,2,0,0,0,0]}]"#).unwrap();
        assert!(matches!(activity, CommitActivity::Weeks(w) if w.len() == 1));
    }

    #[test]
    fn test_ci_status() {
        let runs: WorkflowRuns = serde_json::from_str(r#"{"workflow_runs": [{"conclusion": "success"}]}"#).unwrap();
        assert_eq!(ci_status(&runs), CiStatus::Passing);

        let runs: WorkflowRuns = serde_json::from_str(r#"{"workflow_runs": [{"conclusion": null}]}"#).unwrap();
        assert_eq!(ci_status(&runs), CiStatus::Unknown);

        let runs: WorkflowRuns = serde_json::from_str(r#"{"total_count": 0}"#).unwrap();
        assert_eq!(ci_status(&runs), CiStatus::Unknown);
    }

    #[test]
    fn test_top_contributors_sorted_and_capped() {
        let contributors = (0..15)
            .map(|i| ContributorItem {
                login: Some(format!("user{i}")),
                contributions: i,
            })
            .collect();

        let top = top_contributors(contributors);
        assert_eq!(top.len(), TOP_CONTRIBUTORS);
        assert_eq!(top[0].name, "user14");
    }
}
