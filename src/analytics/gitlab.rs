//! Project analytics from the GitLab REST API.

use super::fetch::{MAX_COMMIT_PAGES, MAX_LISTING_PAGES, PAGE_SIZE, collect_pages, mean_hours, optional};
use super::model::{CommunityProfile, Contributor, Platform, PlatformExtras, ProjectAnalytics, language_shares};
use super::repo_ref::RepoRef;
use super::weekly::{bucket_commits, series_start};
use crate::Result;
use crate::discovery::SourceError;
use crate::sources::{ClientOptions, HttpClient, TokenScheme, encode_path_segment};
use chrono::{DateTime, SecondsFormat, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const LOG_TARGET: &str = " analytics";
pub const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";
const TOP_CONTRIBUTORS: usize = 10;

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    #[serde(default)]
    star_count: u64,
    #[serde(default)]
    forks_count: u64,
    open_issues_count: Option<u64>,
    last_activity_at: Option<DateTime<Utc>>,
    default_branch: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    /// Older name of `topics`, still sent alongside it
    #[serde(default)]
    tag_list: Vec<String>,
    visibility: Option<String>,
    wiki_enabled: Option<bool>,
    readme_url: Option<String>,
    license_url: Option<String>,
    statistics: Option<ProjectStatistics>,
}

#[derive(Debug, Deserialize)]
struct ProjectStatistics {
    commit_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ContributorItem {
    name: String,
    commits: u64,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct MergeRequestItem {
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
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
            accept: None,
            token: token.map(|t| (t, TokenScheme::PrivateToken)),
        };

        Ok(Self {
            client: HttpClient::new(Platform::Gitlab.label(), &options)?,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, repo: &RepoRef, path: &str, query: &[(&str, String)]) -> Result<T, SourceError> {
        let id = encode_path_segment(&repo.full_name());
        let url = format!("{}/projects/{id}{path}", self.api_url);
        self.client.get_json(&url, query).await
    }

    /// Every item of a paginated listing, up to `max_pages` pages
    async fn get_all<T: DeserializeOwned>(
        &self,
        repo: &RepoRef,
        path: &str,
        query: &[(&str, String)],
        max_pages: u32,
    ) -> Result<Vec<T>, SourceError> {
        collect_pages(PAGE_SIZE, max_pages, |page| {
            let query: Vec<_> = query
                .iter()
                .cloned()
                .chain([("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())])
                .collect();
            async move { self.get::<Vec<T>>(repo, path, &query).await }
        })
        .await
    }

    async fn recent_commits(&self, repo: &RepoRef, since: DateTime<Utc>) -> Result<Vec<CommitItem>, SourceError> {
        let since = [("since", since.to_rfc3339_opts(SecondsFormat::Secs, true))];
        self.get_all(repo, "/repository/commits", &since, MAX_COMMIT_PAGES).await
    }

    /// Collect analytics for one project.
    ///
    /// Project metadata, languages, contributors, recent commits and open merge requests are
    /// required; merge times are best effort.
    pub async fn fetch(&self, repo: &RepoRef, now: DateTime<Utc>) -> Result<ProjectAnalytics> {
        log::info!(target: LOG_TARGET, "Querying GitLab for analytics on project '{repo}'");

        let since = series_start(now);
        let with_statistics = [("statistics", "true".to_string())];
        let opened = [("state", "opened".to_string())];
        let merged_sample = [("state", "merged".to_string()), ("per_page", "30".to_string())];

        let (info, languages, contributors, commits, open_mrs, merged_mrs) = tokio::join!(
            self.get::<ProjectInfo>(repo, "", &with_statistics),
            self.get::<HashMap<String, f64>>(repo, "/languages", &[]),
            self.get_all::<ContributorItem>(repo, "/repository/contributors", &[], MAX_LISTING_PAGES),
            self.recent_commits(repo, since),
            self.get_all::<serde_json::Value>(repo, "/merge_requests", &opened, MAX_LISTING_PAGES),
            optional("merged merge requests", self.get::<Vec<MergeRequestItem>>(repo, "/merge_requests", &merged_sample)),
        );

        let context = || format!("could not fetch GitLab analytics for '{repo}'");
        let info = info.into_app_err_with(context)?;
        let languages = languages.into_app_err_with(context)?;
        let contributors = contributors.into_app_err_with(context)?;
        let commits = commits.into_app_err_with(context)?;
        let open_mrs = open_mrs.into_app_err_with(context)?;

        let mut analytics = ProjectAnalytics::placeholder(Platform::Gitlab, now);
        analytics.stars = info.star_count;
        analytics.forks = info.forks_count;
        analytics.open_issues = info.open_issues_count.unwrap_or(0);
        analytics.open_pull_requests = open_mrs.len() as u64;
        analytics.last_commit = commits.iter().map(|c| c.created_at).max().or(info.last_activity_at);

        let reported_total = info.statistics.and_then(|s| s.commit_count);
        analytics.set_weekly_activity(bucket_commits(commits.iter().map(|c| c.created_at), now), reported_total);

        analytics.contributor_count = contributors.len() as u64;
        let mut top: Vec<_> = contributors
            .into_iter()
            .map(|c| Contributor {
                name: c.name,
                contributions: c.commits,
            })
            .collect();
        top.sort_by_key(|c| core::cmp::Reverse(c.contributions));
        top.truncate(TOP_CONTRIBUTORS);
        analytics.top_contributors = top;

        analytics.languages = language_shares(languages);
        analytics.community = CommunityProfile {
            has_readme: info.readme_url.is_some(),
            has_license: info.license_url.is_some(),
            ..CommunityProfile::default()
        };
        analytics.pr_merge_hours =
            merged_mrs.and_then(|mrs| mean_hours(mrs.into_iter().filter_map(|mr| mr.merged_at.map(|m| (mr.created_at, m)))));

        analytics.extras = PlatformExtras {
            default_branch: info.default_branch,
            topics: if info.topics.is_empty() { info.tag_list } else { info.topics },
            visibility: info.visibility,
            has_wiki: info.wiki_enabled,
            has_pages: None,
        };

        Ok(analytics)
    }
}
