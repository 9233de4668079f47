//! Repository analytics from the Gitea API that Codeberg runs.

use super::fetch::{MAX_COMMIT_PAGES, collect_pages, optional};
use super::model::{Contributor, Platform, PlatformExtras, ProjectAnalytics, language_shares};
use super::repo_ref::RepoRef;
use super::weekly::{bucket_commits, series_start};
use crate::Result;
use crate::discovery::SourceError;
use crate::sources::{ClientOptions, HttpClient};
use chrono::{DateTime, SecondsFormat, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const LOG_TARGET: &str = " analytics";
pub const DEFAULT_API_URL: &str = "https://codeberg.org/api/v1";

/// Gitea caps listing pages at fifty items
const PAGE_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct RepoInfo {
    #[serde(default)]
    stars_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    open_pr_counter: u64,
    updated_at: Option<DateTime<Utc>>,
    default_branch: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    private: bool,
    has_wiki: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CommitItem {
    created: Option<DateTime<Utc>>,
    commit: Option<CommitDetail>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    date: Option<DateTime<Utc>>,
}

impl CommitItem {
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created
            .or_else(|| self.commit.as_ref().and_then(|c| c.author.as_ref()).and_then(|a| a.date))
    }
}

#[derive(Debug, Deserialize)]
struct ContributorItem {
    login: String,
    contributions: u64,
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: HttpClient,
    api_url: String,
}

impl Fetcher {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(Platform::Codeberg.label(), &ClientOptions::with_timeout(timeout))?,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, repo: &RepoRef, path: &str, query: &[(&str, String)]) -> Result<T, SourceError> {
        let url = format!("{}/repos/{}/{}{path}", self.api_url, repo.owner(), repo.repo());
        self.client.get_json(&url, query).await
    }

    async fn recent_commits(&self, repo: &RepoRef, since: DateTime<Utc>) -> Result<Vec<CommitItem>, SourceError> {
        let since = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        collect_pages(PAGE_SIZE, MAX_COMMIT_PAGES, |page| {
            let query = [
                ("since", since.clone()),
                ("limit", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
                ("stat", "false".to_string()),
            ];
            async move { self.get(repo, "/commits", &query).await }
        })
        .await
    }

    /// Collect analytics for one repository.
    ///
    /// Repository metadata, languages and recent commits are required; contributors are listed
    /// only when the server exposes them.
    pub async fn fetch(&self, repo: &RepoRef, now: DateTime<Utc>) -> Result<ProjectAnalytics> {
        log::info!(target: LOG_TARGET, "Querying Codeberg for analytics on repository '{repo}'");

        let (info, languages, commits, contributors) = tokio::join!(
            self.get::<RepoInfo>(repo, "", &[]),
            self.get::<HashMap<String, f64>>(repo, "/languages", &[]),
            self.recent_commits(repo, series_start(now)),
            optional("contributors", self.get::<Vec<ContributorItem>>(repo, "/contributors", &[])),
        );

        let context = || format!("could not fetch Codeberg analytics for '{repo}'");
        let info = info.into_app_err_with(context)?;
        let languages = languages.into_app_err_with(context)?;
        let commits = commits.into_app_err_with(context)?;

        let timestamps: Vec<_> = commits.iter().filter_map(CommitItem::timestamp).collect();

        let mut analytics = ProjectAnalytics::placeholder(Platform::Codeberg, now);
        analytics.stars = info.stars_count;
        analytics.forks = info.forks_count;
        analytics.open_issues = info.open_issues_count;
        analytics.open_pull_requests = info.open_pr_counter;
        analytics.last_commit = timestamps.iter().max().copied().or(info.updated_at);
        analytics.set_weekly_activity(bucket_commits(timestamps, now), None);
        analytics.languages = language_shares(languages);

        if let Some(mut contributors) = contributors {
            analytics.contributor_count = contributors.len() as u64;
            contributors.sort_by_key(|c| core::cmp::Reverse(c.contributions));
            analytics.top_contributors = contributors
                .into_iter()
                .take(10)
                .map(|c| Contributor {
                    name: c.login,
                    contributions: c.contributions,
                })
                .collect();
        }

        analytics.extras = PlatformExtras {
            default_branch: info.default_branch,
            topics: info.topics,
            visibility: Some(if info.private { "private" } else { "public" }.to_string()),
            has_wiki: info.has_wiki,
            has_pages: None,
        };

        Ok(analytics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_timestamp_fallback() {
        let item: CommitItem = serde_json::from_value(serde_json::json!({
            "commit": { "author": { "date": "2024-05-01T10:00:00Z" } }
        }))
        .unwrap();
        assert!(item.timestamp().is_some());

        let item: CommitItem = serde_json::from_value(serde_json::json!({ "created": "2024-05-02T10:00:00Z" })).unwrap();
        assert_eq!(item.timestamp().unwrap().to_rfc3339(), "2024-05-02T10:00:00+00:00");

        let item: CommitItem = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(item.timestamp(), None);
    }
}
