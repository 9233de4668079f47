//! GitHub repository search.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter, TokenScheme};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, Characteristic, QueryParams, SortHint, SourceError, non_empty};
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::Deserialize;

const ACCEPT: &str = "application/vnd.github+json";
const API_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepoItem>,
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    description: Option<String>,
    html_url: String,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
    watchers_count: Option<u64>,
    open_issues_count: Option<u64>,
    pushed_at: Option<DateTime<Utc>>,
    owner: Option<Owner>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug)]
pub struct Adapter {
    client: HttpClient,
    endpoint: String,
    max_results: usize,
    page_size: String,
}

impl Adapter {
    /// Create the adapter, authenticating with `token` when one is given
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(settings: &AdapterSettings, token: Option<&str>) -> crate::Result<Self> {
        let options = ClientOptions {
            timeout: settings.timeout,
            accept: Some(ACCEPT),
            token: token.map(|t| (t, TokenScheme::Bearer)),
        };

        Ok(Self {
            client: HttpClient::new(SourceId::Github.label(), &options)?,
            endpoint: settings.endpoint(SourceId::Github.api_url()),
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        let (q, sort) = build_query(params);
        let query = [
            ("q", q),
            ("per_page", self.page_size.clone()),
            ("sort", sort.to_string()),
            ("order", "desc".to_string()),
        ];

        let response: SearchResponse = self.client.get_json(&self.endpoint, &query).await?;
        Ok(response.items.into_iter().take(self.max_results).map(map_item).collect())
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::Github.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

/// Render the search qualifiers and the sort field
fn build_query(params: &QueryParams) -> (String, &'static str) {
    let mut parts = Vec::new();

    for language in params.languages() {
        parts.push(format!("language:\"{}\"", language.replace('"', "\\\"")));
    }

    for topic in params.topics() {
        parts.push(format!("topic:\"{}\"", topic.replace('"', "\\\"")));
    }

    for &characteristic in params.keyword_characteristics() {
        if characteristic == Characteristic::GoodFirstIssues {
            parts.push("good-first-issues:>0".to_string());
        } else {
            parts.push(format!("\"{}\"", characteristic.label().to_lowercase()));
        }
    }

    let q = if parts.is_empty() { "stars:>1".to_string() } else { parts.join(" ") };

    let sort = match params.sort() {
        Some(SortHint::Recency) => "updated",
        Some(SortHint::Popularity) | None => "stars",
    };

    (q, sort)
}

fn map_item(item: RepoItem) -> CanonicalProject {
    let mut project = CanonicalProject::new(SourceId::Github.label(), item.full_name, item.html_url);
    project.description = non_empty(item.description);
    project.add_tags(&item.topics);
    if let Some(language) = &item.language {
        project.add_tags([language]);
    }
    project.language = item.language;
    project.stats.stars = item.stargazers_count;
    project.stats.forks = item.forks_count;
    project.stats.watchers = item.watchers_count;
    project.stats.open_issues = item.open_issues_count;
    project.owner = item.owner.map(|o| o.login);
    project.updated_at = item.pushed_at;
    project
}
