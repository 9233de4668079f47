//! Codeberg (Gitea) repository search.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, Characteristic, QueryParams, SortHint, SourceError, non_empty};
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::Deserialize;

const LOG_TARGET: &str = "   sources";
const API_MAX_PAGE_SIZE: usize = 50;

/// Characteristics under which obscure repositories are still worth showing
const KEEP_UNPOPULAR: [Characteristic; 3] = [
    Characteristic::NeedsContributors,
    Characteristic::BeginnerFriendly,
    Characteristic::GoodFirstIssues,
];

/// Gitea returns either a bare array or `{ data: [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    List(Vec<RepoItem>),
    Wrapped {
        #[serde(default)]
        data: Vec<RepoItem>,
    },
}

impl SearchResponse {
    fn into_items(self) -> Vec<RepoItem> {
        match self {
            Self::List(items) | Self::Wrapped { data: items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RepoItem {
    full_name: String,
    description: Option<String>,
    html_url: String,
    language: Option<String>,
    #[serde(default)]
    topics: Option<Vec<String>>,
    stars_count: Option<u64>,
    forks_count: Option<u64>,
    watchers_count: Option<u64>,
    open_issues_count: Option<u64>,
    updated_at: Option<DateTime<Utc>>,
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
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(settings: &AdapterSettings) -> crate::Result<Self> {
        Ok(Self {
            client: HttpClient::new(SourceId::Codeberg.label(), &ClientOptions::with_timeout(settings.timeout))?,
            endpoint: settings.endpoint(SourceId::Codeberg.api_url()),
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        let mut query = vec![("limit", self.page_size.clone())];
        query.extend(build_query(params));

        let response: SearchResponse = self.client.get_json(&self.endpoint, &query).await?;
        let projects: Vec<_> = response.into_items().into_iter().map(map_item).collect();

        let projects = if KEEP_UNPOPULAR.iter().any(|&c| params.wants(c)) {
            projects
        } else {
            let before = projects.len();
            let kept: Vec<_> = projects
                .into_iter()
                .filter(|p| p.stats.stars.unwrap_or(0) > 0 || p.stats.forks.unwrap_or(0) > 0)
                .collect();

            if kept.len() < before {
                log::debug!(target: LOG_TARGET, "Codeberg dropped {} repositories with no stars or forks", before - kept.len());
            }

            kept
        };

        Ok(projects.into_iter().take(self.max_results).collect())
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::Codeberg.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

fn build_query(params: &QueryParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();

    if let Some(language) = params.primary_language() {
        query.push(("language", language.to_string()));
    }

    let q = params.keyword_text();
    if !q.is_empty() {
        query.push(("q", q));
    }

    let sort = match params.sort() {
        Some(SortHint::Recency) => Some("updated"),
        Some(SortHint::Popularity) => Some("stars"),
        None if query.is_empty() => Some("updated"),
        None => None,
    };

    if let Some(sort) = sort {
        query.push(("sort", sort.to_string()));
    }

    query
}

fn map_item(item: RepoItem) -> CanonicalProject {
    let mut project = CanonicalProject::new(SourceId::Codeberg.label(), item.full_name, item.html_url);
    project.description = non_empty(item.description);
    project.add_tags(item.topics.unwrap_or_default());
    let language = non_empty(item.language);
    if let Some(language) = &language {
        project.add_tags([language]);
    }
    project.language = language;
    project.stats.stars = item.stars_count;
    project.stats.forks = item.forks_count;
    project.stats.watchers = item.watchers_count;
    project.stats.open_issues = item.open_issues_count;
    project.owner = item.owner.map(|o| o.login);
    project.updated_at = item.updated_at;
    project
}
