//! GitLab project search.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter, TokenScheme, capitalize};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, QueryParams, SortHint, SourceError, non_empty};
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::Deserialize;

const API_MAX_PAGE_SIZE: usize = 100;

/// Languages recognized when a project's tags name its language
const COMMON_LANGUAGES: &[&str] = &[
    "python",
    "javascript",
    "java",
    "csharp",
    "cpp",
    "typescript",
    "go",
    "rust",
    "php",
    "ruby",
    "swift",
    "kotlin",
];

#[derive(Debug, Deserialize)]
struct ProjectItem {
    path_with_namespace: String,
    description: Option<String>,
    web_url: String,
    #[serde(default)]
    topics: Vec<String>,
    /// Older name of `topics`, still sent alongside it
    #[serde(default)]
    tag_list: Vec<String>,
    star_count: Option<u64>,
    forks_count: Option<u64>,
    last_activity_at: Option<DateTime<Utc>>,
    namespace: Option<Namespace>,
    open_issues_count: Option<u64>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct Namespace {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    open_issues_count: Option<u64>,
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
            accept: None,
            token: token.map(|t| (t, TokenScheme::PrivateToken)),
        };

        Ok(Self {
            client: HttpClient::new(SourceId::Gitlab.label(), &options)?,
            endpoint: settings.endpoint(SourceId::Gitlab.api_url()),
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        let mut query = vec![("per_page", self.page_size.clone()), ("statistics", "true".to_string())];
        query.extend(build_query(params));

        let items: Vec<ProjectItem> = self.client.get_json(&self.endpoint, &query).await?;
        Ok(items
            .into_iter()
            .take(self.max_results)
            .map(|item| map_item(item, params.primary_language()))
            .collect())
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::Gitlab.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

/// GitLab's spelling of a language name
fn api_language(language: &str) -> String {
    match language.to_lowercase().as_str() {
        "c#" => "csharp".to_string(),
        "c++" => "cpp".to_string(),
        other => other.to_string(),
    }
}

/// Filter, search, and ordering parameters
fn build_query(params: &QueryParams) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();

    let language = params.primary_language().map(api_language);
    let search = params.keyword_text();

    if let Some(language) = &language {
        query.push(("with_programming_language", language.clone()));
    }

    if !search.is_empty() {
        query.push(("search", search.clone()));
    }

    let order_by = match params.sort() {
        Some(SortHint::Recency) => Some("last_activity_at"),
        Some(SortHint::Popularity) => Some("star_count"),
        None if search.is_empty() && language.is_none() => Some("star_count"),
        None => None,
    };

    if let Some(order_by) = order_by {
        query.push(("order_by", order_by.to_string()));
        query.push(("sort", "desc".to_string()));
    }

    query
}

/// The requested language if the project is tagged with it, otherwise a common language found in its tags
fn project_language(tags: &[String], requested: Option<&str>) -> Option<String> {
    let tagged = |lang: &str| tags.iter().any(|t| t.eq_ignore_ascii_case(lang));

    if let Some(requested) = requested
        && tagged(&api_language(requested))
    {
        return Some(requested.to_string());
    }

    tags.iter()
        .find(|t| COMMON_LANGUAGES.contains(&t.to_lowercase().as_str()))
        .cloned()
        .or_else(|| requested.map(ToString::to_string))
}

fn map_item(item: ProjectItem, requested_language: Option<&str>) -> CanonicalProject {
    let tags = if item.topics.is_empty() { item.tag_list } else { item.topics };
    let language = project_language(&tags, requested_language);

    let mut project = CanonicalProject::new(SourceId::Gitlab.label(), item.path_with_namespace, item.web_url);
    project.description = non_empty(item.description);
    project.add_tags(&tags);
    if let Some(language) = &language {
        project.add_tags([language]);
    }
    project.language = language.as_deref().map(capitalize);
    project.stats.stars = item.star_count;
    project.stats.forks = item.forks_count;
    project.stats.open_issues = item
        .open_issues_count
        .or_else(|| item.statistics.and_then(|s| s.open_issues_count));
    project.owner = item.namespace.map(|n| n.name);
    project.updated_at = item.last_activity_at;
    project
}
