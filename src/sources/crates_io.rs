//! Crates.io search.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, QueryParams, SortHint, SourceError, non_empty};
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::Deserialize;

const API_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    crates: Vec<CrateItem>,
}

#[derive(Debug, Deserialize)]
struct CrateItem {
    name: String,
    description: Option<String>,
    homepage: Option<String>,
    repository: Option<String>,
    downloads: Option<u64>,
    recent_downloads: Option<u64>,
    max_version: Option<String>,
    newest_version: Option<String>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    keywords: Option<Vec<String>>,
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
            client: HttpClient::new(SourceId::CratesIo.label(), &ClientOptions::with_timeout(settings.timeout))?,
            endpoint: settings.endpoint(SourceId::CratesIo.api_url()),
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        if !params.primary_language_in(&["rust"]) {
            return Ok(Vec::new());
        }

        let query = [
            ("q", search_text(params)),
            ("per_page", self.page_size.clone()),
            ("sort", sort_order(params).to_string()),
        ];

        let response: SearchResponse = self.client.get_json(&self.endpoint, &query).await?;
        Ok(response.crates.into_iter().take(self.max_results).map(map_item).collect())
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::CratesIo.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

fn search_text(params: &QueryParams) -> String {
    let default = if params.any_language_in(&["rust"]) { "rust" } else { "library" };
    params.keyword_text_or(default)
}

const fn sort_order(params: &QueryParams) -> &'static str {
    match params.sort() {
        Some(SortHint::Recency) => "recent-updates",
        Some(SortHint::Popularity) => "downloads",
        None => "relevance",
    }
}

fn map_item(item: CrateItem) -> CanonicalProject {
    let url = non_empty(item.repository)
        .or_else(|| non_empty(item.homepage))
        .unwrap_or_else(|| format!("https://crates.io/crates/{}", item.name));

    let mut project = CanonicalProject::new(SourceId::CratesIo.label(), item.name, url);
    project.description = non_empty(item.description);
    project.language = Some("Rust".to_string());
    project.add_tags(item.keywords.unwrap_or_default());
    project.stats.downloads = Some(item.downloads.unwrap_or(0));
    project.stats.recent_downloads = item.recent_downloads;
    project.stats.forks = Some(0);
    project.stats.watchers = Some(0);
    project.stats.open_issues = Some(0);
    project.stats.closed_issues = Some(0);
    project.version = item.max_version.or(item.newest_version);
    project.updated_at = item.updated_at;
    project
}
