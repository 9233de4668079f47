//! Packagist (PHP) package search with per-package monthly downloads.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, Characteristic, QueryParams, RateLimiter, SourceError, non_empty};
use futures_util::future::{BoxFuture, join_all};
use serde::Deserialize;
use std::sync::Arc;

const LOG_TARGET: &str = "   sources";
const DEFAULT_STATS_URL: &str = "https://packagist.org";
const API_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<PackageItem>,
}

#[derive(Debug, Deserialize)]
struct PackageItem {
    name: String,
    description: Option<String>,
    url: Option<String>,
    repository: Option<String>,
    downloads: Option<u64>,
    favers: Option<u64>,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PackageStats {
    downloads: StatsDownloads,
}

#[derive(Debug, Deserialize)]
struct StatsDownloads {
    monthly: Option<u64>,
}

#[derive(Debug)]
pub struct Adapter {
    client: HttpClient,
    endpoint: String,
    stats_endpoint: String,
    limiter: Arc<RateLimiter>,
    max_results: usize,
    page_size: String,
}

impl Adapter {
    /// Create the adapter; statistics calls share `limiter`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(settings: &AdapterSettings, limiter: Arc<RateLimiter>) -> crate::Result<Self> {
        Ok(Self {
            client: HttpClient::new(SourceId::Packagist.label(), &ClientOptions::with_timeout(settings.timeout))?,
            endpoint: settings.endpoint(SourceId::Packagist.api_url()),
            stats_endpoint: settings.stats_endpoint(DEFAULT_STATS_URL),
            limiter,
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        if !params.primary_language_in(&["php"]) {
            return Ok(Vec::new());
        }

        let query = [("q", search_text(params)), ("per_page", self.page_size.clone())];
        let response: SearchResponse = self.client.get_json(&self.endpoint, &query).await?;

        let projects = response.results.into_iter().map(map_item);
        let mut projects = join_all(projects.map(|p| self.with_monthly_downloads(p))).await;

        if params.wants(Characteristic::LargeCommunity) {
            projects.sort_by_key(|p| core::cmp::Reverse(p.stats.stars.unwrap_or(0)));
        }

        projects.truncate(self.max_results);
        Ok(projects)
    }

    async fn with_monthly_downloads(&self, mut project: CanonicalProject) -> CanonicalProject {
        self.limiter.acquire().await;

        let url = format!("{}/packages/{}/stats.json", self.stats_endpoint, project.name);
        match self.client.get_json::<PackageStats>(&url, &[]).await {
            Ok(stats) => project.stats.monthly_downloads = stats.downloads.monthly,
            Err(e) => log::warn!(target: LOG_TARGET, "Could not fetch statistics for '{}': {e}", project.name),
        }

        project
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::Packagist.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

fn search_text(params: &QueryParams) -> String {
    let default = if params.any_language_in(&["php"]) { "php" } else { "library" };
    params.keyword_text_or(default)
}

fn map_item(item: PackageItem) -> CanonicalProject {
    let url = item
        .url
        .or(item.repository)
        .unwrap_or_else(|| format!("https://packagist.org/packages/{}", item.name));
    let owner = item.name.split_once('/').map(|(vendor, _)| vendor.to_string());

    let mut project = CanonicalProject::new(SourceId::Packagist.label(), item.name, url);
    project.description = non_empty(item.description);
    project.language = Some("PHP".to_string());
    project.add_tags(&item.keywords);
    project.stats.stars = Some(item.favers.unwrap_or(0));
    project.stats.downloads = Some(item.downloads.unwrap_or(0));
    project.stats.forks = Some(0);
    project.stats.watchers = Some(0);
    project.stats.open_issues = Some(0);
    project.stats.closed_issues = Some(0);
    project.owner = owner;
    project
}
