//! NPM registry search with per-package download statistics.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter, encode_path_segment};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, Characteristic, QueryParams, RateLimiter, SourceError, non_empty};
use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, join_all};
use serde::Deserialize;
use std::sync::Arc;

const LOG_TARGET: &str = "   sources";
const DEFAULT_STATS_URL: &str = "https://api.npmjs.org";
const API_MAX_PAGE_SIZE: usize = 250;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    objects: Vec<SearchObject>,
}

#[derive(Debug, Deserialize)]
struct SearchObject {
    package: Package,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    description: Option<String>,
    links: Option<Links>,
    #[serde(default)]
    keywords: Vec<String>,
    date: Option<DateTime<Utc>>,
    publisher: Option<Publisher>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Links {
    npm: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Publisher {
    username: String,
}

#[derive(Debug, Deserialize)]
struct DownloadsPoint {
    downloads: u64,
}

#[derive(Debug, Clone, Copy)]
enum Period {
    LastMonth,
    LastYear,
}

impl Period {
    const fn as_str(self) -> &'static str {
        match self {
            Self::LastMonth => "last-month",
            Self::LastYear => "last-year",
        }
    }
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
    /// Create the adapter; download statistics calls share `limiter`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(settings: &AdapterSettings, limiter: Arc<RateLimiter>) -> crate::Result<Self> {
        Ok(Self {
            client: HttpClient::new(SourceId::Npm.label(), &ClientOptions::with_timeout(settings.timeout))?,
            endpoint: settings.endpoint(SourceId::Npm.api_url()),
            stats_endpoint: settings.stats_endpoint(DEFAULT_STATS_URL),
            limiter,
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        let mut query = build_query(params);
        query.push(("size", self.page_size.clone()));

        let response: SearchResponse = self.client.get_json(&self.endpoint, &query).await?;
        let projects = response.objects.into_iter().map(|o| map_package(o.package));

        let mut projects = join_all(projects.map(|p| self.with_downloads(p))).await;

        if params.wants(Characteristic::LargeCommunity) {
            projects.sort_by_key(|p| core::cmp::Reverse(p.stats.downloads.or(p.stats.monthly_downloads).unwrap_or(0)));
        }

        projects.truncate(self.max_results);
        Ok(projects)
    }

    async fn with_downloads(&self, mut project: CanonicalProject) -> CanonicalProject {
        project.stats.monthly_downloads = self.downloads(&project.name, Period::LastMonth).await;
        project.stats.downloads = self.downloads(&project.name, Period::LastYear).await;
        project
    }

    async fn downloads(&self, package: &str, period: Period) -> Option<u64> {
        self.limiter.acquire().await;

        let url = format!(
            "{}/downloads/point/{}/{}",
            self.stats_endpoint,
            period.as_str(),
            encode_path_segment(package)
        );

        match self.client.get_json::<DownloadsPoint>(&url, &[]).await {
            Ok(point) => Some(point.downloads),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not fetch {} downloads for '{package}': {e}", period.as_str());
                None
            }
        }
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::Npm.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

fn boost(params: &QueryParams, characteristic: Characteristic, boosted: &str) -> String {
    if params.wants(characteristic) { boosted } else { "1" }.to_string()
}

fn build_query(params: &QueryParams) -> Vec<(&'static str, String)> {
    let mut text = params.keyword_text();
    for language in params.languages() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(language);
    }

    if text.is_empty() {
        text = "popular".to_string();
    }

    vec![
        ("text", text),
        ("popularity", boost(params, Characteristic::LargeCommunity, "2")),
        ("quality", boost(params, Characteristic::GoodDocumentation, "1.5")),
        ("maintenance", boost(params, Characteristic::ActivelyMaintained, "1.5")),
    ]
}

fn map_package(package: Package) -> CanonicalProject {
    let url = package
        .links
        .and_then(|l| l.npm)
        .unwrap_or_else(|| format!("https://www.npmjs.com/package/{}", package.name));

    let language = if package.keywords.iter().any(|k| k.eq_ignore_ascii_case("typescript")) {
        "TypeScript"
    } else {
        "JavaScript"
    };

    let mut project = CanonicalProject::new(SourceId::Npm.label(), package.name, url);
    project.description = non_empty(package.description);
    project.language = Some(language.to_string());
    project.add_tags(&package.keywords);
    project.stats.forks = Some(0);
    project.stats.watchers = Some(0);
    project.stats.open_issues = Some(0);
    project.stats.closed_issues = Some(0);
    project.owner = package.publisher.map(|p| p.username);
    project.version = package.version;
    project.updated_at = package.date;
    project
}
