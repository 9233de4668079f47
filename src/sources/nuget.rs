//! NuGet (.NET) package search.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, Characteristic, QueryParams, SourceError, non_empty};
use futures_util::future::BoxFuture;
use serde::Deserialize;

const API_MAX_PAGE_SIZE: usize = 1000;
const DOTNET_LANGUAGES: &[&str] = &["c#", "f#", "vb.net", ".net", "csharp", "vb"];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PackageItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageItem {
    id: String,
    version: Option<String>,
    description: Option<String>,
    authors: Option<Authors>,
    project_url: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    total_downloads: Option<u64>,
}

/// The feed has returned both shapes over time
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Authors {
    One(String),
    Many(Vec<String>),
}

impl Authors {
    fn joined(self) -> String {
        match self {
            Self::One(author) => author,
            Self::Many(authors) => authors.join(", "),
        }
    }
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
            client: HttpClient::new(SourceId::Nuget.label(), &ClientOptions::with_timeout(settings.timeout))?,
            endpoint: settings.endpoint(SourceId::Nuget.api_url()),
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        if !params.primary_language_in(DOTNET_LANGUAGES) {
            return Ok(Vec::new());
        }

        let query = [
            ("q", search_text(params)),
            ("take", self.page_size.clone()),
            ("prerelease", "false".to_string()),
        ];

        let response: SearchResponse = self.client.get_json(&self.endpoint, &query).await?;
        let mut projects: Vec<_> = response.data.into_iter().map(map_item).collect();

        if params.wants(Characteristic::LargeCommunity) {
            projects.sort_by_key(|p| core::cmp::Reverse(p.stats.downloads.unwrap_or(0)));
        }

        projects.truncate(self.max_results);
        Ok(projects)
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::Nuget.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

fn search_text(params: &QueryParams) -> String {
    let default = if params.any_language_in(DOTNET_LANGUAGES) { "package" } else { "library" };
    params.keyword_text_or(default)
}

fn map_item(item: PackageItem) -> CanonicalProject {
    let url = non_empty(item.project_url).unwrap_or_else(|| format!("https://www.nuget.org/packages/{}/", item.id));

    let mut project = CanonicalProject::new(SourceId::Nuget.label(), item.id, url);
    project.description = non_empty(item.description);
    project.language = Some("C#".to_string());
    project.add_tags(&item.tags);
    project.stats.downloads = Some(item.total_downloads.unwrap_or(0));
    project.stats.forks = Some(0);
    project.stats.watchers = Some(0);
    project.stats.open_issues = Some(0);
    project.stats.closed_issues = Some(0);
    project.owner = item.authors.map(Authors::joined).filter(|a| !a.is_empty());
    project.version = item.version;
    project
}
