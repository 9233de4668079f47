//! Maven Central artifact search through the Solr endpoint.

use super::{AdapterSettings, ClientOptions, HttpClient, SourceAdapter, capitalize};
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, QueryParams, SourceError};
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::Deserialize;

const API_MAX_PAGE_SIZE: usize = 200;
const JVM_LANGUAGES: &[&str] = &["java", "kotlin", "scala", "groovy"];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: Docs,
}

#[derive(Debug, Deserialize)]
struct Docs {
    #[serde(default)]
    docs: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    g: String,
    a: String,
    latest_version: Option<String>,
    /// Milliseconds since the epoch
    timestamp: Option<i64>,
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
            client: HttpClient::new(SourceId::MavenCentral.label(), &ClientOptions::with_timeout(settings.timeout))?,
            endpoint: settings.endpoint(SourceId::MavenCentral.api_url()),
            max_results: settings.max_results,
            page_size: settings.page_size(API_MAX_PAGE_SIZE),
        })
    }

    async fn search(&self, params: &QueryParams) -> Result<Vec<CanonicalProject>, SourceError> {
        if !params.primary_language_in(JVM_LANGUAGES) {
            return Ok(Vec::new());
        }

        let query = [
            ("q", params.keyword_text_or("library")),
            ("rows", self.page_size.clone()),
            ("wt", "json".to_string()),
        ];

        let response: SearchResponse = self.client.get_json(&self.endpoint, &query).await?;
        let language = params.primary_language().map_or_else(|| "Java".to_string(), capitalize);

        Ok(response
            .response
            .docs
            .into_iter()
            .take(self.max_results)
            .map(|doc| map_artifact(doc, &language))
            .collect())
    }
}

impl SourceAdapter for Adapter {
    fn label(&self) -> &str {
        SourceId::MavenCentral.label()
    }

    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        Box::pin(self.search(params))
    }
}

fn map_artifact(artifact: Artifact, language: &str) -> CanonicalProject {
    let url = format!("https://central.sonatype.com/artifact/{}/{}", artifact.g, artifact.a);
    let name = format!("{}:{}", artifact.g, artifact.a);

    let mut project = CanonicalProject::new(SourceId::MavenCentral.label(), name, url);
    project.language = Some(language.to_string());
    project.stats.forks = Some(0);
    project.stats.watchers = Some(0);
    project.stats.open_issues = Some(0);
    project.stats.closed_issues = Some(0);
    project.version = artifact.latest_version;
    project.updated_at = artifact.timestamp.and_then(DateTime::<Utc>::from_timestamp_millis);
    project.owner = Some(artifact.g);
    project
}
