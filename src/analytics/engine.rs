use super::model::{Platform, ProjectAnalytics};
use super::repo_ref::RepoRef;
use super::{codeberg, github, gitlab};
use crate::Result;
use crate::config::Config;
use crate::discovery::CanonicalProject;
use crate::sources::Credentials;
use chrono::Utc;
use core::time::Duration;
use ohno::EnrichableExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const LOG_TARGET: &str = " analytics";

/// Where and how the engine reaches each hosting platform
#[derive(Debug, Clone)]
pub struct AnalyticsSettings {
    pub timeout: Duration,
    pub github_api_url: String,
    pub gitlab_api_url: String,
    pub codeberg_api_url: String,
    pub credentials: Credentials,
}

impl AnalyticsSettings {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            github_api_url: github::DEFAULT_API_URL.to_string(),
            gitlab_api_url: gitlab::DEFAULT_API_URL.to_string(),
            codeberg_api_url: codeberg::DEFAULT_API_URL.to_string(),
            credentials: Credentials::default(),
        }
    }

    /// Point one platform at a different API root
    #[must_use]
    pub fn with_api_url(mut self, platform: Platform, url: impl Into<String>) -> Self {
        let url = url.into();
        match platform {
            Platform::Github => self.github_api_url = url,
            Platform::Gitlab => self.gitlab_api_url = url,
            Platform::Codeberg => self.codeberg_api_url = url,
            Platform::Other => {}
        }
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Key under which analytics are cached: the project id and its URL
type CacheKey = (String, String);

/// Session store of computed analytics.
///
/// Entries are keyed by project id and URL, so a project whose URL changes is analyzed afresh.
#[derive(Debug, Default)]
pub struct AnalyticsCache {
    disabled: bool,
    entries: Mutex<HashMap<CacheKey, Arc<ProjectAnalytics>>>,
}

impl AnalyticsCache {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            disabled: !enabled,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn key(project: &CanonicalProject) -> CacheKey {
        (project.project_id(), project.url.clone())
    }

    #[must_use]
    pub fn get(&self, project: &CanonicalProject) -> Option<Arc<ProjectAnalytics>> {
        if self.disabled {
            return None;
        }

        self.entries.lock().expect("lock not poisoned").get(&Self::key(project)).cloned()
    }

    /// Store analytics for a project, returning whichever entry ends up cached
    pub fn insert(&self, project: &CanonicalProject, analytics: ProjectAnalytics) -> Arc<ProjectAnalytics> {
        let analytics = Arc::new(analytics);
        if self.disabled {
            return analytics;
        }

        let mut entries = self.entries.lock().expect("lock not poisoned");
        Arc::clone(entries.entry(Self::key(project)).or_insert(analytics))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("lock not poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes [`ProjectAnalytics`] for projects on the supported hosting platforms.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    github: github::Fetcher,
    gitlab: gitlab::Fetcher,
    codeberg: codeberg::Fetcher,
}

impl AnalyticsEngine {
    pub fn new(settings: &AnalyticsSettings) -> Result<Self> {
        let credentials = &settings.credentials;
        Ok(Self {
            github: github::Fetcher::new(&settings.github_api_url, credentials.github_token.as_deref(), settings.timeout)?,
            gitlab: gitlab::Fetcher::new(&settings.gitlab_api_url, credentials.gitlab_token.as_deref(), settings.timeout)?,
            codeberg: codeberg::Fetcher::new(&settings.codeberg_api_url, settings.timeout)?,
        })
    }

    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        Self::new(&AnalyticsSettings::new(config.request_timeout()).with_credentials(credentials.clone()))
    }

    /// Platform whose API describes a project: its source label if that is a hosting platform,
    /// otherwise the host of its URL
    #[must_use]
    pub fn platform_of(project: &CanonicalProject) -> Platform {
        Platform::from_label(&project.platform).unwrap_or_else(|| {
            url::Url::parse(&project.url)
                .ok()
                .and_then(|u| u.host_str().map(Platform::from_host))
                .unwrap_or(Platform::Other)
        })
    }

    /// Analytics for a project, computed on first request and then served from `cache`.
    ///
    /// Projects on unsupported platforms get zeroed placeholder analytics.
    pub async fn get_analytics(&self, project: &CanonicalProject, cache: &AnalyticsCache) -> Result<Arc<ProjectAnalytics>> {
        if let Some(analytics) = cache.get(project) {
            log::debug!(target: LOG_TARGET, "Using cached analytics for '{}'", project.url);
            return Ok(analytics);
        }

        let analytics = self
            .compute(project)
            .await
            .map_err(|e| e.enrich_with(|| format!("could not analyze '{}'", project.name)))?;

        Ok(cache.insert(project, analytics))
    }

    async fn compute(&self, project: &CanonicalProject) -> Result<ProjectAnalytics> {
        let now = Utc::now();
        let platform = Self::platform_of(project);

        if platform == Platform::Other {
            log::info!(target: LOG_TARGET, "No analytics available for '{}', using placeholder", project.url);
            return Ok(ProjectAnalytics::placeholder(Platform::Other, now));
        }

        let repo = RepoRef::parse(&project.url, Some(platform))?;
        match platform {
            Platform::Github => self.github.fetch(&repo, now).await,
            Platform::Gitlab => self.gitlab.fetch(&repo, now).await,
            Platform::Codeberg => self.codeberg.fetch(&repo, now).await,
            Platform::Other => Ok(ProjectAnalytics::placeholder(Platform::Other, now)),
        }
    }
}

/// A minimal project record for a repository URL, for analyzing projects that did not come from discovery
pub fn project_for_url(url: &str, platform: Option<Platform>) -> Result<CanonicalProject> {
    let host_platform = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(Platform::from_host))
        .unwrap_or(Platform::Other);

    match platform.unwrap_or(host_platform) {
        Platform::Other => Ok(CanonicalProject::new(Platform::Other.label(), url, url)),
        platform => {
            let repo = RepoRef::parse(url, Some(platform))?;
            Ok(CanonicalProject::new(platform.label(), repo.full_name(), url))
        }
    }
}
