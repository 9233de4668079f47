//! Source adapters, one per external registry.
//!
//! Every adapter implements [`SourceAdapter`]: it renders [`QueryParams`] in its registry's query
//! dialect, issues the request through a shared [`HttpClient`], and maps the payload into
//! [`CanonicalProject`] records. Per-source mapping rules stay inside the adapter's module.

mod catalog;
pub mod codeberg;
pub mod crates_io;
pub mod github;
pub mod gitlab;
mod http;
pub mod maven;
pub mod npm;
pub mod nuget;
pub mod packagist;
mod unsupported;

use crate::discovery::{CanonicalProject, QueryParams, SourceError};
use core::fmt::Debug;
use core::time::Duration;
use futures_util::future::BoxFuture;

pub use catalog::build_adapters;
pub use http::{ClientOptions, HttpClient, TokenScheme};
pub use unsupported::UnsupportedAdapter;

/// The fixed interface every source implements
pub trait SourceAdapter: Send + Sync + Debug {
    /// Display label used on records and partial errors
    fn label(&self) -> &str;

    /// Search the source and return at most the configured number of records
    fn fetch<'a>(&'a self, params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>>;
}

/// Access tokens supplied through the environment or command line
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub gitlab_token: Option<String>,
}

/// Construction settings common to all adapters
#[derive(Debug, Clone)]
pub struct AdapterSettings {
    /// Replaces the adapter's default search endpoint
    pub base_url: Option<String>,
    /// Replaces the host used for per-package statistics
    pub stats_base_url: Option<String>,
    pub timeout: Duration,
    pub max_results: usize,
}

impl AdapterSettings {
    #[must_use]
    pub const fn new(timeout: Duration, max_results: usize) -> Self {
        Self {
            base_url: None,
            stats_base_url: None,
            timeout,
            max_results,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_stats_base_url(mut self, stats_base_url: impl Into<String>) -> Self {
        self.stats_base_url = Some(stats_base_url.into());
        self
    }

    fn endpoint(&self, default: &str) -> String {
        self.base_url.as_deref().unwrap_or(default).trim_end_matches('/').to_string()
    }

    fn stats_endpoint(&self, default: &str) -> String {
        self.stats_base_url.as_deref().unwrap_or(default).trim_end_matches('/').to_string()
    }

    /// Page size to request, bounded by what the API accepts
    fn page_size(&self, api_max: usize) -> String {
        self.max_results.min(api_max).to_string()
    }
}

/// Upper-case the first character, leaving the rest untouched
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

/// Percent-encode a package name for use as a single path segment
pub(crate) fn encode_path_segment(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("rust"), "Rust");
        assert_eq!(capitalize("csharp"), "Csharp");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("@types/node"), "%40types%2Fnode");
        assert_eq!(encode_path_segment("left-pad"), "left-pad");
    }

    #[test]
    fn test_settings_endpoints() {
        let settings = AdapterSettings::new(Duration::from_secs(10), 50).with_base_url("http://localhost:1234/");
        assert_eq!(settings.endpoint("https://example.com"), "http://localhost:1234");
        assert_eq!(settings.stats_endpoint("https://stats.example.com"), "https://stats.example.com");
        assert_eq!(settings.page_size(20), "20");
        assert_eq!(settings.page_size(100), "50");
    }
}
