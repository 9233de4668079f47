//! Integration tests for the discovery pipeline.
//!
//! Stub sources stand in for real registries so that merge, precedence and failure isolation can
//! be checked without a network. One test drives the real GitHub adapter against a local server
//! that never answers in time.

use core::time::Duration;
use futures_util::future::BoxFuture;
use project_scout::discovery::{CanonicalProject, DiscoveryError, Orchestrator, Preference, QueryParams, SourceError};
use project_scout::sources::{AdapterSettings, SourceAdapter, github};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A source that always returns the same records, or always fails, after an optional delay
#[derive(Debug)]
struct StubSource {
    label: &'static str,
    response: Result<Vec<CanonicalProject>, SourceError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubSource {
    fn ok(label: &'static str, records: Vec<CanonicalProject>) -> Arc<Self> {
        Self::slow(label, Duration::ZERO, records)
    }

    fn slow(label: &'static str, delay: Duration, records: Vec<CanonicalProject>) -> Arc<Self> {
        Arc::new(Self {
            label,
            response: Ok(records),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(label: &'static str, error: SourceError) -> Arc<Self> {
        Arc::new(Self {
            label,
            response: Err(error),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }
}

impl SourceAdapter for StubSource {
    fn label(&self) -> &str {
        self.label
    }

    fn fetch<'a>(&'a self, _params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        let _ = self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response.clone()
        })
    }
}

fn project(platform: &str, name: &str, url: &str, stars: u64) -> CanonicalProject {
    let mut project = CanonicalProject::new(platform, name, url);
    project.language = Some("Rust".to_string());
    project.stats.stars = Some(stars);
    project
}

fn orchestrator(sources: &[Arc<StubSource>]) -> Orchestrator {
    Orchestrator::new(sources.iter().map(|s| Arc::clone(s) as Arc<dyn SourceAdapter>).collect())
}

#[tokio::test]
async fn test_duplicate_keeps_earlier_source() {
    let a = StubSource::ok("Source A", vec![project("Source A", "tool", "https://github.com/acme/tool", 500)]);
    let b = StubSource::ok("Source B", vec![project("Source B", "tool", "https://github.com/Acme/Tool", 10)]);

    let result = orchestrator(&[a, b])
        .discover(&Preference::new("rust", "", []))
        .await
        .unwrap();

    assert_eq!(result.records().len(), 1);
    assert_eq!(result.records()[0].stats.stars, Some(500));
    assert_eq!(result.records()[0].platform, "Source A");
    assert!(result.partial_errors().is_empty());
}

#[tokio::test]
async fn test_precedence_follows_declaration_not_completion() {
    let slow = StubSource::slow(
        "Slow Source",
        Duration::from_millis(300),
        vec![project("Slow Source", "tool", "https://github.com/acme/tool", 500)],
    );
    let fast = StubSource::ok("Fast Source", vec![project("Fast Source", "tool", "https://github.com/acme/tool", 10)]);

    let result = orchestrator(&[slow, fast])
        .discover(&Preference::new("rust", "", []))
        .await
        .unwrap();

    assert_eq!(result.records().len(), 1);
    assert_eq!(result.records()[0].stats.stars, Some(500));
    assert_eq!(result.records()[0].platform, "Slow Source");
}

#[tokio::test]
async fn test_failing_source_is_isolated() {
    let a = StubSource::ok("Source A", vec![project("Source A", "a", "https://example.com/a", 5)]);
    let broken = StubSource::failing(
        "Broken",
        SourceError::new("Broken", "API request failed: Service Unavailable").with_status(503),
    );
    let c = StubSource::ok("Source C", vec![project("Source C", "c", "https://example.com/c", 50)]);

    let result = orchestrator(&[a, broken, c])
        .discover(&Preference::new("rust", "cli", []))
        .await
        .unwrap();

    let names: Vec<_> = result.records().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["c", "a"]);
    assert_eq!(
        result.partial_error_messages(),
        ["Broken: API request failed: Service Unavailable (Status: 503)"]
    );
}

#[tokio::test]
async fn test_timed_out_source_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "items": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(Duration::from_millis(200), 10).with_base_url(format!("{}/search/repositories", server.uri()));
    let slow: Arc<dyn SourceAdapter> = Arc::new(github::Adapter::new(&settings, None).unwrap());

    let a: Arc<dyn SourceAdapter> = StubSource::ok("Source A", vec![project("Source A", "a", "https://example.com/a", 1)]);
    let c: Arc<dyn SourceAdapter> = StubSource::ok("Source C", vec![project("Source C", "c", "https://example.com/c", 2)]);

    let started = std::time::Instant::now();
    let result = Orchestrator::new(vec![a, slow, c])
        .discover(&Preference::new("rust", "", []))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(result.records().len(), 2);
    assert!(result.records().iter().all(|p| p.platform != "GitHub"));

    let errors = result.partial_error_messages();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("GitHub: "), "{}", errors[0]);
}

#[tokio::test]
async fn test_repeated_discovery_is_identical() {
    let a = StubSource::ok(
        "Source A",
        vec![
            project("Source A", "one", "https://example.com/one", 10),
            project("Source A", "two", "https://example.com/two", 10),
        ],
    );
    let b = StubSource::ok(
        "Source B",
        vec![
            project("Source B", "three", "https://example.com/three", 30),
            project("Source B", "one-again", "https://EXAMPLE.com/one", 99),
        ],
    );

    let orchestrator = orchestrator(&[a, b]);
    let preference = Preference::new("rust", "", []);
    let first = orchestrator.discover(&preference).await.unwrap();
    let second = orchestrator.discover(&preference).await.unwrap();

    assert_eq!(first, second);

    let names: Vec<_> = first.records().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["three", "one", "two"]);
}

#[tokio::test]
async fn test_all_sources_failing_still_succeeds() {
    let a = StubSource::failing("Source A", SourceError::new("Source A", "network error: refused"));
    let b = StubSource::failing("Source B", SourceError::new("Source B", "unexpected response: eof"));

    let result = orchestrator(&[a, b])
        .discover(&Preference::new("", "web", []))
        .await
        .unwrap();

    assert!(result.records().is_empty());
    assert_eq!(result.partial_errors().len(), 2);
    assert_eq!(result.partial_errors()[0].platform, "Source A");
    assert_eq!(result.partial_errors()[1].platform, "Source B");
}

#[tokio::test]
async fn test_empty_preference_contacts_no_source() {
    let a = StubSource::ok("Source A", vec![project("Source A", "a", "https://example.com/a", 1)]);

    let err = orchestrator(&[Arc::clone(&a)])
        .discover(&Preference::new(" , ", "", []))
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::EmptyPreference));
    assert_eq!(a.calls.load(Ordering::SeqCst), 0);
}
