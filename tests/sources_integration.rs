//! Integration tests for the source adapters.
//!
//! Each adapter is pointed at a local mock server through its base URL override and exercised
//! through the [`SourceAdapter`] interface only.

use camino::Utf8Path;
use core::time::Duration;
use project_scout::config::Config;
use project_scout::discovery::{Characteristic, Orchestrator, Preference, QueryParams, RateLimiter};
use project_scout::sources::{AdapterSettings, Credentials, SourceAdapter, codeberg, crates_io, github, gitlab, npm};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn params(languages: &str, topics: &str, characteristics: &[Characteristic]) -> QueryParams {
    QueryParams::translate(&Preference::new(languages, topics, characteristics.iter().copied()))
}

fn github_repo(full_name: &str, stars: u64) -> serde_json::Value {
    serde_json::json!({
        "full_name": full_name,
        "description": "A project",
        "html_url": format!("https://github.com/{full_name}"),
        "language": "Rust",
        "topics": ["cli"],
        "stargazers_count": stars,
        "forks_count": 3,
        "watchers_count": stars,
        "open_issues_count": 1,
        "pushed_at": "2024-06-01T00:00:00Z",
        "owner": { "login": "acme" }
    })
}

#[tokio::test]
async fn test_github_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "language:\"rust\" topic:\"cli\""))
        .and(query_param("sort", "stars"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [github_repo("acme/one", 10), github_repo("acme/two", 20), github_repo("acme/three", 30)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(TIMEOUT, 2).with_base_url(format!("{}/search/repositories", server.uri()));
    let adapter = github::Adapter::new(&settings, Some("ghp_test")).unwrap();

    let records = adapter.fetch(&params("rust", "cli", &[])).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "acme/one");
    assert_eq!(records[0].platform, "GitHub");
    assert_eq!(records[0].stats.stars, Some(10));
    assert_eq!(records[0].tags, ["cli", "Rust"]);
}

#[tokio::test]
async fn test_github_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(TIMEOUT, 10).with_base_url(server.uri());
    let adapter = github::Adapter::new(&settings, None).unwrap();

    let err = adapter.fetch(&params("go", "", &[])).await.unwrap_err();
    assert_eq!(err.platform, "GitHub");
    assert_eq!(err.status, Some(403));
    assert!(err.to_string().ends_with("(Status: 403)"), "{err}");
}

#[tokio::test]
async fn test_github_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(TIMEOUT, 10).with_base_url(server.uri());
    let adapter = github::Adapter::new(&settings, None).unwrap();

    let err = adapter.fetch(&params("go", "", &[])).await.unwrap_err();
    assert_eq!(err.status, None);
    assert!(err.message.starts_with("unexpected response"), "{err}");
}

#[tokio::test]
async fn test_gitlab_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/projects"))
        .and(query_param("with_programming_language", "csharp"))
        .and(query_param("statistics", "true"))
        .and(header("private-token", "glpat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "path_with_namespace": "group/tool",
            "description": "",
            "web_url": "https://gitlab.com/group/tool",
            "topics": ["dotnet"],
            "star_count": 42,
            "forks_count": 4,
            "last_activity_at": "2024-02-01T00:00:00Z",
            "namespace": { "name": "group" },
            "statistics": { "open_issues_count": 7 }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(TIMEOUT, 10).with_base_url(format!("{}/api/v4/projects", server.uri()));
    let adapter = gitlab::Adapter::new(&settings, Some("glpat-test")).unwrap();

    let records = adapter.fetch(&params("C#", "", &[])).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.platform, "GitLab");
    assert_eq!(record.name, "group/tool");
    assert_eq!(record.description, None);
    assert_eq!(record.stats.stars, Some(42));
    assert_eq!(record.stats.open_issues, Some(7));
    assert_eq!(record.owner.as_deref(), Some("group"));
}

#[tokio::test]
async fn test_codeberg_search_keeps_unreported_stats_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/repos/search"))
        .and(query_param("language", "go"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ok": true,
            "data": [
                { "full_name": "forge/quiet", "html_url": "https://codeberg.org/forge/quiet" },
                { "full_name": "forge/starred", "html_url": "https://codeberg.org/forge/starred", "stars_count": 3 }
            ]
        })))
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(TIMEOUT, 10).with_base_url(format!("{}/api/v1/repos/search", server.uri()));
    let adapter = codeberg::Adapter::new(&settings).unwrap();

    let records = adapter.fetch(&params("go", "", &[])).await.unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.platform, "Codeberg");
    assert_eq!(record.name, "forge/starred");
    assert_eq!(record.stats.stars, Some(3));
    assert_eq!(record.stats.forks, None);
    assert_eq!(record.stats.watchers, None);
    assert_eq!(record.stats.open_issues, None);
}

#[tokio::test]
async fn test_npm_search_with_downloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .and(query_param("text", "testing typescript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objects": [
                { "package": { "name": "small", "keywords": ["TypeScript"] } },
                { "package": { "name": "@scope/big", "keywords": [] } }
            ]
        })))
        .mount(&server)
        .await;

    for (package, month, year) in [("small", 10, 100), ("%40scope%2Fbig", 1000, 20000)] {
        Mock::given(method("GET"))
            .and(path(format!("/downloads/point/last-month/{package}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "downloads": month })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/downloads/point/last-year/{package}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "downloads": year })))
            .mount(&server)
            .await;
    }

    let settings = AdapterSettings::new(TIMEOUT, 10)
        .with_base_url(format!("{}/-/v1/search", server.uri()))
        .with_stats_base_url(server.uri());
    let limiter = RateLimiter::new(10, 10, Duration::from_millis(10));
    let adapter = npm::Adapter::new(&settings, limiter).unwrap();

    let records = adapter
        .fetch(&params("typescript", "testing", &[Characteristic::LargeCommunity]))
        .await
        .unwrap();

    let names: Vec<_> = records.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["@scope/big", "small"]);
    assert_eq!(records[0].stats.downloads, Some(20000));
    assert_eq!(records[0].stats.monthly_downloads, Some(1000));
    assert_eq!(records[1].language.as_deref(), Some("TypeScript"));
}

#[tokio::test]
async fn test_npm_missing_downloads_do_not_fail_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objects": [{ "package": { "name": "lonely" } }]
        })))
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(TIMEOUT, 10)
        .with_base_url(format!("{}/-/v1/search", server.uri()))
        .with_stats_base_url(server.uri());
    let adapter = npm::Adapter::new(&settings, RateLimiter::new(5, 5, Duration::from_millis(10))).unwrap();

    let records = adapter.fetch(&params("javascript", "", &[])).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].stats.downloads, None);
    assert_eq!(records[0].url, "https://www.npmjs.com/package/lonely");
}

#[tokio::test]
async fn test_crates_io_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/crates"))
        .and(query_param("q", "async"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "crates": [{
                "name": "tokio",
                "description": "An event-driven runtime",
                "repository": "https://github.com/tokio-rs/tokio",
                "downloads": 300_000_000,
                "recent_downloads": 40_000_000,
                "max_version": "1.40.0",
                "updated_at": "2024-09-01T00:00:00Z",
                "keywords": ["async", "io"]
            }]
        })))
        .mount(&server)
        .await;

    let settings = AdapterSettings::new(TIMEOUT, 10).with_base_url(format!("{}/api/v1/crates", server.uri()));
    let adapter = crates_io::Adapter::new(&settings).unwrap();

    let records = adapter.fetch(&params("rust", "async", &[])).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].platform, "Crates.io");
    assert_eq!(records[0].url, "https://github.com/tokio-rs/tokio");
    assert_eq!(records[0].stats.downloads, Some(300_000_000));
    assert_eq!(records[0].version.as_deref(), Some("1.40.0"));
}

#[tokio::test]
async fn test_configured_sources_merge_in_declaration_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/github"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [github_repo("tokio-rs/tokio", 500)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/crates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "crates": [
                { "name": "tokio", "repository": "https://github.com/tokio-rs/tokio", "downloads": 10 },
                { "name": "mio", "repository": "https://github.com/tokio-rs/mio", "downloads": 100 }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gitlab"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let yaml = format!(
        "request_timeout_secs: 5\n\
         sources:\n  \
           - id: github\n    base_url: {uri}/github\n  \
           - id: gitlab\n    base_url: {uri}/gitlab\n  \
           - id: crates-io\n    base_url: {uri}/crates\n",
        uri = server.uri()
    );
    let config = Config::parse(Utf8Path::new("scout.yml"), &yaml).unwrap();

    let orchestrator = Orchestrator::from_config(&config, &Credentials::default()).unwrap();
    assert_eq!(orchestrator.sources().collect::<Vec<_>>(), ["GitHub", "GitLab", "Crates.io"]);

    let result = orchestrator.discover(&Preference::new("rust", "", [])).await.unwrap();

    assert_eq!(result.records().len(), 2);
    assert_eq!(result.records()[0].name, "tokio-rs/tokio");
    assert_eq!(result.records()[0].platform, "GitHub");
    assert_eq!(result.records()[1].name, "mio");
    assert_eq!(result.partial_error_messages(), ["GitLab: API request failed: Internal Server Error (Status: 500)"]);
}
