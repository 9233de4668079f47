use super::Suggester;
use crate::Result;
use crate::config::Config;
use crate::discovery::{CanonicalProject, Preference, ProjectStats};
use crate::sources::{ClientOptions, HttpClient};
use core::time::Duration;
use futures_util::future::BoxFuture;
use ohno::{IntoAppError, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const LOG_TARGET: &str = "   suggest";

/// Platform label carried by every suggested project
pub const SUGGESTION_PLATFORM: &str = "AI Suggestion";

/// Environment variable holding the suggestion service's API key
pub const API_KEY_ENV: &str = "SCOUT_AI_API_KEY";

/// A JSON array of objects embedded in surrounding text
static ARRAY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\s*\{[\s\S]*\}\s*\]").expect("invalid regex"));

/// A comma directly before a closing brace or bracket
static TRAILING_COMMA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("invalid regex"));

const INSTRUCTIONS: &str = "Recommend real, existing, actively developed open-source projects matching the preferences. \
Respond with only a JSON array of objects with the fields name, description, language, tags, url and \
conceptual_difficulty (Beginner, Intermediate or Advanced).";

#[derive(Debug, Serialize)]
struct SuggestionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    instructions: &'static str,
    max_suggestions: usize,
    languages: &'a [String],
    topics: &'a [String],
    characteristics: Vec<&'static str>,
}

/// What the service may answer with: the array itself, or text that contains it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionResponse {
    Items(Vec<serde_json::Value>),
    Wrapped { text: String },
    Text(String),
}

#[derive(Debug, Deserialize)]
struct SuggestionItem {
    name: String,
    description: String,
    language: String,
    tags: Vec<String>,
    url: String,
    conceptual_difficulty: String,
}

/// Fetches suggestions from an HTTP endpoint.
///
/// The endpoint receives the preference as a JSON document and answers with an array of
/// suggestion objects. Construction never fails for a missing endpoint or key; those surface as
/// errors from [`Suggester::suggest`] only.
#[derive(Debug)]
pub struct HttpSuggester {
    client: HttpClient,
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    max_suggestions: usize,
}

impl HttpSuggester {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(
        endpoint: Option<String>,
        model: Option<String>,
        api_key: Option<String>,
        max_suggestions: usize,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(SUGGESTION_PLATFORM, &ClientOptions::with_timeout(timeout))?,
            endpoint,
            model,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            max_suggestions,
        })
    }

    /// Build a suggester from configuration, reading the API key from [`API_KEY_ENV`]
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.suggestions.endpoint.clone(),
            config.suggestions.model.clone(),
            std::env::var(API_KEY_ENV).ok(),
            config.suggestions.max_suggestions,
            config.request_timeout(),
        )
    }

    async fn fetch(&self, preference: &Preference) -> Result<Vec<CanonicalProject>> {
        let Some(api_key) = &self.api_key else {
            bail!("the suggestion service is not configured: set {API_KEY_ENV}");
        };

        let Some(endpoint) = &self.endpoint else {
            bail!("the suggestion service is not configured: set 'suggestions.endpoint' in the configuration");
        };

        let request = SuggestionRequest {
            model: self.model.as_deref(),
            instructions: INSTRUCTIONS,
            max_suggestions: self.max_suggestions,
            languages: preference.languages(),
            topics: preference.topics(),
            characteristics: preference.characteristics().iter().map(|c| c.label()).collect(),
        };

        log::info!(target: LOG_TARGET, "Requesting up to {} suggestion(s)", self.max_suggestions);

        let response: SuggestionResponse = self
            .client
            .post_json(endpoint, Some(api_key), &request)
            .await
            .into_app_err("could not get project suggestions")?;

        let mut projects = parse_response(response)?;
        projects.truncate(self.max_suggestions);
        Ok(projects)
    }
}

impl Suggester for HttpSuggester {
    fn suggest<'a>(&'a self, preference: &'a Preference) -> BoxFuture<'a, Result<Vec<CanonicalProject>>> {
        Box::pin(self.fetch(preference))
    }
}

fn parse_response(response: SuggestionResponse) -> Result<Vec<CanonicalProject>> {
    let values = match response {
        SuggestionResponse::Items(values) => values,
        SuggestionResponse::Wrapped { text } | SuggestionResponse::Text(text) => extract_items(&text)?,
    };

    let projects: Vec<_> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<SuggestionItem>(value) {
            Ok(item) => Some(to_project(item, index)),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Skipping malformed suggestion {index}: {e}");
                None
            }
        })
        .collect();

    if projects.is_empty() {
        bail!("no valid project suggestions found");
    }

    Ok(projects)
}

/// Pull the suggestion array out of free text, tolerating trailing commas
fn extract_items(text: &str) -> Result<Vec<serde_json::Value>> {
    let text = TRAILING_COMMA_REGEX.replace_all(text, "$1");
    let json = ARRAY_REGEX.find(&text).map_or(text.as_ref(), |m| m.as_str());
    serde_json::from_str(json).into_app_err("could not parse the suggestion response")
}

fn to_project(item: SuggestionItem, index: usize) -> CanonicalProject {
    let name = if item.name.trim().is_empty() {
        format!("AI Suggested Project {}", index + 1)
    } else {
        item.name
    };

    let url = if item.url.trim().is_empty() { "N/A".to_string() } else { item.url };

    let mut project = CanonicalProject::new(SUGGESTION_PLATFORM, name, url);
    project.description = Some(if item.description.trim().is_empty() {
        "No description provided.".to_string()
    } else {
        item.description
    });
    project.language = Some(if item.language.trim().is_empty() {
        "Unknown".to_string()
    } else {
        item.language
    });
    project.add_tags(&item.tags);
    if !item.conceptual_difficulty.trim().is_empty() {
        project.add_tags([format!("Difficulty: {}", item.conceptual_difficulty.trim())]);
    }
    project.stats = ProjectStats {
        stars: Some(0),
        forks: Some(0),
        watchers: Some(0),
        open_issues: Some(0),
        closed_issues: Some(0),
        ..ProjectStats::default()
    };
    project
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Characteristic;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn suggestion(name: &str) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "description": "A framework",
            "language": "JavaScript",
            "tags": ["frontend"],
            "url": format!("https://github.com/x/{name}"),
            "conceptual_difficulty": "Intermediate"
        })
    }

    fn suggester(endpoint: Option<String>, api_key: Option<&str>, max: usize) -> HttpSuggester {
        HttpSuggester::new(endpoint, Some("test-model".to_string()), api_key.map(ToString::to_string), max, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_extract_items_from_wrapped_text() {
        let text = "Here you go:\n```json\n[\n {\"name\": \"a\",},\n]\n```";
        let items = extract_items(text).unwrap();
        assert_eq!(items, [serde_json::json!({ "name": "a" })]);
    }

    #[test]
    fn test_to_project() {
        let item: SuggestionItem = serde_json::from_value(suggestion("vue")).unwrap();
        let project = to_project(item, 0);
        assert_eq!(project.platform, "AI Suggestion");
        assert_eq!(project.tags, ["frontend", "Difficulty: Intermediate"]);
        assert_eq!(project.stats.stars, Some(0));
        assert_eq!(project.stats.downloads, None);
    }

    #[test]
    fn test_malformed_items_are_skipped() {
        let response = SuggestionResponse::Items(vec![suggestion("ok"), serde_json::json!({ "name": "partial" })]);
        let projects = parse_response(response).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "ok");

        assert!(parse_response(SuggestionResponse::Items(vec![])).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_is_an_error() {
        let preference = Preference::new("rust", "", []);
        let err = suggester(Some("http://localhost:1".to_string()), None, 5)
            .suggest(&preference)
            .await
            .unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV), "{err}");

        let err = suggester(None, Some("key"), 5).suggest(&preference).await.unwrap_err();
        assert!(err.to_string().contains("suggestions.endpoint"), "{err}");
    }

    #[tokio::test]
    async fn test_suggest_posts_preference() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/suggest"))
            .and(header("authorization", "Bearer key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "languages": ["javascript"],
                "characteristics": ["Beginner-Friendly"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                suggestion("one"),
                suggestion("two"),
                suggestion("three")
            ])))
            .mount(&server)
            .await;

        let preference = Preference::new("JavaScript", "", [Characteristic::BeginnerFriendly]);
        let projects = suggester(Some(format!("{}/suggest", server.uri())), Some("key"), 2)
            .suggest(&preference)
            .await
            .unwrap();

        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[tokio::test]
    async fn test_suggest_accepts_text_response() {
        let server = MockServer::start().await;
        let text = format!("Sure! [{}]", suggestion("vue"));
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "text": text })))
            .mount(&server)
            .await;

        let projects = suggester(Some(server.uri()), Some("key"), 5)
            .suggest(&Preference::new("", "web", []))
            .await
            .unwrap();
        assert_eq!(projects[0].name, "vue");
    }
}
