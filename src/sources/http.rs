//! HTTP plumbing shared by every source adapter.
//!
//! Requests carry a fixed timeout. Every failure is classified into a [`SourceError`] attributed to
//! the source that issued the request, so adapters can propagate with `?` and the orchestrator
//! reports them as partial errors.

use crate::discovery::SourceError;
use core::time::Duration;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

const LOG_TARGET: &str = "   sources";
const USER_AGENT: &str = concat!("project-scout/", env!("CARGO_PKG_VERSION"));

/// How an access token is presented to an API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScheme {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `PRIVATE-TOKEN: <token>`, as GitLab expects
    PrivateToken,
}

/// Options used to build an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions<'a> {
    pub timeout: Duration,
    pub accept: Option<&'a str>,
    pub token: Option<(&'a str, TokenScheme)>,
}

impl ClientOptions<'_> {
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            accept: None,
            token: None,
        }
    }
}

/// A JSON-over-HTTP client bound to one source
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    platform: &'static str,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client whose errors are attributed to `platform`
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the client cannot be built
    pub fn new(platform: &'static str, options: &ClientOptions<'_>) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();

        if let Some(accept) = options.accept {
            let _ = headers.insert(ACCEPT, HeaderValue::from_str(accept)?);
        }

        if let Some((token, scheme)) = options.token {
            let (name, value) = match scheme {
                TokenScheme::Bearer => (AUTHORIZATION, format!("Bearer {token}")),
                TokenScheme::PrivateToken => (HeaderName::from_static("private-token"), token.to_string()),
            };

            let mut value = HeaderValue::from_str(&value)?;
            value.set_sensitive(true);
            let _ = headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            client,
            platform,
            timeout: options.timeout,
        })
    }

    #[must_use]
    pub const fn platform(&self) -> &'static str {
        self.platform
    }

    /// GET `url` with the given query parameters and decode the JSON body
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] on timeout, network failure, a non-success status, or an undecodable body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, SourceError> {
        let request = self
            .client
            .get(url)
            .query(query)
            .build()
            .map_err(|e| SourceError::new(self.platform, format!("invalid request: {e}")))?;

        self.send(request).await
    }

    /// POST `body` as JSON to `url`, authenticated with a bearer token, and decode the JSON response
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] under the same conditions as [`Self::get_json`]
    pub async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(&self, url: &str, bearer: Option<&str>, body: &B) -> Result<T, SourceError> {
        let mut builder = self.client.post(url).json(body);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let request = builder
            .build()
            .map_err(|e| SourceError::new(self.platform, format!("invalid request: {e}")))?;

        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::Request) -> Result<T, SourceError> {
        log::debug!(target: LOG_TARGET, "{} {} URL: {}", self.platform, request.method(), request.url());

        let response = self.client.execute(request).await.map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map_or_else(|| status.as_u16().to_string(), ToString::to_string);
            return Err(SourceError::new(self.platform, format!("API request failed: {reason}")).with_status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::new(self.platform, format!("unexpected response: {e}")))
    }

    fn transport_error(&self, e: &reqwest::Error) -> SourceError {
        if e.is_timeout() {
            SourceError::new(self.platform, format!("request timed out after {}s", self.timeout.as_secs_f64()))
        } else {
            SourceError::new(self.platform, format!("network error: {e}"))
        }
    }
}
