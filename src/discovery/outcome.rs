use super::project::CanonicalProject;
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// A failure confined to one source.
///
/// The `Display` form is the partial-error line reported to the caller:
/// `"<Source>: <message>"`, followed by `" (Status: <code>)"` when the HTTP status is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceError {
    pub platform: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl SourceError {
    #[must_use]
    pub fn new(platform: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.platform, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (Status: {status})")?;
        }
        Ok(())
    }
}

impl core::error::Error for SourceError {}

/// The settled result of one adapter invocation
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success { platform: String, records: Vec<CanonicalProject> },
    Failure(SourceError),
}

impl FetchOutcome {
    /// Wrap an adapter's result, attributing it to `platform`
    #[must_use]
    pub fn settle(platform: &str, result: Result<Vec<CanonicalProject>, SourceError>) -> Self {
        match result {
            Ok(records) => Self::Success {
                platform: platform.to_string(),
                records,
            },
            Err(e) => Self::Failure(e),
        }
    }

    #[must_use]
    pub fn platform(&self) -> &str {
        match self {
            Self::Success { platform, .. } => platform,
            Self::Failure(e) => &e.platform,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
