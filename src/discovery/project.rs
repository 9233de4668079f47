use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric statistics reported by a source.
///
/// `None` means the source did not report the figure; it is never conflated with zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watchers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_issues: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_issues: Option<u64>,

    /// All-time (or longest available window) downloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
    /// Downloads over the source's notion of "recent" (90 days on crates.io)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_downloads: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_downloads: Option<u64>,
}

/// A project normalized from any source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProject {
    pub name: String,
    /// Display label of the source the record came from
    pub platform: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub stats: ProjectStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CanonicalProject {
    #[must_use]
    pub fn new(platform: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: platform.into(),
            url: url.into(),
            description: None,
            language: None,
            tags: Vec::new(),
            stats: ProjectStats::default(),
            owner: None,
            version: None,
            updated_at: None,
        }
    }

    /// Identity used to merge records across sources
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.url.to_lowercase()
    }

    /// Stable identifier of the form `<platform>-<name>`, both lower-cased
    #[must_use]
    pub fn project_id(&self) -> String {
        format!("{}-{}", self.platform.to_lowercase(), self.name.to_lowercase())
    }

    /// Popularity proxy: stars if known, else downloads / 100, else 0
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "popularity is an approximate ranking signal")]
    pub fn popularity(&self) -> f64 {
        match (self.stats.stars, self.stats.downloads) {
            (Some(stars), _) => stars as f64,
            (None, Some(downloads)) => downloads as f64 / 100.0,
            (None, None) => 0.0,
        }
    }

    /// Last-updated time in milliseconds since the epoch, 0 when unknown
    #[must_use]
    pub fn updated_millis(&self) -> i64 {
        self.updated_at.map_or(0, |t| t.timestamp_millis())
    }

    /// Append tags, skipping blanks and tags already present (case-insensitive)
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                self.tags.push(tag.to_string());
            }
        }
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Treat empty strings from a source payload as absent
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
