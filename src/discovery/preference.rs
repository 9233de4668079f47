use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};

/// Project traits a user can ask for in addition to languages and topics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, StrumDisplay, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Characteristic {
    BeginnerFriendly,
    GoodFirstIssues,
    ActivelyMaintained,
    GoodDocumentation,
    LargeCommunity,
    CuttingEdgeTech,
    NeedsContributors,
}

impl Characteristic {
    /// Display label, which doubles as the free-text keyword sent to sources
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BeginnerFriendly => "Beginner-Friendly",
            Self::GoodFirstIssues => "Good First Issues",
            Self::ActivelyMaintained => "Actively Maintained",
            Self::GoodDocumentation => "Good Documentation",
            Self::LargeCommunity => "Large Community",
            Self::CuttingEdgeTech => "Cutting-Edge Tech",
            Self::NeedsContributors => "Needs Contributors",
        }
    }
}

/// Errors that reject a discovery request before any source is contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryError {
    /// No language, topic, or characteristic was supplied
    EmptyPreference,
}

impl Display for DiscoveryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyPreference => write!(f, "at least one language, topic, or characteristic is required"),
        }
    }
}

impl core::error::Error for DiscoveryError {}

/// What the user is looking for in a single discovery run.
///
/// Languages and topics are normalized on construction: split on commas, trimmed, lower-cased, with
/// empty tokens and repeats dropped. Order of first appearance is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preference {
    languages: Vec<String>,
    topics: Vec<String>,
    characteristics: Vec<Characteristic>,
}

impl Preference {
    /// Build a preference from comma-separated language and topic lists
    #[must_use]
    pub fn new(languages: &str, topics: &str, characteristics: impl IntoIterator<Item = Characteristic>) -> Self {
        Self::from_terms([languages], [topics], characteristics)
    }

    /// Build a preference from several comma-separated fragments per field
    #[must_use]
    pub fn from_terms<'a>(
        languages: impl IntoIterator<Item = &'a str>,
        topics: impl IntoIterator<Item = &'a str>,
        characteristics: impl IntoIterator<Item = Characteristic>,
    ) -> Self {
        let mut unique = Vec::new();
        for c in characteristics {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }

        Self {
            languages: split_terms(languages),
            topics: split_terms(topics),
            characteristics: unique,
        }
    }

    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    /// The first language listed, if any
    #[must_use]
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }

    #[must_use]
    pub fn has(&self, characteristic: Characteristic) -> bool {
        self.characteristics.contains(&characteristic)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.topics.is_empty() && self.characteristics.is_empty()
    }

    /// Reject preferences that would produce an unbounded query
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::EmptyPreference`] if no language, topic, or characteristic is set
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.languages.is_empty() && self.topics.is_empty() && self.characteristics.is_empty() {
            return Err(DiscoveryError::EmptyPreference);
        }
        Ok(())
    }
}

fn split_terms<'a>(fragments: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in fragments.into_iter().flat_map(|f| f.split(',')) {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
