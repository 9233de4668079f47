use super::preference::{Characteristic, Preference};
use serde::{Deserialize, Serialize};

/// Ordering a source is asked to apply to its own results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortHint {
    Recency,
    Popularity,
}

/// How a characteristic tag shapes a source query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagMapping {
    Sort(SortHint),
    Keyword(&'static str),
}

const fn tag_mapping(characteristic: Characteristic) -> TagMapping {
    match characteristic {
        Characteristic::ActivelyMaintained => TagMapping::Sort(SortHint::Recency),
        Characteristic::LargeCommunity => TagMapping::Sort(SortHint::Popularity),
        other => TagMapping::Keyword(other.label()),
    }
}

/// Source-neutral query parameters derived from a [`Preference`].
///
/// Each adapter reads what it needs from here and renders it in its own query dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    languages: Vec<String>,
    topics: Vec<String>,
    characteristics: Vec<Characteristic>,
    keywords: Vec<Characteristic>,
    sort: Option<SortHint>,
}

impl QueryParams {
    /// Translate a preference into query parameters.
    ///
    /// When both sort-producing tags are present, recency wins.
    #[must_use]
    pub fn translate(preference: &Preference) -> Self {
        let mut sort = None;
        let mut keywords = Vec::new();

        for &characteristic in preference.characteristics() {
            match tag_mapping(characteristic) {
                TagMapping::Sort(hint) => {
                    if sort != Some(SortHint::Recency) {
                        sort = Some(hint);
                    }
                }
                TagMapping::Keyword(_) => keywords.push(characteristic),
            }
        }

        Self {
            languages: preference.languages().to_vec(),
            topics: preference.topics().to_vec(),
            characteristics: preference.characteristics().to_vec(),
            keywords,
            sort,
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
    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }

    #[must_use]
    pub const fn sort(&self) -> Option<SortHint> {
        self.sort
    }

    /// Whether the originating preference asked for a characteristic
    #[must_use]
    pub fn wants(&self, characteristic: Characteristic) -> bool {
        self.characteristics.contains(&characteristic)
    }

    /// Characteristics that became free-text keywords, in preference order
    #[must_use]
    pub fn keyword_characteristics(&self) -> &[Characteristic] {
        &self.keywords
    }

    /// Topics followed by keyword labels, space separated
    #[must_use]
    pub fn keyword_text(&self) -> String {
        let labels = self.keywords.iter().map(|c| -> &str { c.label() });
        self.topics.iter().map(String::as_str).chain(labels).collect::<Vec<_>>().join(" ")
    }

    /// [`Self::keyword_text`], or `default` when it is empty
    #[must_use]
    pub fn keyword_text_or(&self, default: &str) -> String {
        let text = self.keyword_text();
        if text.is_empty() { default.to_string() } else { text }
    }

    /// True when the first language is absent or one of `accepted`
    #[must_use]
    pub fn primary_language_in(&self, accepted: &[&str]) -> bool {
        self.primary_language().is_none_or(|lang| {
            let compact: String = lang.chars().filter(|c| !c.is_whitespace()).collect();
            accepted.contains(&compact.as_str())
        })
    }

    /// True when any requested language is one of `accepted`
    #[must_use]
    pub fn any_language_in(&self, accepted: &[&str]) -> bool {
        self.languages.iter().any(|l| accepted.contains(&l.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_tags_become_hints() {
        let params = QueryParams::translate(&Preference::new("rust", "", [Characteristic::LargeCommunity]));
        assert_eq!(params.sort(), Some(SortHint::Popularity));
        assert!(params.keyword_characteristics().is_empty());

        let params = QueryParams::translate(&Preference::new("rust", "", [Characteristic::ActivelyMaintained]));
        assert_eq!(params.sort(), Some(SortHint::Recency));
    }

    #[test]
    fn test_recency_wins_over_popularity() {
        let params = QueryParams::translate(&Preference::new(
            "",
            "",
            [Characteristic::LargeCommunity, Characteristic::ActivelyMaintained],
        ));
        assert_eq!(params.sort(), Some(SortHint::Recency));

        let params = QueryParams::translate(&Preference::new(
            "",
            "",
            [Characteristic::ActivelyMaintained, Characteristic::LargeCommunity],
        ));
        assert_eq!(params.sort(), Some(SortHint::Recency));
    }

    #[test]
    fn test_other_tags_become_keywords() {
        let params = QueryParams::translate(&Preference::new(
            "go",
            "cli, web",
            [
                Characteristic::GoodDocumentation,
                Characteristic::LargeCommunity,
                Characteristic::BeginnerFriendly,
            ],
        ));

        assert_eq!(
            params.keyword_characteristics(),
            [Characteristic::GoodDocumentation, Characteristic::BeginnerFriendly]
        );
        assert_eq!(params.keyword_text(), "cli web Good Documentation Beginner-Friendly");
        assert!(params.wants(Characteristic::LargeCommunity));
    }

    #[test]
    fn test_empty_keyword_text_uses_default() {
        let params = QueryParams::translate(&Preference::new("rust", "", [Characteristic::ActivelyMaintained]));
        assert_eq!(params.keyword_text(), "");
        assert_eq!(params.keyword_text_or("popular"), "popular");
    }

    #[test]
    fn test_primary_language_filter() {
        let none = QueryParams::translate(&Preference::new("", "cli", []));
        assert!(none.primary_language_in(&["rust"]));

        let rust = QueryParams::translate(&Preference::new("rust, go", "", []));
        assert!(rust.primary_language_in(&["rust"]));
        assert!(!rust.primary_language_in(&["php"]));
        assert!(rust.any_language_in(&["go"]));

        let vb = QueryParams::translate(&Preference::new("vb .net", "", []));
        assert!(vb.primary_language_in(&["vb.net"]));
    }
}
