//! Preference-aware scoring and filtering applied on top of the core ranking.

use super::preference::Preference;
use super::project::CanonicalProject;
use chrono::{DateTime, Utc};

const LANGUAGE_MATCH_POINTS: u32 = 30;
const TOPIC_MATCH_POINTS: u32 = 10;
const MAX_RELEVANCE: u32 = 100;
const DAYS_PER_MONTH: f64 = 30.0;

/// Score how well a project matches a preference, from 0 to 100.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "month granularity does not need full precision")]
pub fn relevance(project: &CanonicalProject, preference: &Preference, now: DateTime<Utc>) -> u32 {
    let mut score = 0;

    if language_matches(project, preference) && !preference.languages().is_empty() {
        score += LANGUAGE_MATCH_POINTS;
    }

    let matching_topics = preference.topics().iter().filter(|t| project.has_tag(t)).count();
    score += u32::try_from(matching_topics).unwrap_or(u32::MAX).saturating_mul(TOPIC_MATCH_POINTS);

    if let Some(updated) = project.updated_at {
        let months_ago = (now - updated).num_seconds() as f64 / (DAYS_PER_MONTH * 86_400.0);
        score += match months_ago {
            m if m <= 1.0 => 20,
            m if m <= 3.0 => 15,
            m if m <= 6.0 => 10,
            m if m <= 12.0 => 5,
            _ => 0,
        };
    }

    score += match project.stats.stars.unwrap_or(0) {
        s if s >= 1000 => 20,
        s if s >= 500 => 15,
        s if s >= 100 => 10,
        s if s >= 50 => 5,
        _ => 0,
    };

    score.min(MAX_RELEVANCE)
}

/// Keep the projects that match the preference.
///
/// A project matches when its language is one of the requested languages, a requested topic appears
/// among its tags or in its description, and one of the requested characteristics appears in its tags.
/// Empty criteria match everything. If nothing matches, the lenient language-or-topic filter is tried;
/// if that also yields nothing, the input is returned unchanged.
#[must_use]
pub fn filter_matching(projects: &[CanonicalProject], preference: &Preference) -> Vec<CanonicalProject> {
    let strict: Vec<_> = projects
        .iter()
        .filter(|p| language_matches(p, preference) && topic_matches(p, preference) && characteristic_matches(p, preference))
        .cloned()
        .collect();
    if !strict.is_empty() {
        return strict;
    }

    let lenient: Vec<_> = projects
        .iter()
        .filter(|p| language_matches(p, preference) || topic_matches(p, preference))
        .cloned()
        .collect();
    if !lenient.is_empty() {
        return lenient;
    }

    projects.to_vec()
}

/// Sort by descending relevance; ties keep their incoming order
pub fn sort_by_relevance(projects: &mut [CanonicalProject], preference: &Preference, now: DateTime<Utc>) {
    projects.sort_by_cached_key(|p| core::cmp::Reverse(relevance(p, preference, now)));
}

fn language_matches(project: &CanonicalProject, preference: &Preference) -> bool {
    if preference.languages().is_empty() {
        return true;
    }

    project
        .language
        .as_deref()
        .is_some_and(|lang| preference.languages().iter().any(|l| l.eq_ignore_ascii_case(lang)))
}

fn topic_matches(project: &CanonicalProject, preference: &Preference) -> bool {
    if preference.topics().is_empty() {
        return true;
    }

    let description = project.description.as_deref().unwrap_or_default().to_lowercase();
    preference
        .topics()
        .iter()
        .any(|topic| project.has_tag(topic) || description.contains(topic.as_str()))
}

fn characteristic_matches(project: &CanonicalProject, preference: &Preference) -> bool {
    if preference.characteristics().is_empty() {
        return true;
    }

    preference.characteristics().iter().any(|c| {
        let label = c.label().to_lowercase();
        project.tags.iter().any(|tag| tag.to_lowercase().contains(&label))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Characteristic;
    use chrono::Duration;

    fn project(name: &str, language: &str, tags: &[&str]) -> CanonicalProject {
        let mut p = CanonicalProject::new("GitHub", name, format!("https://github.com/{name}"));
        p.language = Some(language.to_string());
        p.add_tags(tags);
        p
    }

    #[test]
    fn test_relevance_components() {
        let now = Utc::now();
        let pref = Preference::new("rust", "cli, async", []);

        let mut p = project("a/b", "Rust", &["cli", "async"]);
        p.updated_at = Some(now - Duration::days(10));
        p.stats.stars = Some(600);

        // 30 language + 20 topics + 20 recency + 15 popularity
        assert_eq!(relevance(&p, &pref, now), 85);
    }

    #[test]
    fn test_relevance_is_capped() {
        let now = Utc::now();
        let pref = Preference::new("rust", "a, b, c, d, e, f", []);

        let mut p = project("a/b", "Rust", &["a", "b", "c", "d", "e", "f"]);
        p.updated_at = Some(now);
        p.stats.stars = Some(5000);

        assert_eq!(relevance(&p, &pref, now), 100);
    }

    #[test]
    fn test_relevance_without_language_preference() {
        let now = Utc::now();
        let pref = Preference::new("", "cli", []);
        let p = project("a/b", "Rust", &[]);
        assert_eq!(relevance(&p, &pref, now), 0);
    }

    #[test]
    fn test_recency_bands() {
        let now = Utc::now();
        let pref = Preference::new("", "x", []);
        let mut p = project("a/b", "Rust", &[]);

        p.updated_at = Some(now - Duration::days(80));
        assert_eq!(relevance(&p, &pref, now), 15);

        p.updated_at = Some(now - Duration::days(170));
        assert_eq!(relevance(&p, &pref, now), 10);

        p.updated_at = Some(now - Duration::days(350));
        assert_eq!(relevance(&p, &pref, now), 5);

        p.updated_at = Some(now - Duration::days(400));
        assert_eq!(relevance(&p, &pref, now), 0);
    }

    #[test]
    fn test_strict_filter() {
        let pref = Preference::new("rust", "cli", []);
        let projects = vec![
            project("a/rust-cli", "Rust", &["cli"]),
            project("b/go-cli", "Go", &["cli"]),
            project("c/rust-web", "Rust", &["web"]),
        ];

        let names: Vec<_> = filter_matching(&projects, &pref).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["a/rust-cli"]);
    }

    #[test]
    fn test_topic_matches_description() {
        let pref = Preference::new("", "parser", []);
        let mut p = project("a/b", "Rust", &[]);
        p.description = Some("A fast Parser combinator library".to_string());

        assert_eq!(filter_matching(&[p], &pref).len(), 1);
    }

    #[test]
    fn test_lenient_fallback() {
        let pref = Preference::new("rust", "cli", [Characteristic::GoodDocumentation]);
        let projects = vec![project("a/b", "Rust", &["web"]), project("c/d", "Go", &["db"])];

        let names: Vec<_> = filter_matching(&projects, &pref).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["a/b"]);
    }

    #[test]
    fn test_no_match_returns_input() {
        let pref = Preference::new("haskell", "", []);
        let projects = vec![project("a/b", "Rust", &[]), project("c/d", "Go", &[])];

        assert_eq!(filter_matching(&projects, &pref), projects);
    }

    #[test]
    fn test_characteristic_filter_uses_tags() {
        let pref = Preference::new("", "", [Characteristic::GoodFirstIssues]);
        let projects = vec![
            project("a/b", "Rust", &["good first issues"]),
            project("c/d", "Rust", &["other"]),
        ];

        let names: Vec<_> = filter_matching(&projects, &pref).into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["a/b"]);
    }

    #[test]
    fn test_sort_by_relevance_is_stable() {
        let now = Utc::now();
        let pref = Preference::new("rust", "", []);
        let mut projects = vec![
            project("go1", "Go", &[]),
            project("rust1", "Rust", &[]),
            project("go2", "Go", &[]),
            project("rust2", "Rust", &[]),
        ];

        sort_by_relevance(&mut projects, &pref, now);
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["rust1", "rust2", "go1", "go2"]);
    }
}
