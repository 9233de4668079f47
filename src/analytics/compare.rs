//! Side-by-side comparison of two projects.

use super::health::health_score;
use super::model::ProjectAnalytics;
use super::trend::{TrendResult, trend};
use crate::discovery::CanonicalProject;
use serde::{Deserialize, Serialize};

/// One project's figures in a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedSide {
    pub name: String,
    pub platform: String,
    pub url: String,
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub watchers: Option<u64>,
    /// Present only when analytics were computed for the project
    pub health: Option<u8>,
    pub trend: Option<TrendResult>,
    #[serde(skip)]
    tags: Vec<String>,
}

impl ComparedSide {
    fn new(project: &CanonicalProject, analytics: Option<&ProjectAnalytics>) -> Self {
        let mut tags = project.clone();
        if let Some(a) = analytics {
            tags.add_tags(&a.extras.topics);
        }

        Self {
            name: project.name.clone(),
            platform: project.platform.clone(),
            url: project.url.clone(),
            stars: project.stats.stars.or_else(|| analytics.map(|a| a.stars)),
            forks: project.stats.forks.or_else(|| analytics.map(|a| a.forks)),
            watchers: project.stats.watchers,
            health: analytics.map(health_score),
            trend: analytics.map(trend),
            tags: tags.tags,
        }
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectComparison {
    pub left: ComparedSide,
    pub right: ComparedSide,
    /// Tags on both sides, spelled as on the left
    pub common_tags: Vec<String>,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
}

/// Compare two projects.
///
/// Tags are matched case-insensitively. Analytics, when given, add repository topics to a
/// side's tags, fill in stars and forks the source did not report, and provide the health
/// score and activity trend.
#[must_use]
pub fn compare(
    left: &CanonicalProject,
    left_analytics: Option<&ProjectAnalytics>,
    right: &CanonicalProject,
    right_analytics: Option<&ProjectAnalytics>,
) -> ProjectComparison {
    let left = ComparedSide::new(left, left_analytics);
    let right = ComparedSide::new(right, right_analytics);

    let (common_tags, left_only): (Vec<_>, Vec<_>) = left.tags.iter().cloned().partition(|t| right.has_tag(t));
    let right_only = right.tags.iter().filter(|t| !left.has_tag(t)).cloned().collect();

    ProjectComparison {
        left,
        right,
        common_tags,
        left_only,
        right_only,
    }
}
