use crate::analytics::{HealthBreakdown, ProjectAnalytics, TrendResult, health_breakdown, trend};
use crate::discovery::CanonicalProject;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A project with its analytics and the scores derived from them, ready for reporting.
#[derive(Debug, Clone)]
pub struct ReportableAnalytics {
    pub name: String,
    pub url: String,
    pub analytics: Arc<ProjectAnalytics>,
    pub health: HealthBreakdown,
    pub trend: TrendResult,
}

impl ReportableAnalytics {
    /// Score `analytics` as of `now`
    #[must_use]
    pub fn new(project: &CanonicalProject, analytics: Arc<ProjectAnalytics>, now: DateTime<Utc>) -> Self {
        Self {
            name: project.name.clone(),
            url: project.url.clone(),
            health: health_breakdown(&analytics, now),
            trend: trend(&analytics),
            analytics,
        }
    }
}
