//! Health and trend analytics for projects on hosting platforms.
//!
//! The [`AnalyticsEngine`] fetches repository data from GitHub, GitLab or Codeberg and condenses
//! it into [`ProjectAnalytics`]: a twelve-week commit series, contributor and language breakdowns,
//! and community signals. [`health_score`] and [`trend`] are pure functions over that record.

mod codeberg;
mod compare;
mod engine;
mod fetch;
mod github;
mod gitlab;
mod health;
mod model;
mod repo_ref;
mod trend;
mod weekly;

pub use compare::{ComparedSide, ProjectComparison, compare};
pub use engine::{AnalyticsCache, AnalyticsEngine, AnalyticsSettings, project_for_url};
pub use health::{HealthBreakdown, health_breakdown, health_score};
pub use model::{CiStatus, CommunityProfile, Contributor, LanguageShare, Platform, PlatformExtras, ProjectAnalytics};
pub use repo_ref::RepoRef;
pub use trend::{Trend, TrendResult, classify, trend};
pub use weekly::{WEEKS, WeeklyCommits};
