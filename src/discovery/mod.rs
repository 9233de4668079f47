//! The multi-source discovery pipeline.
//!
//! A [`Preference`] is translated into [`QueryParams`], every enabled source adapter is run
//! concurrently by the [`Orchestrator`], each adapter's settled result becomes a [`FetchOutcome`],
//! and [`DiscoveryResult::assemble`] merges the successful records in source order, drops duplicate
//! URLs, and ranks what remains.

mod dedup;
mod orchestrator;
mod outcome;
mod preference;
mod project;
mod query;
mod ranking;
mod rate_limiter;
pub mod relevance;
mod result;

pub use dedup::dedup;
pub use orchestrator::Orchestrator;
pub use outcome::{FetchOutcome, SourceError};
pub use preference::{Characteristic, DiscoveryError, Preference};
pub use project::{CanonicalProject, ProjectStats};
pub(crate) use project::non_empty;
pub use query::{QueryParams, SortHint};
pub use ranking::{compare as compare_rank, rank};
pub use rate_limiter::RateLimiter;
pub use result::DiscoveryResult;
