//! Discovers open-source projects across code hosts and package registries.
//!
//! The library is organized around a single discovery pipeline and an independent analytics engine:
//!
//! - [`discovery`] turns a [`discovery::Preference`] into per-source query parameters, fans out to every
//!   enabled source concurrently, collects per-source failures as partial errors, removes duplicate
//!   projects, and produces a deterministically ranked [`discovery::DiscoveryResult`].
//! - [`sources`] holds one adapter per registry plus the shared HTTP plumbing.
//! - [`analytics`] fetches weekly activity for a single project on demand and derives a health score
//!   and an activity trend from it.
//! - [`suggest`] is the seam for an external suggestion service.
//! - [`reports`] renders results for the console, JSON, and CSV.

pub mod analytics;
pub mod config;
pub mod discovery;
pub mod reports;
pub mod sources;
pub mod suggest;

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;
