//! Project suggestions from an external recommendation service.
//!
//! Suggestions complement discovery: they are canonical records on the `AI Suggestion` platform,
//! carrying no statistics, and are never merged into a discovery result.

mod http_suggester;

use crate::Result;
use crate::discovery::{CanonicalProject, Preference};
use core::fmt::Debug;
use futures_util::future::BoxFuture;

pub use http_suggester::{API_KEY_ENV, HttpSuggester, SUGGESTION_PLATFORM};

/// A provider of project suggestions for a preference
pub trait Suggester: Send + Sync + Debug {
    fn suggest<'a>(&'a self, preference: &'a Preference) -> BoxFuture<'a, Result<Vec<CanonicalProject>>>;
}
