use super::SourceAdapter;
use crate::config::SourceId;
use crate::discovery::{CanonicalProject, QueryParams, SourceError};
use futures_util::future::BoxFuture;

const LOG_TARGET: &str = "   sources";

/// Stand-in for a cataloged source that has no working adapter; it always returns no records
#[derive(Debug, Clone, Copy)]
pub struct UnsupportedAdapter {
    id: SourceId,
}

impl UnsupportedAdapter {
    #[must_use]
    pub const fn new(id: SourceId) -> Self {
        Self { id }
    }

    /// Why the source cannot be searched
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self.id {
            SourceId::Bitbucket => "this platform is not currently active",
            SourceId::Sourceforge => "its API offers no keyword search suitable for this tool",
            SourceId::Pypi => "its search is only available as HTML pages",
            SourceId::Rubygems => "its search API has been unreliable",
            SourceId::LibrariesIo => "it requires an API key for comprehensive search",
            SourceId::OpenHub => "its API is limited for general search and requires an API key",
            SourceId::FDroid => "it only publishes an XML index",
            _ => "no adapter is available",
        }
    }
}

impl SourceAdapter for UnsupportedAdapter {
    fn label(&self) -> &str {
        self.id.label()
    }

    fn fetch<'a>(&'a self, _params: &'a QueryParams) -> BoxFuture<'a, Result<Vec<CanonicalProject>, SourceError>> {
        log::warn!(target: LOG_TARGET, "{} is not searched: {}", self.id.label(), self.reason());
        Box::pin(async { Ok(Vec::new()) })
    }
}
