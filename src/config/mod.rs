//! Configuration file model, loading, and validation.

#[expect(clippy::module_inception, reason = "the configuration type lives in its own file")]
mod config;
mod source_id;

pub use config::{Config, DEFAULT_CONFIG_YAML, RateLimitConfig, SourceConfig, SuggestionsConfig};
pub use source_id::{SourceId, SourceKind};
