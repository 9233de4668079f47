use super::{AdapterSettings, Credentials, SourceAdapter, UnsupportedAdapter};
use super::{codeberg, crates_io, github, gitlab, maven, npm, nuget, packagist};
use crate::Result;
use crate::config::{Config, SourceConfig, SourceId};
use crate::discovery::RateLimiter;
use ohno::IntoAppError;
use std::sync::Arc;

const LOG_TARGET: &str = "   sources";

/// Build an adapter for every enabled source, in configuration order.
///
/// All adapters that issue secondary statistics requests share one [`RateLimiter`].
///
/// # Errors
///
/// Returns an error if an adapter's HTTP client cannot be created
pub fn build_adapters(config: &Config, credentials: &Credentials) -> Result<Vec<Arc<dyn SourceAdapter>>> {
    let limiter = RateLimiter::new(
        config.stats_rate_limit.capacity,
        config.stats_rate_limit.refill_tokens,
        config.stats_refill_interval(),
    );

    config
        .enabled_sources()
        .map(|source| {
            build_adapter(source, config, credentials, &limiter)
                .into_app_err_with(|| format!("could not create the {} adapter", source.id.label()))
        })
        .collect()
}

fn build_adapter(
    source: &SourceConfig,
    config: &Config,
    credentials: &Credentials,
    limiter: &Arc<RateLimiter>,
) -> Result<Arc<dyn SourceAdapter>> {
    let mut settings = AdapterSettings::new(config.request_timeout(), config.max_results_per_source);
    settings.base_url.clone_from(&source.base_url);
    settings.stats_base_url.clone_from(&source.stats_base_url);

    log::debug!(target: LOG_TARGET, "Creating adapter for {}", source.id.label());

    let adapter: Arc<dyn SourceAdapter> = match source.id {
        SourceId::Github => Arc::new(github::Adapter::new(&settings, credentials.github_token.as_deref())?),
        SourceId::Gitlab => Arc::new(gitlab::Adapter::new(&settings, credentials.gitlab_token.as_deref())?),
        SourceId::Codeberg => Arc::new(codeberg::Adapter::new(&settings)?),
        SourceId::Npm => Arc::new(npm::Adapter::new(&settings, Arc::clone(limiter))?),
        SourceId::Packagist => Arc::new(packagist::Adapter::new(&settings, Arc::clone(limiter))?),
        SourceId::CratesIo => Arc::new(crates_io::Adapter::new(&settings)?),
        SourceId::MavenCentral => Arc::new(maven::Adapter::new(&settings)?),
        SourceId::Nuget => Arc::new(nuget::Adapter::new(&settings)?),
        id @ (SourceId::Bitbucket
        | SourceId::Sourceforge
        | SourceId::Pypi
        | SourceId::Rubygems
        | SourceId::LibrariesIo
        | SourceId::OpenHub
        | SourceId::FDroid) => Arc::new(UnsupportedAdapter::new(id)),
    };

    Ok(adapter)
}
