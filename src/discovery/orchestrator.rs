use super::outcome::{FetchOutcome, SourceError};
use super::preference::{DiscoveryError, Preference};
use super::query::QueryParams;
use super::result::DiscoveryResult;
use crate::Result;
use crate::config::Config;
use crate::sources::{Credentials, SourceAdapter, build_adapters};
use futures_util::future::join_all;
use std::sync::Arc;

const LOG_TARGET: &str = " discovery";

/// Runs every enabled source adapter concurrently and merges what they return.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl Orchestrator {
    /// Create an orchestrator over adapters listed in precedence order
    #[must_use]
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self { adapters }
    }

    /// Create an orchestrator over the enabled sources of a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be created
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        Ok(Self::new(build_adapters(config, credentials)?))
    }

    /// Labels of the adapters, in precedence order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.adapters.iter().map(|a| a.label())
    }

    /// Run the full pipeline for one preference.
    ///
    /// Source failures never fail the call; each one becomes a partial error on the result.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::EmptyPreference`] before contacting any source if the preference is empty
    pub async fn discover(&self, preference: &Preference) -> Result<DiscoveryResult, DiscoveryError> {
        preference.validate()?;

        let params = QueryParams::translate(preference);
        let outcomes = self.fetch_all(params).await;
        let result = DiscoveryResult::assemble(outcomes);

        log::info!(
            target: LOG_TARGET,
            "Discovery produced {} project(s) with {} partial error(s)",
            result.records().len(),
            result.partial_errors().len()
        );

        Ok(result)
    }

    /// Invoke every adapter concurrently and wait for all of them to settle.
    ///
    /// Each adapter runs in its own task so that a panic is contained to that source. The returned
    /// outcomes are in adapter order, regardless of completion order.
    pub async fn fetch_all(&self, params: QueryParams) -> Vec<FetchOutcome> {
        let params = Arc::new(params);

        let handles: Vec<_> = self
            .adapters
            .iter()
            .map(|adapter| {
                log::debug!(target: LOG_TARGET, "Initiating fetch from {}", adapter.label());
                let adapter = Arc::clone(adapter);
                let params = Arc::clone(&params);
                tokio::spawn(async move { adapter.fetch(&params).await })
            })
            .collect();

        let joined = join_all(handles).await;

        self.adapters
            .iter()
            .zip(joined)
            .map(|(adapter, joined)| {
                let label = adapter.label();
                let outcome = match joined {
                    Ok(result) => FetchOutcome::settle(label, result),
                    Err(e) => FetchOutcome::Failure(SourceError::new(label, format!("source task failed: {e}"))),
                };

                match &outcome {
                    FetchOutcome::Success { records, .. } => {
                        log::info!(target: LOG_TARGET, "Fetched {} project(s) from {label}", records.len());
                    }
                    FetchOutcome::Failure(e) => {
                        log::warn!(target: LOG_TARGET, "Error fetching projects from {e}");
                    }
                }

                outcome
            })
            .collect()
    }
}
