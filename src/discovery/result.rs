use super::dedup::dedup;
use super::outcome::{FetchOutcome, SourceError};
use super::project::CanonicalProject;
use super::ranking::rank;
use serde::Serialize;

/// Ranked, duplicate-free projects plus one error per failed source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoveryResult {
    records: Vec<CanonicalProject>,
    partial_errors: Vec<SourceError>,
}

impl DiscoveryResult {
    /// Assemble a result from settled outcomes, which must be in source declaration order
    #[must_use]
    pub fn assemble(outcomes: impl IntoIterator<Item = FetchOutcome>) -> Self {
        let mut all_records = Vec::new();
        let mut partial_errors = Vec::new();

        for outcome in outcomes {
            match outcome {
                FetchOutcome::Success { records, .. } => all_records.extend(records),
                FetchOutcome::Failure(e) => partial_errors.push(e),
            }
        }

        let mut records = dedup(all_records);
        rank(&mut records);

        Self { records, partial_errors }
    }

    #[must_use]
    pub fn records(&self) -> &[CanonicalProject] {
        &self.records
    }

    #[must_use]
    pub fn partial_errors(&self) -> &[SourceError] {
        &self.partial_errors
    }

    /// Partial errors rendered as `"<Source>: <message> (Status: <code>)"` lines
    #[must_use]
    pub fn partial_error_messages(&self) -> Vec<String> {
        self.partial_errors.iter().map(ToString::to_string).collect()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<CanonicalProject>, Vec<SourceError>) {
        (self.records, self.partial_errors)
    }
}
