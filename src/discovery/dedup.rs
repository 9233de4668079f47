use super::project::CanonicalProject;
use std::collections::HashSet;

/// Keep the first record seen for each dedup key, preserving first-seen order.
///
/// Callers pass records concatenated in source declaration order, so the earliest-declared source
/// wins when two sources report the same project.
#[must_use]
pub fn dedup(records: impl IntoIterator<Item = CanonicalProject>) -> Vec<CanonicalProject> {
    let mut seen = HashSet::new();
    records.into_iter().filter(|p| seen.insert(p.dedup_key())).collect()
}
