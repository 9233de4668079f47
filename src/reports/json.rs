use super::ReportableAnalytics;
use crate::Result;
use crate::analytics::ProjectComparison;
use crate::discovery::{CanonicalProject, SourceError};
use core::fmt::Write;
use serde_json::json;

pub fn generate<W: Write>(projects: &[CanonicalProject], partial_errors: &[SourceError], writer: &mut W) -> Result<()> {
    let output = json!({
        "projects": projects,
        "partial_errors": partial_errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
    });

    write!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[expect(unused_results, reason = "Map::insert on fresh keys")]
pub fn generate_analytics<W: Write>(report: &ReportableAnalytics, writer: &mut W) -> Result<()> {
    let mut obj = serde_json::Map::new();
    obj.insert("name".to_string(), json!(report.name));
    obj.insert("url".to_string(), json!(report.url));
    obj.insert("health_score".to_string(), json!(report.health.overall));
    obj.insert("health".to_string(), json!(report.health));
    obj.insert("trend".to_string(), json!(report.trend));
    obj.insert("analytics".to_string(), json!(*report.analytics));

    write!(writer, "{}", serde_json::to_string_pretty(&obj)?)?;
    Ok(())
}

pub fn generate_comparison<W: Write>(comparison: &ProjectComparison, writer: &mut W) -> Result<()> {
    write!(writer, "{}", serde_json::to_string_pretty(comparison)?)?;
    Ok(())
}
