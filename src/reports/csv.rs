use super::common;
use crate::Result;
use crate::discovery::CanonicalProject;
use core::fmt::Write;

const HEADER: [&str; 13] = [
    "Name",
    "Platform",
    "URL",
    "Description",
    "Language",
    "Tags",
    "Stars",
    "Forks",
    "Open Issues",
    "Downloads",
    "Monthly Downloads",
    "Owner",
    "Updated",
];

pub fn generate<W: Write>(projects: &[CanonicalProject], writer: &mut W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(Vec::new());
    csv_writer.write_record(HEADER)?;

    for project in projects {
        let optional = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_default();
        csv_writer.write_record([
            project.name.as_str(),
            project.platform.as_str(),
            project.url.as_str(),
            project.description.as_deref().unwrap_or_default(),
            project.language.as_deref().unwrap_or_default(),
            project.tags.join("; ").as_str(),
            optional(project.stats.stars).as_str(),
            optional(project.stats.forks).as_str(),
            optional(project.stats.open_issues).as_str(),
            optional(project.stats.downloads).as_str(),
            optional(project.stats.monthly_downloads).as_str(),
            project.owner.as_deref().unwrap_or_default(),
            project.updated_at.map(|dt| common::format_date(Some(dt))).unwrap_or_default().as_str(),
        ])?;
    }

    let bytes = csv_writer.into_inner().map_err(csv::IntoInnerError::into_error)?;
    write!(writer, "{}", String::from_utf8(bytes)?)?;
    Ok(())
}
