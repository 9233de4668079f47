use super::{ReportableAnalytics, common};
use crate::Result;
use crate::analytics::{ComparedSide, ProjectComparison, Trend};
use crate::discovery::{CanonicalProject, SourceError};
use core::fmt::Write;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

/// Project details are indented by "    " (4)
const DETAIL_INDENT: usize = 4;

/// Width of the label column in comparisons
const LABEL_WIDTH: usize = 10;

pub fn generate<W: Write>(projects: &[CanonicalProject], partial_errors: &[SourceError], use_colors: bool, writer: &mut W) -> Result<()> {
    if projects.is_empty() {
        writeln!(writer, "No projects found.")?;
    }

    let term_width = get_terminal_width();

    for (index, project) in projects.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }

        let heading = format!("{}. {}", index + 1, project.name);
        if use_colors {
            writeln!(writer, "{} [{}]", heading.bold(), project.platform.cyan())?;
        } else {
            writeln!(writer, "{heading} [{}]", project.platform)?;
        }

        if let Some(description) = &project.description {
            for line in wrap_text(description, term_width.saturating_sub(DETAIL_INDENT), 0) {
                writeln!(writer, "    {line}")?;
            }
        }

        let mut facts = vec![
            format!("★ {}", common::format_stat(project.stats.stars)),
            format!("forks {}", common::format_stat(project.stats.forks)),
        ];
        if let Some(downloads) = project.stats.downloads {
            facts.push(format!("downloads {downloads}"));
        }
        if let Some(language) = &project.language {
            facts.push(language.clone());
        }
        if project.updated_at.is_some() {
            facts.push(format!("updated {}", common::format_date(project.updated_at)));
        }
        writeln!(writer, "    {}", facts.join("  ·  "))?;

        if !project.tags.is_empty() {
            let tags: Vec<_> = project.tags.iter().map(|t| format!("#{t}")).collect();
            writeln!(writer, "    {}", tags.join(", "))?;
        }

        if use_colors {
            writeln!(writer, "    {}", project.url.underline())?;
        } else {
            writeln!(writer, "    {}", project.url)?;
        }
    }

    if !partial_errors.is_empty() {
        writeln!(writer)?;
        let heading = "Some sources could not be searched:";
        if use_colors {
            writeln!(writer, "{}", heading.yellow().bold())?;
        } else {
            writeln!(writer, "{heading}")?;
        }

        for error in partial_errors {
            writeln!(writer, "  ⚠️  {error}")?;
        }
    }

    Ok(())
}

pub fn generate_analytics<W: Write>(report: &ReportableAnalytics, use_colors: bool, writer: &mut W) -> Result<()> {
    let a = &report.analytics;
    let overall = report.health.overall;
    let band = common::health_band(overall);

    let colored_band = if use_colors {
        match overall {
            70..=100 => band.green().bold().to_string(),
            40..=69 => band.yellow().bold().to_string(),
            _ => band.red().bold().to_string(),
        }
    } else {
        band.to_string()
    };

    writeln!(writer, "{} ({}) has a health score of {overall}/100: {colored_band}", report.name, a.platform.label())?;
    writeln!(writer, "{}", report.url)?;

    section(writer, "Health", use_colors)?;
    let rows = [
        ("activity", format!("{:.0}", report.health.activity)),
        ("community", format!("{:.0}", report.health.community)),
        ("quality", format!("{:.0}", report.health.quality)),
        ("maintenance", format!("{:.0}", report.health.maintenance)),
    ];
    write_rows(writer, &rows)?;

    section(writer, "Activity", use_colors)?;
    let trend = common::format_trend(report.trend.trend);
    let trend = if use_colors {
        match report.trend.trend {
            Trend::Up => trend.green().to_string(),
            Trend::Down => trend.red().to_string(),
            Trend::Stable => trend.to_string(),
        }
    } else {
        trend.to_string()
    };

    let rows = [
        ("last 12 weeks", common::sparkline(&a.weekly_counts())),
        (
            "trend",
            format!(
                "{trend} ({:+.1}%, confidence {:.0}%)",
                report.trend.change_percent,
                report.trend.confidence * 100.0
            ),
        ),
        ("commits per week", format!("{:.1}", a.commit_frequency)),
        ("commits last 4 weeks", a.monthly_commits.to_string()),
        ("total commits", a.total_commits.to_string()),
        ("last commit", common::format_date(a.last_commit)),
    ];
    write_rows(writer, &rows)?;

    section(writer, "Community", use_colors)?;
    let contributors: Vec<_> = a
        .top_contributors
        .iter()
        .take(5)
        .map(|c| format!("{} ({})", c.name, c.contributions))
        .collect();
    let rows = [
        ("stars", a.stars.to_string()),
        ("forks", a.forks.to_string()),
        ("open issues", a.open_issues.to_string()),
        ("open pull requests", a.open_pull_requests.to_string()),
        ("contributors", a.contributor_count.to_string()),
        ("top contributors", contributors.join(", ")),
        ("issue response", common::format_hours(a.issue_response_hours)),
        ("pull request merge", common::format_hours(a.pr_merge_hours)),
        ("community profile", format!("{}%", a.community.health_percentage)),
    ];
    write_rows(writer, &rows)?;

    if !a.languages.is_empty() {
        section(writer, "Languages", use_colors)?;
        let languages: Vec<_> = a.languages.iter().map(|l| format!("{} {:.1}%", l.language, l.percentage)).collect();
        for line in wrap_text(&languages.join(", "), get_terminal_width().saturating_sub(2), 0) {
            writeln!(writer, "  {line}")?;
        }
    }

    Ok(())
}

pub fn generate_comparison<W: Write>(comparison: &ProjectComparison, use_colors: bool, writer: &mut W) -> Result<()> {
    let left = &comparison.left;
    let right = &comparison.right;

    let heading = format!("{:LABEL_WIDTH$}   {:<30}   {}", "", left.name, right.name);
    if use_colors {
        writeln!(writer, "{}", heading.bold())?;
    } else {
        writeln!(writer, "{heading}")?;
    }

    let rows: [(&str, fn(&ComparedSide) -> String); 6] = [
        ("platform", |s| s.platform.clone()),
        ("stars", |s| common::format_stat(s.stars)),
        ("forks", |s| common::format_stat(s.forks)),
        ("watchers", |s| common::format_stat(s.watchers)),
        ("health", |s| s.health.map_or_else(|| "n/a".to_string(), |h| format!("{h}/100"))),
        ("trend", |s| s.trend.map_or_else(|| "n/a".to_string(), |t| common::format_trend(t.trend).to_string())),
    ];

    for (label, value) in rows {
        writeln!(writer, "{label:LABEL_WIDTH$}   {:<30}   {}", value(left), value(right))?;
    }

    section(writer, "Tags", use_colors)?;
    let rows = [
        ("common", comparison.common_tags.join(", ")),
        ("only left", comparison.left_only.join(", ")),
        ("only right", comparison.right_only.join(", ")),
    ];
    write_rows(writer, &rows)?;

    Ok(())
}

fn section<W: Write>(writer: &mut W, title: &str, use_colors: bool) -> Result<()> {
    writeln!(writer)?;
    if use_colors {
        writeln!(writer, "{}", title.bold())?;
    } else {
        writeln!(writer, "{title}")?;
    }
    Ok(())
}

/// Write aligned `name : value` rows, wrapping long values
fn write_rows<W: Write>(writer: &mut W, rows: &[(&str, String)]) -> Result<()> {
    let max_name_len = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let term_width = get_terminal_width();
    // "  " (2) + name + " : " (3)
    let value_indent = 2 + max_name_len + 3;

    for (name, value) in rows {
        let value = if value.is_empty() { "n/a" } else { value.as_str() };
        let wrapped_lines = wrap_text(value, term_width, value_indent);

        if let Some(first_line) = wrapped_lines.first() {
            writeln!(writer, "  {name:<max_name_len$} : {first_line}")?;
            for line in wrapped_lines.iter().skip(1) {
                writeln!(writer, "{line}")?;
            }
        }
    }

    Ok(())
}

/// Get the terminal width, defaulting to 80 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(80, |(Width(w), _)| usize::from(w))
}

/// Word-wrap text to fit within a given width, with indentation for continuation lines
fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    if width <= indent {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut is_first_line = true;

    for word in text.split_whitespace() {
        let separator_len = usize::from(!current_line.is_empty());
        let line_width = if is_first_line {
            current_line.len()
        } else {
            indent + current_line.len()
        };

        if !current_line.is_empty() && line_width + separator_len + word.len() > width {
            if is_first_line {
                lines.push(current_line);
                is_first_line = false;
            } else {
                lines.push(format!("{:indent$}{current_line}", ""));
            }
            current_line = word.to_string();
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        if is_first_line {
            lines.push(current_line);
        } else {
            lines.push(format!("{:indent$}{current_line}", ""));
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
