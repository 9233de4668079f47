use super::common::{Common, CommonArgs, PreferenceArgs, emit};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use project_scout::Result;
use project_scout::discovery::Orchestrator;
use project_scout::discovery::relevance::{filter_matching, sort_by_relevance};
use project_scout::reports::{generate_console, generate_csv, generate_json};

/// Order in which discovered projects are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Popularity, then recency
    Rank,
    /// How well each project matches the preference
    Relevance,
    /// Most stars first
    Stars,
    /// Most recently updated first
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
    Csv,
}

#[derive(Parser, Debug)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub preference: PreferenceArgs,

    /// Order of the listed projects
    #[arg(long, value_name = "ORDER", default_value = "rank")]
    pub sort: SortOrder,

    /// Keep only projects matching the requested languages, topics and characteristics
    #[arg(long)]
    pub strict: bool,

    /// Show at most this many projects
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    #[arg(long, value_name = "FORMAT", default_value = "console", help_heading = "Report Output")]
    pub format: OutputFormat,

    /// Write the report to a file instead of to the terminal
    #[arg(long, short = 'o', value_name = "PATH", help_heading = "Report Output")]
    pub output: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn discover_projects(args: &DiscoverArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let preference = args.preference.preference();

    let orchestrator = Orchestrator::from_config(&common.config, &common.credentials)?;
    let (mut projects, partial_errors) = orchestrator.discover(&preference).await?.into_parts();

    if args.strict {
        projects = filter_matching(&projects, &preference);
    }

    match args.sort {
        SortOrder::Rank => {}
        SortOrder::Relevance => sort_by_relevance(&mut projects, &preference, Utc::now()),
        SortOrder::Stars => projects.sort_by_key(|p| core::cmp::Reverse(p.stats.stars.unwrap_or(0))),
        SortOrder::Updated => projects.sort_by_key(|p| core::cmp::Reverse(p.updated_millis())),
    }

    if let Some(limit) = args.limit {
        projects.truncate(limit);
    }

    let mut report = String::new();
    match args.format {
        OutputFormat::Console => {
            generate_console(&projects, &partial_errors, common.use_colors(args.output.as_ref()), &mut report)?;
        }
        OutputFormat::Json => generate_json(&projects, &partial_errors, &mut report)?,
        OutputFormat::Csv => {
            generate_csv(&projects, &mut report)?;
            for error in &partial_errors {
                eprintln!("⚠️  {error}");
            }
        }
    }

    emit(args.output.as_ref(), &report)
}
