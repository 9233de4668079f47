use super::common::{Common, CommonArgs, emit};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use project_scout::Result;
use project_scout::analytics::{AnalyticsCache, AnalyticsEngine, Platform, project_for_url};
use project_scout::reports::{ReportableAnalytics, generate_analytics_console, generate_analytics_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalyticsFormat {
    Console,
    Json,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Repository URL, such as `https://github.com/owner/repo`
    #[arg(value_name = "URL")]
    pub url: String,

    /// Hosting platform, when it cannot be told from the URL's host
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<Platform>,

    #[arg(long, value_name = "FORMAT", default_value = "console", help_heading = "Report Output")]
    pub format: AnalyticsFormat,

    /// Write the report to a file instead of to the terminal
    #[arg(long, short = 'o', value_name = "PATH", help_heading = "Report Output")]
    pub output: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn analyze_project(args: &AnalyzeArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let engine = AnalyticsEngine::from_config(&common.config, &common.credentials)?;
    let cache = AnalyticsCache::new(common.config.analytics_cache);

    let project = project_for_url(&args.url, args.platform)?;
    let analytics = engine.get_analytics(&project, &cache).await?;
    let report = ReportableAnalytics::new(&project, analytics, Utc::now());

    let mut output = String::new();
    match args.format {
        AnalyticsFormat::Console => {
            generate_analytics_console(&report, common.use_colors(args.output.as_ref()), &mut output)?;
        }
        AnalyticsFormat::Json => generate_analytics_json(&report, &mut output)?,
    }

    emit(args.output.as_ref(), &output)
}
