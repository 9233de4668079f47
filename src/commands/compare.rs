use super::analyze::AnalyticsFormat;
use super::common::{Common, CommonArgs, emit};
use camino::Utf8PathBuf;
use clap::Parser;
use project_scout::Result;
use project_scout::analytics::{AnalyticsCache, AnalyticsEngine, compare, project_for_url};
use project_scout::reports::{generate_comparison_console, generate_comparison_json};

#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// First repository URL
    #[arg(value_name = "URL")]
    pub left: String,

    /// Second repository URL
    #[arg(value_name = "URL")]
    pub right: String,

    #[arg(long, value_name = "FORMAT", default_value = "console", help_heading = "Report Output")]
    pub format: AnalyticsFormat,

    /// Write the report to a file instead of to the terminal
    #[arg(long, short = 'o', value_name = "PATH", help_heading = "Report Output")]
    pub output: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn compare_projects(args: &CompareArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let engine = AnalyticsEngine::from_config(&common.config, &common.credentials)?;
    let cache = AnalyticsCache::new(common.config.analytics_cache);

    let left = project_for_url(&args.left, None)?;
    let right = project_for_url(&args.right, None)?;

    let (left_analytics, right_analytics) = tokio::join!(engine.get_analytics(&left, &cache), engine.get_analytics(&right, &cache));

    // A side without analytics is still compared on its tags and source figures
    let left_analytics = left_analytics.inspect_err(|e| eprintln!("⚠️  {e}")).ok();
    let right_analytics = right_analytics.inspect_err(|e| eprintln!("⚠️  {e}")).ok();

    let comparison = compare(&left, left_analytics.as_deref(), &right, right_analytics.as_deref());

    let mut output = String::new();
    match args.format {
        AnalyticsFormat::Console => {
            generate_comparison_console(&comparison, common.use_colors(args.output.as_ref()), &mut output)?;
        }
        AnalyticsFormat::Json => generate_comparison_json(&comparison, &mut output)?,
    }

    emit(args.output.as_ref(), &output)
}
