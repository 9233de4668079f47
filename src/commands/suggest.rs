use super::common::{Common, CommonArgs, PreferenceArgs, emit};
use super::discover::OutputFormat;
use camino::Utf8PathBuf;
use clap::Parser;
use project_scout::Result;
use project_scout::reports::{generate_console, generate_csv, generate_json};
use project_scout::suggest::{HttpSuggester, Suggester};

#[derive(Parser, Debug)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub preference: PreferenceArgs,

    #[arg(long, value_name = "FORMAT", default_value = "console", help_heading = "Report Output")]
    pub format: OutputFormat,

    /// Write the report to a file instead of to the terminal
    #[arg(long, short = 'o', value_name = "PATH", help_heading = "Report Output")]
    pub output: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn suggest_projects(args: &SuggestArgs) -> Result<()> {
    let common = Common::new(&args.common)?;
    let preference = args.preference.preference();
    preference.validate()?;

    let suggester = HttpSuggester::from_config(&common.config)?;
    let projects = suggester.suggest(&preference).await?;

    let mut output = String::new();
    match args.format {
        OutputFormat::Console => generate_console(&projects, &[], common.use_colors(args.output.as_ref()), &mut output)?,
        OutputFormat::Json => generate_json(&projects, &[], &mut output)?,
        OutputFormat::Csv => generate_csv(&projects, &mut output)?,
    }

    emit(args.output.as_ref(), &output)
}
