use camino::Utf8PathBuf;
use clap::Parser;
use project_scout::Result;
use project_scout::config::Config;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path; the extension picks the format (toml, yml, yaml or json)
    #[arg(value_name = "PATH", default_value = "scout.yml")]
    pub output: Utf8PathBuf,
}

pub fn init_config(args: &InitArgs) -> Result<()> {
    let config = Config::default();
    config.save_default_with_comments(&args.output)?;
    println!("Generated default configuration file: {}", args.output);
    Ok(())
}
