//! Argument handling and setup shared by every command that talks to the network.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use project_scout::Result;
use project_scout::config::Config;
use project_scout::discovery::{Characteristic, Preference};
use project_scout::sources::Credentials;
use std::fs;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by the discover, analyze, compare and suggest commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Path to configuration file [default: one of scout.[toml|yml|yaml|json] ]
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// GitHub personal access token
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitLab personal access token
    #[arg(long, value_name = "TOKEN", env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,
}

/// What the user is looking for, as given on the command line
#[derive(Args, Debug)]
pub struct PreferenceArgs {
    /// Comma-separated programming languages, the first one being the primary language
    #[arg(long, short = 'l', value_name = "LIST", default_value = "")]
    pub languages: String,

    /// Comma-separated topics
    #[arg(long, short = 't', value_name = "LIST", default_value = "")]
    pub topics: String,

    /// Project traits to look for (may be repeated)
    #[arg(long = "characteristic", value_name = "TRAIT")]
    pub characteristics: Vec<Characteristic>,
}

impl PreferenceArgs {
    pub fn preference(&self) -> Preference {
        Preference::new(&self.languages, &self.topics, self.characteristics.iter().copied())
    }
}

#[derive(Debug)]
pub struct Common {
    pub config: Config,
    pub credentials: Credentials,
    color: ColorMode,
}

impl Common {
    /// Initialize logging and load the configuration, printing any validation warnings
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded
    pub fn new(args: &CommonArgs) -> Result<Self> {
        init_logging(args.log_level);

        let (config, warnings) = Config::load(Utf8Path::new("."), args.config.as_ref())?;
        print_warnings(&warnings);

        Ok(Self {
            config,
            credentials: Credentials {
                github_token: args.github_token.clone(),
                gitlab_token: args.gitlab_token.clone(),
            },
            color: args.color,
        })
    }

    /// Whether output written to standard output should be colored
    pub fn use_colors(&self, output: Option<&Utf8PathBuf>) -> bool {
        match self.color {
            ColorMode::Always => output.is_none(),
            ColorMode::Never => false,
            ColorMode::Auto => {
                use std::io::{IsTerminal, stdout};
                output.is_none() && stdout().is_terminal()
            }
        }
    }
}

/// Write a rendered report to `output`, or to standard output when no path is given
pub fn emit(output: Option<&Utf8PathBuf>, text: &str) -> Result<()> {
    if let Some(path) = output {
        fs::write(path, text).into_app_err_with(|| format!("writing report to {path}"))?;
        eprintln!("Report written to {path}");
    } else {
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

pub fn print_warnings(warnings: &[String]) {
    if !warnings.is_empty() {
        eprintln!("\n⚠️  Configuration validation warnings:");
        for warning in warnings {
            eprintln!("   {warning}");
        }
        eprintln!();
    }
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}
