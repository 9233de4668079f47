//! A tool to discover open-source projects and gauge their health.
//!
//! # Overview
//!
//! `project-scout` searches code hosts and package registries for projects matching a set of
//! languages, topics and traits, merges what every source returns into one ranked list, and can
//! compute activity and health analytics for any GitHub, GitLab or Codeberg repository.
//!
//! # Quick Start
//!
//! ```bash
//! project-scout discover --languages rust --topics cli
//! ```
//!
//! Sources are searched concurrently. A source that fails or times out does not fail the run;
//! its error is listed after the results.
//!
//! # Discovering Projects
//!
//! **Languages and topics** are comma-separated. The first language is the primary one, which
//! single-language registries such as crates.io or Packagist use to decide whether to search:
//! ```bash
//! project-scout discover --languages typescript,javascript --topics testing
//! ```
//!
//! **Traits** narrow the search and influence ordering:
//! ```bash
//! project-scout discover --topics web --characteristic good-first-issues --characteristic actively-maintained
//! ```
//!
//! Available traits: `beginner-friendly`, `good-first-issues`, `actively-maintained`,
//! `good-documentation`, `large-community`, `cutting-edge-tech`, `needs-contributors`.
//!
//! **Ordering and filtering:**
//! ```bash
//! project-scout discover --languages go --sort relevance --strict --limit 20
//! ```
//!
//! - `rank` (default): most popular first, then most recently updated
//! - `relevance`: how well each project matches the requested languages and topics
//! - `stars`, `updated`: by a single field
//!
//! # Analytics
//!
//! ```bash
//! project-scout analyze https://github.com/tokio-rs/tokio
//! project-scout compare https://github.com/clap-rs/clap https://gitlab.com/group/tool
//! ```
//!
//! Analytics include a twelve-week commit series, a health score from 0 to 100 and an activity
//! trend. Repositories on other hosts get empty analytics.
//!
//! # Output Formats
//!
//! `discover` and `suggest` support `--format console|json|csv`; `analyze` and `compare` support
//! `--format console|json`. Use `--output PATH` to write the report to a file.
//!
//! # Configuration
//!
//! ```bash
//! project-scout init             # writes scout.yml
//! project-scout init scout.toml  # or TOML / JSON
//! project-scout validate
//! ```
//!
//! The configuration lists the sources in precedence order: when two sources return the same
//! project, the entry from the source listed first is kept. It also sets the request timeout,
//! the per-source result limit and the rate limit applied to download-count lookups.
//!
//! **Default search locations:** `scout.toml`, `scout.yml`, `scout.yaml`, `scout.json` in the
//! current directory. Without a file, built-in defaults are used.
//!
//! # Authentication
//!
//! ```bash
//! export GITHUB_TOKEN=ghp_...
//! export GITLAB_TOKEN=glpat-...
//! export SCOUT_AI_API_KEY=...
//! ```
//!
//! Tokens raise API rate limits. `SCOUT_AI_API_KEY` and the `suggestions.endpoint` setting are
//! required only by the `suggest` command.
//!
//! # Troubleshooting
//!
//! ```bash
//! project-scout discover --topics cli --log-level debug
//! ```

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use project_scout::Result;

mod commands;

use crate::commands::{
    AnalyzeArgs, CompareArgs, DiscoverArgs, InitArgs, SuggestArgs, ValidateArgs, analyze_project, compare_projects, discover_projects,
    init_config, suggest_projects, validate_config,
};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "project-scout", version, about, long_about = None)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: ScoutSubcommand,
}

#[derive(Subcommand, Debug)]
enum ScoutSubcommand {
    /// Search every enabled source for projects matching a preference
    Discover(Box<DiscoverArgs>),
    /// Compute health and activity analytics for a repository
    Analyze(Box<AnalyzeArgs>),
    /// Compare two repositories side by side
    Compare(Box<CompareArgs>),
    /// Ask the suggestion service for projects matching a preference
    Suggest(Box<SuggestArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    match &Cli::parse().command {
        ScoutSubcommand::Discover(args) => discover_projects(args).await,
        ScoutSubcommand::Analyze(args) => analyze_project(args).await,
        ScoutSubcommand::Compare(args) => compare_projects(args).await,
        ScoutSubcommand::Suggest(args) => suggest_projects(args).await,
        ScoutSubcommand::Init(args) => init_config(args),
        ScoutSubcommand::Validate(args) => validate_config(args),
    }
}
