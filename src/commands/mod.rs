//! Command-line commands.
//!
//! Each command loads configuration through [`common::Common`], runs one library operation, and
//! renders the outcome with the report generators.

mod analyze;
mod common;
mod compare;
mod discover;
mod init;
mod suggest;
mod validate;

pub use analyze::{AnalyzeArgs, analyze_project};
pub use compare::{CompareArgs, compare_projects};
pub use discover::{DiscoverArgs, discover_projects};
pub use init::{InitArgs, init_config};
pub use suggest::{SuggestArgs, suggest_projects};
pub use validate::{ValidateArgs, validate_config};
