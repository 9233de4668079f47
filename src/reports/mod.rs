//! Report generation for discovery results, analytics and comparisons.
//!
//! Every generator writes into a [`core::fmt::Write`] sink so callers can render to a string,
//! a file, or standard output. The console generators optionally color their output; the JSON
//! generators emit the serde form of the records; the CSV generator emits one row per project.

mod common;
mod console;
mod csv;
mod json;
mod reportable_analytics;

pub use console::{
    generate as generate_console, generate_analytics as generate_analytics_console,
    generate_comparison as generate_comparison_console,
};
pub use csv::generate as generate_csv;
pub use json::{generate as generate_json, generate_analytics as generate_analytics_json, generate_comparison as generate_comparison_json};
pub use reportable_analytics::ReportableAnalytics;
