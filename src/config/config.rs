use super::SourceId;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;

/// The default configuration YAML content, embedded from `default_config.yml`
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../default_config.yml");

/// Base names probed, in order, when no explicit configuration path is given
const CONFIG_CANDIDATES: [&str; 4] = ["scout.toml", "scout.yml", "scout.yaml", "scout.json"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of records kept from a single source
    #[serde(default = "default_max_results_per_source")]
    pub max_results_per_source: usize,

    /// Whether analytics are cached for the lifetime of the process
    #[serde(default = "default_true")]
    pub analytics_cache: bool,

    #[serde(default)]
    pub stats_rate_limit: RateLimitConfig,

    #[serde(default)]
    pub suggestions: SuggestionsConfig,

    /// Sources in precedence order
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

/// One entry of the ordered source list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub id: SourceId,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Replaces the source's default API endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Replaces the host used for per-package statistics (NPM and Packagist)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_base_url: Option<String>,
}

/// Token bucket settings for secondary statistics calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    #[serde(default = "default_capacity")]
    pub capacity: u32,

    #[serde(default = "default_capacity")]
    pub refill_tokens: u32,

    #[serde(default = "default_refill_interval_ms")]
    pub refill_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionsConfig {
    /// Endpoint receiving suggestion requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name forwarded to the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_max_results_per_source() -> usize {
    50
}

const fn default_true() -> bool {
    true
}

const fn default_capacity() -> u32 {
    5
}

const fn default_refill_interval_ms() -> u64 {
    1000
}

const fn default_max_suggestions() -> usize {
    10
}

fn default_sources() -> Vec<SourceConfig> {
    use strum::IntoEnumIterator;

    SourceId::iter()
        .map(|id| SourceConfig {
            id,
            enabled: id.is_implemented(),
            base_url: None,
            stats_base_url: None,
        })
        .collect()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            refill_tokens: default_capacity(),
            refill_interval_ms: default_refill_interval_ms(),
        }
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: None,
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// When `config_path` is `None`, the first of `scout.toml`, `scout.yml`, `scout.yaml`, and
    /// `scout.json` found in `base_dir` is used. If none exists, the embedded defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let mut found = None;
            for name in CONFIG_CANDIDATES {
                let path = base_dir.join(name);
                match fs::read_to_string(&path) {
                    Ok(text) => {
                        found = Some((path, text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration from {path}")),
                }
            }

            let Some(result) = found else {
                let config = Self::default();
                let mut warnings = Vec::new();
                config.validate(&mut warnings);
                return Ok((config, warnings));
            };
            result
        };

        let config = Self::parse(&final_path, &text)?;
        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        Ok((config, warnings))
    }

    /// Parse configuration text, choosing the format from the file extension
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not recognized or the text does not parse
    pub fn parse(path: &Utf8Path, text: &str) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        let config = match extension {
            "toml" => toml::from_str(text).into_app_err_with(|| format!("parsing TOML configuration from {path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(text).into_app_err_with(|| format!("parsing YAML configuration from {path}"))?,
            "json" => serde_json::from_str(text).into_app_err_with(|| format!("parsing JSON configuration from {path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };
        Ok(config)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Save the default configuration to a file
    ///
    /// YAML output is the embedded `default_config.yml` verbatim, comments included. Other formats
    /// are produced by serializing the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default_with_comments(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();

        if matches!(extension, "yml" | "yaml") {
            fs::write(output_path, DEFAULT_CONFIG_YAML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
            Ok(())
        } else {
            self.save(output_path)
        }
    }

    /// Enabled sources in precedence order, with later duplicates of the same id dropped
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        let mut seen = HashSet::new();
        self.sources.iter().filter(move |s| seen.insert(s.id)).filter(|s| s.enabled)
    }

    /// First configuration entry for a source, if any
    #[must_use]
    pub fn source(&self, id: SourceId) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn stats_refill_interval(&self) -> Duration {
        Duration::from_millis(self.stats_rate_limit.refill_interval_ms)
    }

    /// Collect warnings about settings that are legal but almost certainly a mistake
    fn validate(&self, warnings: &mut Vec<String>) {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id) {
                warnings.push(format!(
                    "source '{}' is listed more than once; only the first entry is used",
                    source.id
                ));
            }
        }

        for source in self.enabled_sources() {
            if !source.id.is_implemented() {
                warnings.push(format!(
                    "source '{}' is enabled but not implemented; it will not return any projects",
                    source.id
                ));
            }
        }

        if self.enabled_sources().next().is_none() {
            warnings.push("no sources are enabled; discovery will always return an empty result".to_string());
        }

        if self.request_timeout_secs == 0 {
            warnings.push("request_timeout_secs is 0; every request will time out immediately".to_string());
        }

        if self.max_results_per_source == 0 {
            warnings.push("max_results_per_source is 0; every source will return an empty result".to_string());
        }

        if self.stats_rate_limit.capacity == 0 {
            warnings.push("stats_rate_limit.capacity is 0; it is treated as 1".to_string());
        }

        if self.stats_rate_limit.refill_tokens == 0 {
            warnings.push("stats_rate_limit.refill_tokens is 0; it is treated as 1".to_string());
        }

        if self.stats_rate_limit.refill_interval_ms == 0 {
            warnings.push("stats_rate_limit.refill_interval_ms is 0; statistics calls are effectively unthrottled".to_string());
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        serde_yaml::from_str(DEFAULT_CONFIG_YAML).expect("default_config.yml should be valid YAML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_warnings() {
        let config = Config::default();
        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.max_results_per_source, 50);
        assert!(config.analytics_cache);
        assert_eq!(config.stats_rate_limit, RateLimitConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.stats_refill_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_default_enabled_sources_are_the_implemented_ones() {
        let config = Config::default();
        let enabled: Vec<_> = config.enabled_sources().map(|s| s.id).collect();
        assert_eq!(
            enabled,
            [
                SourceId::Github,
                SourceId::Gitlab,
                SourceId::Codeberg,
                SourceId::Npm,
                SourceId::Packagist,
                SourceId::CratesIo,
                SourceId::MavenCentral,
                SourceId::Nuget,
            ]
        );
    }

    #[test]
    fn test_serde_defaults_match_embedded_file() {
        let from_empty: Config = serde_yaml::from_str("{}").unwrap();
        let embedded = Config::default();
        assert_eq!(from_empty.request_timeout_secs, embedded.request_timeout_secs);
        assert_eq!(from_empty.max_results_per_source, embedded.max_results_per_source);
        assert_eq!(from_empty.stats_rate_limit, embedded.stats_rate_limit);
        assert_eq!(from_empty.sources, embedded.sources);
    }

    #[test]
    fn test_duplicate_sources_keep_first_entry() {
        let config: Config = serde_yaml::from_str(
            "sources:\n  - id: npm\n    enabled: false\n  - id: github\n  - id: npm\n    enabled: true\n",
        )
        .unwrap();

        let enabled: Vec<_> = config.enabled_sources().map(|s| s.id).collect();
        assert_eq!(enabled, [SourceId::Github]);

        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        assert!(warnings.iter().any(|w| w.contains("'npm' is listed more than once")));
    }

    #[test]
    fn test_warnings_for_degenerate_settings() {
        let config: Config = serde_yaml::from_str(
            "request_timeout_secs: 0\nmax_results_per_source: 0\nstats_rate_limit:\n  capacity: 0\nsources: []\n",
        )
        .unwrap();

        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        assert!(warnings.iter().any(|w| w.contains("no sources are enabled")));
        assert!(warnings.iter().any(|w| w.contains("request_timeout_secs is 0")));
        assert!(warnings.iter().any(|w| w.contains("max_results_per_source is 0")));
        assert!(warnings.iter().any(|w| w.contains("capacity is 0")));
    }

    #[test]
    fn test_warning_for_enabled_unimplemented_source() {
        let config: Config = serde_yaml::from_str("sources:\n  - id: pypi\n").unwrap();
        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        assert!(warnings.iter().any(|w| w.contains("'pypi' is enabled but not implemented")));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("not_a_field: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_extension() {
        let result = Config::parse(Utf8Path::new("scout.ini"), "");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_json_and_toml() {
        let json = Config::parse(Utf8Path::new("scout.json"), r#"{"request_timeout_secs": 3}"#).unwrap();
        assert_eq!(json.request_timeout_secs, 3);

        let toml = Config::parse(
            Utf8Path::new("scout.toml"),
            "max_results_per_source = 7\n\n[[sources]]\nid = \"crates-io\"\nbase_url = \"http://localhost:1234\"\n",
        )
        .unwrap();
        assert_eq!(toml.max_results_per_source, 7);
        assert_eq!(toml.sources.len(), 1);
        assert_eq!(toml.sources[0].id, SourceId::CratesIo);
        assert!(toml.sources[0].enabled);
        assert_eq!(toml.sources[0].base_url.as_deref(), Some("http://localhost:1234"));
    }
}
