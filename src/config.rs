//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.lookup-differ.toml` in current directory
//! 4. `~/.config/lookup-differ/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [diff]
//! case_insensitive = true
//! table_contains = "LOOKUP"
//!
//! [output]
//! out_dir = "patches"
//! json_out = "report/findings.json"
//! html_out = "report/index.html"
//! max_per_kind = 50
//! max_parse_errors = 10
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `LOOKUP_DIFFER_OUT_DIR` | Patch output directory |
//! | `LOOKUP_DIFFER_JSON_OUT` | JSON finding dump path |
//! | `LOOKUP_DIFFER_HTML_OUT` | HTML report path |
//! | `LOOKUP_DIFFER_TABLE_CONTAINS` | Table name filter |
//! | `LOOKUP_DIFFER_CASE_INSENSITIVE` | `true`/`false` |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub diff:   DiffConfig,
    #[serde(default)]
    pub output: OutputConfig
}

/// Matching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Compare table and column names case-insensitively
    pub case_insensitive: bool,
    /// Only index tables whose name contains this text
    pub table_contains:   Option<String>
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            table_contains:   None
        }
    }
}

/// Artifact and report configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub out_dir:          Option<PathBuf>,
    pub json_out:         Option<PathBuf>,
    pub html_out:         Option<PathBuf>,
    pub max_per_kind:     usize,
    pub max_parse_errors: usize
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            out_dir:          None,
            json_out:         None,
            html_out:         None,
            max_per_kind:     50,
            max_parse_errors: 10
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.lookup-differ.toml)
    /// 3. Config file in home directory (~/.config/lookup-differ/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let home_config = env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("lookup-differ")
                .join("config.toml")
        });
        Self::load_from(
            home_config.as_deref(),
            Path::new(".lookup-differ.toml"),
            |name| env::var(name).ok()
        )
    }

    /// Load from explicit file locations and an environment lookup.
    pub fn load_from(
        home_config: Option<&Path>,
        local_config: &Path,
        env_lookup: impl Fn(&str) -> Option<String>
    ) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home_config) = home_config.filter(|p| p.exists()) {
            config = Self::from_file(home_config)?;
        }

        // Local config overrides home config
        if local_config.exists() {
            config = Self::from_file(local_config)?;
        }

        config.apply_env(env_lookup)?;
        Ok(config)
    }

    /// Parse a TOML config document.
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Override values with `LOOKUP_DIFFER_*` environment variables.
    pub fn apply_env(&mut self, env_lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(dir) = env_lookup("LOOKUP_DIFFER_OUT_DIR") {
            self.output.out_dir = Some(PathBuf::from(dir));
        }

        if let Some(path) = env_lookup("LOOKUP_DIFFER_JSON_OUT") {
            self.output.json_out = Some(PathBuf::from(path));
        }

        if let Some(path) = env_lookup("LOOKUP_DIFFER_HTML_OUT") {
            self.output.html_out = Some(PathBuf::from(path));
        }

        if let Some(filter) = env_lookup("LOOKUP_DIFFER_TABLE_CONTAINS") {
            self.diff.table_contains = Some(filter);
        }

        if let Some(value) = env_lookup("LOOKUP_DIFFER_CASE_INSENSITIVE") {
            self.diff.case_insensitive = parse_bool(&value).ok_or_else(|| {
                config_error(format!(
                    "LOOKUP_DIFFER_CASE_INSENSITIVE must be true or false, got '{}'",
                    value
                ))
            })?;
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::from_toml_str("[output]\nmax_per_kind = 5\n").unwrap();
        assert_eq!(config.output.max_per_kind, 5);
        assert_eq!(config.output.max_parse_errors, 10);
        assert!(config.diff.case_insensitive);
    }
}
