//! Configuration module for the batch runner.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `BR_` and use double underscores
//! to separate nested levels:
//! - `BR_RUNNER__INPUT=public_cases.json` sets `runner.input`
//! - `BR_RUNNER__ON_FAILURE=abort` sets `runner.on_failure`
//! - `BR_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Directory holding the settings file, searched from the current directory upwards.
pub const CONFIG_DIR: &str = ".batch-runner";
pub const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "BR_";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Batch run configuration
    #[serde(default)]
    pub runner: RunnerConfig,

    /// External calculator invocation
    #[serde(default)]
    pub calculator: CalculatorConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RunnerConfig {
    /// JSON array of test cases
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Results file, truncated at the start of every run
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// What to do when the calculator fails for a record
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Show a progress bar on stderr
    #[serde(default = "default_true")]
    pub progress: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CalculatorConfig {
    /// Program followed by any leading arguments. The three trip values are
    /// appended after these.
    #[serde(default = "default_command")]
    pub command: Vec<String>,

    /// Working directory for the calculator process
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for every target
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `runner = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

/// Behaviour when the calculator cannot be started or exits non-zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log a warning, keep whatever stdout was captured, move on
    #[default]
    Continue,
    /// Stop the run at the first failing record
    Abort,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_input() -> PathBuf {
    PathBuf::from("private_cases.json")
}
fn default_output() -> PathBuf {
    PathBuf::from("private_results.txt")
}
fn default_command() -> Vec<String> {
    vec!["./run.sh".to_string()]
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            runner: RunnerConfig::default(),
            calculator: CalculatorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            on_failure: FailurePolicy::default(),
            progress: true,
        }
    }
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            working_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, still honouring `BR_` overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore becomes a dot, single underscore stays inside field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for the config directory
    /// from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_DIR))
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE))
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BoxError> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, BoxError> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
