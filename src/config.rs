//! Configuration module for the ThinkLink gate service.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `TL_` and use double underscores
//! to separate nested levels:
//! - `TL_GATE__MIN_THRESHOLD=0.25` sets `gate.min_threshold`
//! - `TL_SERVER__BIND=0.0.0.0:5000` sets `server.bind`
//! - `TL_VECTORS__MAX_WORDS=50000` sets `vectors.max_words`

use crate::error::GateResult;
use crate::gate::{MAX_THRESHOLD, MIN_THRESHOLD, SCORE_CAP, ThresholdPolicy};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory searched for `settings.toml`, relative to a workspace root.
pub const CONFIG_DIR: &str = ".thinklink";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "TL_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Word vector source
    #[serde(default)]
    pub vectors: VectorsConfig,

    /// Acceptance threshold curve
    #[serde(default)]
    pub gate: GateConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VectorsConfig {
    /// GloVe text file or `.tlwv` cache
    #[serde(default = "default_vectors_path")]
    pub path: PathBuf,

    /// Keep only the first N words of a text file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GateConfig {
    /// Threshold with no accumulated score
    #[serde(default = "default_min_threshold")]
    pub min_threshold: f64,

    /// Threshold once `score_cap` is reached
    #[serde(default = "default_max_threshold")]
    pub max_threshold: f64,

    /// Accumulated score at which the threshold saturates
    #[serde(default = "default_score_cap")]
    pub score_cap: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// HTTP server bind address
    #[serde(default = "default_bind_address")]
    pub bind: String,

    /// Allowed CORS origins, `"*"` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Maximum log level: error, warn, info, debug or trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_vectors_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR))
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR))
        .join("vectors")
        .join("glove.6B.100d.txt")
}
fn default_min_threshold() -> f64 {
    MIN_THRESHOLD
}
fn default_max_threshold() -> f64 {
    MAX_THRESHOLD
}
fn default_score_cap() -> f64 {
    SCORE_CAP
}
fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            vectors: VectorsConfig::default(),
            gate: GateConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for VectorsConfig {
    fn default() -> Self {
        Self {
            path: default_vectors_path(),
            max_words: None,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_threshold: default_min_threshold(),
            max_threshold: default_max_threshold(),
            score_cap: default_score_cap(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GateConfig {
    /// Build the validated threshold policy for these settings.
    pub fn policy(&self) -> GateResult<ThresholdPolicy> {
        ThresholdPolicy::new(self.min_threshold, self.max_threshold, self.score_cap)
    }
}

impl LoggingConfig {
    /// Parse the configured level, falling back to `INFO` on unknown names.
    pub fn max_level(&self) -> tracing::Level {
        self.level
            .trim()
            .parse::<tracing::Level>()
            .unwrap_or(tracing::Level::INFO)
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        // Try to find the workspace root by looking for .thinklink directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::load_from(config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref()).extract().map_err(Box::new)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(path))
            // Double underscore separates nested levels; single underscores
            // stay inside field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".")
                    .into()
            }))
    }

    /// Find the workspace config by looking for .thinklink directory
    /// Searches from current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join("settings.toml"));
            }
        }

        None
    }

    /// Render the effective settings as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(
        dir: impl AsRef<Path>,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = dir.as_ref().join(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = format!(
            r#"# ThinkLink Configuration File

# Version of the configuration schema
version = 1

[vectors]
# GloVe text file ("word v1 v2 ... vd" per line) or a .tlwv cache
# written by 'thinklink convert'
path = '{}'

# Keep only the N most frequent words of a text file
# max_words = 100000

[gate]
# Acceptance threshold with no accumulated score
min_threshold = {MIN_THRESHOLD}

# Acceptance threshold once score_cap is reached
max_threshold = {MAX_THRESHOLD}

# Accumulated score at which the threshold stops rising
score_cap = {SCORE_CAP:.1}

[server]
# HTTP server bind address
bind = "{}"

# Allowed CORS origins ("*" allows any origin)
cors_origins = ["*"]

[logging]
# error, warn, info, debug or trace
level = "info"
"#,
            default_vectors_path().display(),
            default_bind_address(),
        );

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
