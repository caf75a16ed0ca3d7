//! TOML-based configuration for scopekit.
//!
//! Supports a config file (scopekit.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [dsl]
//! separator = "|"
//! args_separator = ","
//!
//! [pagination]
//! default_per_page = 20
//! max_per_page = 100
//!
//! [database]
//! path = "${DATA_DIR}/app.sqlite"
//!
//! [[models]]
//! name = "widget"
//! table = "widgets"
//!
//! [[models.fields]]
//! name = "num"
//! column = "num"
//! type = "integer"
//! nullable = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::ModelDescriptor;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// DSL separators.
    pub dsl: DslSettings,

    /// Pagination limits.
    pub pagination: PaginationSettings,

    /// SQLite database used by the CLI.
    pub database: DatabaseSettings,

    /// Models declared in configuration.
    pub models: Vec<ModelDescriptor>,
}

/// Separators of the filter/sort/aggregation DSL.
///
/// Request parameters `filter_separator` and `filter_args_separator` take
/// precedence over these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DslSettings {
    /// Separates list entries (`filter_columns=a|b`).
    pub separator: String,

    /// Separates the arguments of multi-argument operators (`IN`, `NIN`).
    pub args_separator: String,
}

impl Default for DslSettings {
    fn default() -> Self {
        Self {
            separator: "|".to_string(),
            args_separator: ",".to_string(),
        }
    }
}

/// Pagination limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_per_page: 20,
            max_per_page: 100,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Path to a SQLite file (supports ${ENV_VAR} expansion).
    pub path: Option<String>,
}

impl DatabaseSettings {
    /// Get the database path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.path
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SCOPEKIT_CONFIG`
    /// 2. `./scopekit.toml`
    /// 3. `~/.config/scopekit/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SCOPEKIT_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("scopekit.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("scopekit").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("no config file found, using defaults");
        Ok(Settings::default())
    }

    /// Get a model descriptor by name.
    pub fn get_model(&self, name: &str) -> Result<&ModelDescriptor, SettingsError> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| SettingsError::ModelNotFound(name.to_string()))
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.dsl.separator.is_empty() || self.dsl.args_separator.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "dsl separators must not be empty".into(),
            ));
        }
        if self.pagination.default_per_page == 0 || self.pagination.max_per_page == 0 {
            return Err(SettingsError::InvalidConfig(
                "pagination sizes must be positive".into(),
            ));
        }
        if let Some(dup) = self
            .models
            .iter()
            .enumerate()
            .find(|(i, m)| self.models[..*i].iter().any(|o| o.name == m.name))
        {
            return Err(SettingsError::InvalidConfig(format!(
                "duplicate model: {}",
                dup.1.name
            )));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
