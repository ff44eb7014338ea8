//! Core configuration loaded from TOML.
//!
//! # Responsibility
//! - Provide defaults for meta key, sentinel, logging and extra options.
//! - Validate configuration before any store or registry is built.
//!
//! # Invariants
//! - Every field has a default; an empty document is a valid config.
//! - Config-declared options are applied before any code-registered extension.

use crate::logging::default_log_level;
use crate::model::visibility::{VisibilityOption, DEFAULT_SENTINEL, VISIBILITY_META_KEY};
use crate::registry::vocabulary::{options_extension, VisibilityRegistryBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

static OPTION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_\-]{0,31}$").expect("valid option id regex"));

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// Metadata key for assignments.
    pub meta_key: String,
    /// Display value for absent or unrecognized assignments.
    pub sentinel: String,
    pub logging: LoggingConfig,
    /// Extra options appended to (or relabeling) the built-in set.
    pub options: Vec<OptionConfig>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            meta_key: VISIBILITY_META_KEY.to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            logging: LoggingConfig::default(),
            options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute log directory. Logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionConfig {
    pub id: String,
    pub label: String,
}

impl CoreConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meta_key.trim().is_empty() {
            return Err(ConfigError::EmptyMetaKey);
        }
        if self.meta_key.trim() != self.meta_key {
            return Err(ConfigError::PaddedMetaKey(self.meta_key.clone()));
        }
        if self.sentinel.is_empty() {
            return Err(ConfigError::EmptySentinel);
        }
        for option in &self.options {
            if !OPTION_ID_RE.is_match(&option.id) {
                return Err(ConfigError::InvalidOptionId(option.id.clone()));
            }
            if option.label.trim().is_empty() {
                return Err(ConfigError::EmptyOptionLabel(option.id.clone()));
            }
        }
        Ok(())
    }

    /// Registry builder seeded with the defaults plus config-declared options.
    pub fn registry_builder(&self) -> VisibilityRegistryBuilder {
        let builder = VisibilityRegistryBuilder::new();
        if self.options.is_empty() {
            return builder;
        }
        let additions = self
            .options
            .iter()
            .map(|option| VisibilityOption::new(option.id.as_str(), option.label.trim()))
            .collect();
        builder.with_extension(options_extension(additions))
    }
}

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    EmptyMetaKey,
    PaddedMetaKey(String),
    EmptySentinel,
    InvalidOptionId(String),
    EmptyOptionLabel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::EmptyMetaKey => write!(f, "meta_key must not be empty"),
            Self::PaddedMetaKey(value) => {
                write!(f, "meta_key `{value}` must not have surrounding whitespace")
            }
            Self::EmptySentinel => write!(f, "sentinel must not be empty"),
            Self::InvalidOptionId(value) => write!(
                f,
                "option id `{value}` must match [a-z][a-z0-9_-]{{0,31}}"
            ),
            Self::EmptyOptionLabel(id) => write!(f, "option `{id}` has an empty label"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}
