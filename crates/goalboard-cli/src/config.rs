//! CLI configuration
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. TOML file given with `--config`
//! 3. `GOALBOARD_ENDPOINT` / `GOALBOARD_VISITOR_FILE`
//! 4. `--endpoint`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the store endpoint
pub const ENV_ENDPOINT: &str = "GOALBOARD_ENDPOINT";

/// Environment variable overriding the visitor id file
pub const ENV_VISITOR_FILE: &str = "GOALBOARD_VISITOR_FILE";

/// Default location of the visitor id file
pub const DEFAULT_VISITOR_FILE: &str = ".goalboard/visitor";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Config location
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No store endpoint anywhere
    #[error("no store endpoint configured (set `endpoint`, GOALBOARD_ENDPOINT, or --endpoint)")]
    MissingEndpoint,
}

/// Goalboard configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoalboardConfig {
    /// Store endpoint URL
    pub endpoint: Option<String>,
    /// Where the visitor id is kept
    pub visitor_file: PathBuf,
}

impl Default for GoalboardConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            visitor_file: PathBuf::from(DEFAULT_VISITOR_FILE),
        }
    }
}

impl GoalboardConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With store endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// With visitor id file
    #[inline]
    #[must_use]
    pub fn with_visitor_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.visitor_file = path.into();
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it does not parse
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Apply environment overrides through `lookup`
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(path) = lookup(ENV_VISITOR_FILE).filter(|v| !v.trim().is_empty()) {
            self.visitor_file = PathBuf::from(path);
        }
        self
    }

    /// Full resolution: defaults, optional file, process environment, flag
    ///
    /// # Errors
    /// Propagates file errors from [`GoalboardConfig::from_file`]
    pub fn resolve(file: Option<&Path>, endpoint_flag: Option<&str>) -> Result<Self, ConfigError> {
        let config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env(|key| std::env::var(key).ok());
        Ok(match endpoint_flag {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        })
    }

    /// Configured endpoint
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEndpoint`] if none is set
    pub fn endpoint(&self) -> Result<&str, ConfigError> {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint)
    }
}
