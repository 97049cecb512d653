//! Engine configuration.
//!
//! Built in code with the `with_*` methods or read from JSON; fields missing
//! from the JSON keep their defaults.

use serde::Deserialize;
use std::path::Path;

/// Error loading an engine configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Cannot read config: {}", e),
            ConfigError::Json(e) => write!(f, "Invalid config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Settings for one rewriting engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Stop after this many rewritings. `None` means all of them.
    pub max_rewritings: Option<usize>,
    /// Drop rewritings that repeat an earlier one.
    pub dedup: bool,
    /// Rank for views a preference document does not name.
    pub default_rank: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rewritings: None,
            dedup: false,
            default_rank: 0.0,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rewritings(mut self, max: usize) -> Self {
        self.max_rewritings = Some(max);
        self
    }

    pub fn with_dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn with_default_rank(mut self, rank: f64) -> Self {
        self.default_rank = rank;
        self
    }

    /// The enumeration cap this configuration asks for.
    pub fn cap(&self) -> usize {
        self.max_rewritings.unwrap_or(usize::MAX)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_rank.is_finite() {
            return Err(ConfigError::Invalid(
                "default_rank must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
