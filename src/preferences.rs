//! View ranks loaded from a JSON preference document.
//!
//! ```json
//! { "default_rank": 1.0, "ranks": { "V1": 5.0, "V2": 3 } }
//! ```
//!
//! Both fields are optional. Views are matched by name.

use crate::record::{Rank, View};
use crate::symbol::SymbolStore;
use crate::trace::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Error loading a preference document.
#[derive(Debug)]
pub enum PreferenceError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A rank that is NaN or infinite, with the key it was given under.
    NonFiniteRank(String),
}

impl std::fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceError::Io(e) => write!(f, "Cannot read preferences: {}", e),
            PreferenceError::Json(e) => write!(f, "Invalid preferences: {}", e),
            PreferenceError::NonFiniteRank(key) => {
                write!(f, "Rank for '{}' is not a finite number", key)
            }
        }
    }
}

impl std::error::Error for PreferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreferenceError::Io(e) => Some(e),
            PreferenceError::Json(e) => Some(e),
            PreferenceError::NonFiniteRank(_) => None,
        }
    }
}

impl From<std::io::Error> for PreferenceError {
    fn from(e: std::io::Error) -> Self {
        PreferenceError::Io(e)
    }
}

impl From<serde_json::Error> for PreferenceError {
    fn from(e: serde_json::Error) -> Self {
        PreferenceError::Json(e)
    }
}

/// Ranks by view name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preferences {
    #[serde(default)]
    pub default_rank: Option<f64>,
    #[serde(default)]
    pub ranks: BTreeMap<String, f64>,
}

impl Preferences {
    pub fn from_json(text: &str) -> Result<Self, PreferenceError> {
        let prefs: Preferences = serde_json::from_str(text)?;
        prefs.validate()?;
        Ok(prefs)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Add or replace one view's rank.
    pub fn with_rank(mut self, view: &str, rank: f64) -> Self {
        self.ranks.insert(view.to_string(), rank);
        self
    }

    fn validate(&self) -> Result<(), PreferenceError> {
        if let Some(rank) = self.default_rank {
            if !rank.is_finite() {
                return Err(PreferenceError::NonFiniteRank("default_rank".to_string()));
            }
        }
        if let Some((name, _)) = self.ranks.iter().find(|(_, r)| !r.is_finite()) {
            return Err(PreferenceError::NonFiniteRank(name.clone()));
        }
        Ok(())
    }

    /// Set every view's rank: its named rank, else this document's
    /// `default_rank`, else `fallback`. Returns how many views were named.
    pub fn apply(&self, views: &mut [View], symbols: &SymbolStore, fallback: f64) -> usize {
        let unnamed = Rank::new(self.default_rank.unwrap_or(fallback));
        let mut matched = 0;

        for view in views.iter_mut() {
            let rank = symbols
                .resolve(view.name())
                .and_then(|name| self.ranks.get(name))
                .map(|&r| Rank::new(r));
            match rank {
                Some(rank) => {
                    matched += 1;
                    view.set_rank(rank);
                }
                None => view.set_rank(unnamed),
            }
        }

        for name in self.ranks.keys() {
            let known = symbols
                .get(name)
                .map_or(false, |id| views.iter().any(|v| v.name() == id));
            if !known {
                warn!(view = name.as_str(), "preference_for_unknown_view");
            }
        }

        debug!(matched, views = views.len(), "preferences_applied");
        matched
    }
}

#[cfg(test)]
#[path = "tests/preferences.rs"]
mod tests;
