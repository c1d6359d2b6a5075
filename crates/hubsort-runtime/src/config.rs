#![forbid(unsafe_code)]

//! Application-wide defaults for every sortable region.
//!
//! [`SortableConfig::globals`] sits below each region's own options:
//!
//! ```text
//! globals < options input < individual option inputs < host handlers
//! ```
//!
//! # Loading
//!
//! ```toml
//! strict_targets = true
//!
//! [globals]
//! animation = 150
//! ghostClass = "sortable-ghost"
//! group = { name = "board", pull = "clone" }
//! ```
//!
//! ```rust,ignore
//! let config = SortableConfig::from_toml_file("hubsort.toml")?.validated()?;
//! ```
//!
//! Option keys inside `globals` use the engine's spelling. Callback-shaped
//! options (`setData`, `store`, predicate pulls) cannot come from a file.

#[cfg(feature = "config")]
use std::path::Path;

use hubsort_core::SortableOptions;
use thiserror::Error;

/// Defaults shared by every region.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SortableConfig {
    /// Engine options applied to every region.
    pub globals: SortableOptions,
    /// Refuse data targets that expose no sequence capability instead of
    /// degrading them to no-ops.
    pub strict_targets: bool,
}

impl SortableConfig {
    #[must_use]
    pub fn with_globals(globals: SortableOptions) -> Self {
        Self {
            globals,
            ..Self::default()
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Range and shape problems, one message each. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let globals = &self.globals;

        for (key, value) in [
            ("swapThreshold", globals.swap_threshold),
            ("invertedSwapThreshold", globals.inverted_swap_threshold),
        ] {
            if let Some(v) = value
                && !(0.0..=1.0).contains(&v)
            {
                errors.push(format!("globals.{key} must be in [0, 1], got {v}"));
            }
        }

        for (key, value) in [
            ("draggable", &globals.draggable),
            ("handle", &globals.handle),
            ("dataIdAttr", &globals.data_id_attr),
            ("ghostClass", &globals.ghost_class),
            ("chosenClass", &globals.chosen_class),
            ("dragClass", &globals.drag_class),
        ] {
            if value.as_deref().is_some_and(|s| s.trim().is_empty()) {
                errors.push(format!("globals.{key} must not be blank"));
            }
        }

        if let Some(group) = &globals.group
            && group.name().is_some_and(str::is_empty)
        {
            errors.push("globals.group name must not be empty".into());
        }

        errors
    }

    /// `self` if [`Self::validate`] finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Failure to load a [`SortableConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(toml::de::Error),
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
