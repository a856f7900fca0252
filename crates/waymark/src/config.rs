#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Everything the positioning engine would otherwise hardcode lives in
//! [`EngineConfig`]. Defaults match the stock tooltip markup:
//!
//! ```toml
//! # waymark.toml
//! class_prefix = "acme"
//! settle_delay_ms = 300
//! arrow_offset_px = 35.0
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("waymark.toml")?;
//! ```

#[cfg(feature = "config-files")]
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use waymark_core::Selector;

use crate::util::normalize_prefix;

/// Tunables of the positioning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prepended (normalized, see [`normalize_prefix`]) to the class names below.
    pub class_prefix: Option<String>,
    /// Class of the arrow element inside the tooltip.
    pub arrow_class: String,
    /// Class added to the content element of centered steps.
    pub centered_class: String,
    /// Attribute carrying the final placement token.
    pub placement_attribute: String,
    /// Delay between positioning and moving focus to the tooltip.
    pub settle_delay_ms: u64,
    /// How far the arrow sticks out on its static side.
    pub arrow_offset_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            class_prefix: None,
            arrow_class: "shepherd-arrow".into(),
            centered_class: "shepherd-centered".into(),
            placement_attribute: "data-popper-placement".into(),
            settle_delay_ms: 300,
            arrow_offset_px: 35.0,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// The normalized class prefix, possibly empty.
    pub fn prefix(&self) -> String {
        normalize_prefix(self.class_prefix.as_deref())
    }

    /// Selector locating the arrow inside a tooltip.
    pub fn arrow_selector(&self) -> String {
        format!(".{}{}", self.prefix(), self.arrow_class)
    }

    pub fn centered_class_name(&self) -> String {
        format!("{}{}", self.prefix(), self.centered_class)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Check every field. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("arrow_class", &self.arrow_class),
            ("centered_class", &self.centered_class),
        ] {
            let class = format!("{}{}", self.prefix(), value);
            if value.is_empty() {
                errors.push(format!("{field} must not be empty"));
            } else if Selector::parse(&format!(".{class}")).is_err() {
                errors.push(format!("{field} is not a valid class name: {class:?}"));
            }
        }

        if self.placement_attribute.is_empty()
            || self.placement_attribute.chars().any(char::is_whitespace)
        {
            errors.push(format!(
                "placement_attribute must be a non-empty name without whitespace, got {:?}",
                self.placement_attribute
            ));
        }

        if !self.arrow_offset_px.is_finite() || self.arrow_offset_px < 0.0 {
            errors.push(format!(
                "arrow_offset_px must be finite and >= 0, got {}",
                self.arrow_offset_px
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading an [`EngineConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    #[cfg(feature = "config-files")]
    Toml(toml::de::Error),
    #[cfg(feature = "config-files")]
    Json(serde_json::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-files")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-files")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
