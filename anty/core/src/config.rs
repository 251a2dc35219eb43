//! Engine Configuration
//!
//! The morphed search bar's geometry and styling come from the hosting UI.
//! The engine consumes the config verbatim when computing morph targets;
//! purely visual fields (corner radius, placeholder text) pass straight
//! through to the host's renderer.
//!
//! Config can be embedded in a TOML file under an `[search_bar]` section:
//!
//! ```toml
//! [search_bar]
//! width = 240.0
//! height = 44.0
//! corner_radius = 22.0
//! placeholder = "Search…"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading an engine config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file at {path}: {source}")]
    Read {
        /// The path that was attempted.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Geometry and styling of the morphed search bar.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBarConfig {
    /// Bar width in stage units.
    pub width: f32,
    /// Bar height in stage units.
    pub height: f32,
    /// Corner radius; rendering concern, passed through to the host.
    pub corner_radius: f32,
    /// Placeholder text; rendering concern, passed through to the host.
    pub placeholder: String,
}

impl Default for SearchBarConfig {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 44.0,
            corner_radius: 22.0,
            placeholder: "Search…".to_string(),
        }
    }
}

/// Measured geometry of the search-bar target element, supplied by the host
/// once the target is mounted and measurable. Offsets are relative to the
/// character's rest origin.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SearchTarget {
    /// Horizontal center offset.
    pub x: f32,
    /// Vertical center offset.
    pub y: f32,
    /// Measured width.
    pub width: f32,
    /// Measured height.
    pub height: f32,
}

/// Top-level engine config file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AntyConfig {
    /// Search-bar morph configuration.
    pub search_bar: SearchBarConfig,
}

impl AntyConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
