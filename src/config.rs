//! Viewer configuration.
//!
//! ```text
//! default_paper = "2401.00001"
//! math_backend = "katex"
//! standalone = true
//! title = "Theorem Search"
//! class_prefix = "av-"
//! custom_css = "body { max-width: 60rem; }"
//! ```

use crate::error::{ConfigError, Result};
use crate::render::math::MathBackend;
use serde::Deserialize;
use std::path::Path;

/// Configuration for page rendering and routing.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Paper selected when the fragment names no known paper.
    pub default_paper: Option<String>,
    /// Client-side typesetter.
    pub math_backend: MathBackend,
    /// Whether to generate a complete HTML document or just the body content.
    pub standalone: bool,
    /// Document title (for standalone mode).
    pub title: String,
    /// Additional CSS to include.
    pub custom_css: Option<String>,
    /// CSS class prefix for styling.
    pub class_prefix: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_paper: None,
            math_backend: MathBackend::default(),
            standalone: true,
            title: "Artifact Browser".to_string(),
            custom_css: None,
            class_prefix: "av-".to_string(),
        }
    }
}

/// Raw configuration structure for deserialization.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    default_paper: Option<String>,
    math_backend: Option<String>,
    standalone: Option<bool>,
    title: Option<String>,
    custom_css: Option<String>,
    class_prefix: Option<String>,
}

impl ViewerConfig {
    /// Parse configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let raw: RawConfig =
            toml::from_str(input).map_err(|e| ConfigError::Toml(e.to_string()))?;
        Ok(Self::from_raw(raw)?)
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn from_raw(raw: RawConfig) -> std::result::Result<Self, ConfigError> {
        let defaults = Self::default();
        let math_backend = match raw.math_backend {
            Some(name) => name.parse()?,
            None => defaults.math_backend,
        };

        Ok(Self {
            default_paper: raw.default_paper.filter(|id| !id.is_empty()),
            math_backend,
            standalone: raw.standalone.unwrap_or(defaults.standalone),
            title: raw.title.unwrap_or(defaults.title),
            custom_css: raw.custom_css,
            class_prefix: raw.class_prefix.unwrap_or(defaults.class_prefix),
        })
    }
}
