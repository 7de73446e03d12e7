//! Render and site configuration.

use mdxsite_core::{MetadataOptions, ParseOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options for the render helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Log unknown tags at warn level; debug level otherwise.
    pub warn_unknown_tags: bool,
    /// Include the icon in expanded admonition headings.
    pub admonition_icons: bool,
    /// Wrap heading content in a link to the heading itself.
    pub heading_anchors: bool,
    /// Add `loading="lazy"` to images.
    pub lazy_images: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            warn_unknown_tags: true,
            admonition_icons: true,
            heading_anchors: false,
            lazy_images: false,
        }
    }
}

/// Configuration for one site build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    /// Markdown parsing.
    pub parse: ParseOptions,
    /// Page metadata derivation.
    pub metadata: MetadataOptions,
    /// Rendering.
    pub render: RenderOptions,
}

/// Errors raised while reading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid JSON.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid YAML.
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SiteConfig {
    /// Reads a configuration from JSON; missing fields take their defaults.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Reads a configuration from YAML; an empty document yields the defaults.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }
}
