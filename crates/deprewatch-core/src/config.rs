//! Configuration schema (deprewatch.toml)

use crate::annotation::AnnotationStyle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Catalog acquisition settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL of the deprecation notes document. A `{version}` placeholder is
    /// substituted with the catalog version before fetching.
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Catalog version identifier; also keys the on-disk cache
    #[serde(default = "default_version")]
    pub version: String,

    /// Heading level that delimits sections in the source document (1-6)
    #[serde(default = "default_heading_level")]
    pub heading_level: u8,

    /// Directory for persisted catalogs
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

fn default_source_url() -> String {
    "https://developer.chrome.com/release-notes/{version}".to_string()
}

fn default_version() -> String {
    "130".to_string()
}

fn default_heading_level() -> u8 {
    2
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".deprewatch")
}

impl CatalogConfig {
    /// Source URL with the `{version}` placeholder resolved
    pub fn resolved_source_url(&self) -> String {
        self.source_url.replace("{version}", &self.version)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            version: default_version(),
            heading_level: default_heading_level(),
            cache_dir: default_cache_dir(),
        }
    }
}

/// Generative inference settings for catalog structuring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Max tokens for the structuring response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature; extraction wants determinism
    #[serde(default)]
    pub temperature: f32,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_max_tokens() -> usize {
    2048
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog acquisition settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Inference settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Annotation styling
    #[serde(default)]
    pub annotation: AnnotationStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            inference: InferenceConfig::default(),
            annotation: AnnotationStyle::default(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from a TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
