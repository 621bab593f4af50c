//! Block configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest file (in bytes) the preview will decode.
pub const MAX_PREVIEW_SIZE: u64 = 10 * 1024 * 1024;

/// Distance from the frame's top edge that arms the header reveal.
pub const HOVER_MARGIN: u16 = 15;

/// How long the pointer must stay near the top edge before the header shows.
pub const HOVER_DELAY_MS: u64 = 100;

/// Delay before the preview's icon override is written to the chrome cell.
pub const ICON_OVERRIDE_DELAY_MS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Backend host used for streaming URLs, without a trailing slash.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_max_preview_size")]
    pub max_preview_size: u64,
    #[serde(default = "default_hover_margin")]
    pub hover_margin: u16,
    #[serde(default = "default_hover_delay")]
    pub hover_delay_ms: u64,
    #[serde(default = "default_icon_override_delay")]
    pub icon_override_delay_ms: u64,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:1719".to_string()
}

fn default_max_preview_size() -> u64 {
    MAX_PREVIEW_SIZE
}

fn default_hover_margin() -> u16 {
    HOVER_MARGIN
}

fn default_hover_delay() -> u64 {
    HOVER_DELAY_MS
}

fn default_icon_override_delay() -> u64 {
    ICON_OVERRIDE_DELAY_MS
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            max_preview_size: default_max_preview_size(),
            hover_margin: default_hover_margin(),
            hover_delay_ms: default_hover_delay(),
            icon_override_delay_ms: default_icon_override_delay(),
        }
    }
}

impl BlockConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn hover_delay(&self) -> Duration {
        Duration::from_millis(self.hover_delay_ms)
    }

    pub fn icon_override_delay(&self) -> Duration {
        Duration::from_millis(self.icon_override_delay_ms)
    }
}

/// Load a config file.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` on read or parse failure.
pub fn load_config(path: impl AsRef<Path>) -> Result<Option<BlockConfig>, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    BlockConfig::from_json(&content).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = BlockConfig::from_json("{}").unwrap();
        assert_eq!(config, BlockConfig::default());
        assert_eq!(config.max_preview_size, 10 * 1024 * 1024);
        assert_eq!(config.hover_margin, 15);
        assert_eq!(config.hover_delay(), Duration::from_millis(100));
        assert_eq!(config.icon_override_delay(), Duration::from_millis(10));
    }

    #[test]
    fn test_partial_override() {
        let config =
            BlockConfig::from_json(r#"{"backend_url": "http://localhost:9000", "hover_margin": 2}"#)
                .unwrap();
        assert_eq!(config.backend_url, "http://localhost:9000");
        assert_eq!(config.hover_margin, 2);
        assert_eq!(config.hover_delay_ms, 100);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            BlockConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_none() {
        let loaded = load_config("/definitely/not/here/spark-block.json").unwrap();
        assert!(loaded.is_none());
    }
}
