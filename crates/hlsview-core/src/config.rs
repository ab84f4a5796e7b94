//! Player configuration

use crate::{source::DEFAULT_STREAM_URL, theme::Theme, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a player instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Start playing as soon as the source is ready
    pub auto_play: bool,
    /// Start muted. Autoplay policies usually forbid unmuted autoplay.
    pub start_muted: bool,
    /// Volume used until the user changes it
    pub initial_volume: f64,
    /// Source loaded on mount
    pub default_url: String,
    /// Initial color theme
    pub theme: Theme,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            auto_play: true,
            start_muted: true,
            initial_volume: 0.8,
            default_url: DEFAULT_STREAM_URL.to_string(),
            theme: Theme::Dark,
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(Error::InvalidConfig(format!(
                "initial_volume must be within [0, 1], got {}",
                self.initial_volume
            )));
        }
        if self.default_url.trim().is_empty() {
            return Err(Error::InvalidConfig("default_url is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert!(config.auto_play);
        assert!(config.start_muted);
        assert_eq!(config.initial_volume, 0.8);
        assert_eq!(config.default_url, DEFAULT_STREAM_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PlayerConfig::from_json(r#"{"auto_play": false, "theme": "light"}"#).unwrap();
        assert!(!config.auto_play);
        assert!(config.start_muted);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_volume_out_of_range() {
        let err = PlayerConfig::from_json(r#"{"initial_volume": 1.5}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = PlayerConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_PARSE");
    }
}
