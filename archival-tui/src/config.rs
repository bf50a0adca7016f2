use std::path::PathBuf;

use anyhow::Context as _;
use archival_core::NavigationConfig;
use serde::{Deserialize, Serialize};

use crate::style::Style;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub catalog: CatalogSource,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub style: Style,
}
impl Config {
    pub const FILENAME: &str = "tui-config.toml";

    /// Loads the config from the working directory, falling back to defaults if there is none.
    /// The file is never written back.
    pub fn load() -> anyhow::Result<Self> {
        match std::fs::read_to_string(Self::FILENAME) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", Self::FILENAME)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", Self::FILENAME)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub tick_rate_ms: u64,
    /// Wheel delta reported for one terminal scroll notch.
    pub wheel_notch_delta: f32,
    /// Fraction of the remaining distance a card covers each tick.
    pub animation_rate: f32,
}
impl Default for General {
    fn default() -> Self {
        Self {
            tick_rate_ms: 33,
            wheel_notch_delta: 120.0,
            animation_rate: 0.35,
        }
    }
}

/// Where the records come from. Without a path, the built-in sample catalog is used.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CatalogSource {
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [general]
            tick_rate_ms = 50

            [navigation]
            scroll_cooldown_ms = 600

            [catalog]
            path = "records/catalog.toml"
            "#,
        )
        .unwrap();
        assert_eq!(config.general.tick_rate_ms, 50);
        assert_eq!(config.general.wheel_notch_delta, 120.0);
        assert_eq!(config.navigation.scroll_cooldown_ms, 600);
        assert_eq!(config.navigation.wheel_noise_threshold, 40.0);
        assert_eq!(
            config.catalog.path,
            Some(PathBuf::from("records/catalog.toml"))
        );
        assert_eq!(config.style, Style::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }
}
