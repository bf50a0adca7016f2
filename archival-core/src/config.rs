use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for turning raw wheel input into navigation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Minimum spacing between two accepted wheel navigations, in milliseconds.
    pub scroll_cooldown_ms: u64,
    /// Wheel deltas with a smaller magnitude than this are treated as noise.
    pub wheel_noise_threshold: f32,
}
impl NavigationConfig {
    pub fn scroll_cooldown(&self) -> Duration {
        Duration::from_millis(self.scroll_cooldown_ms)
    }
}
impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_cooldown_ms: 900,
            wheel_noise_threshold: 40.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: NavigationConfig = toml::from_str("scroll_cooldown_ms = 500").unwrap();
        assert_eq!(config.scroll_cooldown(), Duration::from_millis(500));
        assert_eq!(config.wheel_noise_threshold, 40.0);
    }
}
