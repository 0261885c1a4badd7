//! `[watch]` section configuration.
//!
//! ```toml
//! [watch]
//! enable = true         # forward on-disk edits of resource files
//! ignore_temp = true    # skip editor swap/backup files
//! ```

use serde::{Deserialize, Serialize};

/// Filesystem watching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub enable: bool,
    pub ignore_temp: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ignore_temp: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_watch_defaults() {
        let config = test_parse_config("");
        assert!(config.watch.enable);
        assert!(config.watch.ignore_temp);
    }

    #[test]
    fn test_watch_partial_override() {
        let config = test_parse_config("[watch]\nenable = false");
        assert!(!config.watch.enable);
        assert!(config.watch.ignore_temp);
    }
}
