//! `[module]` section configuration.
//!
//! ```toml
//! [module]
//! init_timeout_ms = 5000    # readiness handshake bound
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::host::DEFAULT_INIT_TIMEOUT;

/// Module initialization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Milliseconds the module may take to signal readiness.
    pub init_timeout_ms: u64,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let init_timeout_ms = DEFAULT_INIT_TIMEOUT.as_millis() as u64;
        Self { init_timeout_ms }
    }
}

impl ModuleConfig {
    pub fn init_timeout(&self) -> Duration {
        Duration::from_millis(self.init_timeout_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.init_timeout_ms == 0 {
            diag.error("module.init_timeout_ms", "must be greater than 0");
        }
    }
}
