//! `[bridge]` section configuration.
//!
//! ```toml
//! [bridge]
//! document = "shader.wgsl"    # resource the editor document maps to
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::host::bridge::DEFAULT_DOCUMENT;

/// Edit bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Resource name edits are forwarded to.
    pub document: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            document: DEFAULT_DOCUMENT.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn validate(&self, catalog: &[String], diag: &mut ConfigDiagnostics) {
        if self.document.trim().is_empty() {
            diag.error("bridge.document", "must not be empty");
        } else if !catalog.is_empty() && !catalog.contains(&self.document) {
            diag.error_with_hint(
                "bridge.document",
                format!("`{}` is not in the resource catalog", self.document),
                "add it to `resources.catalog`",
            );
        }
    }
}
