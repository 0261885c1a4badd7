//! `[resources]` section configuration.
//!
//! ```toml
//! [resources]
//! root = "assets"                          # relative to the config file
//! catalog = ["nuero.png", "shader.wgsl"]   # empty: every file in root
//! ```

use std::path::PathBuf;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::host::registry::BUILTIN_CATALOG;

/// Resource catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Directory resource files live in.
    pub root: PathBuf,

    /// Resource names in listing order.
    /// An empty catalog lists every regular file in `root`.
    pub catalog: Vec<String>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            catalog: BUILTIN_CATALOG.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResourcesConfig {
    /// Whether the catalog comes from scanning `root`
    pub fn scans_root(&self) -> bool {
        self.catalog.is_empty()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let mut seen = FxHashSet::default();
        for name in &self.catalog {
            if name.trim().is_empty() {
                diag.error("resources.catalog", "resource names must not be empty");
            } else if name.contains(['/', '\\']) {
                diag.error_with_hint(
                    "resources.catalog",
                    format!("`{name}` contains a path separator"),
                    "resources are plain file names inside `resources.root`",
                );
            } else if !seen.insert(name.as_str()) {
                diag.error(
                    "resources.catalog",
                    format!("`{name}` is listed more than once"),
                );
            }
        }
    }
}
