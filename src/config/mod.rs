//! Host configuration from `toolbox.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/   # [resources] [bridge] [module] [watch]
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # config file discovery
//! └── mod.rs     # HostConfig (this file)
//! ```
//!
//! Every section is optional. Without a config file the built-in catalog
//! (`nuero.png`, `shader.wgsl`) is served from the current directory.

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{BridgeConfig, ModuleConfig, ResourcesConfig, WatchConfig};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands};
use crate::log;
use util::find_config_file;

/// Root configuration structure representing toolbox.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub resources: ResourcesConfig,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub module: ModuleConfig,

    #[serde(default)]
    pub watch: WatchConfig,
}

impl HostConfig {
    /// Load configuration for the given command line.
    ///
    /// Searches upward from cwd for the config file; falls back to defaults
    /// rooted at cwd when none exists.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                crate::debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                Self {
                    root: cwd.clone(),
                    ..Self::default()
                }
            }
        };

        config.finalize(cli, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load from file, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve paths and apply command-line overrides.
    fn finalize(&mut self, cli: &Cli, cwd: &Path) {
        if self.resources.root.is_relative() {
            self.resources.root = self.root.join(&self.resources.root);
        }

        if let Commands::Watch { root, document } = &cli.command {
            if let Some(root) = root {
                self.resources.root = cwd.join(root);
            }
            if let Some(document) = document {
                self.bridge.document = document.clone();
            }
        }
    }

    /// Validate all sections, collecting every error before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.resources.validate(&mut diag);
        self.bridge.validate(&self.resources.catalog, &mut diag);
        self.module.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Directory resources are read from and watched in
    pub fn resource_root(&self) -> &Path {
        &self.resources.root
    }
}

/// Parse a config snippet, asserting it has no unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> HostConfig {
    let (parsed, ignored) = HostConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
