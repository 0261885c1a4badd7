//! Command-line interface module.

mod args;
pub mod list;
pub mod watch;

pub use args::{Cli, Commands};

use anyhow::Result;

use crate::config::HostConfig;
use crate::host::ResourceRegistry;

/// Resource names described by the config, without reading contents.
pub fn catalog_names(config: &HostConfig) -> Result<Vec<String>> {
    if config.resources.scans_root() {
        ResourceRegistry::list_dir(config.resource_root())
    } else {
        Ok(config.resources.catalog.clone())
    }
}

/// Build the resource catalog described by the config.
pub fn open_registry(config: &HostConfig) -> Result<ResourceRegistry> {
    let names = catalog_names(config)?;
    Ok(ResourceRegistry::load_from_dir(config.resource_root(), names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_registry_static_catalog() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("shader.wgsl"), "fn vs_main() {}").unwrap();

        let mut config = HostConfig::default();
        config.resources.root = temp.path().to_path_buf();

        let registry = open_registry(&config).unwrap();
        assert_eq!(registry.list_resources(), vec!["nuero.png", "shader.wgsl"]);
        assert!(registry.content("shader.wgsl").is_some());
    }

    #[test]
    fn test_open_registry_scans_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.wgsl"), "").unwrap();
        std::fs::write(temp.path().join("a.png"), "").unwrap();

        let mut config = HostConfig::default();
        config.resources.root = temp.path().to_path_buf();
        config.resources.catalog.clear();

        let registry = open_registry(&config).unwrap();
        assert_eq!(registry.list_resources(), vec!["a.png", "b.wgsl"]);
        assert_eq!(catalog_names(&config).unwrap(), vec!["a.png", "b.wgsl"]);
    }

    #[test]
    fn test_catalog_names_static_without_reading() {
        let temp = TempDir::new().unwrap();
        let mut config = HostConfig::default();
        config.resources.root = temp.path().join("missing");

        assert_eq!(
            catalog_names(&config).unwrap(),
            vec!["nuero.png", "shader.wgsl"]
        );
    }
}
