//! `list` command: print the resource catalog.

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::HostConfig;
use crate::host::ResourceRegistry;

pub fn list_resources(config: &HostConfig) -> Result<()> {
    let registry = super::open_registry(config)?;
    crate::debug!("list"; "catalog root: {}", config.resource_root().display());

    if registry.is_empty() {
        crate::log!("list"; "no resources in {}", config.resource_root().display());
        return Ok(());
    }

    for line in catalog_lines(&registry) {
        println!("{line}");
    }
    Ok(())
}

/// One line per resource: name, then its size or `missing`.
fn catalog_lines(registry: &ResourceRegistry) -> Vec<String> {
    registry
        .list_resources()
        .into_iter()
        .map(|name| match registry.content(&name) {
            Some(content) => format!("{name} {}", format!("({} bytes)", content.len()).dimmed()),
            None => format!("{name} {}", "(missing)".yellow()),
        })
        .collect()
}
