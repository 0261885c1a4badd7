//! Resource Registry
//!
//! The catalog of named resources visible to the compiled module. The set of
//! names is fixed at construction; contents may change through edits.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

/// Catalog of the in-browser build: an image asset and the shader source.
pub const BUILTIN_CATALOG: [&str; 2] = ["nuero.png", "shader.wgsl"];

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    /// Listing order
    names: Vec<String>,
    /// Last known content per listed name (absent until loaded or edited)
    contents: FxHashMap<String, Vec<u8>>,
}

impl ResourceRegistry {
    /// Catalog with names only; contents arrive through edits.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for name in names {
            registry.insert(name.into(), None);
        }
        registry
    }

    /// Catalog with initial contents.
    pub fn from_resources<I, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for (name, content) in resources {
            registry.insert(name.into(), Some(content));
        }
        registry
    }

    /// Catalog of every regular file directly inside `dir`, sorted by name.
    ///
    /// Contents are read eagerly.
    pub fn scan_dir(dir: &Path) -> Result<Self> {
        let mut resources = Vec::new();
        for name in Self::list_dir(dir)? {
            let path = dir.join(&name);
            let content = fs::read(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            resources.push((name, content));
        }
        Ok(Self::from_resources(resources))
    }

    /// Names of the regular files directly inside `dir`, sorted. Names that
    /// are not valid UTF-8 are skipped.
    pub fn list_dir(dir: &Path) -> Result<Vec<String>> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("failed to read `{}`", dir.display()))?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_owned))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Catalog of the given names, with contents read from `dir` where the
    /// file exists.
    pub fn load_from_dir<I, S>(dir: &Path, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for name in names {
            let name = name.into();
            let content = fs::read(dir.join(&name)).ok();
            registry.insert(name, content);
        }
        registry
    }

    fn insert(&mut self, name: String, content: Option<Vec<u8>>) {
        if !self.names.contains(&name) {
            self.names.push(name.clone());
        }
        if let Some(content) = content {
            self.contents.insert(name, content);
        }
    }

    /// Resource names in listing order.
    pub fn list_resources(&self) -> Vec<String> {
        self.names.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Last known content of a listed resource.
    pub fn content(&self, name: &str) -> Option<&[u8]> {
        self.contents.get(name).map(Vec::as_slice)
    }

    /// Record new content. Unlisted names are ignored and return `false`.
    pub fn update(&mut self, name: &str, content: &[u8]) -> bool {
        if !self.contains(name) {
            return false;
        }
        self.contents.insert(name.to_owned(), content.to_vec());
        true
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog_order() {
        let registry = ResourceRegistry::from_names(BUILTIN_CATALOG);
        assert_eq!(registry.list_resources(), vec!["nuero.png", "shader.wgsl"]);
        assert_eq!(registry.content("shader.wgsl"), None);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ResourceRegistry::default();
        assert!(registry.list_resources().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_names_listed_once() {
        let registry = ResourceRegistry::from_names(["a.wgsl", "b.png", "a.wgsl"]);
        assert_eq!(registry.list_resources(), vec!["a.wgsl", "b.png"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_update_listed_and_unlisted() {
        let mut registry = ResourceRegistry::from_names(["shader.wgsl"]);

        assert!(registry.update("shader.wgsl", b"fn vs_main() {}"));
        assert_eq!(registry.content("shader.wgsl"), Some(&b"fn vs_main() {}"[..]));

        assert!(!registry.update("other.wgsl", b"x"));
        assert_eq!(registry.content("other.wgsl"), None);
        assert_eq!(registry.list_resources(), vec!["shader.wgsl"]);
    }

    #[test]
    fn test_scan_dir_lists_sorted_files_only() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("shader.wgsl"), b"wgsl").unwrap();
        std::fs::write(temp.path().join("nuero.png"), b"png").unwrap();
        std::fs::create_dir(temp.path().join("nested")).unwrap();

        let registry = ResourceRegistry::scan_dir(temp.path()).unwrap();

        assert_eq!(registry.list_resources(), vec!["nuero.png", "shader.wgsl"]);
        assert_eq!(registry.content("nuero.png"), Some(&b"png"[..]));
    }

    #[test]
    fn test_scan_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        assert!(ResourceRegistry::scan_dir(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_load_from_dir_keeps_missing_names() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("shader.wgsl"), b"wgsl").unwrap();

        let registry = ResourceRegistry::load_from_dir(temp.path(), BUILTIN_CATALOG);

        assert_eq!(registry.list_resources(), vec!["nuero.png", "shader.wgsl"]);
        assert_eq!(registry.content("nuero.png"), None);
        assert_eq!(registry.content("shader.wgsl"), Some(&b"wgsl"[..]));
    }
}
