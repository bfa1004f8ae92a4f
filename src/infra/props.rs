//! System property lookup
//!
//! Properties are read from `key=value` prop files such as `/default.prop`
//! and `/system/build.prop`. The [`PropertySource`] trait lets callers swap in
//! a fixed map for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Source of system properties
pub trait PropertySource {
    /// Look up a property
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a property, falling back to `default` when unset
    fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }
}

/// Properties held in memory
#[derive(Debug, Clone, Default)]
pub struct MapProperties {
    values: HashMap<String, String>,
}

impl MapProperties {
    /// Create an empty property map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a property
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PropertySource for MapProperties {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Properties parsed from prop files
///
/// Files are consulted in order; the first file defining a key wins. Files
/// that do not exist are skipped.
#[derive(Debug, Clone, Default)]
pub struct PropFiles {
    values: HashMap<String, String>,
}

impl PropFiles {
    /// Load every existing file in `paths`
    pub fn load(paths: &[PathBuf]) -> Result<Self, FilesystemError> {
        let mut values = HashMap::new();

        for path in paths {
            if !path.exists() {
                tracing::debug!("Property file not present: {}", path.display());
                continue;
            }

            let contents = filesystem::read_file(path)?;
            for (key, value) in parse_props(&String::from_utf8_lossy(&contents)) {
                values.entry(key).or_insert(value);
            }
        }

        Ok(Self { values })
    }

    /// Load a single prop file
    pub fn load_file(path: &Path) -> Result<Self, FilesystemError> {
        Self::load(&[path.to_path_buf()])
    }
}

impl PropertySource for PropFiles {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Parse `key=value` lines, ignoring blanks and `#` comments
pub fn parse_props(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_props_skips_comments_and_garbage() {
        let content = "# build properties\n\
                       ro.product.device=hammerhead\n\
                       \n\
                       not a property\n\
                       =novalue\n\
                       ro.build.display.id = KTU84P test-keys\n";

        let props = parse_props(content);
        assert_eq!(
            props,
            vec![
                ("ro.product.device".to_string(), "hammerhead".to_string()),
                (
                    "ro.build.display.id".to_string(),
                    "KTU84P test-keys".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_first_file_wins() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("default.prop");
        let second = temp.path().join("build.prop");
        std::fs::write(&first, "ro.product.device=jflte\n").unwrap();
        std::fs::write(&second, "ro.product.device=other\nro.build.product=jfltexx\n").unwrap();

        let props = PropFiles::load(&[first, temp.path().join("missing.prop"), second]).unwrap();

        assert_eq!(props.get("ro.product.device").as_deref(), Some("jflte"));
        assert_eq!(props.get("ro.build.product").as_deref(), Some("jfltexx"));
    }

    #[test]
    fn test_get_string_default() {
        let props = MapProperties::new().with("ro.build.product", "bacon");

        assert_eq!(props.get_string("ro.build.product", ""), "bacon");
        assert_eq!(props.get_string("ro.product.device", ""), "");
    }
}
