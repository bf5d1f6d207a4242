//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from the
//! project directory in the correct priority order.

use crate::config::schema::SteplineConfig;
use crate::error::{Result, SteplineError};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding project configuration.
pub const CONFIG_DIR: &str = ".stepline";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Project config (`.stepline/config.yml`)
/// 2. Local overrides (`.stepline/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .stepline/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .stepline/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project
            .iter()
            .chain(self.project_local.iter())
            .collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file and parse it into SteplineConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<SteplineConfig> {
    let content = read(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into SteplineConfig.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<SteplineConfig> {
    if content.trim().is_empty() {
        return Ok(SteplineConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| SteplineError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as a raw YAML value (for merging).
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = read(path)?;
    if content.trim().is_empty() {
        return Ok(Value::Mapping(Default::default()));
    }
    serde_yaml::from_str(&content).map_err(|e| SteplineError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteplineError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            SteplineError::Io(e)
        }
    })
}

/// Deep merge two YAML values.
///
/// Mappings merge recursively, anything else in `overlay` replaces `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.get(key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Mapping(result)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Load and merge the project's config files.
///
/// Missing files are skipped; with none present the defaults are returned.
pub fn load_merged_config(project_root: &Path) -> Result<SteplineConfig> {
    let paths = ConfigPaths::discover(project_root);

    let mut merged = Value::Mapping(Default::default());
    for path in paths.all_existing() {
        merged = deep_merge(&merged, &load_config_value(path)?);
    }

    serde_yaml::from_value(merged).map_err(|e| SteplineError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging
/// and fails if it is missing. Otherwise, discovers and merges project files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<SteplineConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_project_and_local() {
        let temp = project_with(&[("config.yml", ""), ("config.local.yml", "")]);
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
        assert_eq!(paths.all_existing().len(), 2);
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(!paths.has_project_config());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn missing_project_config_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config, SteplineConfig::default());
    }

    #[test]
    fn local_overrides_project() {
        let temp = project_with(&[
            (
                "config.yml",
                "repository:\n  branch: main\n  commit_message: init\n",
            ),
            ("config.local.yml", "repository:\n  branch: trunk\n"),
        ]);
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.repository.branch, "trunk");
        assert_eq!(config.repository.commit_message, "init");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config(temp.path(), Some(&temp.path().join("nope.yml"))).unwrap_err();
        assert!(matches!(err, SteplineError::ConfigNotFound { .. }));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = project_with(&[("config.yml", "settings: [unclosed")]);
        let err = load_merged_config(temp.path()).unwrap_err();
        match err {
            SteplineError::ConfigParseError { path, .. } => {
                assert!(path.ends_with("config.yml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn deep_merge_replaces_scalars_and_keeps_siblings() {
        let base: Value = serde_yaml::from_str("a: 1\nb:\n  c: 2\n  d: 3").unwrap();
        let overlay: Value = serde_yaml::from_str("b:\n  c: 9").unwrap();
        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"]["c"], 9);
        assert_eq!(merged["b"]["d"], 3);
    }
}
