//! Config command implementation.
//!
//! The `stepline config` command shows resolved configuration.

use std::path::{Path, PathBuf};

use crate::config::{ConfigPaths, SteplineConfig};
use crate::error::{Result, SteplineError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    config: SteplineConfig,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, config: &SteplineConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.clone(),
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let paths = ConfigPaths::discover(&self.project_root);
        let existing = paths.all_existing();
        if existing.is_empty() {
            ui.message("# defaults (no config file found)");
        } else {
            for path in &existing {
                ui.message(&format!("# {}", path.display()));
            }
        }

        let yaml = serde_yaml::to_string(&self.config).map_err(|e| SteplineError::Other(e.into()))?;
        ui.message(yaml.trim_end());

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_merged_config;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".stepline");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config).unwrap();
        temp
    }

    #[test]
    fn config_without_files_shows_defaults() {
        let temp = TempDir::new().unwrap();
        let cmd = ConfigCommand::new(temp.path(), &SteplineConfig::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_output("defaults"));
        assert!(ui.has_output("branch: master"));
    }

    #[test]
    fn config_shows_config_path_and_values() {
        let temp = setup_project("repository:\n  branch: main\n");
        let config = load_merged_config(temp.path()).unwrap();
        let cmd = ConfigCommand::new(temp.path(), &config);
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.messages().iter().any(|m| m.contains("config.yml")));
        assert!(ui.has_output("branch: main"));
    }
}
