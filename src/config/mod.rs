//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and merging in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use stepline::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".stepline");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "repository:\n  branch: main").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.repository.branch, "main");
//! ```
//!
//! # Configuration File Locations
//!
//! Configuration is merged in this order:
//! 1. Project config (`.stepline/config.yml`)
//! 2. Local overrides (`.stepline/config.local.yml`)

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    deep_merge, load_config, load_config_file, load_merged_config, parse_config, ConfigPaths,
    CONFIG_DIR,
};
pub use schema::{MailerConfig, OutputMode, RepositoryConfig, Settings, SteplineConfig};
pub use validator::{validate, validate_config, ValidationError};
