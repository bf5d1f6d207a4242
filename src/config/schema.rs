//! Configuration schema.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration.

use serde::{Deserialize, Serialize};

/// Root configuration, read from `.stepline/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteplineConfig {
    /// Global settings.
    pub settings: Settings,

    /// Settings for the console mailer used by `register`.
    pub mailer: MailerConfig,

    /// Defaults for `start-repo`.
    pub repository: RepositoryConfig,
}

/// Global settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log filter used when neither `--debug` nor `RUST_LOG` is given.
    pub log_level: String,

    /// Default output mode.
    pub output: OutputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            output: OutputMode::Normal,
        }
    }
}

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Settings {
    /// The `EnvFilter` directive built from `log_level`.
    ///
    /// A bare level such as `debug` is scoped to this crate
    /// (`stepline=debug`). Anything else is used verbatim.
    pub fn log_filter(&self) -> String {
        let level = self.log_level.trim();
        if LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            format!("stepline={}", level)
        } else {
            level.to_string()
        }
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Verbose,
    #[default]
    Normal,
    Quiet,
    Silent,
}

/// Console mailer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailerConfig {
    /// Sender shown in rendered messages.
    pub sender: String,

    /// Greeting template. `{email}` is replaced with the recipient.
    pub greeting: String,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            sender: "no-reply@stepline.local".to_string(),
            greeting: "hello {email}".to_string(),
        }
    }
}

/// Repository bootstrap defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Remote URL added as `origin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,

    /// Branch pushed upstream.
    pub branch: String,

    /// Message for the first commit.
    pub commit_message: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            remote: None,
            branch: "master".to_string(),
            commit_message: "First Commit".to_string(),
        }
    }
}
