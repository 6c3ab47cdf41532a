//! Configuration management for mcp-poke
//!
//! Configuration lives in a YAML file under the platform config directory.
//! Every field is optional: whatever the file leaves out keeps its built-in
//! default.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Level;

/// Directory name under the platform config root
pub const APP_DIR: &str = "mcp-desktop-notification";

/// Configuration file name
pub const CONFIG_FILE: &str = "config.yaml";

/// Delivery mode backed by the native notification library
pub const LIBRARY_MODE: &str = "library";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notification configuration
    pub notification: NotificationConfig,
}

/// Notification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Log notifications instead of delivering them
    pub dry_run: bool,
    /// Emit diagnostic records around every call
    pub verbose: bool,
    /// Delivery mode
    pub mode: String,
    /// Message template
    pub template: Template,
    /// Presentation hints per level name
    pub levels: HashMap<String, LevelStyle>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            verbose: false,
            mode: LIBRARY_MODE.to_string(),
            template: Template::default(),
            levels: default_levels(),
        }
    }
}

/// Message template configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    /// Template applied to every notification
    pub default: String,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            default: "{{.Title}}: {{.Message}} [{{.Level}}]".to_string(),
        }
    }
}

impl Template {
    /// Substitute the title, message and level placeholders
    pub fn render(&self, title: &str, message: &str, level: Level) -> String {
        self.default
            .replace("{{.Title}}", title)
            .replace("{{.Message}}", message)
            .replace("{{.Level}}", level.as_str())
    }
}

/// Presentation hints for one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelStyle {
    /// Urgency name (low, normal, critical)
    pub urgency: String,
    /// Icon name or path, empty for none
    pub icon: String,
}

impl Default for LevelStyle {
    fn default() -> Self {
        Self::new("normal", "")
    }
}

impl LevelStyle {
    /// Create a level style
    pub fn new(urgency: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            urgency: urgency.into(),
            icon: icon.into(),
        }
    }
}

fn default_levels() -> HashMap<String, LevelStyle> {
    HashMap::from([
        (Level::Info.to_string(), LevelStyle::new("normal", "")),
        (Level::Warning.to_string(), LevelStyle::new("normal", "dialog-warning")),
        (Level::Error.to_string(), LevelStyle::new("critical", "dialog-error")),
        (Level::Success.to_string(), LevelStyle::new("low", "dialog-information")),
    ])
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file is absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        // serde_yaml rejects an empty document
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the platform default location
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Check the configuration for problems
    ///
    /// Nothing is rejected yet. Delivery mode is checked when the notifier is
    /// built, see [`crate::notifier::Notifier::from_config`].
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Force-enable flags given on the command line
    pub fn apply_overrides(&mut self, verbose: bool, dry_run: bool) {
        if verbose {
            self.notification.verbose = true;
        }
        if dry_run {
            self.notification.dry_run = true;
        }
    }

    /// Whether verbose diagnostics are on
    pub fn verbose(&self) -> bool {
        self.notification.verbose
    }

    /// Whether dry-run mode is on
    pub fn dry_run(&self) -> bool {
        self.notification.dry_run
    }
}

/// Platform-specific configuration file path
pub fn default_config_path() -> PathBuf {
    config_root().join(APP_DIR).join(CONFIG_FILE)
}

#[cfg(windows)]
fn config_root() -> PathBuf {
    non_empty(std::env::var_os("APPDATA"))
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))
        .unwrap_or_default()
}

#[cfg(not(windows))]
fn config_root() -> PathBuf {
    xdg_config_root(
        std::env::var_os("XDG_CONFIG_HOME"),
        BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
    )
}

/// XDG rule: `$XDG_CONFIG_HOME`, else `$HOME/.config`
#[cfg_attr(windows, allow(dead_code))]
fn xdg_config_root(xdg_config_home: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    non_empty(xdg_config_home)
        .map(PathBuf::from)
        .unwrap_or_else(|| home.unwrap_or_default().join(".config"))
}

fn non_empty(value: Option<OsString>) -> Option<OsString> {
    value.filter(|v| !v.is_empty())
}
