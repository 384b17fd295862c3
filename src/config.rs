//! Configuration management for ktwrap.
//!
//! This module provides the [`Config`] struct which controls wrapping behavior.
//! Configuration can be loaded from:
//! - TOML files (`ktwrap.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`// ktwrap: -l 120`)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being formatted up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::directive::DirectiveOverrides;
use crate::format::{Settings, DEFAULT_MARKER};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["ktwrap.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_max_line_length() -> usize {
    100
}
fn default_indent() -> usize {
    4
}
fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

/// Main configuration struct for ktwrap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum line width in columns; 0 disables wrapping (default: 100)
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,

    /// Number of spaces per indent level (default: 4)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Text of the manual-review comment (default: `TODO: Reformat`)
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Keep a `.org` copy of every rewritten file (default: false)
    #[serde(default)]
    pub backup: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub max_line_length: Option<usize>,
    pub indent: Option<usize>,
    pub marker: Option<String>,
    pub backup: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_line_length: default_max_line_length(),
            indent: default_indent(),
            marker: default_marker(),
            backup: false,
        }
    }
}

impl Config {
    /// Minimum line length when wrapping is enabled
    const MIN_LINE_LENGTH: usize = 20;
    /// Maximum reasonable line length
    const MAX_LINE_LENGTH: usize = 1000;
    /// Maximum reasonable indent size
    const MAX_INDENT: usize = 16;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.max_line_length != 0 && self.max_line_length < Self::MIN_LINE_LENGTH {
            return Some(format!(
                "max_line_length {} is below minimum of {}",
                self.max_line_length,
                Self::MIN_LINE_LENGTH
            ));
        }
        if self.max_line_length > Self::MAX_LINE_LENGTH {
            return Some(format!(
                "max_line_length {} exceeds maximum of {}",
                self.max_line_length,
                Self::MAX_LINE_LENGTH
            ));
        }
        if self.indent > Self::MAX_INDENT {
            return Some(format!(
                "indent {} exceeds maximum of {}",
                self.indent,
                Self::MAX_INDENT
            ));
        }
        if self.marker.trim().is_empty() {
            return Some("marker must not be empty".to_string());
        }
        if self.marker.contains(['\n', '\r']) {
            return Some("marker must be a single line".to_string());
        }
        None
    }

    /// Engine settings for this configuration
    #[must_use]
    pub fn to_settings(&self) -> Settings {
        Settings {
            max_line_length: self.max_line_length,
            indent: self.indent,
            marker: self.marker.clone(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.max_line_length {
            self.max_line_length = v;
        }
        if let Some(v) = partial.indent {
            self.indent = v;
        }
        if let Some(v) = &partial.marker {
            self.marker.clone_from(v);
        }
        if let Some(v) = partial.backup {
            self.backup = v;
        }
    }

    /// Apply in-file directive overrides
    pub fn apply_directive(&mut self, overrides: &DirectiveOverrides) {
        if let Some(v) = overrides.max_line_length {
            self.max_line_length = v;
        }
        if let Some(v) = overrides.indent {
            self.indent = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root to current: less specific to more specific
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Unreadable or malformed files are skipped with a warning.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let mut config = Self::default();
        for path in &Self::discover_config_files(start_path) {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_line_length, 100);
        assert_eq!(config.indent, 4);
        assert_eq!(config.marker, "TODO: Reformat");
        assert!(!config.backup);
    }

    #[test]
    fn test_to_settings() {
        let config = Config {
            max_line_length: 80,
            indent: 2,
            ..Default::default()
        };
        let settings = config.to_settings();
        assert_eq!(settings.max_line_length, 80);
        assert_eq!(settings.indent, 2);
        assert_eq!(settings.marker_comment(), "// TODO: Reformat");
    }

    #[test]
    fn test_config_apply_partial_preserves_unset() {
        let mut base = Config {
            indent: 2,
            ..Default::default()
        };
        let partial = PartialConfig {
            max_line_length: Some(120),
            ..Default::default()
        };
        base.apply_partial(&partial);
        assert_eq!(base.indent, 2);
        assert_eq!(base.max_line_length, 120);
    }

    #[test]
    fn test_parse_toml() {
        let partial: PartialConfig =
            toml::from_str("max_line_length = 80\nmarker = \"FIXME\"\n").unwrap();
        let mut config = Config::default();
        config.apply_partial(&partial);
        assert_eq!(config.max_line_length, 80);
        assert_eq!(config.marker, "FIXME");
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(toml::from_str::<PartialConfig>("line_length = 80\n").is_err());
    }

    #[test]
    fn test_apply_directive() {
        let mut config = Config::default();
        config.apply_directive(&DirectiveOverrides {
            indent: Some(2),
            ..Default::default()
        });
        assert_eq!(config.indent, 2);
        assert_eq!(config.max_line_length, 100);
    }

    #[test]
    fn test_from_discovered_files_returns_default_when_empty() {
        let path = PathBuf::from("/nonexistent/unique/path/Main.kt");
        let config = Config::from_discovered_files(&path);
        assert_eq!(config.indent, Config::default().indent);
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_none());
    }

    #[test]
    fn test_validate_zero_width_disables() {
        let config = Config {
            max_line_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_none());
    }

    #[test]
    fn test_validate_bounds() {
        let config = Config {
            max_line_length: 10,
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("max_line_length"));

        let config = Config {
            max_line_length: 5000,
            ..Default::default()
        };
        assert!(config.validate().is_some());

        let config = Config {
            indent: 40,
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("indent"));
    }

    #[test]
    fn test_validate_marker() {
        let config = Config {
            marker: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_some());

        let config = Config {
            marker: "two\nlines".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap().contains("single line"));
    }
}
