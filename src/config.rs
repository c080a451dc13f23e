//! Configuration file handling.
//!
//! This module provides loading and saving of soter configuration from a
//! TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/soter/config.toml`
//! - macOS: `~/Library/Application Support/soter/config.toml`
//! - Windows: `%APPDATA%\soter\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! default_format = "table"
//! default_fields = "package_type,package_slug,title,vuln_type,fixed_in"
//! wordpress_path = "/var/www/html"
//! database_path = "/var/lib/soter/vulnerabilities.json"
//!
//! [ignore]
//! plugins = ["akismet"]
//! themes = []
//! wordpresses = ["474"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::checker::CheckScope;
use crate::output::DEFAULT_FIELDS;

/// Application configuration.
///
/// Command line flags always win over these values.
///
/// # Example
///
/// ```no_run
/// use soter::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Default format: {}", config.default_format);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "csv", "json", "yaml", "ids", "count"
    /// Default: "table"
    pub default_format: String,

    /// Comma separated fields when no `--fields` flag is provided.
    pub default_fields: String,

    /// WordPress root to scan when no `--path` flag is provided.
    ///
    /// Default: the current directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress_path: Option<PathBuf>,

    /// Vulnerability database file when no `--database` flag is provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Slugs always skipped by batch checks.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Per-class slugs excluded from batch checks.
///
/// Core releases are listed by numeric slug (`"474"` for 4.7.4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    pub plugins: Vec<String>,
    pub themes: Vec<String>,
    pub wordpresses: Vec<String>,
}

impl IgnoreConfig {
    /// Slugs ignored for a batch over `scope`. A site check combines every
    /// class.
    pub fn for_scope(&self, scope: CheckScope) -> Vec<String> {
        match scope {
            CheckScope::Plugins => self.plugins.clone(),
            CheckScope::Themes => self.themes.clone(),
            CheckScope::Wordpresses => self.wordpresses.clone(),
            CheckScope::Site => self
                .plugins
                .iter()
                .chain(&self.themes)
                .chain(&self.wordpresses)
                .cloned()
                .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: "table".to_string(),
            default_fields: DEFAULT_FIELDS.to_string(),
            wordpress_path: None,
            database_path: None,
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use soter::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("soter/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("soter")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.default_format, "table");
        assert_eq!(config.default_fields, DEFAULT_FIELDS);
        assert!(config.wordpress_path.is_none());
        assert!(config.database_path.is_none());
        assert!(config.ignore.plugins.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            default_format = "json"

            [ignore]
            wordpresses = ["474"]
            "#,
        )
        .unwrap();

        assert_eq!(config.default_format, "json");
        assert_eq!(config.default_fields, DEFAULT_FIELDS);
        assert_eq!(config.ignore.wordpresses, vec!["474"]);
        assert!(config.ignore.themes.is_empty());
    }

    #[test]
    fn test_ignore_for_scope() {
        let ignore = IgnoreConfig {
            plugins: vec!["akismet".to_string()],
            themes: vec!["twentyten".to_string()],
            wordpresses: vec!["474".to_string()],
        };

        assert_eq!(ignore.for_scope(CheckScope::Plugins), vec!["akismet"]);
        assert_eq!(ignore.for_scope(CheckScope::Wordpresses), vec!["474"]);
        assert_eq!(
            ignore.for_scope(CheckScope::Site),
            vec!["akismet", "twentyten", "474"]
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.database_path = Some(PathBuf::from("/tmp/db.json"));
        config.ignore.plugins.push("hello-dolly".to_string());
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_format = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_generate_default_config() {
        let text = Config::generate_default_config();
        assert!(text.contains("default_format = \"table\""));
        assert!(text.contains("[ignore]"));
    }
}
