use super::headers::{header_value, read_head};
use crate::layout::plugins_dir;
use crate::model::{Package, PackageType};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct PluginScanner {
    root: PathBuf,
}

impl PluginScanner {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl super::Scanner for PluginScanner {
    fn name(&self) -> &'static str {
        "WordPress Plugins"
    }

    fn package_type(&self) -> PackageType {
        PackageType::Plugin
    }

    fn scan(&self) -> Result<Vec<Package>> {
        let plugins_dir = match plugins_dir(&self.root) {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };

        let mut packages = Vec::new();
        // Directory whose main plugin file has already been found
        let mut claimed: Option<PathBuf> = None;

        let walker = WalkDir::new(&plugins_dir)
            .min_depth(1)
            .max_depth(2)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to read plugins directory: {:?}", plugins_dir))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_php(path) {
                continue;
            }

            // Top level files are single-file plugins such as hello.php
            let (slug, dir) = match (entry.depth(), path.parent()) {
                (1, _) => (file_stem(path), None),
                (_, Some(parent)) => (file_name(parent), Some(parent.to_path_buf())),
                _ => continue,
            };
            if dir.is_some() && dir == claimed {
                continue;
            }

            if let Some(version) = plugin_version(path)? {
                packages.push(Package::plugin(slug).with_optional_version(version));
                claimed = dir;
            }
        }

        Ok(packages)
    }
}

/// `Some(version)` when the file carries a `Plugin Name` header.
fn plugin_version(path: &Path) -> Result<Option<Option<String>>> {
    let content = read_head(path)?;
    if header_value(&content, "Plugin Name").is_none() {
        return Ok(None);
    }
    Ok(Some(header_value(&content, "Version")))
}

fn is_php(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "php")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_plugins_dir() {
        let dir = TempDir::new().unwrap();
        assert!(PluginScanner::new(dir.path()).scan().unwrap().is_empty());
    }

    #[test]
    fn test_scan_plugins() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(
            root,
            "wp-content/plugins/akismet/akismet.php",
            "<?php\n/*\nPlugin Name: Akismet Anti-Spam\nVersion: 3.1.4\n*/\n",
        );
        write(root, "wp-content/plugins/akismet/class.akismet.php", "<?php\nclass Akismet {}\n");
        write(
            root,
            "wp-content/plugins/hello.php",
            "<?php\n/**\n * Plugin Name: Hello Dolly\n * Version: 1.6\n */\n",
        );
        write(root, "wp-content/plugins/index.php", "<?php\n// Silence is golden.\n");
        write(
            root,
            "wp-content/plugins/unversioned/main.php",
            "<?php\n/* Plugin Name: Unversioned */\n",
        );
        write(root, "wp-content/plugins/not-a-plugin/readme.txt", "Plugin Name: nope");

        let packages = PluginScanner::new(root).scan().unwrap();
        assert_eq!(
            packages,
            vec![
                Package::plugin("akismet").with_version("3.1.4"),
                Package::plugin("hello").with_version("1.6"),
                Package::plugin("unversioned"),
            ]
        );
    }
}
