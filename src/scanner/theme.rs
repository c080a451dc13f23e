use super::headers::{header_value, read_head};
use crate::layout::themes_dir;
use crate::model::{Package, PackageType};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct ThemeScanner {
    root: PathBuf,
}

impl ThemeScanner {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl super::Scanner for ThemeScanner {
    fn name(&self) -> &'static str {
        "WordPress Themes"
    }

    fn package_type(&self) -> PackageType {
        PackageType::Theme
    }

    fn scan(&self) -> Result<Vec<Package>> {
        let themes_dir = match themes_dir(&self.root) {
            Some(dir) => dir,
            None => return Ok(Vec::new()),
        };

        let mut entries: Vec<_> = fs::read_dir(&themes_dir)
            .with_context(|| format!("Failed to read themes directory: {:?}", themes_dir))?
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .collect();
        entries.sort_by_key(|entry| entry.file_name());

        let mut packages = Vec::new();

        for entry in entries {
            let stylesheet = entry.path().join("style.css");
            if !stylesheet.is_file() {
                continue;
            }

            let content = read_head(&stylesheet)?;
            if header_value(&content, "Theme Name").is_none() {
                continue;
            }

            let slug = entry.file_name().to_string_lossy().to_string();
            let version = header_value(&content, "Version");
            packages.push(Package::theme(slug).with_optional_version(version));
        }

        Ok(packages)
    }
}
