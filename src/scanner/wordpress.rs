use crate::layout::core_version_file;
use crate::model::{Package, PackageType};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct CoreScanner {
    root: PathBuf,
}

impl CoreScanner {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl super::Scanner for CoreScanner {
    fn name(&self) -> &'static str {
        "WordPress Core"
    }

    fn package_type(&self) -> PackageType {
        PackageType::Wordpress
    }

    fn scan(&self) -> Result<Vec<Package>> {
        let version_file = match core_version_file(&self.root) {
            Some(path) => path,
            None => return Ok(Vec::new()),
        };

        let content = fs::read_to_string(&version_file)
            .with_context(|| format!("Failed to read {:?}", version_file))?;

        match parse_wp_version(&content) {
            Some(version) => Ok(vec![Package::wordpress(version)]),
            None => bail!("No $wp_version found in {:?}", version_file),
        }
    }
}

/// Pulls the quoted value out of `$wp_version = '4.7.4';`.
fn parse_wp_version(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("$wp_version")?;
        let rest = rest.trim_start().strip_prefix('=')?.trim_start();
        let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        let value = &rest[1..];
        let end = value.find(quote)?;
        Some(value[..end].to_string()).filter(|v| !v.is_empty())
    })
}
