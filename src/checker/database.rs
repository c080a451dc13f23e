//! File-backed vulnerability data.
//!
//! The database is a JSON document keyed by package class, then by slug,
//! using the WPVulnDB response shape:
//!
//! ```json
//! {
//!   "plugins": {
//!     "akismet": {
//!       "vulnerabilities": [
//!         {
//!           "id": 8215,
//!           "title": "Akismet <= 3.1.4 - Unauthenticated Stored XSS",
//!           "created_at": "2015-10-07T20:53:55.000Z",
//!           "updated_at": "2015-10-08T09:23:44.000Z",
//!           "published_date": "2015-10-06T00:00:00.000Z",
//!           "vuln_type": "XSS",
//!           "fixed_in": "3.1.5",
//!           "references": { "url": ["https://blog.akismet.com/"] }
//!         }
//!       ]
//!     }
//!   },
//!   "themes": {},
//!   "wordpresses": { "474": { "vulnerabilities": [] } }
//! }
//! ```

use crate::error::CheckError;
use crate::model::{Package, PackageType, References, Vulnerability};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VulnerabilityDatabase {
    plugins: HashMap<String, DatabaseEntry>,
    themes: HashMap<String, DatabaseEntry>,
    wordpresses: HashMap<String, DatabaseEntry>,
}

/// Everything known about one slug.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseEntry {
    pub vulnerabilities: Vec<VulnerabilityRecord>,
}

/// A vulnerability as stored, before it is attached to a package.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VulnerabilityRecord {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_date: Option<DateTime<Utc>>,
    pub vuln_type: Option<String>,
    pub fixed_in: Option<String>,
    pub references: Option<References>,
}

impl VulnerabilityRecord {
    pub fn into_vulnerability(self, package: Package) -> Vulnerability {
        Vulnerability {
            id: self.id,
            title: self.title.unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            published_date: self.published_date,
            vuln_type: self.vuln_type.unwrap_or_default(),
            fixed_in: self.fixed_in.filter(|v| !v.trim().is_empty()),
            references: self.references,
            package,
        }
    }
}

impl VulnerabilityDatabase {
    pub fn load(path: &Path) -> Result<Self, CheckError> {
        Self::read(path).map_err(|e| CheckError::Database {
            path: path.to_path_buf(),
            details: format!("{:#}", e),
        })
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let database = serde_json::from_str(&content).context("Invalid vulnerability database")?;
        Ok(database)
    }

    pub fn from_json(json: &str) -> Result<Self, CheckError> {
        serde_json::from_str(json).map_err(|e| CheckError::Database {
            path: PathBuf::from("<inline>"),
            details: e.to_string(),
        })
    }

    pub fn entry(&self, package_type: PackageType, slug: &str) -> Option<&DatabaseEntry> {
        self.entries(package_type).get(slug)
    }

    pub fn len(&self) -> usize {
        self.plugins.len() + self.themes.len() + self.wordpresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self, package_type: PackageType) -> &HashMap<String, DatabaseEntry> {
        match package_type {
            PackageType::Plugin => &self.plugins,
            PackageType::Theme => &self.themes,
            PackageType::Wordpress => &self.wordpresses,
        }
    }
}
