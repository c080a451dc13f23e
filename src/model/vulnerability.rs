use super::Package;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference links grouped by kind (`url`, `cve`, `secunia`, ...).
pub type References = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: Option<u64>,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub published_date: Option<DateTime<Utc>>,
    pub vuln_type: String,
    /// Version that fixed the issue; `None` while no fix has been released.
    pub fixed_in: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<References>,
    /// The package this vulnerability was reported against.
    pub package: Package,
}

impl Vulnerability {
    pub fn new(id: u64, title: impl Into<String>, package: Package) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            created_at: None,
            updated_at: None,
            published_date: None,
            vuln_type: String::new(),
            fixed_in: None,
            references: None,
            package,
        }
    }

    pub fn with_vuln_type(mut self, vuln_type: impl Into<String>) -> Self {
        self.vuln_type = vuln_type.into();
        self
    }

    pub fn with_fixed_in(mut self, version: impl Into<String>) -> Self {
        self.fixed_in = Some(version.into());
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

}

/// Ordered results of one check.
///
/// Order is discovery order; the collection is never sorted or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VulnerabilityCollection(Vec<Vulnerability>);

impl VulnerabilityCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vulnerability> {
        self.0.iter()
    }

    /// Appends every vulnerability of `other`, keeping its order.
    pub fn append(&mut self, other: VulnerabilityCollection) {
        self.0.extend(other.0);
    }

    /// Maps every vulnerability to a new shape, preserving order.
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: FnMut(&Vulnerability) -> T,
    {
        self.0.iter().map(f).collect()
    }

    pub fn into_vec(self) -> Vec<Vulnerability> {
        self.0
    }
}

impl From<Vec<Vulnerability>> for VulnerabilityCollection {
    fn from(vulnerabilities: Vec<Vulnerability>) -> Self {
        Self(vulnerabilities)
    }
}

impl FromIterator<Vulnerability> for VulnerabilityCollection {
    fn from_iter<I: IntoIterator<Item = Vulnerability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for VulnerabilityCollection {
    type Item = Vulnerability;
    type IntoIter = std::vec::IntoIter<Vulnerability>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VulnerabilityCollection {
    type Item = &'a Vulnerability;
    type IntoIter = std::slice::Iter<'a, Vulnerability>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vuln(id: u64) -> Vulnerability {
        Vulnerability::new(id, format!("Issue {}", id), Package::plugin("akismet"))
    }

    #[test]
    fn test_collection_empty() {
        let collection = VulnerabilityCollection::new();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
        assert!(collection.map(|v| v.id).is_empty());
    }

    #[test]
    fn test_collection_map_keeps_order() {
        let collection: VulnerabilityCollection = vec![vuln(3), vuln(1), vuln(2)].into();
        assert_eq!(collection.map(|v| v.id), vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_collection_append_keeps_duplicates() {
        let mut collection: VulnerabilityCollection = vec![vuln(1)].into();
        collection.append(vec![vuln(1), vuln(2)].into());
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.map(|v| v.id), vec![Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn test_vulnerability_builder() {
        let v = vuln(7).with_vuln_type("XSS").with_fixed_in("3.1.5");
        assert_eq!(v.vuln_type, "XSS");
        assert_eq!(v.fixed_in.as_deref(), Some("3.1.5"));
        assert_eq!(v.package.slug, "akismet");
        assert!(vuln(8).fixed_in.is_none());
    }
}
