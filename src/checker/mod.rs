//! The checking service seam.
//!
//! [`CheckingService`] is what the command layer drives. [`LocalChecker`]
//! implements it offline, on top of the package scanners and a
//! [`VulnerabilityDatabase`] file.

mod database;
mod local;
mod version;

pub use database::{DatabaseEntry, VulnerabilityDatabase, VulnerabilityRecord};
pub use local::LocalChecker;
pub use version::{is_affected, is_newer};

use crate::error::CheckError;
use crate::model::{Package, PackageType, VulnerabilityCollection};
use std::collections::BTreeSet;

/// Which installed packages a batch check covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckScope {
    Plugins,
    Themes,
    Wordpresses,
    /// Every plugin, every theme and the core.
    Site,
}

impl CheckScope {
    pub fn includes(&self, package_type: PackageType) -> bool {
        match self {
            CheckScope::Plugins => package_type == PackageType::Plugin,
            CheckScope::Themes => package_type == PackageType::Theme,
            CheckScope::Wordpresses => package_type == PackageType::Wordpress,
            CheckScope::Site => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckScope::Plugins => "plugins",
            CheckScope::Themes => "themes",
            CheckScope::Wordpresses => "wordpresses",
            CheckScope::Site => "site",
        }
    }
}

impl From<PackageType> for CheckScope {
    fn from(package_type: PackageType) -> Self {
        match package_type {
            PackageType::Plugin => CheckScope::Plugins,
            PackageType::Theme => CheckScope::Themes,
            PackageType::Wordpress => CheckScope::Wordpresses,
        }
    }
}

/// Slugs excluded from a batch check entirely.
///
/// WordPress core entries use the numeric slug form (`474`, not `4.7.4`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList(BTreeSet<String>);

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma separated slug list. Blank entries are dropped.
    ///
    /// ```
    /// use soter::checker::IgnoreList;
    ///
    /// let ignored = IgnoreList::parse("akismet, jetpack");
    /// assert!(ignored.contains("jetpack"));
    /// assert_eq!(ignored.len(), 2);
    /// ```
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .collect()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.0.contains(slug)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for IgnoreList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

/// Outcome of one package check, as seen by post-check callbacks.
pub struct ItemReport<'a> {
    pub package: &'a Package,
    pub outcome: Result<&'a VulnerabilityCollection, &'a CheckError>,
}

/// Runs synchronously after every individual package check, failed or not.
pub type PostCheckCallback = Box<dyn Fn(&ItemReport<'_>)>;

/// Looks packages up against a vulnerability source.
pub trait CheckingService {
    /// Checks one package. A package without a version is resolved to the
    /// installed version when there is one.
    fn check_package(&self, package: &Package) -> Result<VulnerabilityCollection, CheckError>;

    /// Checks every installed package in `scope` whose slug is not ignored.
    ///
    /// A failure for one package is reported to the callbacks and skipped;
    /// only failures affecting the whole call are returned.
    fn check_scope(
        &self,
        scope: CheckScope,
        ignored: &IgnoreList,
    ) -> Result<VulnerabilityCollection, CheckError>;

    /// Number of packages [`check_scope`](Self::check_scope) would check.
    fn count(&self, scope: CheckScope, ignored: &IgnoreList) -> Result<usize, CheckError>;

    fn register_post_check_callback(&mut self, callback: PostCheckCallback);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignore_list_trims_whitespace() {
        let ignored = IgnoreList::parse("akismet, jetpack");
        assert!(ignored.contains("akismet"));
        assert!(ignored.contains("jetpack"));
        assert!(!ignored.contains(" jetpack"));
        assert!(!ignored.contains("hello-dolly"));
        assert_eq!(ignored.len(), 2);
    }

    #[test]
    fn test_ignore_list_empty_input() {
        assert!(IgnoreList::parse("").is_empty());
        assert!(IgnoreList::parse(" , ,").is_empty());
    }

    #[test]
    fn test_ignore_list_extend() {
        let mut ignored = IgnoreList::parse("474");
        ignored.extend(["akismet", "474"]);
        assert_eq!(ignored.iter().collect::<Vec<_>>(), vec!["474", "akismet"]);
    }

    #[test]
    fn test_scope_includes() {
        assert!(CheckScope::Plugins.includes(PackageType::Plugin));
        assert!(!CheckScope::Plugins.includes(PackageType::Theme));
        assert!(CheckScope::Site.includes(PackageType::Wordpress));
        assert_eq!(CheckScope::from(PackageType::Theme), CheckScope::Themes);
    }
}
