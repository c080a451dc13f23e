use super::{
    is_affected, CheckScope, CheckingService, IgnoreList, ItemReport, PostCheckCallback,
    VulnerabilityDatabase,
};
use crate::error::CheckError;
use crate::model::{Package, PackageType, VulnerabilityCollection};
use crate::scanner::all_scanners;
use std::path::Path;
use tracing::debug;

/// Offline checking service: installed packages from a WordPress root,
/// vulnerabilities from a [`VulnerabilityDatabase`] file.
pub struct LocalChecker {
    database: VulnerabilityDatabase,
    installed: Vec<Package>,
    callbacks: Vec<PostCheckCallback>,
}

impl LocalChecker {
    pub fn new(database: VulnerabilityDatabase, installed: Vec<Package>) -> Self {
        Self {
            database,
            installed,
            callbacks: Vec::new(),
        }
    }

    /// Scans the install at `root` for plugins, themes and the core version.
    pub fn from_install(root: &Path, database: VulnerabilityDatabase) -> Result<Self, CheckError> {
        let mut installed = Vec::new();

        for scanner in all_scanners(root) {
            let packages = scanner.scan().map_err(|e| CheckError::Scan {
                path: root.to_path_buf(),
                details: format!("{:#}", e),
            })?;
            debug!(
                scanner = scanner.name(),
                package_type = scanner.package_type().as_str(),
                found = packages.len(),
                "Scanned install"
            );
            installed.extend(packages);
        }

        Ok(Self::new(database, installed))
    }

    pub fn installed(&self) -> &[Package] {
        &self.installed
    }

    fn checkable<'a>(
        &'a self,
        scope: CheckScope,
        ignored: &'a IgnoreList,
    ) -> impl Iterator<Item = &'a Package> + 'a {
        self.installed
            .iter()
            .filter(move |p| scope.includes(p.package_type) && !ignored.contains(&p.slug))
    }

    /// Fills in the installed version when the caller gave none.
    fn resolve(&self, package: &Package) -> Result<Package, CheckError> {
        if package.version.is_some() {
            return Ok(package.clone());
        }

        let installed = self
            .installed
            .iter()
            .find(|p| p.package_type == package.package_type && p.slug == package.slug);

        match installed {
            Some(found) => Ok(package.clone().with_optional_version(found.version.clone())),
            None if package.package_type == PackageType::Wordpress => {
                Err(CheckError::MissingCoreVersion)
            }
            None => Ok(package.clone()),
        }
    }

    fn lookup(&self, package: &Package) -> Result<VulnerabilityCollection, CheckError> {
        if package.slug.trim().is_empty() {
            return Err(CheckError::EmptySlug {
                package_type: package.package_type,
            });
        }

        let entry = self
            .database
            .entry(package.package_type, &package.slug)
            .ok_or_else(|| CheckError::NotFound {
                package_type: package.package_type,
                slug: package.slug.clone(),
            })?;

        // Core entries are keyed by exact release, so everything listed applies.
        let version = match package.package_type {
            PackageType::Wordpress => None,
            _ => package.version.as_deref(),
        };

        Ok(entry
            .vulnerabilities
            .iter()
            .filter(|record| match version {
                Some(installed) => {
                    let fixed_in = record.fixed_in.as_deref().filter(|f| !f.trim().is_empty());
                    is_affected(installed, fixed_in)
                }
                None => true,
            })
            .map(|record| record.clone().into_vulnerability(package.clone()))
            .collect())
    }

    fn notify(&self, package: &Package, outcome: Result<&VulnerabilityCollection, &CheckError>) {
        let report = ItemReport { package, outcome };
        for callback in &self.callbacks {
            callback(&report);
        }
    }
}

impl CheckingService for LocalChecker {
    fn check_package(&self, package: &Package) -> Result<VulnerabilityCollection, CheckError> {
        let (checked, result) = match self.resolve(package) {
            Ok(resolved) => {
                let result = self.lookup(&resolved);
                (resolved, result)
            }
            Err(e) => (package.clone(), Err(e)),
        };

        self.notify(&checked, result.as_ref());
        result
    }

    fn check_scope(
        &self,
        scope: CheckScope,
        ignored: &IgnoreList,
    ) -> Result<VulnerabilityCollection, CheckError> {
        let mut found = VulnerabilityCollection::new();

        for package in self.checkable(scope, ignored) {
            if let Ok(vulnerabilities) = self.check_package(package) {
                found.append(vulnerabilities);
            }
        }

        Ok(found)
    }

    fn count(&self, scope: CheckScope, ignored: &IgnoreList) -> Result<usize, CheckError> {
        Ok(self.checkable(scope, ignored).count())
    }

    fn register_post_check_callback(&mut self, callback: PostCheckCallback) {
        self.callbacks.push(callback);
    }
}
