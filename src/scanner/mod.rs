//! Installed package scanners.
//!
//! This module provides the [`Scanner`] trait and one implementation per
//! package class, each reading a WordPress install on disk.
//!
//! # Available Scanners
//!
//! | Scanner | Package type | Reads |
//! |---------|--------------|-------|
//! | [`PluginScanner`] | plugin | `wp-content/plugins/` PHP headers |
//! | [`ThemeScanner`] | theme | `wp-content/themes/*/style.css` |
//! | [`CoreScanner`] | wordpress | `wp-includes/version.php` |
//!
//! # Example
//!
//! ```no_run
//! use soter::scanner::all_scanners;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     for scanner in all_scanners(Path::new("/var/www/html")) {
//!         let packages = scanner.scan()?;
//!         println!("{}: {} found", scanner.name(), packages.len());
//!     }
//!     Ok(())
//! }
//! ```

mod headers;
mod plugin;
mod theme;
mod wordpress;

pub use headers::header_value;
pub use plugin::PluginScanner;
pub use theme::ThemeScanner;
pub use wordpress::CoreScanner;

use crate::model::{Package, PackageType};
use anyhow::Result;
use std::path::Path;

/// Trait for discovering installed packages of one class.
pub trait Scanner: Send + Sync {
    /// Returns the human-readable name of this scanner.
    fn name(&self) -> &'static str;

    /// Returns the package class this scanner finds.
    fn package_type(&self) -> PackageType;

    /// Scans for installed packages, in directory name order.
    ///
    /// A missing directory is not an error and yields no packages.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing directory or file cannot be read.
    fn scan(&self) -> Result<Vec<Package>>;
}

/// Returns every scanner for the install at `root`: plugins, then themes,
/// then the core.
///
/// ```
/// use soter::scanner::all_scanners;
/// use std::path::Path;
///
/// let scanners = all_scanners(Path::new("."));
/// assert_eq!(scanners.len(), 3);
/// ```
pub fn all_scanners(root: &Path) -> Vec<Box<dyn Scanner>> {
    vec![
        Box::new(PluginScanner::new(root)),
        Box::new(ThemeScanner::new(root)),
        Box::new(CoreScanner::new(root)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_order() {
        let types: Vec<PackageType> = all_scanners(Path::new("."))
            .iter()
            .map(|s| s.package_type())
            .collect();
        assert_eq!(
            types,
            vec![PackageType::Plugin, PackageType::Theme, PackageType::Wordpress]
        );
    }
}
