//! Core data types for packages and vulnerabilities.
//!
//! This module contains the value objects that flow through soter:
//!
//! - [`Package`] - One checkable plugin, theme or WordPress core release
//! - [`PackageType`] - The class a package belongs to
//! - [`Vulnerability`] - A reported issue, attached to the package it was found against
//! - [`VulnerabilityCollection`] - Ordered results of a check
//!
//! # Example
//!
//! ```
//! use soter::{Package, PackageType};
//!
//! let core = Package::wordpress("4.7.4");
//! assert_eq!(core.package_type, PackageType::Wordpress);
//! assert_eq!(core.slug, "474");
//! ```

mod package;
mod vulnerability;

pub use package::*;
pub use vulnerability::*;
