use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Plugin,
    Theme,
    Wordpress,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Plugin => "plugin",
            PackageType::Theme => "theme",
            PackageType::Wordpress => "wordpress",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PackageType::Plugin => "Plugin",
            PackageType::Theme => "Theme",
            PackageType::Wordpress => "WordPress",
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single checkable unit.
///
/// `version` is `None` when the caller wants whatever is currently installed.
/// WordPress core packages always carry a version, and their slug is derived
/// from it with [`core_slug`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Package {
    pub package_type: PackageType,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Package {
    pub fn new(package_type: PackageType, slug: impl Into<String>) -> Self {
        Self {
            package_type,
            slug: slug.into(),
            version: None,
        }
    }

    pub fn plugin(slug: impl Into<String>) -> Self {
        Self::new(PackageType::Plugin, slug)
    }

    pub fn theme(slug: impl Into<String>) -> Self {
        Self::new(PackageType::Theme, slug)
    }

    pub fn wordpress(version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            package_type: PackageType::Wordpress,
            slug: core_slug(&version),
            version: Some(version),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_optional_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }
}

/// Derives a WordPress core slug by dropping every non-numeric character.
///
/// ```
/// assert_eq!(soter::core_slug("4.7.4"), "474");
/// assert_eq!(soter::core_slug("5.0"), "50");
/// ```
pub fn core_slug(version: &str) -> String {
    version.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_slug_strips_dots() {
        assert_eq!(core_slug("4.7.4"), "474");
        assert_eq!(core_slug("5.0"), "50");
    }

    #[test]
    fn test_core_slug_strips_prerelease_text() {
        assert_eq!(core_slug("6.5-RC1"), "651");
        assert_eq!(core_slug("beta"), "");
    }

    #[test]
    fn test_wordpress_package() {
        let package = Package::wordpress("4.7.4");
        assert_eq!(package.package_type, PackageType::Wordpress);
        assert_eq!(package.slug, "474");
        assert_eq!(package.version.as_deref(), Some("4.7.4"));
    }

    #[test]
    fn test_plugin_without_version() {
        let package = Package::plugin("akismet");
        assert_eq!(package.package_type, PackageType::Plugin);
        assert_eq!(package.slug, "akismet");
        assert!(package.version.is_none());
    }

    #[test]
    fn test_with_optional_version() {
        let package = Package::theme("twentyten").with_optional_version(Some("2.1".to_string()));
        assert_eq!(package.version.as_deref(), Some("2.1"));

        let package = Package::theme("twentyten").with_optional_version(None);
        assert!(package.version.is_none());
    }

    #[test]
    fn test_package_type_names() {
        assert_eq!(PackageType::Plugin.as_str(), "plugin");
        assert_eq!(PackageType::Wordpress.to_string(), "WordPress");
    }
}
