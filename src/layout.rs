//! WordPress install layout.
//!
//! Functions return `Option<PathBuf>`, with `None` when the location does
//! not exist under the given root.

use std::path::{Path, PathBuf};

/// Returns the plugins directory.
///
/// Location: `<root>/wp-content/plugins/`.
pub fn plugins_dir(root: &Path) -> Option<PathBuf> {
    existing(root.join("wp-content").join("plugins"))
}

/// Returns the themes directory.
///
/// Location: `<root>/wp-content/themes/`.
pub fn themes_dir(root: &Path) -> Option<PathBuf> {
    existing(root.join("wp-content").join("themes"))
}

/// Returns the file declaring the core version.
///
/// Location: `<root>/wp-includes/version.php`.
pub fn core_version_file(root: &Path) -> Option<PathBuf> {
    existing(root.join("wp-includes").join("version.php"))
}

/// Whether `root` looks like a WordPress install at all.
pub fn is_wordpress_root(root: &Path) -> bool {
    root.join("wp-content").is_dir() || root.join("wp-includes").is_dir()
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}
