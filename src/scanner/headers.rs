use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Headers are only looked for near the top of a file.
const HEADER_BYTES: u64 = 8 * 1024;

/// Reads the leading part of a file where WordPress file headers live.
pub(crate) fn read_head(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut buf = Vec::new();
    file.take(HEADER_BYTES)
        .read_to_end(&mut buf)
        .with_context(|| format!("Failed to read {:?}", path))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Extracts a `Key: value` file header, as found in plugin PHP files and
/// theme stylesheets. Keys match case-insensitively.
///
/// ```
/// use soter::scanner::header_value;
///
/// let php = "<?php\n/**\n * Plugin Name: Akismet\n * Version: 3.1.4\n */";
/// assert_eq!(header_value(php, "Version").as_deref(), Some("3.1.4"));
/// assert_eq!(header_value(php, "Author"), None);
/// ```
pub fn header_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.trim_start_matches([' ', '\t', '/', '*', '#', '@']);
        let (name, value) = line.split_once(':')?;
        if !name.trim_end().eq_ignore_ascii_case(key) {
            return None;
        }

        let value = value.trim();
        let value = value.strip_suffix("*/").unwrap_or(value).trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    })
}
