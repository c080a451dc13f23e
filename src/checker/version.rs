use std::cmp::Ordering;

/// Returns true when `installed` predates the release that fixed an issue.
///
/// An issue without a fix affects every version.
pub fn is_affected(installed: &str, fixed_in: Option<&str>) -> bool {
    match fixed_in {
        Some(fixed) => is_newer(fixed, installed),
        None => true,
    }
}

pub fn is_newer(candidate: &str, current: &str) -> bool {
    // Try semver comparison first
    if let (Some(candidate_ver), Some(current_ver)) =
        (parse_lenient(candidate), parse_lenient(current))
    {
        return candidate_ver > current_ver;
    }

    // Four-part and otherwise odd versions ("1.2.3.4", "2.0b")
    compare_components(candidate, current) == Ordering::Greater
}

/// Parses a version, padding WordPress style "4.7" out to "4.7.0".
fn parse_lenient(version: &str) -> Option<semver::Version> {
    let version = version.trim().trim_start_matches('v');
    if let Ok(parsed) = semver::Version::parse(version) {
        return Some(parsed);
    }

    let (core, pre) = match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    };

    let parts: Vec<&str> = core.split('.').collect();
    let numeric = |part: &&str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if parts.len() > 3 || !parts.iter().all(numeric) {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    if let Some(pre) = pre {
        padded.push('-');
        padded.push_str(pre);
    }

    semver::Version::parse(&padded).ok()
}

fn compare_components(a: &str, b: &str) -> Ordering {
    let numbers = |v: &str| -> Vec<u64> {
        v.trim_start_matches('v')
            .split(|c: char| !c.is_ascii_digit())
            .filter(|part| !part.is_empty())
            .filter_map(|part| part.parse().ok())
            .collect()
    };

    let (left, right) = (numbers(a), numbers(b));
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
