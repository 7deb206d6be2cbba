//! Project path helpers for manifest-union

use std::path::{Path, PathBuf};

/// Separator between the segments of a project name.
pub const SEPARATOR: char = '/';

/// Whether `candidate` lives strictly below `parent` in the project tree.
///
/// `platform/build/soong` is nested under `platform/build`, while
/// `platform/buildbot` is not: the match must end on a separator. Anything
/// past that separator counts, so `a/` is nested under `a`.
pub fn is_nested_under(parent: &str, candidate: &str) -> bool {
    candidate.len() > parent.len()
        && candidate.starts_with(parent)
        && candidate[parent.len()..].starts_with(SEPARATOR)
}

/// Prefix shared by every name nested under `parent`.
pub fn descendant_prefix(parent: &str) -> String {
    let mut prefix = String::with_capacity(parent.len() + 1);
    prefix.push_str(parent);
    prefix.push(SEPARATOR);
    prefix
}

/// Checkout path for a project whose bare name collides with a child project.
pub fn disambiguated_path(name: &str, suffix: &str) -> String {
    format!("{}{}", name, suffix)
}

/// Encode a URL path to be filesystem-safe
///
/// This converts URL characters that are problematic for filesystems
/// into safe alternatives.
pub fn encode_url_path(url: &str) -> String {
    url.chars()
        .map(|c| match c {
            '/' => '-',
            '\\' => '-',
            ':' => '_',
            // Keep alphanumeric, dots, dashes, underscores as-is
            c if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect()
}

/// Directory under `cache_root` holding the bare clone of `url`.
pub fn clone_dir(cache_root: &Path, url: &str) -> PathBuf {
    let trimmed = url.trim_end_matches('/');
    cache_root.join(format!("{}.git", encode_url_path(trimmed)))
}
