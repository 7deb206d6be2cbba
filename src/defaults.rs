//! Default values for manifest-union configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

use crate::classifier::{compile_rule, Matcher, Rule};
use crate::error::Result;

/// Configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "manifest-union.yaml";

/// Manifest document read from every revision unless overridden.
pub const DEFAULT_DOCUMENT: &str = "default.xml";

/// Suffix appended to a project path that collides with a nested project.
pub const DEFAULT_PATH_SUFFIX: &str = ".git";

/// Default `sync-j` hint written into the generated manifest.
pub const DEFAULT_SYNC_JOBS: u32 = 4;

/// Returns the default cache root directory.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/manifest-union` (XDG Base Directory)
/// - macOS: `~/Library/Caches/manifest-union`
/// - Windows: `{FOLDERID_LocalAppData}\manifest-union`
///
/// Falls back to `.manifest-union-cache` in the current directory if the
/// platform cache directory cannot be determined.
///
/// This can be overridden by the `--cache-root` CLI flag or the
/// `MANIFEST_UNION_CACHE` environment variable.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".manifest-union-cache"))
        .join("manifest-union")
}

/// Built-in classification rules for Android platform manifests.
///
/// Used whenever a configuration does not define its own `rules`.
pub fn default_rules() -> Result<Vec<Rule>> {
    vec![
        compile_rule("kernel", Matcher::regex(r"device/.*[_-]kernel")),
        compile_rule("kernel", Matcher::regex(r"kernel/prebuilts/")),
        compile_rule("mips", Matcher::regex(r"device/generic/.*mips")),
        compile_rule("mips", Matcher::regex(r"platform/prebuilts/.*/mips/.*")),
        compile_rule(
            "chromium",
            Ok(Matcher::Exact("platform/external/chromium-webview".to_string())),
        ),
        compile_rule(
            "bsp",
            Ok(Matcher::Prefix("platform/hardware/bsp/".to_string())),
        ),
        compile_rule("darwin", Matcher::regex(r"platform/prebuilts/.*darwin(-x86)?.*")),
        compile_rule("windows", Matcher::regex(r"platform/prebuilts/.*windows(-x86)?.*")),
    ]
    .into_iter()
    .collect()
}
