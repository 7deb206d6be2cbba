//! # Output Configuration
//!
//! Controls how the CLI decorates its human-readable output: status markers
//! are emoji on a color terminal and bracketed words everywhere else, so
//! logs captured from CI stay greppable.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use manifest_union::output::{OutputConfig, Status};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Scanning namespaces...", Status::Scan.marker(&out));
//! ```

use std::env;

use console::style;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always" forces colors on
    /// (overriding `NO_COLOR`), "never" forces them off and anything else
    /// detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Bold `text` when colors are enabled.
    pub fn emphasize(&self, text: impl std::fmt::Display) -> String {
        if self.use_color {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Leading marker of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Scan,
    Ok,
    Warn,
    Err,
    Info,
    Write,
}

impl Status {
    pub fn marker(self, config: &OutputConfig) -> &'static str {
        match self {
            Status::Scan => emoji(config, "🔍", "[SCAN]"),
            Status::Ok => emoji(config, "✅", "[OK]"),
            Status::Warn => emoji(config, "⚠️", "[WARN]"),
            Status::Err => emoji(config, "❌", "[ERR]"),
            Status::Info => emoji(config, "📊", "[INFO]"),
            Status::Write => emoji(config, "📝", "[WRITE]"),
        }
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("NEVER");
        assert!(!config.use_color);
    }

    #[test]
    fn test_status_markers_without_color() {
        let config = OutputConfig::without_color();
        assert_eq!(Status::Ok.marker(&config), "[OK]");
        assert_eq!(Status::Write.marker(&config), "[WRITE]");
        assert_eq!(config.emphasize(42), "42");
    }

    #[test]
    fn test_status_markers_with_color() {
        let config = OutputConfig::with_color();
        assert_eq!(Status::Scan.marker(&config), "🔍");
        assert_eq!(emoji(&config, "🔍", "[SCAN]"), "🔍");
    }
}
