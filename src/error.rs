//! # Error Handling
//!
//! This module defines the centralized error type for `manifest-union`. It
//! uses the `thiserror` library to create an `Error` enum covering every
//! anticipated failure mode, each with enough context to tell the user which
//! source, revision or document was involved.
//!
//! ## Propagation
//!
//! Not every variant aborts a run. The aggregation phases decide how far an
//! error travels:
//!
//! - **`SourceUnavailable`** aborts the whole run.
//! - **`MalformedDocument`** only empties the contribution of one revision,
//!   unless no revision of the namespace parsed at all.
//! - **`MissingInclude`** is logged and treated as an empty document.
//! - **`NamespaceFailed`** aborts the run unless the namespace is optional and
//!   nothing of lower precedence depends on it.
//!
//! The `Result` alias is used across the library so functions can propagate
//! errors with `?`.

use thiserror::Error;

/// Main error type for manifest-union operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the configuration file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A classification rule could not be compiled.
    #[error("Invalid rule for label '{label}': {message}")]
    InvalidRule { label: String, message: String },

    /// A revision source could not be reached at all (clone, fetch or listing
    /// failed and nothing usable is cached).
    #[error("Revision source unavailable: {source_name} - {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    /// A fetched document is not well-formed XML.
    #[error("Malformed document {document} at {revision}: {message}")]
    MalformedDocument {
        revision: String,
        document: String,
        message: String,
    },

    /// A document named by an `<include>` element does not exist in the
    /// revision.
    #[error("Missing include {document} at {revision}")]
    MissingInclude { revision: String, document: String },

    /// Every revision of a namespace failed, so the namespace produced no
    /// usable project set.
    #[error("Namespace '{namespace}' failed: {reason}")]
    NamespaceFailed { namespace: String, reason: String },

    /// An error occurred while executing a Git command.
    #[error("Git command failed for {url}: {command} - {stderr}")]
    GitCommand {
        command: String,
        url: String,
        stderr: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// The fetch thread pool could not be built.
    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },
}

impl Error {
    /// Whether this error only affects the revision it was raised for.
    ///
    /// Revision-scoped errors are recorded and skipped during scanning;
    /// everything else stops the scan.
    pub fn is_revision_scoped(&self) -> bool {
        matches!(
            self,
            Error::MalformedDocument { .. } | Error::MissingInclude { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
