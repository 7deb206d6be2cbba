//! # Manifest Union Library
//!
//! This library aggregates the projects declared by every historical
//! revision of one or more upstream manifest repositories into a single repo
//! manifest. Syncing that manifest mirrors every project any release ever
//! used. It backs the `manifest-union` command-line tool but can be driven
//! directly, e.g. with in-memory sources.
//!
//! ## Quick Example
//!
//! ```
//! use manifest_union::classifier::Classifier;
//! use manifest_union::defaults::default_rules;
//! use manifest_union::phases::{aggregate, AggregateOptions, Namespace};
//! use manifest_union::repository::MemorySource;
//!
//! let platform = MemorySource::new("platform")
//!     .with_projects("android-13.0.0_r1", &["platform/build", "platform/external/chromium-webview"])
//!     .with_projects("android-14.0.0_r1", &["platform/build", "platform/art"]);
//! let namespaces = vec![Namespace::new("platform", platform)];
//!
//! let classifier = Classifier::new(default_rules().unwrap());
//! let manifest = aggregate(&namespaces, &classifier, &AggregateOptions::default()).unwrap();
//!
//! assert_eq!(manifest.len(), 3);
//! assert!(manifest.get("platform/external/chromium-webview").unwrap().groups.contains("chromium"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Revision sources (`repository`, `git`)**: Something that lists the
//!   revisions of a manifest repository and hands out the documents of each
//!   one. Git sources keep bare clones in an on-disk cache.
//! - **Revision plans (`revision`)**: Which revisions are scanned and which
//!   document is read for each.
//! - **Documents (`document`)**: Parsing the project and include declarations
//!   out of a manifest document.
//! - **Project sets (`project_set`)** and **paths (`path`)**: Sorted name sets
//!   with nesting queries used for path disambiguation.
//! - **Classification (`classifier`)**: Ordered rules mapping project names to
//!   group labels.
//! - **Phases (`phases`)**: Scanning, reconciliation and annotation of the
//!   namespaces of a run.
//! - **Rendering (`render`)**: Writing the result as a repo manifest.
//! - **Configuration (`config`)**: The `manifest-union.yaml` schema.

pub mod classifier;
pub mod config;
pub mod defaults;
pub mod document;
pub mod error;
pub mod git;
pub mod output;
pub mod path;
pub mod phases;
pub mod project_set;
pub mod render;
pub mod repository;
pub mod revision;
pub mod suggestions;

#[cfg(test)]
mod path_proptest;
