//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the
//! `manifest-union.yaml` configuration file, as well as the logic for
//! parsing and validating it.
//!
//! ## Key Components
//!
//! - **`Config`**: The whole file. Holds the header of the generated
//!   manifest (`remote`, `default`), path handling, classification `rules`
//!   and the list of `namespaces` to aggregate.
//!
//! - **`NamespaceConfig`**: One namespace: where its revisions come from
//!   (`source`), which revisions and projects to keep, and the static
//!   `inject`/`exclude`/`extra_labels` lists.
//!
//! - **`RuleConfig`**: A classification rule. Exactly one of `exact`,
//!   `prefix`, `regex` or `glob` must be given.
//!
//! ## Example
//!
//! ```yaml
//! output: aosp-kernel.xml
//! remote:
//!   name: aosp
//!   fetch: https://android.googlesource.com
//! default:
//!   revision: master
//!   sync-j: 4
//! namespaces:
//!   - name: kernel
//!     source:
//!       url: https://android.googlesource.com/kernel/manifest
//!       refs: branches
//!       skip_revisions: [android-gs-raviole-mainline]
//!     inject: [kernel/manifest]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classifier::{compile_rule, Classifier, Matcher, Rule};
use crate::defaults::{default_rules, DEFAULT_DOCUMENT, DEFAULT_PATH_SUFFIX, DEFAULT_SYNC_JOBS};
use crate::error::{Error, Result};
use crate::git::RefSelection;
use crate::render::ManifestHeader;

/// Remote written into the generated manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    /// Name other elements refer to the remote by.
    pub name: String,
    /// Fetch location, absolute or relative to the manifest's own URL.
    pub fetch: String,
    /// Optional code review server.
    #[serde(default)]
    pub review: Option<String>,
}

/// `<default>` element of the generated manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultConfig {
    /// Revision checked out for every project.
    #[serde(default)]
    pub revision: Option<String>,
    /// Number of parallel sync jobs hinted to the sync tool.
    #[serde(default = "default_sync_jobs", rename = "sync-j", alias = "sync_j")]
    pub sync_j: u32,
}

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            revision: None,
            sync_j: DEFAULT_SYNC_JOBS,
        }
    }
}

fn default_sync_jobs() -> u32 {
    DEFAULT_SYNC_JOBS
}

fn default_document() -> String {
    DEFAULT_DOCUMENT.to_string()
}

fn default_path_suffix() -> String {
    DEFAULT_PATH_SUFFIX.to_string()
}

/// Classification rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Label given to matching projects.
    pub label: String,
    #[serde(default)]
    pub exact: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    /// Matched at the start of the project name.
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default)]
    pub glob: Option<String>,
}

impl RuleConfig {
    /// Compile into a classifier rule.
    pub fn compile(&self) -> Result<Rule> {
        let given = [&self.exact, &self.prefix, &self.regex, &self.glob]
            .iter()
            .filter(|m| m.is_some())
            .count();
        if given != 1 {
            return Err(Error::InvalidRule {
                label: self.label.clone(),
                message: format!(
                    "expected exactly one of exact, prefix, regex or glob, found {}",
                    given
                ),
            });
        }

        let matcher = if let Some(exact) = &self.exact {
            Ok(Matcher::Exact(exact.clone()))
        } else if let Some(prefix) = &self.prefix {
            Ok(Matcher::Prefix(prefix.clone()))
        } else if let Some(regex) = &self.regex {
            Matcher::regex(regex)
        } else {
            // Exactly one matcher is set, so this is the glob
            Matcher::glob(self.glob.as_deref().unwrap_or_default())
        };
        compile_rule(&self.label, matcher)
    }
}

/// Source of revisions that another source already covers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverConfig {
    pub url: String,
    #[serde(default)]
    pub refs: RefSelection,
}

/// Where a namespace's revisions come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// URL or local path of the manifest repository.
    pub url: String,
    /// Which refs are revisions.
    #[serde(default)]
    pub refs: RefSelection,
    /// Revisions always scanned, listed or not (e.g. `master`).
    #[serde(default)]
    pub extra_revisions: Vec<String>,
    /// Document read from each revision; `{revision}` expands to the revision.
    #[serde(default = "default_document")]
    pub document: String,
    /// Follow `<include name="..."/>` within a revision.
    #[serde(default)]
    pub follow_includes: bool,
    /// Per-revision document overrides.
    #[serde(default)]
    pub documents: BTreeMap<String, String>,
    /// Per-prefix document overrides; the longest matching prefix wins.
    #[serde(default)]
    pub document_prefixes: BTreeMap<String, String>,
    /// Revisions never scanned.
    #[serde(default)]
    pub skip_revisions: Vec<String>,
    /// Revision prefixes never scanned.
    #[serde(default)]
    pub skip_prefixes: Vec<String>,
    /// Skip every revision this other repository also has.
    #[serde(default)]
    pub skip_revisions_in: Option<CoverConfig>,
}

/// Declared-project filter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default)]
    pub name_prefixes: Vec<String>,
    #[serde(default)]
    pub remotes: Vec<String>,
}

/// One namespace of the aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    pub name: String,
    /// Lower wins on shared names; defaults to the namespace's position.
    #[serde(default)]
    pub precedence: Option<u32>,
    /// Drop the namespace instead of failing when none of its revisions parse.
    #[serde(default)]
    pub optional: bool,
    pub source: SourceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub inject: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub extra_labels: Vec<String>,
}

/// The complete configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// File the manifest is written to when `--output` is not given.
    #[serde(default)]
    pub output: Option<PathBuf>,
    pub remote: RemoteConfig,
    #[serde(default)]
    pub default: DefaultConfig,
    /// Appended to the path of a project that has nested projects.
    #[serde(default = "default_path_suffix")]
    pub path_suffix: String,
    /// Emit a path for every project, not only conflicting ones.
    #[serde(default)]
    pub explicit_paths: bool,
    /// Number of revisions fetched in parallel.
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Classification rules; omitted means the built-in Android rules.
    #[serde(default)]
    pub rules: Option<Vec<RuleConfig>>,
    pub namespaces: Vec<NamespaceConfig>,
}

impl Config {
    /// Classifier built from `rules`, or the built-in rules when absent.
    pub fn classifier(&self) -> Result<Classifier> {
        let rules = match &self.rules {
            Some(rules) => rules.iter().map(RuleConfig::compile).collect::<Result<_>>()?,
            None => default_rules()?,
        };
        Ok(Classifier::new(rules))
    }

    /// Precedence of the namespace at `index`.
    pub fn precedence_of(&self, index: usize) -> u32 {
        self.namespaces[index]
            .precedence
            .unwrap_or(index as u32)
    }

    pub fn namespace(&self, name: &str) -> Option<&NamespaceConfig> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    pub fn header(&self) -> ManifestHeader {
        ManifestHeader {
            remote_name: self.remote.name.clone(),
            fetch: self.remote.fetch.clone(),
            review: self.remote.review.clone(),
            revision: self.default.revision.clone(),
            sync_j: self.default.sync_j,
        }
    }

    /// Check everything serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.namespaces.is_empty() {
            return Err(Error::ConfigParse {
                message: "No namespaces configured".to_string(),
                hint: Some("Add a 'namespaces:' list with at least one source".to_string()),
            });
        }

        let mut seen = BTreeSet::new();
        for ns in &self.namespaces {
            if ns.name.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: "Namespace with an empty name".to_string(),
                    hint: None,
                });
            }
            if !seen.insert(ns.name.as_str()) {
                return Err(Error::ConfigParse {
                    message: format!("Duplicate namespace '{}'", ns.name),
                    hint: Some("Namespace names must be unique".to_string()),
                });
            }
            if ns.source.url.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: format!("Namespace '{}' has an empty source url", ns.name),
                    hint: None,
                });
            }
        }

        if self.path_suffix.is_empty() {
            return Err(Error::ConfigParse {
                message: "path_suffix must not be empty".to_string(),
                hint: Some(format!("The usual suffix is '{}'", DEFAULT_PATH_SUFFIX)),
            });
        }

        if self.jobs == Some(0) {
            return Err(Error::ConfigParse {
                message: "jobs must be at least 1".to_string(),
                hint: None,
            });
        }

        self.classifier()?;
        Ok(())
    }
}

/// Parse and validate a configuration from YAML.
pub fn parse(yaml_content: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml_content)?;
    config.validate()?;
    Ok(config)
}

/// Parse a configuration from a YAML file path
pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
