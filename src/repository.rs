//! # Revision Sources
//!
//! A revision source is anything that can name the historical revisions of
//! a manifest repository and hand out the raw manifest documents of each
//! revision. The aggregation phases only ever talk to the
//! [`RevisionSource`] trait.
//!
//! ## Implementations
//!
//! - **`GitRevisionSource`**: keeps a bare clone of the manifest repository
//!   in the on-disk cache, refreshes it on [`RevisionSource::prepare`], lists
//!   tags and/or branches and reads documents with `git cat-file`.
//!
//! - **`MemorySource`**: documents held in memory. Used by tests and
//!   benchmarks, and handy when manifests come from somewhere other than git.
//!
//! `GitRevisionSource` reaches git through the **`GitOperations`** trait so
//! that tests can replace the system `git` binary with a mock.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::git::{GitRef, RefSelection};

/// Opaque name of one historical state of a manifest repository.
pub type RevisionId = String;

/// Object id of the commit a revision points at.
pub type CommitId = String;

/// Provider of (revision, document) pairs.
pub trait RevisionSource: Send + Sync {
    /// Human readable identity of the source, used in logs and errors.
    fn describe(&self) -> String;

    /// Make the source ready for listing and fetching (clone, update, ...).
    fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Every revision the source knows about, in no particular order.
    fn list_revisions(&self) -> Result<Vec<RevisionId>>;

    /// Every revision paired with the commit it points at, when the source
    /// knows it. Revisions on the same commit hold identical documents.
    fn list_commits(&self) -> Result<Vec<(RevisionId, Option<CommitId>)>> {
        Ok(self
            .list_revisions()?
            .into_iter()
            .map(|revision| (revision, None))
            .collect())
    }

    /// Raw bytes of `document` at `revision`, or `None` if it does not exist.
    fn fetch_document(&self, revision: &str, document: &str) -> Result<Option<Vec<u8>>>;
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Create a bare clone of `url` at `target_dir`.
    fn clone_bare(&self, url: &str, target_dir: &Path) -> Result<()>;

    /// Refresh an existing bare clone from its origin.
    fn fetch(&self, repo_dir: &Path, url: &str) -> Result<()>;

    /// List refs matching `selection`.
    fn list_refs(&self, repo_dir: &Path, url: &str, selection: RefSelection) -> Result<Vec<GitRef>>;

    /// Read a file as of a revision.
    fn show_file(
        &self,
        repo_dir: &Path,
        url: &str,
        revision: &str,
        document: &str,
    ) -> Result<Option<Vec<u8>>>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_bare(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone_bare(url, target_dir)
    }

    fn fetch(&self, repo_dir: &Path, url: &str) -> Result<()> {
        crate::git::fetch(repo_dir, url)
    }

    fn list_refs(&self, repo_dir: &Path, url: &str, selection: RefSelection) -> Result<Vec<GitRef>> {
        crate::git::list_refs(repo_dir, url, selection)
    }

    fn show_file(
        &self,
        repo_dir: &Path,
        url: &str,
        revision: &str,
        document: &str,
    ) -> Result<Option<Vec<u8>>> {
        crate::git::show_file(repo_dir, url, revision, document)
    }
}

/// Manifest repository backed by a bare clone in the cache.
pub struct GitRevisionSource {
    url: String,
    clone_dir: PathBuf,
    selection: RefSelection,
    offline: bool,
    git_ops: Box<dyn GitOperations>,
}

impl GitRevisionSource {
    /// Source for `url`, cloned under `cache_root`.
    pub fn new(url: impl Into<String>, cache_root: &Path, selection: RefSelection) -> Self {
        let url = url.into();
        let clone_dir = crate::path::clone_dir(cache_root, &url);
        Self {
            url,
            clone_dir,
            selection,
            offline: false,
            git_ops: Box::new(DefaultGitOperations),
        }
    }

    /// Never touch the network; use whatever is cached.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Replace the git backend. This is primarily used for testing.
    pub fn with_operations(mut self, git_ops: Box<dyn GitOperations>) -> Self {
        self.git_ops = git_ops;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn clone_dir(&self) -> &Path {
        &self.clone_dir
    }

    fn is_cached(&self) -> bool {
        self.clone_dir.is_dir()
    }
}

impl RevisionSource for GitRevisionSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    /// Clone the repository if needed, otherwise fetch new refs.
    ///
    /// Network Failure Behavior:
    /// - If fetch fails but a clone exists, continue with it and warn
    /// - If clone fails, the source is unavailable
    fn prepare(&self) -> Result<()> {
        if self.is_cached() {
            if self.offline {
                debug!("Offline: using cached clone of {}", self.url);
                return Ok(());
            }
            debug!("Updating {} in {}", self.url, self.clone_dir.display());
            if let Err(e) = self.git_ops.fetch(&self.clone_dir, &self.url) {
                warn!(
                    "Fetch failed for {}, falling back to cached clone: {}",
                    self.url, e
                );
            }
            return Ok(());
        }

        if self.offline {
            return Err(Error::SourceUnavailable {
                source_name: self.url.clone(),
                message: "offline and no cached clone exists".to_string(),
            });
        }

        debug!("Cloning {} into {}", self.url, self.clone_dir.display());
        self.git_ops
            .clone_bare(&self.url, &self.clone_dir)
            .map_err(|e| match e {
                Error::SourceUnavailable { .. } => e,
                other => Error::SourceUnavailable {
                    source_name: self.url.clone(),
                    message: other.to_string(),
                },
            })
    }

    fn list_revisions(&self) -> Result<Vec<RevisionId>> {
        Ok(self
            .list_commits()?
            .into_iter()
            .map(|(revision, _)| revision)
            .collect())
    }

    fn list_commits(&self) -> Result<Vec<(RevisionId, Option<CommitId>)>> {
        let mut refs = self
            .git_ops
            .list_refs(&self.clone_dir, &self.url, self.selection)
            .map_err(|e| Error::SourceUnavailable {
                source_name: self.url.clone(),
                message: e.to_string(),
            })?;
        refs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(refs.into_iter().map(|r| (r.name, Some(r.commit))).collect())
    }

    fn fetch_document(&self, revision: &str, document: &str) -> Result<Option<Vec<u8>>> {
        self.git_ops
            .show_file(&self.clone_dir, &self.url, revision, document)
    }
}

/// Revision source holding its documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    revisions: BTreeMap<RevisionId, BTreeMap<String, Vec<u8>>>,
    unavailable: bool,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A source that fails to list anything.
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unavailable: true,
            ..Self::default()
        }
    }

    /// Add a revision without any documents.
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revisions.entry(revision.into()).or_default();
        self
    }

    /// Add `document` with raw `content` to `revision`.
    pub fn with_document(
        mut self,
        revision: impl Into<String>,
        document: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.revisions
            .entry(revision.into())
            .or_default()
            .insert(document.into(), content.into());
        self
    }

    /// Add a `default.xml` declaring `projects` to `revision`.
    pub fn with_projects(self, revision: impl Into<String>, projects: &[&str]) -> Self {
        let body: String = projects
            .iter()
            .map(|name| format!("  <project name=\"{}\" />\n", name))
            .collect();
        self.with_document(
            revision,
            crate::defaults::DEFAULT_DOCUMENT,
            format!("<manifest>\n{}</manifest>\n", body),
        )
    }
}

impl RevisionSource for MemorySource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn list_revisions(&self) -> Result<Vec<RevisionId>> {
        if self.unavailable {
            return Err(Error::SourceUnavailable {
                source_name: self.name.clone(),
                message: "source is unavailable".to_string(),
            });
        }
        Ok(self.revisions.keys().cloned().collect())
    }

    fn fetch_document(&self, revision: &str, document: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .revisions
            .get(revision)
            .and_then(|docs| docs.get(document))
            .cloned())
    }
}
