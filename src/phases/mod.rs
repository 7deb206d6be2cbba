//! Implementation of the aggregation pipeline.
//!
//! ## Overview
//!
//! An aggregation run follows 3 phases:
//! 1. Scanning - List every revision of each namespace's source, keep the
//!    eligible ones and union the projects their documents declare
//! 2. Reconciliation - Inject always-present projects, drop excluded ones and
//!    let higher-precedence namespaces claim shared names
//! 3. Annotation - Classify every surviving project, detect path conflicts and
//!    merge all namespaces into one sorted manifest
//!
//! Sources are prepared (cloned or updated) by the orchestrator before
//! phase 1; rendering the result is left to [`crate::render`].

use crate::classifier::GroupLabelSet;
use crate::document::DeclaredProject;
use crate::project_set::ProjectSet;
use crate::repository::RevisionSource;
use crate::revision::RevisionPlan;

// Phase modules
pub mod annotate;
pub mod orchestrator;
pub mod reconcile;
pub mod scan;

pub use annotate as phase3;
pub use reconcile as phase2;
pub use scan as phase1;

pub use orchestrator::aggregate;

/// Restricts which declared projects a namespace keeps.
///
/// An empty list places no restriction on that attribute.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Keep only names starting with one of these prefixes.
    pub name_prefixes: Vec<String>,
    /// Keep only projects declared with one of these remotes.
    pub remotes: Vec<String>,
}

impl ProjectFilter {
    pub fn accepts(&self, project: &DeclaredProject) -> bool {
        let name_ok = self.name_prefixes.is_empty()
            || self
                .name_prefixes
                .iter()
                .any(|prefix| project.name.starts_with(prefix.as_str()));
        let remote_ok = self.remotes.is_empty()
            || project
                .remote
                .as_ref()
                .is_some_and(|remote| self.remotes.contains(remote));
        name_ok && remote_ok
    }
}

/// One logical group of revisions aggregated together.
pub struct Namespace {
    pub name: String,
    /// Lower values win when two namespaces declare the same project.
    pub precedence: u32,
    pub source: Box<dyn RevisionSource>,
    /// Source whose revisions are already covered elsewhere and must be skipped.
    pub covered_by: Option<Box<dyn RevisionSource>>,
    pub plan: RevisionPlan,
    /// Follow `<include>` elements within a revision.
    pub follow_includes: bool,
    pub filter: ProjectFilter,
    /// Names added whether or not any revision declares them.
    pub injected: Vec<String>,
    /// Names never emitted for this namespace.
    pub excluded: Vec<String>,
    /// Labels stamped on every project of this namespace.
    pub extra_labels: Vec<String>,
    /// A failed optional namespace may be dropped instead of aborting the run.
    pub optional: bool,
}

impl Namespace {
    pub fn new(name: impl Into<String>, source: impl RevisionSource + 'static) -> Self {
        Self {
            name: name.into(),
            precedence: 0,
            source: Box::new(source),
            covered_by: None,
            plan: RevisionPlan::default(),
            follow_includes: false,
            filter: ProjectFilter::default(),
            injected: Vec::new(),
            excluded: Vec::new(),
            extra_labels: Vec::new(),
            optional: false,
        }
    }

    pub fn precedence(mut self, precedence: u32) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn plan(mut self, plan: RevisionPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn covered_by(mut self, source: impl RevisionSource + 'static) -> Self {
        self.covered_by = Some(Box::new(source));
        self
    }

    pub fn follow_includes(mut self, follow: bool) -> Self {
        self.follow_includes = follow;
        self
    }

    pub fn filter(mut self, filter: ProjectFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn inject<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.injected.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn exclude<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn extra_labels<I: IntoIterator<Item = S>, S: Into<String>>(mut self, labels: I) -> Self {
        self.extra_labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

/// Project set of one namespace as it moves through the phases.
pub struct NamespaceProjects<'a> {
    pub namespace: &'a Namespace,
    pub projects: ProjectSet,
}

/// Knobs of an aggregation run that are not tied to a namespace.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Size of the fetch pool; `None` uses rayon's default.
    pub jobs: Option<usize>,
    /// Show a progress bar while scanning.
    pub progress: bool,
    /// Appended to a project's path when a nested project would collide with it.
    pub path_suffix: String,
    /// Give every project a path, not only the conflicting ones.
    pub explicit_paths: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            jobs: None,
            progress: false,
            path_suffix: crate::defaults::DEFAULT_PATH_SUFFIX.to_string(),
            explicit_paths: false,
        }
    }
}

/// One project of the final manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    /// Checkout path, when it differs from the name or paths are explicit.
    pub path: Option<String>,
    pub groups: GroupLabelSet,
    /// Namespace the project was taken from.
    pub namespace: String,
}

/// Every project of a run, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateManifest {
    pub entries: Vec<ManifestEntry>,
}

impl AggregateManifest {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries
            .binary_search_by(|entry| entry.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.entries[index])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }
}
