//! Phase 1: Scanning
//!
//! This is the first phase of the aggregation pipeline. For one namespace it
//! turns "every revision of a manifest repository" into the set of project
//! names those revisions declare.
//!
//! ## Process
//!
//! 1.  **Listing**: Ask the namespace's source for its revisions. A source
//!     that cannot list anything aborts the run.
//! 2.  **Selection**: Apply the namespace's [`RevisionPlan`] before any fetch,
//!     dropping broken or already-covered revisions and choosing the document
//!     to read for each remaining one. Eligible revisions that point at the
//!     same commit and read the same document are scanned once.
//! 3.  **Parallel Fetching**: Fetch and parse every selected revision on a
//!     rayon pool. Documents named by `<include>` are followed within the same
//!     revision when the namespace asks for it.
//! 4.  **Union**: Fold the per-revision results into the namespace's
//!     [`ProjectSet`] on the calling thread. Set union does not care about
//!     order, so the parallel fetch cannot change the result.
//!
//! Per-revision problems stay per-revision: an absent document contributes
//! nothing, a malformed one is logged and contributes nothing. Only when no
//! revision yields a well-formed document does the namespace fail.
//!
//! [`RevisionPlan`]: crate::revision::RevisionPlan

use std::collections::{HashMap, HashSet, VecDeque};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;

use super::{AggregateOptions, Namespace};
use crate::document::{parse_document, DeclaredProject};
use crate::error::{Error, Result};
use crate::project_set::ProjectSet;
use crate::repository::{RevisionId, RevisionSource};

/// What one revision contributed.
#[derive(Debug)]
pub enum RevisionOutcome {
    /// The document(s) parsed; `missing_includes` were named but absent.
    Parsed {
        projects: Vec<DeclaredProject>,
        missing_includes: Vec<String>,
    },
    /// The revision has no such document.
    Absent,
    /// A document of the revision is not well-formed.
    Malformed(Error),
}

/// Executes Phase 1 for one namespace.
pub fn execute(namespace: &Namespace, options: &AggregateOptions) -> Result<ProjectSet> {
    let selected = select_revisions(namespace)?;
    let outcomes = fetch_all(namespace, &selected, options)?;
    fold_outcomes(namespace, outcomes)
}

/// List the namespace's revisions and pair each eligible one with the
/// document to read from it. Nothing is fetched.
pub fn select_revisions(namespace: &Namespace) -> Result<Vec<(RevisionId, String)>> {
    let listed = namespace.source.list_commits()?;
    let listed_count = listed.len();
    let mut commits = HashMap::new();
    let mut names = Vec::with_capacity(listed_count);
    for (revision, commit) in listed {
        if let Some(commit) = commit {
            commits.insert(revision.clone(), commit);
        }
        names.push(revision);
    }

    let plan = match &namespace.covered_by {
        Some(cover) => {
            let covered = cover.list_revisions()?;
            debug!(
                "{}: {} revisions are covered by {}",
                namespace.name,
                covered.len(),
                cover.describe()
            );
            namespace.plan.clone().skip_covered(covered)
        }
        None => namespace.plan.clone(),
    };

    let eligible = plan.select(names);
    let eligible_count = eligible.len();
    let mut seen = HashSet::new();
    let selected: Vec<(RevisionId, String)> = eligible
        .into_iter()
        .filter(|(revision, document)| match commits.get(revision) {
            Some(commit) => seen.insert((commit.clone(), document.clone())),
            None => true,
        })
        .collect();
    if selected.len() < eligible_count {
        debug!(
            "{}: {} revisions repeat a commit already scanned",
            namespace.name,
            eligible_count - selected.len()
        );
    }

    info!(
        "{}: scanning {} of {} revisions from {}",
        namespace.name,
        selected.len(),
        listed_count,
        namespace.source.describe()
    );
    Ok(selected)
}

/// Fetch every selected revision, in parallel.
///
/// Collecting into a `Result` stops handing out new fetches after the first
/// fatal error.
fn fetch_all(
    namespace: &Namespace,
    selected: &[(RevisionId, String)],
    options: &AggregateOptions,
) -> Result<Vec<(RevisionId, RevisionOutcome)>> {
    let progress = progress_bar(selected.len() as u64, options.progress);
    let source = namespace.source.as_ref();
    let follow = namespace.follow_includes;

    let fetch = || {
        selected
            .par_iter()
            .map(|(revision, document)| {
                let outcome = scan_revision(source, revision, document, follow);
                progress.inc(1);
                outcome.map(|outcome| (revision.clone(), outcome))
            })
            .collect::<Result<Vec<_>>>()
    };

    let result = match options.jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| Error::ThreadPool {
                message: e.to_string(),
            })?
            .install(fetch),
        None => fetch(),
    };
    progress.finish_and_clear();
    result
}

fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_bar} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Read `document` at `revision`, following includes when asked to.
///
/// Only errors that are not scoped to this revision are returned as `Err`.
/// A git failure while reading a document counts as a malformed document.
pub fn scan_revision(
    source: &dyn RevisionSource,
    revision: &str,
    document: &str,
    follow_includes: bool,
) -> Result<RevisionOutcome> {
    let mut queue = VecDeque::from([document.to_string()]);
    let mut visited = HashSet::new();
    let mut projects = Vec::new();
    let mut missing_includes = Vec::new();

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }

        // A document git cannot read (a tree, a corrupt object) only breaks
        // this revision
        let fetched = match source.fetch_document(revision, &current) {
            Ok(fetched) => fetched,
            Err(e @ Error::GitCommand { .. }) => {
                return Ok(RevisionOutcome::Malformed(Error::MalformedDocument {
                    revision: revision.to_string(),
                    document: current,
                    message: e.to_string(),
                }));
            }
            Err(e) => return Err(e),
        };
        let Some(bytes) = fetched else {
            if current == document {
                return Ok(RevisionOutcome::Absent);
            }
            missing_includes.push(current);
            continue;
        };

        let parsed = match parse_document(revision, &current, &bytes) {
            Ok(parsed) => parsed,
            Err(e) if e.is_revision_scoped() => return Ok(RevisionOutcome::Malformed(e)),
            Err(e) => return Err(e),
        };

        projects.extend(parsed.projects);
        if follow_includes {
            queue.extend(parsed.includes);
        }
    }

    Ok(RevisionOutcome::Parsed {
        projects,
        missing_includes,
    })
}

/// Union the outcomes into the namespace's project set, logging as it goes.
fn fold_outcomes(
    namespace: &Namespace,
    outcomes: Vec<(RevisionId, RevisionOutcome)>,
) -> Result<ProjectSet> {
    let total = outcomes.len();
    let mut projects = ProjectSet::new();
    let mut parsed_count = 0;
    let mut malformed = Vec::new();

    for (index, (revision, outcome)) in outcomes.into_iter().enumerate() {
        match outcome {
            RevisionOutcome::Parsed {
                projects: declared,
                missing_includes,
            } => {
                parsed_count += 1;
                let before = projects.len();
                projects.extend(
                    declared
                        .into_iter()
                        .filter(|project| namespace.filter.accepts(project))
                        .map(|project| project.name),
                );
                debug!(
                    "[{}/{}] {}: {} new projects",
                    index + 1,
                    total,
                    revision,
                    projects.len() - before
                );
                for document in missing_includes {
                    warn!(
                        "{}",
                        Error::MissingInclude {
                            revision: revision.clone(),
                            document,
                        }
                    );
                }
            }
            RevisionOutcome::Absent => {
                warn!("[{}/{}] {}: no manifest document, skipping", index + 1, total, revision);
            }
            RevisionOutcome::Malformed(error) => {
                warn!("[{}/{}] {}", index + 1, total, error);
                malformed.push(error);
            }
        }
    }

    if parsed_count == 0 && !malformed.is_empty() {
        let reason = if malformed.len() == 1 {
            malformed[0].to_string()
        } else {
            format!("all {} revisions are malformed", malformed.len())
        };
        return Err(Error::NamespaceFailed {
            namespace: namespace.name.clone(),
            reason,
        });
    }

    info!(
        "{}: {} projects across {} revisions",
        namespace.name,
        projects.len(),
        parsed_count
    );
    Ok(projects)
}
