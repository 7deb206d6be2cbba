//! Revision eligibility and document selection.
//!
//! A [`RevisionPlan`] decides, before anything is fetched, which revisions of
//! a source are scanned and which manifest document is read for each of
//! them. Upstream repositories are messy: some tags are known to be empty,
//! some are re-published copies of another repository's tags, and some keep
//! their manifest under a per-release file name.
//!
//! Document names may contain the `{revision}` placeholder, which expands to
//! the revision being scanned.

use std::collections::{BTreeMap, BTreeSet};

use crate::defaults::DEFAULT_DOCUMENT;
use crate::repository::RevisionId;

const REVISION_PLACEHOLDER: &str = "{revision}";

/// Declarative allow/deny predicate over revisions plus document selection.
#[derive(Debug, Clone)]
pub struct RevisionPlan {
    document: String,
    documents: BTreeMap<String, String>,
    document_prefixes: BTreeMap<String, String>,
    skip: BTreeSet<String>,
    skip_prefixes: Vec<String>,
    covered: BTreeSet<String>,
    extra_revisions: Vec<RevisionId>,
}

impl Default for RevisionPlan {
    fn default() -> Self {
        Self::new(DEFAULT_DOCUMENT)
    }
}

impl RevisionPlan {
    /// Plan reading `document` from every revision.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            documents: BTreeMap::new(),
            document_prefixes: BTreeMap::new(),
            skip: BTreeSet::new(),
            skip_prefixes: Vec::new(),
            covered: BTreeSet::new(),
            extra_revisions: Vec::new(),
        }
    }

    /// Read `document` instead of the default for exactly `revision`.
    pub fn with_document_for(mut self, revision: impl Into<String>, document: impl Into<String>) -> Self {
        self.documents.insert(revision.into(), document.into());
        self
    }

    /// Read `document` for every revision starting with `prefix`.
    pub fn with_document_prefix(mut self, prefix: impl Into<String>, document: impl Into<String>) -> Self {
        self.document_prefixes.insert(prefix.into(), document.into());
        self
    }

    /// Never scan `revision`.
    pub fn skip_revision(mut self, revision: impl Into<String>) -> Self {
        self.skip.insert(revision.into());
        self
    }

    /// Never scan revisions starting with `prefix`.
    pub fn skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefixes.push(prefix.into());
        self
    }

    /// Skip revisions that another source already publishes.
    pub fn skip_covered<I, S>(mut self, revisions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.covered.extend(revisions.into_iter().map(Into::into));
        self
    }

    /// Always scan `revision`, even if the source does not list it.
    pub fn with_extra_revision(mut self, revision: impl Into<String>) -> Self {
        self.extra_revisions.push(revision.into());
        self
    }

    pub fn is_eligible(&self, revision: &str) -> bool {
        !self.skip.contains(revision)
            && !self.covered.contains(revision)
            && !self
                .skip_prefixes
                .iter()
                .any(|prefix| revision.starts_with(prefix.as_str()))
    }

    /// Document to read at `revision`, or `None` if it must not be scanned.
    ///
    /// Exact overrides win over prefix overrides; among prefixes the longest
    /// match wins.
    pub fn document_for(&self, revision: &str) -> Option<String> {
        if !self.is_eligible(revision) {
            return None;
        }

        let template = self.documents.get(revision).or_else(|| {
            self.document_prefixes
                .iter()
                .filter(|(prefix, _)| revision.starts_with(prefix.as_str()))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, document)| document)
        });

        Some(expand(template.unwrap_or(&self.document), revision))
    }

    /// Eligible revisions out of `listed` plus the extra ones, each paired
    /// with its document, sorted and without duplicates.
    pub fn select(&self, listed: Vec<RevisionId>) -> Vec<(RevisionId, String)> {
        let all: BTreeSet<RevisionId> = listed
            .into_iter()
            .chain(self.extra_revisions.iter().cloned())
            .collect();

        all.into_iter()
            .filter_map(|revision| {
                let document = self.document_for(&revision)?;
                Some((revision, document))
            })
            .collect()
    }
}

fn expand(template: &str, revision: &str) -> String {
    template.replace(REVISION_PLACEHOLDER, revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caf_plan() -> RevisionPlan {
        RevisionPlan::new("{revision}.xml")
            .skip_prefix("android-")
            .skip_revision("M7630AABBQVLZA0020")
            .with_document_for("M7201JSDCBALYA6375", "default.xml")
            .with_document_prefix("AU_LINUX_ANDROID_", "caf_{revision}.xml")
            .skip_covered(["LA.UM.5.1_r1"])
    }

    #[test]
    fn test_default_document() {
        let plan = RevisionPlan::default();
        assert_eq!(plan.document_for("android-14.0.0_r1").as_deref(), Some("default.xml"));
    }

    #[test]
    fn test_skipped_revisions_have_no_document() {
        let plan = caf_plan();
        assert_eq!(plan.document_for("android-4.4_r1"), None);
        assert_eq!(plan.document_for("M7630AABBQVLZA0020"), None);
        assert_eq!(plan.document_for("LA.UM.5.1_r1"), None);
    }

    #[test]
    fn test_document_overrides() {
        let plan = caf_plan();
        assert_eq!(
            plan.document_for("M7201JSDCBALYA6375").as_deref(),
            Some("default.xml")
        );
        assert_eq!(
            plan.document_for("AU_LINUX_ANDROID_LA.BF.1.1.3").as_deref(),
            Some("caf_AU_LINUX_ANDROID_LA.BF.1.1.3.xml")
        );
        assert_eq!(
            plan.document_for("LA.BR.1.3.7").as_deref(),
            Some("LA.BR.1.3.7.xml")
        );
    }

    #[test]
    fn test_longest_prefix_wins() {
        let plan = RevisionPlan::default()
            .with_document_prefix("LA.", "la.xml")
            .with_document_prefix("LA.UM.", "um.xml");
        assert_eq!(plan.document_for("LA.UM.9").as_deref(), Some("um.xml"));
        assert_eq!(plan.document_for("LA.BR.1").as_deref(), Some("la.xml"));
    }

    #[test]
    fn test_select_adds_extra_revisions_and_dedups() {
        let plan = RevisionPlan::default()
            .with_extra_revision("master")
            .skip_revision("broken");
        let selected = plan.select(vec![
            "v2".to_string(),
            "master".to_string(),
            "broken".to_string(),
            "v1".to_string(),
        ]);
        let names: Vec<&str> = selected.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(names, vec!["master", "v1", "v2"]);
    }
}
