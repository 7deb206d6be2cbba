//! Per-namespace set of project names.

use std::collections::BTreeSet;
use std::ops::Bound;

use crate::path::{descendant_prefix, is_nested_under};

/// Names declared by one namespace, kept in byte-wise order.
///
/// Names are unique but may be nested (`a` and `a/b`); nesting is resolved
/// with a disambiguated path, not by dropping either project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSet {
    names: BTreeSet<String>,
}

impl ProjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. Returns `true` if it was not present yet.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Union `other` into this set.
    pub fn extend<I, S>(&mut self, other: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(other.into_iter().map(Into::into));
    }

    /// Drop every name that `other` also contains. Returns how many were dropped.
    pub fn subtract(&mut self, other: &ProjectSet) -> usize {
        let before = self.names.len();
        self.names.retain(|name| !other.contains(name));
        before - self.names.len()
    }

    /// Whether some other name in the set is nested under `name`.
    ///
    /// Every descendant sorts at or after `name + "/"`, so the first entry of
    /// that range decides.
    pub fn has_descendant(&self, name: &str) -> bool {
        let prefix = descendant_prefix(name);
        self.names
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .next()
            .is_some_and(|candidate| is_nested_under(name, candidate))
    }
}

impl<S: Into<String>> FromIterator<S> for ProjectSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ProjectSet::new();
        set.extend(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = ProjectSet::new();
        assert!(set.insert("platform/build"));
        assert!(!set.insert("platform/build"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let set: ProjectSet = ["b", "a/b", "a", "A"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["A", "a", "a/b", "b"]);
    }

    #[test]
    fn test_has_descendant() {
        let set: ProjectSet = ["a", "a/b"].into_iter().collect();
        assert!(set.has_descendant("a"));
        assert!(!set.has_descendant("a/b"));
    }

    #[test]
    fn test_no_descendant_for_string_prefix() {
        let set: ProjectSet = ["a", "ab"].into_iter().collect();
        assert!(!set.has_descendant("a"));
        assert!(!set.has_descendant("ab"));
    }

    #[test]
    fn test_descendant_found_past_siblings() {
        // "a-b" and "a.b" sort between "a" and "a/" but are not nested
        let set: ProjectSet = ["a", "a-b", "a.b", "a/x/y"].into_iter().collect();
        assert!(set.has_descendant("a"));
        assert!(!set.has_descendant("a-b"));
    }

    #[test]
    fn test_bare_separator_is_a_descendant() {
        let set: ProjectSet = ["a", "a/"].into_iter().collect();
        assert!(set.has_descendant("a"));
        assert!(!set.has_descendant("a/"));
    }

    #[test]
    fn test_subtract() {
        let mut kernel: ProjectSet = ["platform/build", "kernel/prebuilts/foo"].into_iter().collect();
        let platform: ProjectSet = ["platform/build"].into_iter().collect();
        assert_eq!(kernel.subtract(&platform), 1);
        assert_eq!(kernel.iter().collect::<Vec<_>>(), vec!["kernel/prebuilts/foo"]);
    }
}
