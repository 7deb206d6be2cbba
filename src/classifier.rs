//! # Project Classifier
//!
//! Maps a project name to the set of group labels it belongs to. Downstream
//! sync tools use these labels to skip whole families of projects (kernel
//! prebuilts, host toolchains for other platforms, ...).
//!
//! A [`Classifier`] is an ordered list of independent [`Rule`]s. Rules are not
//! mutually exclusive: every rule whose [`Matcher`] accepts the name adds its
//! label. Classification is pure, so the same name always yields the same
//! sorted [`GroupLabelSet`].

use std::collections::BTreeSet;

use glob::Pattern;
use regex::Regex;

use crate::error::{Error, Result};

/// Group labels attached to a project, iterated in sorted order.
pub type GroupLabelSet = BTreeSet<String>;

/// Predicate over a full project name.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The name equals the given string.
    Exact(String),
    /// The name starts with the given string.
    Prefix(String),
    /// The regex matches at the start of the name.
    Regex(Regex),
    /// The whole name matches the glob.
    Glob(Pattern),
}

impl Matcher {
    /// Compile a start-anchored regex matcher.
    ///
    /// The pattern only has to match a prefix of the name, so
    /// `kernel/prebuilts/` accepts `kernel/prebuilts/4.19/arm64`.
    pub fn regex(pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{})", pattern);
        Ok(Matcher::Regex(Regex::new(&anchored)?))
    }

    /// Compile a glob matcher.
    pub fn glob(pattern: &str) -> Result<Self> {
        Ok(Matcher::Glob(Pattern::new(pattern)?))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Exact(expected) => name == expected,
            Matcher::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Matcher::Regex(regex) => regex.is_match(name),
            Matcher::Glob(pattern) => pattern.matches(name),
        }
    }
}

/// A single predicate→label rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub label: String,
    pub matcher: Matcher,
}

impl Rule {
    pub fn new(label: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            label: label.into(),
            matcher,
        }
    }
}

/// Ordered set of classification rules.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Labels for `name`, plus every label in `extra`.
    ///
    /// Names no rule matches simply get `extra` (often nothing).
    pub fn classify(&self, name: &str, extra: &[String]) -> GroupLabelSet {
        let mut groups: GroupLabelSet = extra.iter().cloned().collect();
        for rule in &self.rules {
            if rule.matcher.matches(name) {
                groups.insert(rule.label.clone());
            }
        }
        groups
    }
}

/// Join labels the way the `groups` attribute expects them.
pub fn join_labels(groups: &GroupLabelSet) -> String {
    groups.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

/// Build a rule, mapping compile errors to [`Error::InvalidRule`].
pub fn compile_rule(label: &str, matcher: Result<Matcher>) -> Result<Rule> {
    matcher
        .map(|matcher| Rule::new(label, matcher))
        .map_err(|e| Error::InvalidRule {
            label: label.to_string(),
            message: e.to_string(),
        })
}
