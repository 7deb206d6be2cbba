//! Orchestrator for the complete aggregation
//!
//! This module turns a configuration into namespaces, prepares their sources
//! and runs the three phases in order to produce an [`AggregateManifest`].

use std::path::Path;

use log::{info, warn};

use super::{
    phase1, phase2, phase3, AggregateManifest, AggregateOptions, Namespace, NamespaceProjects,
    ProjectFilter,
};
use crate::classifier::Classifier;
use crate::config::{Config, NamespaceConfig};
use crate::error::{Error, Result};
use crate::repository::GitRevisionSource;
use crate::revision::RevisionPlan;

/// Run the complete aggregation (Phases 1-3)
///
/// Namespaces are scanned one after the other in precedence order; each
/// scan fetches its own revisions in parallel.
///
/// A namespace whose revisions are all malformed aborts the run, except
/// when it is marked optional and comes last in precedence order. An
/// unavailable source always aborts.
pub fn aggregate(
    namespaces: &[Namespace],
    classifier: &Classifier,
    options: &AggregateOptions,
) -> Result<AggregateManifest> {
    let mut order: Vec<&Namespace> = namespaces.iter().collect();
    order.sort_by_key(|namespace| namespace.precedence);
    let last = order.len().saturating_sub(1);

    // Phase 1: Scanning
    let mut scanned = Vec::with_capacity(order.len());
    for (position, namespace) in order.into_iter().enumerate() {
        match phase1::execute(namespace, options) {
            Ok(projects) => scanned.push(NamespaceProjects {
                namespace,
                projects,
            }),
            Err(Error::NamespaceFailed { namespace: name, reason })
                if namespace.optional && position == last =>
            {
                warn!("Dropping optional namespace '{}': {}", name, reason);
            }
            Err(e) => return Err(e),
        }
    }

    // Phase 2: Reconciliation
    let reconciled = phase2::execute(scanned);

    // Phase 3: Annotation
    let manifest = phase3::execute(&reconciled, classifier, options);
    info!("Aggregated {} projects", manifest.len());
    Ok(manifest)
}

/// Clone or update every source, including the ones used only for coverage.
///
/// Sequential: two namespaces may share a clone directory.
pub fn prepare_sources(namespaces: &[Namespace]) -> Result<()> {
    for namespace in namespaces {
        namespace.source.prepare()?;
        if let Some(cover) = &namespace.covered_by {
            cover.prepare()?;
        }
    }
    Ok(())
}

/// Build the namespaces a configuration describes, backed by git clones
/// under `cache_root`.
pub fn build_namespaces(config: &Config, cache_root: &Path, offline: bool) -> Vec<Namespace> {
    config
        .namespaces
        .iter()
        .enumerate()
        .map(|(index, ns)| {
            let source = GitRevisionSource::new(&ns.source.url, cache_root, ns.source.refs)
                .offline(offline);
            let mut namespace = Namespace::new(&ns.name, source)
                .precedence(config.precedence_of(index))
                .plan(revision_plan(ns))
                .follow_includes(ns.source.follow_includes)
                .filter(ProjectFilter {
                    name_prefixes: ns.filter.name_prefixes.clone(),
                    remotes: ns.filter.remotes.clone(),
                })
                .inject(&ns.inject)
                .exclude(&ns.exclude)
                .extra_labels(&ns.extra_labels)
                .optional(ns.optional);

            if let Some(cover) = &ns.source.skip_revisions_in {
                namespace = namespace.covered_by(
                    GitRevisionSource::new(&cover.url, cache_root, cover.refs).offline(offline),
                );
            }
            namespace
        })
        .collect()
}

fn revision_plan(ns: &NamespaceConfig) -> RevisionPlan {
    let source = &ns.source;
    let mut plan = RevisionPlan::new(&source.document);
    for (revision, document) in &source.documents {
        plan = plan.with_document_for(revision, document);
    }
    for (prefix, document) in &source.document_prefixes {
        plan = plan.with_document_prefix(prefix, document);
    }
    for revision in &source.skip_revisions {
        plan = plan.skip_revision(revision);
    }
    for prefix in &source.skip_prefixes {
        plan = plan.skip_prefix(prefix);
    }
    for revision in &source.extra_revisions {
        plan = plan.with_extra_revision(revision);
    }
    plan
}

/// Aggregation options taken from the configuration.
pub fn options_from_config(config: &Config) -> AggregateOptions {
    AggregateOptions {
        jobs: config.jobs,
        path_suffix: config.path_suffix.clone(),
        explicit_paths: config.explicit_paths,
        ..AggregateOptions::default()
    }
}

/// Execute the complete generate operation
///
/// 1. Build the namespaces of `config`
/// 2. Clone or update their sources under `cache_root`
/// 3. Aggregate them into one manifest
pub fn execute_generate(
    config: &Config,
    cache_root: &Path,
    offline: bool,
    options: &AggregateOptions,
) -> Result<AggregateManifest> {
    let classifier = config.classifier()?;
    let namespaces = build_namespaces(config, cache_root, offline);
    prepare_sources(&namespaces)?;
    aggregate(&namespaces, &classifier, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemorySource;
    use tempfile::TempDir;

    fn broken(name: &str) -> MemorySource {
        MemorySource::new(name).with_document("v1", "default.xml", "<manifest>")
    }

    #[test]
    fn test_optional_last_namespace_is_dropped() {
        let namespaces = vec![
            Namespace::new("platform", MemorySource::new("p").with_projects("v1", &["a"])),
            Namespace::new("extra", broken("e")).precedence(1).optional(true),
        ];

        let manifest =
            aggregate(&namespaces, &Classifier::default(), &AggregateOptions::default()).unwrap();
        assert_eq!(manifest.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_optional_namespace_not_last_is_fatal() {
        let namespaces = vec![
            Namespace::new("extra", broken("e")).optional(true),
            Namespace::new("platform", MemorySource::new("p").with_projects("v1", &["a"]))
                .precedence(1),
        ];

        let err = aggregate(&namespaces, &Classifier::default(), &AggregateOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::NamespaceFailed { .. }));
    }

    #[test]
    fn test_required_namespace_failure_is_fatal() {
        let namespaces = vec![
            Namespace::new("platform", MemorySource::new("p").with_projects("v1", &["a"])),
            Namespace::new("kernel", broken("k")).precedence(1),
        ];

        let err = aggregate(&namespaces, &Classifier::default(), &AggregateOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("kernel"));
    }

    #[test]
    fn test_unavailable_optional_source_is_still_fatal() {
        let namespaces = vec![
            Namespace::new("platform", MemorySource::new("p").with_projects("v1", &["a"])),
            Namespace::new("extra", MemorySource::unavailable("down"))
                .precedence(1)
                .optional(true),
        ];

        let err = aggregate(&namespaces, &Classifier::default(), &AggregateOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_build_namespaces_from_config() {
        let config = crate::config::parse(
            r#"
remote: { name: caf, fetch: "https://git.codelinaro.org/clo/la/" }
path_suffix: "_git"
explicit_paths: true
jobs: 8
namespaces:
  - name: caf
    source:
      url: https://git.codelinaro.org/clo/la/platform/manifest
      document: "{revision}.xml"
      documents: { M7201JSDCBALYA6375: default.xml }
      document_prefixes: { AU_LINUX_ANDROID_: "caf_{revision}.xml" }
      skip_revisions: [M7630AABBQVLZA0020]
      skip_prefixes: [android-]
      skip_revisions_in: { url: https://android.googlesource.com/platform/manifest }
  - name: second
    precedence: 0
    optional: true
    source: { url: /srv/second }
    inject: [x]
"#,
        )
        .unwrap();
        let temp = TempDir::new().unwrap();
        let namespaces = build_namespaces(&config, temp.path(), true);

        assert_eq!(namespaces.len(), 2);
        let caf = &namespaces[0];
        assert_eq!(caf.name, "caf");
        assert_eq!(caf.precedence, 0);
        assert!(caf.covered_by.is_some());
        assert_eq!(caf.plan.document_for("android-4.4_r1"), None);
        assert_eq!(caf.plan.document_for("M7630AABBQVLZA0020"), None);
        assert_eq!(
            caf.plan.document_for("AU_LINUX_ANDROID_X").as_deref(),
            Some("caf_AU_LINUX_ANDROID_X.xml")
        );
        assert_eq!(
            caf.plan.document_for("LA.BR.1").as_deref(),
            Some("LA.BR.1.xml")
        );

        let second = &namespaces[1];
        assert_eq!(second.precedence, 0);
        assert!(second.optional);
        assert_eq!(second.injected, vec!["x"]);

        let options = options_from_config(&config);
        assert_eq!(options.jobs, Some(8));
        assert_eq!(options.path_suffix, "_git");
        assert!(options.explicit_paths);
    }

    #[test]
    fn test_offline_without_cache_is_unavailable() {
        let config = crate::config::parse(
            "remote: { name: aosp, fetch: '..' }\nnamespaces:\n  - { name: a, source: { url: 'https://example.invalid/manifest' } }\n",
        )
        .unwrap();
        let temp = TempDir::new().unwrap();

        let err = execute_generate(&config, temp.path(), true, &AggregateOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_prepare_memory_sources() {
        let namespaces = vec![Namespace::new("a", MemorySource::new("a"))
            .covered_by(MemorySource::new("cover"))];
        assert!(prepare_sources(&namespaces).is_ok());
    }
}
