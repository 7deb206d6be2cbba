//! Phase 3: Annotation
//!
//! Turns the reconciled project sets into manifest entries. Each surviving
//! project gets its group labels from the classifier (plus its namespace's
//! extra labels) and, when another project of the same namespace lives
//! below it, a disambiguated checkout path. All namespaces are then merged
//! into a single list sorted by name.

use super::{AggregateManifest, AggregateOptions, ManifestEntry, NamespaceProjects};
use crate::classifier::Classifier;
use crate::path::disambiguated_path;

/// Executes Phase 3.
pub fn execute(
    reconciled: &[NamespaceProjects<'_>],
    classifier: &Classifier,
    options: &AggregateOptions,
) -> AggregateManifest {
    let mut entries: Vec<ManifestEntry> = reconciled
        .iter()
        .flat_map(|entry| {
            let namespace = entry.namespace;
            entry.projects.iter().map(move |name| {
                let path = if entry.projects.has_descendant(name) {
                    Some(disambiguated_path(name, &options.path_suffix))
                } else if options.explicit_paths {
                    Some(name.to_string())
                } else {
                    None
                };

                ManifestEntry {
                    name: name.to_string(),
                    path,
                    groups: classifier.classify(name, &namespace.extra_labels),
                    namespace: namespace.name.clone(),
                }
            })
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    AggregateManifest { entries }
}
