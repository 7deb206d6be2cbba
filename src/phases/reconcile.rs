//! Phase 2: Reconciliation
//!
//! Applies the static rules of each namespace to its scanned project set and
//! resolves names declared by more than one namespace.
//!
//! For every namespace, in order:
//! 1. Injected names are added, whether or not any revision declared them.
//! 2. Excluded names are removed.
//! 3. Names already claimed by a namespace of higher precedence (lower
//!    `precedence` value, configuration order breaking ties) are removed.
//!
//! The namespace that wins a shared name keeps it with its own labels; the
//! loser's entry is dropped entirely, labels included.

use log::{debug, info};

use super::NamespaceProjects;
use crate::project_set::ProjectSet;

/// Executes Phase 2 over every scanned namespace.
///
/// Returns the namespaces sorted by precedence.
pub fn execute(mut scanned: Vec<NamespaceProjects<'_>>) -> Vec<NamespaceProjects<'_>> {
    // Stable: equal precedence keeps configuration order
    scanned.sort_by_key(|entry| entry.namespace.precedence);

    let mut claimed = ProjectSet::new();
    for entry in &mut scanned {
        let namespace = entry.namespace;

        for name in &namespace.injected {
            if entry.projects.insert(name.as_str()) {
                debug!("{}: injected {}", namespace.name, name);
            }
        }

        for name in &namespace.excluded {
            if entry.projects.remove(name) {
                debug!("{}: excluded {}", namespace.name, name);
            }
        }

        let dropped = entry.projects.subtract(&claimed);
        if dropped > 0 {
            info!(
                "{}: {} projects already provided by a higher-precedence namespace",
                namespace.name, dropped
            );
        }
        claimed.extend(entry.projects.iter());
    }

    scanned
}
